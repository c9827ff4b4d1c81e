// Library root: domain model, roster board and local persistence for the
// tryout roster assistant.

pub mod auth;
pub mod board;
pub mod config;
pub mod db;
pub mod drag;
pub mod filter;
pub mod notify;
pub mod persist;
pub mod player;
pub mod position;
pub mod session;
