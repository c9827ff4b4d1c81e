pub mod app;
pub mod export;
pub mod fallback;
pub mod feed;
pub mod protocol;
