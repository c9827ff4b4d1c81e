// Coach login gate.

use tracing::{info, warn};

/// Top-level views the gate routes between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    Roster,
}

/// Unauthenticated sessions always land on the login view; authenticated
/// sessions are sent away from it.
pub fn resolve_route(authenticated: bool, requested: View) -> View {
    match (authenticated, requested) {
        (false, _) => View::Login,
        (true, View::Login) => View::Roster,
        (true, view) => view,
    }
}

/// Holds the configured coach password. With no password configured every
/// session counts as logged in.
#[derive(Debug, Clone)]
pub struct IdentityGate {
    password: Option<String>,
    authenticated: bool,
}

impl IdentityGate {
    pub fn new(password: Option<&str>) -> Self {
        IdentityGate {
            password: password.map(str::to_string),
            authenticated: password.is_none(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn requires_login(&self) -> bool {
        self.password.is_some()
    }

    /// Check a password attempt. Returns whether the session is now
    /// authenticated.
    pub fn login(&mut self, attempt: &str) -> bool {
        match &self.password {
            None => true,
            Some(expected) if expected == attempt => {
                self.authenticated = true;
                info!("coach logged in");
                true
            }
            Some(_) => {
                warn!("rejected login attempt");
                false
            }
        }
    }

    pub fn logout(&mut self) {
        if self.password.is_some() {
            self.authenticated = false;
            info!("coach logged out");
        }
    }

    pub fn route(&self, requested: View) -> View {
        resolve_route(self.authenticated, requested)
    }
}
