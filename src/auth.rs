use crate::config::AuthSettings;
use tracing::{info, warn};

pub const MAX_LOGIN_ATTEMPTS: usize = 3;

pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn verify(&self, username: &str, password: &str) -> bool {
        let ok = username == self.username && password == self.password;
        if ok {
            info!("User authenticated successfully");
        } else {
            warn!("Invalid login attempt");
        }
        ok
    }
}

impl From<&AuthSettings> for Credentials {
    fn from(settings: &AuthSettings) -> Self {
        Credentials::new(settings.username.clone(), settings.password.clone())
    }
}
