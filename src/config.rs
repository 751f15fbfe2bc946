use serde::{Deserialize, Serialize};
use std::fmt;

fn default_verify_ssl() -> bool {
    true
}

fn default_auth_type() -> String {
    "kerberos".to_string()
}

/// Settings needed to build a [`PiWebApiClient`](crate::PiWebApiClient)
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the service, e.g. `https://host/piwebapi`
    pub url: String,
    #[serde(default = "default_verify_ssl")]
    pub verify_ssl: bool,
    /// `basic` or `kerberos`; anything else is treated as `basic`
    #[serde(default = "default_auth_type")]
    pub auth_type: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl ClientConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            verify_ssl: default_verify_ssl(),
            auth_type: default_auth_type(),
            username: None,
            password: None,
        }
    }

    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth_type = "basic".to_string();
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn auth_type(mut self, auth_type: impl Into<String>) -> Self {
        self.auth_type = auth_type.into();
        self
    }

    pub fn verify_ssl(mut self, verify: bool) -> Self {
        self.verify_ssl = verify;
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("url", &self.url)
            .field("verify_ssl", &self.verify_ssl)
            .field("auth_type", &self.auth_type)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}
