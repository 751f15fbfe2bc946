use crate::error::{PiWebApiError, PiWebApiResult};
use crate::logging::Logger;
use base64::{Engine, engine::general_purpose};
use std::str::FromStr;
use std::sync::Arc;

/// Authentication trait for PI Web API
#[async_trait::async_trait]
pub trait Authentication: Send + Sync {
    /// Apply authentication to the request headers
    async fn apply_auth(&self, headers: &mut reqwest::header::HeaderMap) -> PiWebApiResult<()>;

    /// Short scheme name for log lines
    fn scheme(&self) -> &'static str;
}

/// Basic authentication using username/password
#[derive(Clone)]
pub struct BasicAuth {
    username: String,
    password: String,
}

impl BasicAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

impl std::fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[async_trait::async_trait]
impl Authentication for BasicAuth {
    async fn apply_auth(&self, headers: &mut reqwest::header::HeaderMap) -> PiWebApiResult<()> {
        let credentials = format!("{}:{}", self.username, self.password);
        let encoded = general_purpose::STANDARD.encode(credentials.as_bytes());
        let auth_value = format!("Basic {}", encoded);

        headers.insert(
            reqwest::header::AUTHORIZATION,
            auth_value.parse()
                .map_err(|e| PiWebApiError::auth_error(format!("Invalid auth header: {}", e)))?
        );

        Ok(())
    }

    fn scheme(&self) -> &'static str {
        "basic"
    }
}

/// Kerberos / SPNEGO negotiated authentication.
///
/// The SPNEGO token has to be acquired from the OS ticket cache by the
/// caller. Without a token every request fails locally with
/// [`PiWebApiError::Auth`] before anything is sent.
#[derive(Debug, Clone, Default)]
pub struct NegotiateAuth {
    token: Option<String>,
}

impl NegotiateAuth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }
}

#[async_trait::async_trait]
impl Authentication for NegotiateAuth {
    async fn apply_auth(&self, headers: &mut reqwest::header::HeaderMap) -> PiWebApiResult<()> {
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| PiWebApiError::auth_error("no Negotiate token available"))?;
        let auth_value = format!("Negotiate {}", token);
        headers.insert(
            reqwest::header::AUTHORIZATION,
            auth_value.parse()
                .map_err(|e| PiWebApiError::auth_error(format!("Invalid auth header: {}", e)))?
        );

        Ok(())
    }

    fn scheme(&self) -> &'static str {
        "negotiate"
    }
}

/// No authentication
#[derive(Debug, Clone)]
pub struct NoAuth;

#[async_trait::async_trait]
impl Authentication for NoAuth {
    async fn apply_auth(&self, _headers: &mut reqwest::header::HeaderMap) -> PiWebApiResult<()> {
        Ok(())
    }

    fn scheme(&self) -> &'static str {
        "none"
    }
}

/// Authentication schemes selectable by name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthType {
    Basic,
    Kerberos,
}

impl FromStr for AuthType {
    type Err = PiWebApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(AuthType::Basic),
            "kerberos" | "negotiate" | "negotiated" => Ok(AuthType::Kerberos),
            other => Err(PiWebApiError::invalid_param(format!("Unknown auth type: {}", other))),
        }
    }
}

/// Resolve a scheme name and optional credentials into an authentication handle.
///
/// Unknown scheme names fall back to basic authentication.
pub fn resolve_credentials(
    auth_type: &str,
    username: Option<&str>,
    password: Option<&str>,
    logger: &Logger,
) -> Arc<dyn Authentication> {
    let scheme = auth_type.parse::<AuthType>().unwrap_or_else(|e| {
        logger.warn(format_args!("{}; falling back to basic authentication", e));
        AuthType::Basic
    });

    match scheme {
        AuthType::Kerberos => {
            logger.warn(format_args!(
                "Negotiated (Kerberos) authentication selected without a token; \
                 requests will fail until one is supplied through NegotiateAuth::with_token"
            ));
            Arc::new(NegotiateAuth::new())
        }
        AuthType::Basic => {
            let username = username.unwrap_or_default();
            logger.debug(format_args!("Using basic authentication for user {}", username));
            Arc::new(BasicAuth::new(username, password.unwrap_or_default()))
        }
    }
}
