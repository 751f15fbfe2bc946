use crate::{
    apis::{DataServerApi, HomeApi, PointApi, StreamApi},
    auth::{resolve_credentials, Authentication},
    config::ClientConfig,
    connectivity::test_connectivity,
    error::{PiWebApiError, PiWebApiResult},
    logging::Logger,
    models::ErrorResponse,
};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use url::Url;

/// Main PI Web API client
#[derive(Clone)]
pub struct PiWebApiClient {
    client: Client,
    base_url: Url,
    auth: Arc<dyn Authentication>,
    logger: Logger,
}

impl PiWebApiClient {
    /// Create a new PI Web API client with authentication
    pub fn new(
        base_url: impl AsRef<str>,
        auth: impl Authentication + 'static,
    ) -> PiWebApiResult<Self> {
        Self::with_client(Self::build_http_client(true)?, base_url, Arc::new(auth))
    }

    /// Create a new PI Web API client with custom reqwest client
    pub fn with_client(
        client: Client,
        base_url: impl AsRef<str>,
        auth: Arc<dyn Authentication>,
    ) -> PiWebApiResult<Self> {
        let base_url = normalize_base_url(base_url.as_ref())?;

        Ok(Self {
            client,
            base_url,
            auth,
            logger: Logger::global(),
        })
    }

    /// Build a client from configuration, resolving the auth scheme by name
    pub fn from_config(config: &ClientConfig) -> PiWebApiResult<Self> {
        Self::from_config_with_logger(config, Logger::global())
    }

    /// Same as [`from_config`](Self::from_config) with an injected logger
    pub fn from_config_with_logger(config: &ClientConfig, logger: Logger) -> PiWebApiResult<Self> {
        logger.info(format_args!(
            "Creating PI Web API client: URL: {}, VerifySSL: {}, AuthType: {}, Username: {}",
            config.url,
            config.verify_ssl,
            config.auth_type,
            config.username.as_deref().unwrap_or("-")
        ));
        let auth = resolve_credentials(
            &config.auth_type,
            config.username.as_deref(),
            config.password.as_deref(),
            &logger,
        );
        let client = Self::build_http_client(config.verify_ssl)?;
        Ok(Self::with_client(client, &config.url, auth)?.with_logger(logger))
    }

    /// Build from configuration and check connectivity once.
    ///
    /// The client is returned even when the service is unreachable; the
    /// outcome is only logged.
    pub async fn connect(config: &ClientConfig, logger: Logger) -> PiWebApiResult<Self> {
        let client = Self::from_config_with_logger(config, logger)?;
        if client.is_reachable().await {
            client.logger.info(format_args!(
                "PI Web API client ready using {} against {}",
                client.auth.scheme(),
                client.base_url
            ));
        } else {
            client.logger.error(format_args!(
                "PI Web API client could not reach {} using {}",
                client.base_url,
                client.auth.scheme()
            ));
        }
        Ok(client)
    }

    /// Replace the logger used by this client and its APIs
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    fn build_http_client(verify_ssl: bool) -> PiWebApiResult<Client> {
        let client = Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .danger_accept_invalid_certs(!verify_ssl)
            .build()?;
        Ok(client)
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Get the service root API
    pub fn home(&self) -> HomeApi<'_> {
        HomeApi::new(self)
    }

    /// Get Data Server API
    pub fn data_servers(&self) -> DataServerApi<'_> {
        DataServerApi::new(self)
    }

    /// Get Point search API
    pub fn points(&self) -> PointApi<'_> {
        PointApi::new(self)
    }

    /// Get Stream (value retrieval) API
    pub fn streams(&self) -> StreamApi<'_> {
        StreamApi::new(self)
    }

    /// One GET against the base URL; any HTTP answer counts as reachable
    pub async fn is_reachable(&self) -> bool {
        test_connectivity(&self.client, &self.base_url, &self.logger).await
    }

    /// Build a request to a path relative to the base URL, with authentication
    pub async fn request(
        &self,
        method: reqwest::Method,
        path: &str,
    ) -> PiWebApiResult<RequestBuilder> {
        let url = self.base_url.join(path.trim_start_matches('/'))?;
        self.request_url(method, url).await
    }

    /// Build a request to an absolute URL, with authentication
    pub async fn request_url(
        &self,
        method: reqwest::Method,
        url: Url,
    ) -> PiWebApiResult<RequestBuilder> {
        let mut request = self.client.request(method, url);

        // Apply authentication
        let mut headers = reqwest::header::HeaderMap::new();
        self.auth.apply_auth(&mut headers).await?;

        for (name, value) in headers.iter() {
            request = request.header(name, value);
        }

        Ok(request)
    }

    /// Execute a request and handle common error cases
    pub async fn execute<T>(&self, request: RequestBuilder) -> PiWebApiResult<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = request.send().await?;
        self.handle_response(response).await
    }

    /// Handle response and deserialize JSON
    async fn handle_response<T>(&self, response: Response) -> PiWebApiResult<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let status = response.status();

        if status.is_success() {
            let json = response.json::<T>().await?;
            Ok(json)
        } else {
            self.handle_error_response(status, response).await
        }
    }

    /// Handle error responses
    async fn handle_error_response<T>(&self, status: StatusCode, response: Response) -> PiWebApiResult<T> {
        // Try to parse error response
        let error_message = match response.json::<ErrorResponse>().await {
            Ok(error_resp) => error_resp
                .summary()
                .unwrap_or_else(|| format!("HTTP {}", status)),
            Err(_) => format!("HTTP {}", status),
        };
        self.logger.debug(format_args!("HTTP {} - {}", status, error_message));

        match status {
            StatusCode::UNAUTHORIZED => Err(PiWebApiError::auth_error(error_message)),
            StatusCode::FORBIDDEN => Err(PiWebApiError::PermissionDenied(error_message)),
            StatusCode::NOT_FOUND => Err(PiWebApiError::NotFound(error_message)),
            StatusCode::BAD_REQUEST => Err(PiWebApiError::invalid_param(error_message)),
            _ => Err(PiWebApiError::api_error(status.as_u16(), error_message)),
        }
    }
}

impl std::fmt::Debug for PiWebApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PiWebApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("auth", &self.auth.scheme())
            .finish_non_exhaustive()
    }
}

/// Parse the base URL and make sure its path ends with `/`, so relative
/// joins keep prefixes like `/piwebapi`
fn normalize_base_url(base_url: &str) -> PiWebApiResult<Url> {
    let mut url = Url::parse(base_url)?;
    if url.cannot_be_a_base() {
        return Err(PiWebApiError::invalid_param(format!(
            "Base URL cannot carry paths: {}",
            base_url
        )));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod url_tests {
    use super::normalize_base_url;

    #[test]
    fn base_url_keeps_its_path() {
        let url = normalize_base_url("https://pi.example.com/piwebapi").unwrap();
        assert_eq!(url.as_str(), "https://pi.example.com/piwebapi/");
        assert_eq!(
            url.join("dataservers").unwrap().as_str(),
            "https://pi.example.com/piwebapi/dataservers"
        );
    }

    #[test]
    fn trailing_slash_is_not_doubled() {
        let url = normalize_base_url("https://pi.example.com/piwebapi/").unwrap();
        assert_eq!(url.as_str(), "https://pi.example.com/piwebapi/");
    }
}
