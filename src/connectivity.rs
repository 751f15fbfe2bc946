use reqwest::Client;
use url::Url;

use crate::logging::Logger;

/// Issue one GET against `url` and report whether the server answered.
///
/// Any HTTP status counts as reachable; only transport failures (DNS,
/// connect, TLS, timeout) yield `false`. Failures are logged, never returned.
pub async fn test_connectivity(client: &Client, url: &Url, logger: &Logger) -> bool {
    logger.debug(format_args!("Testing connectivity to {}", url));
    match client.get(url.clone()).send().await {
        Ok(response) => {
            logger.debug(format_args!(
                "HTTP {} - {} is reachable",
                response.status(),
                url
            ));
            true
        }
        Err(e) => {
            logger.error(format_args!("Unable to reach {}: {}", url, e));
            false
        }
    }
}
