use crate::{
    client::PiWebApiClient,
    error::PiWebApiResult,
    models::HomeDocument,
};
use reqwest::Method;

/// Service root operations
pub struct HomeApi<'a> {
    client: &'a PiWebApiClient,
}

impl<'a> HomeApi<'a> {
    pub fn new(client: &'a PiWebApiClient) -> Self {
        Self { client }
    }

    /// Get the root document and its `Links` (`Self`, `Search`, `DataServers`, ...)
    pub async fn get(&self) -> PiWebApiResult<HomeDocument> {
        self.client.logger().info(format_args!("Getting PI Web API root from {}", self.client.base_url()));
        let req = self.client.request(Method::GET, "").await?;

        self.client.execute(req).await
    }

    /// Get the indexed search root as raw JSON
    pub async fn search_root(&self) -> PiWebApiResult<serde_json::Value> {
        self.client.logger().info(format_args!("Getting search root"));
        let req = self.client.request(Method::GET, "search").await?;
        self.client.logger().debug(format_args!("HTTP GET search"));

        self.client.execute(req).await
    }
}
