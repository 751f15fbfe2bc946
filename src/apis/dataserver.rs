use crate::{
    client::PiWebApiClient,
    error::PiWebApiResult,
    mapper::{map_items, map_server},
    models::{DataServer, ItemsEnvelope},
};
use reqwest::Method;

/// PI Data Archive server operations
pub struct DataServerApi<'a> {
    client: &'a PiWebApiClient,
}

impl<'a> DataServerApi<'a> {
    pub fn new(client: &'a PiWebApiClient) -> Self {
        Self { client }
    }

    /// List all PI Data Archive servers.
    ///
    /// Records that cannot be mapped are logged and left out.
    pub async fn list(&self) -> PiWebApiResult<Vec<DataServer>> {
        let logger = self.client.logger();
        logger.info(format_args!("Retrieving all PI Data Archive servers from {}", self.client.base_url()));
        let req = self.client.request(Method::GET, "dataservers").await?;
        logger.debug(format_args!("HTTP GET dataservers"));

        let envelope: ItemsEnvelope = self.client.execute(req).await?;
        logger.debug(format_args!("Staging {} PI server(s) for mapping", envelope.items.len()));
        let servers = map_items(&envelope.items, logger, map_server);
        logger.debug(format_args!("{} PI server(s) were found and mapped", servers.len()));

        Ok(servers)
    }

    /// Find a PI Data Archive server by name
    ///
    /// # Arguments
    /// * `name` - Server name, compared exactly
    pub async fn get_by_name(&self, name: &str) -> PiWebApiResult<Option<DataServer>> {
        let logger = self.client.logger();
        logger.info(format_args!("Getting PI Data Archive server named \"{}\"", name));
        let server = self.list().await?.into_iter().find(|s| s.name == name);

        match &server {
            Some(s) => logger.debug(format_args!("Found PI Data Archive \"{}\" with WebID \"{}\"", s.name, s.web_id)),
            None => logger.warn(format_args!("No PI Data Archive named \"{}\" was found on {}", name, self.client.base_url())),
        }

        Ok(server)
    }
}
