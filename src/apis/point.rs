use crate::{
    client::PiWebApiClient,
    error::{PiWebApiError, PiWebApiResult},
    mapper::{map_items, map_point},
    models::{ItemsEnvelope, Point},
};
use reqwest::Method;

/// Default number of search hits requested
pub const DEFAULT_SEARCH_COUNT: u32 = 10;

/// PI point search operations
pub struct PointApi<'a> {
    client: &'a PiWebApiClient,
}

impl<'a> PointApi<'a> {
    pub fn new(client: &'a PiWebApiClient) -> Self {
        Self { client }
    }

    /// Find points through the indexed search
    ///
    /// # Arguments
    /// * `query` - Search expression, e.g. `name:sinusoid`
    /// * `count` - Maximum number of hits
    /// * `scope` - Search scope, e.g. `pi:myserver` or `*`
    ///
    /// Returned points carry no values yet. Entries of the upstream `Errors`
    /// array are logged as warnings; they only fail the call when no point
    /// came back at all.
    pub async fn search(&self, query: &str, count: u32, scope: &str) -> PiWebApiResult<Vec<Point>> {
        let logger = self.client.logger();
        logger.info(format_args!("Searching PI points: query \"{}\", count {}, scope \"{}\"", query, count, scope));
        let req = self.client.request(Method::GET, "search/query").await?;
        let req = req.query(&[("q", query), ("scope", scope)]).query(&[("count", count)]);
        logger.debug(format_args!("HTTP GET search/query?q={}&count={}&scope={}", query, count, scope));

        let envelope: ItemsEnvelope = self.client.execute(req).await?;
        logger.debug(format_args!("Staging {} PI point(s) for mapping", envelope.items.len()));
        let points = map_items(&envelope.items, logger, map_point);
        logger.debug(format_args!("{} PI point(s) were found and mapped", points.len()));

        for error in &envelope.errors {
            logger.warn(format_args!("PI Web API returned an error while searching PI points. {}", error));
        }
        if points.is_empty() && !envelope.errors.is_empty() {
            return Err(PiWebApiError::Upstream(envelope.errors));
        }

        Ok(points)
    }

    /// Search with the default count and an unrestricted scope
    pub async fn find(&self, query: &str) -> PiWebApiResult<Vec<Point>> {
        self.search(query, DEFAULT_SEARCH_COUNT, "*").await
    }
}
