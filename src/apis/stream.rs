use crate::{
    aggregate::{reconcile, stream_endpoint, ValueUpdateReport},
    client::PiWebApiClient,
    error::{PiWebApiError, PiWebApiResult},
    mapper::parse_values,
    models::{CalculationType, MergePolicy, Point, Value, ValueQuery},
};
use reqwest::Method;

/// Stream value retrieval operations
pub struct StreamApi<'a> {
    client: &'a PiWebApiClient,
}

impl<'a> StreamApi<'a> {
    pub fn new(client: &'a PiWebApiClient) -> Self {
        Self { client }
    }

    /// Fetch one point's values for a calculation type without storing them
    ///
    /// # Arguments
    /// * `point` - Point whose WebID addresses the stream
    /// * `calculation_type` - Which stream endpoint to read
    /// * `query` - Optional time range / interval parameters
    pub async fn fetch_values(
        &self,
        point: &Point,
        calculation_type: CalculationType,
        query: &ValueQuery,
    ) -> PiWebApiResult<Vec<Value>> {
        let logger = self.client.logger();
        let endpoint = stream_endpoint(self.client.base_url(), &point.web_id, calculation_type)?;
        logger.debug(format_args!("Retrieving {} data for {} from {}", calculation_type, point.name, endpoint));

        let mut req = self.client.request_url(Method::GET, endpoint).await?;
        if !query.is_empty() {
            logger.debug(format_args!("Query parameters: {:?}", query));
            req = req.query(query);
        }

        let body: serde_json::Value = self.client.execute(req).await?;
        let values = parse_values(calculation_type, &body, logger)?;
        logger.debug(format_args!("{} {} value(s) were mapped for {}", values.len(), calculation_type, point.name));

        Ok(values)
    }

    /// Fetch values for every point and merge them into each point's slot.
    ///
    /// Points are processed one after another in input order. A failure on
    /// one point (transport, HTTP status, response shape, unsupported merge)
    /// is logged and recorded in the report; that point's slot is left as it
    /// was and the remaining points are still processed.
    ///
    /// # Arguments
    /// * `points` - Points to update in place
    /// * `calculation_type` - Which stream endpoint to read
    /// * `policy` - How new values are merged into existing ones
    /// * `query` - Optional time range / interval parameters
    pub async fn get_values(
        &self,
        points: &mut [Point],
        calculation_type: CalculationType,
        policy: MergePolicy,
        query: &ValueQuery,
    ) -> ValueUpdateReport {
        let logger = self.client.logger();
        logger.info(format_args!(
            "Retrieving {} values for {} PI point(s), policy {:?}, single value: {}",
            calculation_type,
            points.len(),
            policy,
            calculation_type.is_single_valued()
        ));

        let mut report = ValueUpdateReport::new(calculation_type, policy);
        for point in points.iter_mut() {
            let outcome = self.update_point(point, calculation_type, policy, query).await;
            if let Err(e) = &outcome {
                logger.error(format_args!(
                    "Unable to update {} values for PI point {}: {}",
                    calculation_type, point.name, e
                ));
            }
            report.record(point, outcome);
        }

        logger.info(format_args!(
            "{} of {} PI point(s) updated with {} {} value(s)",
            report.succeeded(),
            report.updates.len(),
            report.values_applied(),
            calculation_type
        ));
        report
    }

    /// Same as [`get_values`](Self::get_values) with the calculation type
    /// given by name (case-insensitive)
    pub async fn get_values_by_name(
        &self,
        points: &mut [Point],
        calculation_type: &str,
        policy: MergePolicy,
        query: &ValueQuery,
    ) -> PiWebApiResult<ValueUpdateReport> {
        let calculation_type: CalculationType = calculation_type.parse()?;
        Ok(self.get_values(points, calculation_type, policy, query).await)
    }

    async fn update_point(
        &self,
        point: &mut Point,
        calculation_type: CalculationType,
        policy: MergePolicy,
        query: &ValueQuery,
    ) -> PiWebApiResult<usize> {
        // Nothing could be stored, so don't spend a round trip
        if !policy.supports(calculation_type) {
            return Err(PiWebApiError::UnsupportedMerge {
                calculation_type,
                policy,
            });
        }

        let new_values = self.fetch_values(point, calculation_type, query).await?;
        reconcile(point, calculation_type, policy, new_values, self.client.logger())
    }
}
