//! JSON record to entity mapping.
//!
//! Each record is mapped on its own so one malformed entry never costs the
//! rest of a collection.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value as Json;

use crate::error::{PiWebApiError, PiWebApiResult};
use crate::logging::Logger;
use crate::models::{CalculationType, DataServer, Point, Value, ValuePayload};

#[derive(Deserialize)]
struct WireServer {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "ServerVersion")]
    server_version: String,
    #[serde(rename = "WebId", alias = "WebID")]
    web_id: String,
    #[serde(rename = "IsConnected")]
    is_connected: bool,
    #[serde(rename = "Id")]
    id: String,
}

#[derive(Deserialize)]
struct WirePoint {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Description", alias = "description", default)]
    description: Option<String>,
    #[serde(rename = "UniqueID", alias = "UniqueId")]
    unique_id: String,
    #[serde(rename = "WebID", alias = "WebId")]
    web_id: String,
    #[serde(rename = "DataType")]
    data_type: String,
}

#[derive(Deserialize)]
struct WireValue {
    #[serde(rename = "Timestamp")]
    timestamp: DateTime<Utc>,
    #[serde(rename = "Value")]
    value: ValuePayload,
    #[serde(rename = "UnitsAbbreviation", default)]
    units_abbreviation: Option<String>,
    #[serde(rename = "Good", default)]
    good: Option<bool>,
    #[serde(rename = "Questionable", default)]
    questionable: Option<bool>,
    #[serde(rename = "Substituted", default)]
    substituted: Option<bool>,
}

#[derive(Deserialize)]
struct WireSummaryItem {
    #[serde(rename = "Type")]
    summary_type: String,
    #[serde(rename = "Value")]
    value: WireValue,
}

impl WireValue {
    fn into_value(self, calculation_type: CalculationType, summary_type: Option<String>) -> Value {
        Value {
            calculation_type,
            timestamp: self.timestamp,
            value: self.value,
            units_abbreviation: self.units_abbreviation.filter(|u| !u.is_empty()),
            good: self.good,
            questionable: self.questionable,
            substituted: self.substituted,
            summary_type,
        }
    }
}

/// Map one `dataservers` item
pub fn map_server(json: &Json) -> PiWebApiResult<DataServer> {
    let wire = WireServer::deserialize(json)
        .map_err(|e| PiWebApiError::mapping("data server", e.to_string()))?;
    Ok(DataServer {
        name: wire.name,
        server_version: wire.server_version,
        web_id: wire.web_id,
        is_connected: wire.is_connected,
        id: wire.id,
    })
}

/// Map one search result item into a point with empty value slots
pub fn map_point(json: &Json) -> PiWebApiResult<Point> {
    let wire = WirePoint::deserialize(json)
        .map_err(|e| PiWebApiError::mapping("point", e.to_string()))?;
    Ok(Point {
        name: wire.name,
        description: wire.description,
        unique_id: wire.unique_id,
        web_id: wire.web_id,
        data_type: wire.data_type,
        ..Default::default()
    })
}

/// Map one `{Timestamp, Value, ...}` record
pub fn map_value(calculation_type: CalculationType, json: &Json) -> PiWebApiResult<Value> {
    let wire = WireValue::deserialize(json)
        .map_err(|e| PiWebApiError::mapping("value", e.to_string()))?;
    Ok(wire.into_value(calculation_type, None))
}

/// Map one `{Type, Value: {...}}` summary record
pub fn map_summary_value(json: &Json) -> PiWebApiResult<Value> {
    let wire = WireSummaryItem::deserialize(json)
        .map_err(|e| PiWebApiError::mapping("summary value", e.to_string()))?;
    Ok(wire
        .value
        .into_value(CalculationType::Summary, Some(wire.summary_type)))
}

/// Map every record of an `Items` array, logging and skipping the bad ones
pub fn map_items<T>(
    items: &[Json],
    logger: &Logger,
    map: impl Fn(&Json) -> PiWebApiResult<T>,
) -> Vec<T> {
    items
        .iter()
        .filter_map(|item| match map(item) {
            Ok(entity) => Some(entity),
            Err(e) => {
                logger.error(format_args!(
                    "Skipping record {}: {}. Raw JSON: {}",
                    record_name(item),
                    e,
                    item
                ));
                None
            }
        })
        .collect()
}

/// Parse a stream response body into values.
///
/// Single-valued calculation types expect one value object, all others an
/// `Items` array. An empty `Items` array is an empty result, not an error.
pub fn parse_values(
    calculation_type: CalculationType,
    body: &Json,
    logger: &Logger,
) -> PiWebApiResult<Vec<Value>> {
    if calculation_type.is_single_valued() {
        if !body.is_object() {
            return Err(PiWebApiError::UnexpectedShape {
                expected: "a value object",
                found: json_kind(body).to_string(),
            });
        }
        return Ok(vec![map_value(calculation_type, body)?]);
    }

    let items = body
        .get("Items")
        .and_then(Json::as_array)
        .ok_or_else(|| PiWebApiError::UnexpectedShape {
            expected: "an object with an Items array",
            found: json_kind(body).to_string(),
        })?;

    let values = if calculation_type == CalculationType::Summary {
        map_items(items, logger, map_summary_value)
    } else {
        map_items(items, logger, |item| map_value(calculation_type, item))
    };
    Ok(values)
}

fn record_name(json: &Json) -> String {
    json.get("Name")
        .and_then(Json::as_str)
        .map(|n| format!("\"{}\"", n))
        .unwrap_or_else(|| "<unnamed>".to_string())
}

fn json_kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "a boolean",
        Json::Number(_) => "a number",
        Json::String(_) => "a string",
        Json::Array(_) => "an array",
        Json::Object(map) if map.contains_key("Items") => "an object whose Items is not an array",
        Json::Object(_) => "an object without Items",
    }
}
