use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::PiWebApiError;

/// Ways of retrieving a point's value(s) from the stream endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalculationType {
    Current,
    End,
    Interpolated,
    Recorded,
    Plot,
    Summary,
}

impl CalculationType {
    pub const ALL: [CalculationType; 6] = [
        CalculationType::Current,
        CalculationType::End,
        CalculationType::Interpolated,
        CalculationType::Recorded,
        CalculationType::Plot,
        CalculationType::Summary,
    ];

    /// `current` and `end` yield exactly one value; everything else a sequence
    pub fn is_single_valued(self) -> bool {
        matches!(self, CalculationType::Current | CalculationType::End)
    }

    /// Last path segment of `streams/{webId}/...` for this calculation
    pub fn endpoint_suffix(self) -> &'static str {
        match self {
            CalculationType::Current => "value",
            CalculationType::End => "end",
            CalculationType::Interpolated => "interpolated",
            CalculationType::Recorded => "recorded",
            CalculationType::Plot => "plot",
            CalculationType::Summary => "summary",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CalculationType::Current => "current",
            CalculationType::End => "end",
            CalculationType::Interpolated => "interpolated",
            CalculationType::Recorded => "recorded",
            CalculationType::Plot => "plot",
            CalculationType::Summary => "summary",
        }
    }
}

impl fmt::Display for CalculationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CalculationType {
    type Err = PiWebApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        CalculationType::ALL
            .into_iter()
            .find(|c| c.as_str() == lowered)
            .ok_or_else(|| PiWebApiError::invalid_param(format!("Unknown calculation type: {}", s)))
    }
}

/// How newly fetched values are merged into a point's existing slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergePolicy {
    /// Replace the slot with the fetched data
    Overwrite,
    /// Extend a sequence slot with the fetched data
    Append,
    /// Leave every slot untouched and report an error per point
    Reject,
}

impl MergePolicy {
    /// Map the `overwrite` / `append` flag pair; overwrite takes precedence
    pub fn from_flags(overwrite: bool, append: bool) -> Self {
        match (overwrite, append) {
            (true, _) => MergePolicy::Overwrite,
            (false, true) => MergePolicy::Append,
            (false, false) => MergePolicy::Reject,
        }
    }

    /// Whether this policy can be applied to values of the given calculation type
    pub fn supports(self, calculation_type: CalculationType) -> bool {
        match self {
            MergePolicy::Overwrite => true,
            MergePolicy::Append => !calculation_type.is_single_valued(),
            MergePolicy::Reject => false,
        }
    }
}

/// Entry of the `Errors` array returned alongside search results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamError {
    #[serde(rename = "ErrorCode", default)]
    pub error_code: Option<i64>,
    #[serde(rename = "Source", default)]
    pub source: Option<String>,
    #[serde(rename = "Message", default)]
    pub message: Option<String>,
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ErrorCode: {}, Source: {}, Message: {}",
            self.error_code.map(|c| c.to_string()).unwrap_or_else(|| "-".into()),
            self.source.as_deref().unwrap_or("-"),
            self.message.as_deref().unwrap_or("-"),
        )
    }
}

/// `{Items, Errors, Links}` envelope shared by collection endpoints.
///
/// Items are kept as raw JSON so that each record is mapped on its own.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemsEnvelope {
    #[serde(rename = "Items", default)]
    pub items: Vec<serde_json::Value>,
    #[serde(rename = "Errors", default)]
    pub errors: Vec<UpstreamError>,
    #[serde(rename = "TotalHits", default)]
    pub total_hits: Option<u64>,
}

/// Service root document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeDocument {
    #[serde(rename = "Links", default)]
    pub links: HashMap<String, String>,
}

impl HomeDocument {
    pub fn link(&self, rel: &str) -> Option<&str> {
        self.links.get(rel).map(String::as_str)
    }
}

/// Body of a non-2xx response; PI Web API puts plain strings in `Errors`
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    #[serde(rename = "Errors", default)]
    pub errors: Vec<serde_json::Value>,
    #[serde(rename = "Message", default)]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn summary(&self) -> Option<String> {
        if let Some(message) = &self.message {
            return Some(message.clone());
        }
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| match e {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect();
        (!parts.is_empty()).then(|| parts.join("; "))
    }
}

/// A PI Data Archive server
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataServer {
    pub name: String,
    pub server_version: String,
    pub web_id: String,
    pub is_connected: bool,
    pub id: String,
}

/// Digital state payload (`{"Name": "Active", "Value": 1}`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigitalState {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Value")]
    pub value: i64,
    #[serde(rename = "IsSystem", default)]
    pub is_system: bool,
}

/// Scalar payload of a point value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValuePayload {
    Number(f64),
    Bool(bool),
    Text(String),
    Digital(DigitalState),
    Other(serde_json::Value),
}

impl ValuePayload {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ValuePayload::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ValuePayload::Text(s) => Some(s),
            ValuePayload::Digital(d) => Some(&d.name),
            _ => None,
        }
    }
}

impl fmt::Display for ValuePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValuePayload::Number(n) => write!(f, "{}", n),
            ValuePayload::Bool(b) => write!(f, "{}", b),
            ValuePayload::Text(s) => f.write_str(s),
            ValuePayload::Digital(d) => f.write_str(&d.name),
            ValuePayload::Other(v) => write!(f, "{}", v),
        }
    }
}

/// One timestamped value of a point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Value {
    pub calculation_type: CalculationType,
    pub timestamp: DateTime<Utc>,
    pub value: ValuePayload,
    pub units_abbreviation: Option<String>,
    pub good: Option<bool>,
    pub questionable: Option<bool>,
    pub substituted: Option<bool>,
    /// Set for summary values (`Total`, `Average`, ...)
    pub summary_type: Option<String>,
}

/// A PI point and the values fetched for it so far
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Point {
    pub name: String,
    pub description: Option<String>,
    pub unique_id: String,
    pub web_id: String,
    pub data_type: String,
    pub current: Option<Value>,
    pub end: Option<Value>,
    pub interpolated: Vec<Value>,
    pub recorded: Vec<Value>,
    pub plot: Vec<Value>,
    pub summary: Vec<Value>,
}

/// Read access to one calculation type's slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Slot<'a> {
    Single(Option<&'a Value>),
    Series(&'a [Value]),
}

impl Slot<'_> {
    pub fn len(&self) -> usize {
        match self {
            Slot::Single(v) => usize::from(v.is_some()),
            Slot::Series(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Write access to one calculation type's slot
#[derive(Debug)]
pub enum SlotMut<'a> {
    Single(&'a mut Option<Value>),
    Series(&'a mut Vec<Value>),
}

impl SlotMut<'_> {
    pub fn len(&self) -> usize {
        match self {
            SlotMut::Single(v) => usize::from(v.is_some()),
            SlotMut::Series(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Point {
    pub fn new(name: impl Into<String>, web_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            web_id: web_id.into(),
            ..Default::default()
        }
    }

    pub fn slot(&self, calculation_type: CalculationType) -> Slot<'_> {
        match calculation_type {
            CalculationType::Current => Slot::Single(self.current.as_ref()),
            CalculationType::End => Slot::Single(self.end.as_ref()),
            CalculationType::Interpolated => Slot::Series(&self.interpolated),
            CalculationType::Recorded => Slot::Series(&self.recorded),
            CalculationType::Plot => Slot::Series(&self.plot),
            CalculationType::Summary => Slot::Series(&self.summary),
        }
    }

    pub fn slot_mut(&mut self, calculation_type: CalculationType) -> SlotMut<'_> {
        match calculation_type {
            CalculationType::Current => SlotMut::Single(&mut self.current),
            CalculationType::End => SlotMut::Single(&mut self.end),
            CalculationType::Interpolated => SlotMut::Series(&mut self.interpolated),
            CalculationType::Recorded => SlotMut::Series(&mut self.recorded),
            CalculationType::Plot => SlotMut::Series(&mut self.plot),
            CalculationType::Summary => SlotMut::Series(&mut self.summary),
        }
    }

    /// Points are the same tag when both name and WebID match
    pub fn same_point(&self, other: &Point) -> bool {
        self.name == other.name && self.web_id == other.web_id
    }
}

/// Optional parameters for stream value retrieval
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    /// Sampling interval for interpolated values, or plot intervals count
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_count: Option<u32>,
    /// `Inside`, `Outside` or `Interpolated`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boundary_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_duration: Option<String>,
}

impl ValueQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_time(mut self, start: impl Into<String>) -> Self {
        self.start_time = Some(start.into());
        self
    }

    pub fn end_time(mut self, end: impl Into<String>) -> Self {
        self.end_time = Some(end.into());
        self
    }

    pub fn interval(mut self, interval: impl Into<String>) -> Self {
        self.interval = Some(interval.into());
        self
    }

    pub fn max_count(mut self, max_count: u32) -> Self {
        self.max_count = Some(max_count);
        self
    }

    pub fn boundary_type(mut self, boundary: impl Into<String>) -> Self {
        self.boundary_type = Some(boundary.into());
        self
    }

    pub fn summary_type(mut self, summary: impl Into<String>) -> Self {
        self.summary_type = Some(summary.into());
        self
    }

    pub fn summary_duration(mut self, duration: impl Into<String>) -> Self {
        self.summary_duration = Some(duration.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
