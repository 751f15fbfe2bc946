//! Reconciliation of freshly fetched values into a point's existing slot.

use url::Url;

use crate::error::{PiWebApiError, PiWebApiResult};
use crate::logging::Logger;
use crate::models::{CalculationType, MergePolicy, Point, SlotMut, Value};

/// Outcome of one point within a bulk value update
#[derive(Debug)]
pub struct PointUpdate {
    pub point: String,
    /// Number of values written into the slot, or why nothing was written
    pub outcome: PiWebApiResult<usize>,
}

/// Per-point outcomes of a bulk value update, in input order
#[derive(Debug)]
pub struct ValueUpdateReport {
    pub calculation_type: CalculationType,
    pub policy: MergePolicy,
    pub updates: Vec<PointUpdate>,
}

impl ValueUpdateReport {
    pub fn new(calculation_type: CalculationType, policy: MergePolicy) -> Self {
        Self {
            calculation_type,
            policy,
            updates: Vec::new(),
        }
    }

    pub fn record(&mut self, point: &Point, outcome: PiWebApiResult<usize>) {
        self.updates.push(PointUpdate {
            point: point.name.clone(),
            outcome,
        });
    }

    /// True when every point was updated
    pub fn is_success(&self) -> bool {
        self.updates.iter().all(|u| u.outcome.is_ok())
    }

    pub fn succeeded(&self) -> usize {
        self.updates.iter().filter(|u| u.outcome.is_ok()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &PointUpdate> {
        self.updates.iter().filter(|u| u.outcome.is_err())
    }

    /// Total number of values written across all points
    pub fn values_applied(&self) -> usize {
        self.updates
            .iter()
            .filter_map(|u| u.outcome.as_ref().ok())
            .sum()
    }
}

/// `{base}/streams/{webId}/{suffix}` for a point and calculation type
pub fn stream_endpoint(
    base_url: &Url,
    web_id: &str,
    calculation_type: CalculationType,
) -> PiWebApiResult<Url> {
    if web_id.is_empty() {
        return Err(PiWebApiError::invalid_param("Point has no WebID"));
    }
    let path = format!(
        "streams/{}/{}",
        urlencoding::encode(web_id),
        calculation_type.endpoint_suffix()
    );
    Ok(base_url.join(&path)?)
}

/// Merge `new_values` into the point's slot for `calculation_type`.
///
/// The slot is either replaced whole or extended whole; on error it is left
/// untouched. Returns the number of values written.
pub fn reconcile(
    point: &mut Point,
    calculation_type: CalculationType,
    policy: MergePolicy,
    new_values: Vec<Value>,
    logger: &Logger,
) -> PiWebApiResult<usize> {
    if !policy.supports(calculation_type) {
        return Err(PiWebApiError::UnsupportedMerge {
            calculation_type,
            policy,
        });
    }

    let existing = point.slot(calculation_type).len();
    if existing == 0 {
        logger.debug(format_args!(
            "PI point {} has no existing {} values",
            point.name, calculation_type
        ));
    } else {
        logger.debug(format_args!(
            "PI point {} currently has {} {} value(s)",
            point.name, existing, calculation_type
        ));
    }

    let applied = match (policy, point.slot_mut(calculation_type)) {
        (MergePolicy::Overwrite, SlotMut::Single(slot)) => {
            *slot = new_values.into_iter().next();
            usize::from(slot.is_some())
        }
        (MergePolicy::Overwrite, SlotMut::Series(slot)) => {
            let count = new_values.len();
            *slot = new_values;
            count
        }
        (MergePolicy::Append, SlotMut::Series(slot)) => {
            let count = new_values.len();
            slot.extend(new_values);
            count
        }
        _ => {
            return Err(PiWebApiError::UnsupportedMerge {
                calculation_type,
                policy,
            })
        }
    };

    logger.debug(format_args!(
        "{:?} stored {} {} value(s) for PI point {}",
        policy, applied, calculation_type, point.name
    ));
    Ok(applied)
}
