use std::collections::BTreeMap;

use crate::models::{CalculationType, Point};

/// Running value counts across points and calculation types
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Totalizer {
    counts: BTreeMap<CalculationType, usize>,
    pub total: usize,
    pub tags: usize,
}

impl Totalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count the values each point holds for the given calculation types
    pub fn tally<'a>(
        &mut self,
        points: impl IntoIterator<Item = &'a Point>,
        calculation_types: &[CalculationType],
    ) {
        for point in points {
            self.tags += 1;
            for &calculation_type in calculation_types {
                let count = point.slot(calculation_type).len();
                *self.counts.entry(calculation_type).or_default() += count;
                self.total += count;
            }
        }
    }

    pub fn count(&self, calculation_type: CalculationType) -> usize {
        self.counts
            .get(&calculation_type)
            .copied()
            .unwrap_or_default()
    }

    /// Counts in calculation type order
    pub fn counts(&self) -> impl Iterator<Item = (CalculationType, usize)> + '_ {
        self.counts.iter().map(|(k, v)| (*k, *v))
    }
}
