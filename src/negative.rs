//! Negative value generation support
//!
//! Negative patterns describe data a pattern must reject. Scalars produce
//! them from a fixed candidate list of other types; composites build theirs
//! from their members'.

use serde::{Deserialize, Serialize};

use crate::pattern::{Pattern, PatternOps};
use crate::resolver::Resolver;
use crate::return_value::ReturnValue;
use crate::row::Row;
use crate::variations::Variations;

/// Which families of negatives to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NegativePatternConfiguration {
    /// Substitute values of other data types
    pub with_data_type_negatives: bool,
}

impl Default for NegativePatternConfiguration {
    fn default() -> Self {
        Self {
            with_data_type_negatives: true,
        }
    }
}

impl NegativePatternConfiguration {
    pub fn without_data_type_negatives() -> Self {
        Self {
            with_data_type_negatives: false,
        }
    }
}

/// Expand each wrong-type candidate and record which substitution produced it
pub fn scalar_annotation(
    pattern: &Pattern,
    candidates: Vec<Pattern>,
    row: &Row,
    resolver: &Resolver,
    config: &NegativePatternConfiguration,
) -> Variations<ReturnValue<Pattern>> {
    if !config.with_data_type_negatives {
        return Variations::empty();
    }

    let type_name = pattern.type_name();
    let row = row.clone();
    let resolver = resolver.clone();
    Variations::from_vec(candidates).flat_map(move |candidate| {
        let message = format!("{} mutated to {}", type_name, candidate.type_name());
        candidate
            .new_based_on_row(&row, &resolver)
            .map(move |variation| variation.add_details(&message, ""))
    })
}
