//! Leaf literal payloads: the immutable typed attributes stamped on a node
//! at construction time (as opposed to the mutable dynamic attributes in
//! [`crate::attributes`]).

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, GraphResult};

/// A single immutable leaf value. Every set container in [`crate::sets`],
/// [`crate::numeric_set`], and [`crate::numbers`] is built out of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LeafValue {
    String(String),
    Numeric(f64),
    NumericInterval { min: f64, max: f64 },
    Count(i64),
    Boolean(bool),
    EnumValue { name: String, value: String },
}

impl LeafValue {
    /// Constructs a `NumericInterval`, enforcing `min <= max`.
    pub fn interval(min: f64, max: f64) -> GraphResult<Self> {
        if min > max {
            return Err(GraphError::InvalidInterval { min, max });
        }
        Ok(LeafValue::NumericInterval { min, max })
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            LeafValue::String(_) => "String",
            LeafValue::Numeric(_) => "Numeric",
            LeafValue::NumericInterval { .. } => "NumericInterval",
            LeafValue::Count(_) => "Count",
            LeafValue::Boolean(_) => "Boolean",
            LeafValue::EnumValue { .. } => "EnumValue",
        }
    }
}
