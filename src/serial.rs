//! External serialization for literal sets (§6): stable `{"type":...,"data":{...}}`
//! tagged records. `SerializedLiteral` is the wire shape; `From`/`TryFrom`
//! conversions bridge it to the in-memory value types in [`crate::sets`],
//! [`crate::numeric_set`], and [`crate::numbers`].

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, GraphResult};
use crate::numbers::Numbers;
use crate::numeric_set::{Interval, NumericSet};
use crate::sets::{BooleanSet, CountSet, EnumMember, EnumSet, StringSet};
use crate::units::Unit;

const KNOWN_TAGS: &[&str] = &[
    "StringSet",
    "CountSet",
    "BooleanSet",
    "EnumSet",
    "Numeric_Interval_Disjoint",
    "Quantity_Interval_Disjoint",
    "Quantity_Set_Discrete",
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SerializedInterval {
    pub min: f64,
    pub max: f64,
}

impl From<&Interval> for SerializedInterval {
    fn from(iv: &Interval) -> Self {
        Self { min: iv.min, max: iv.max }
    }
}

/// The wire shape for every literal set the specification names. Uses
/// serde's internally-tagged representation so the `type` discriminator
/// and `data` payload fall out of the derive, matching §6 exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum SerializedLiteral {
    StringSet { values: Vec<String> },
    CountSet { values: Vec<i64> },
    BooleanSet { values: Vec<bool> },
    /// Each member is encoded `"EnumName:value"`.
    EnumSet { values: Vec<String> },
    #[serde(rename = "Numeric_Interval_Disjoint")]
    NumericIntervalDisjoint { intervals: Vec<SerializedInterval> },
    #[serde(rename = "Quantity_Interval_Disjoint")]
    QuantityIntervalDisjoint { intervals: Vec<SerializedInterval>, unit: Option<Unit> },
    #[serde(rename = "Quantity_Set_Discrete")]
    QuantitySetDiscrete { intervals: Vec<SerializedInterval>, unit: Option<Unit> },
}

/// Serializes to the canonical JSON string.
pub fn to_json(value: &SerializedLiteral) -> String {
    serde_json::to_string(value).expect("SerializedLiteral always serializes")
}

/// Parses a JSON string, validating the `type` tag before attempting the
/// full deserialization so an unknown tag reports the tag itself rather
/// than a generic parse failure.
pub fn from_json(json: &str) -> GraphResult<SerializedLiteral> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|_| GraphError::InvalidSerializedType("<invalid json>".to_string()))?;
    let tag = value
        .get("type")
        .and_then(|t| t.as_str())
        .ok_or_else(|| GraphError::InvalidSerializedType("<missing type>".to_string()))?;
    if !KNOWN_TAGS.contains(&tag) {
        return Err(GraphError::InvalidSerializedType(tag.to_string()));
    }
    serde_json::from_value(value).map_err(|_| GraphError::InvalidSerializedType(tag.to_string()))
}

impl From<&StringSet> for SerializedLiteral {
    fn from(s: &StringSet) -> Self {
        SerializedLiteral::StringSet { values: s.values().to_vec() }
    }
}

impl From<&CountSet> for SerializedLiteral {
    fn from(s: &CountSet) -> Self {
        SerializedLiteral::CountSet { values: s.values().to_vec() }
    }
}

impl From<&BooleanSet> for SerializedLiteral {
    fn from(s: &BooleanSet) -> Self {
        SerializedLiteral::BooleanSet { values: s.values().to_vec() }
    }
}

impl From<&EnumSet> for SerializedLiteral {
    fn from(s: &EnumSet) -> Self {
        let values = s.values().iter().map(|m| format!("{}:{}", m.name, m.value)).collect();
        SerializedLiteral::EnumSet { values }
    }
}

impl From<&NumericSet> for SerializedLiteral {
    fn from(s: &NumericSet) -> Self {
        SerializedLiteral::NumericIntervalDisjoint { intervals: s.intervals().iter().map(SerializedInterval::from).collect() }
    }
}

/// `Numbers` serializes as `Quantity_Interval_Disjoint`, except when every
/// interval is a point, in which case it serializes as the more specific
/// `Quantity_Set_Discrete` (a discrete set of exact quantities, e.g. a BOM
/// line's allowed resistor values).
impl From<&Numbers> for SerializedLiteral {
    fn from(n: &Numbers) -> Self {
        let intervals: Vec<SerializedInterval> = n.set.intervals().iter().map(SerializedInterval::from).collect();
        if !intervals.is_empty() && n.set.intervals().iter().all(|iv| iv.is_point()) {
            SerializedLiteral::QuantitySetDiscrete { intervals, unit: n.unit }
        } else {
            SerializedLiteral::QuantityIntervalDisjoint { intervals, unit: n.unit }
        }
    }
}

impl TryFrom<&SerializedLiteral> for StringSet {
    type Error = GraphError;
    fn try_from(value: &SerializedLiteral) -> GraphResult<Self> {
        match value {
            SerializedLiteral::StringSet { values } => Ok(StringSet::new(values.clone())),
            _ => Err(GraphError::InvalidSerializedType(format!("{:?}", value))),
        }
    }
}

impl TryFrom<&SerializedLiteral> for CountSet {
    type Error = GraphError;
    fn try_from(value: &SerializedLiteral) -> GraphResult<Self> {
        match value {
            SerializedLiteral::CountSet { values } => Ok(CountSet::new(values.clone())),
            _ => Err(GraphError::InvalidSerializedType(format!("{:?}", value))),
        }
    }
}

impl TryFrom<&SerializedLiteral> for BooleanSet {
    type Error = GraphError;
    fn try_from(value: &SerializedLiteral) -> GraphResult<Self> {
        match value {
            SerializedLiteral::BooleanSet { values } => Ok(BooleanSet::new(values.clone())),
            _ => Err(GraphError::InvalidSerializedType(format!("{:?}", value))),
        }
    }
}

impl TryFrom<&SerializedLiteral> for EnumSet {
    type Error = GraphError;
    fn try_from(value: &SerializedLiteral) -> GraphResult<Self> {
        match value {
            SerializedLiteral::EnumSet { values } => {
                let members = values
                    .iter()
                    .map(|s| {
                        let (name, value) = s.split_once(':').unwrap_or(("", s.as_str()));
                        EnumMember { name: name.to_string(), value: value.to_string() }
                    })
                    .collect::<Vec<_>>();
                Ok(EnumSet::new(members))
            }
            _ => Err(GraphError::InvalidSerializedType(format!("{:?}", value))),
        }
    }
}

impl TryFrom<&SerializedLiteral> for NumericSet {
    type Error = GraphError;
    fn try_from(value: &SerializedLiteral) -> GraphResult<Self> {
        match value {
            SerializedLiteral::NumericIntervalDisjoint { intervals } => {
                let ivs = intervals.iter().map(|iv| Interval::new(iv.min, iv.max)).collect::<GraphResult<Vec<_>>>()?;
                Ok(NumericSet::setup_from_intervals(ivs))
            }
            _ => Err(GraphError::InvalidSerializedType(format!("{:?}", value))),
        }
    }
}

impl TryFrom<&SerializedLiteral> for Numbers {
    type Error = GraphError;
    fn try_from(value: &SerializedLiteral) -> GraphResult<Self> {
        match value {
            SerializedLiteral::QuantityIntervalDisjoint { intervals, unit }
            | SerializedLiteral::QuantitySetDiscrete { intervals, unit } => {
                let ivs = intervals.iter().map(|iv| Interval::new(iv.min, iv.max)).collect::<GraphResult<Vec<_>>>()?;
                Ok(Numbers::new(NumericSet::setup_from_intervals(ivs), *unit))
            }
            _ => Err(GraphError::InvalidSerializedType(format!("{:?}", value))),
        }
    }
}
