//! Record shapes accepted from the companion app and the cloud API, plus the
//! normalized value written to the variable tree.

use serde::Deserialize;
use std::fmt;

/// A normalized value for one variable slot. The sink applies last-write-wins
/// semantics per ident.
#[derive(Debug, Clone, PartialEq)]
pub enum VarValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for VarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarValue::Int(v) => write!(f, "{v}"),
            VarValue::Float(v) => write!(f, "{v}"),
            VarValue::Text(v) => write!(f, "{v}"),
        }
    }
}

/// Single-value record, e.g. `{"value": 72}` for heart rate.
#[derive(Debug, Deserialize)]
pub struct ScalarRecord {
    pub value: f64,
}

/// Paired record for blood pressure readings.
#[derive(Debug, Deserialize)]
pub struct BloodPressureRecord {
    pub systolic: i64,
    pub diastolic: i64,
}

/// One sleep session as pushed by the companion app.
#[derive(Debug, Deserialize)]
pub struct SleepSessionRecord {
    pub duration_total_minutes: i64,
    pub duration_deep_minutes: i64,
    pub duration_light_minutes: i64,
    pub duration_rem_minutes: i64,
    pub duration_awake_minutes: i64,
    pub start_time: String,
    pub end_time: String,
}
