//! Static registry of supported health metrics.
//!
//! One `FieldSpec` per metric binds the canonical snake_case payload key to
//! its target variable slots (and, for composite metrics, the category the
//! slots are grouped under). The table is the single source of truth for
//! dispatch and for structural reconciliation of the variable tree.

/// The fixed set of health metrics the bridge understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Steps,
    Distance,
    TotalCaloriesBurned,
    ActiveCaloriesBurned,
    Weight,
    HeartRate,
    RestingHeartRate,
    BloodPressure,
    BodyTemperature,
    OxygenSaturation,
    SleepSession,
}

impl Metric {
    /// All metrics, in registry order. `FIELD_SPECS` follows the same order.
    pub const ALL: [Metric; 11] = [
        Metric::Steps,
        Metric::Distance,
        Metric::TotalCaloriesBurned,
        Metric::ActiveCaloriesBurned,
        Metric::Weight,
        Metric::HeartRate,
        Metric::RestingHeartRate,
        Metric::BloodPressure,
        Metric::BodyTemperature,
        Metric::OxygenSaturation,
        Metric::SleepSession,
    ];

    /// The canonical key used in webhook payloads and poll endpoints.
    pub fn key(self) -> &'static str {
        match self {
            Metric::Steps => "steps",
            Metric::Distance => "distance",
            Metric::TotalCaloriesBurned => "total_calories_burned",
            Metric::ActiveCaloriesBurned => "active_calories_burned",
            Metric::Weight => "weight",
            Metric::HeartRate => "heart_rate",
            Metric::RestingHeartRate => "resting_heart_rate",
            Metric::BloodPressure => "blood_pressure",
            Metric::BodyTemperature => "body_temperature",
            Metric::OxygenSaturation => "oxygen_saturation",
            Metric::SleepSession => "sleep_session",
        }
    }

    pub fn from_key(key: &str) -> Option<Metric> {
        Metric::ALL.into_iter().find(|m| m.key() == key)
    }

    pub fn spec(self) -> &'static FieldSpec {
        &FIELD_SPECS[self as usize]
    }
}

/// The value type a variable slot holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Int,
    Float,
    Text,
}

/// One target variable slot: stable ident, display name, value kind, unit
/// profile, and sort position in the tree.
#[derive(Debug)]
pub struct VariableSpec {
    pub ident: &'static str,
    pub name: &'static str,
    pub kind: VarKind,
    pub profile: &'static str,
    pub position: i32,
}

/// A grouping category for composite metrics (blood pressure, sleep).
#[derive(Debug)]
pub struct CategorySpec {
    pub ident: &'static str,
    pub name: &'static str,
    pub position: i32,
}

/// Static descriptor binding a metric to its variable slots.
#[derive(Debug)]
pub struct FieldSpec {
    pub metric: Metric,
    pub category: Option<CategorySpec>,
    pub variables: &'static [VariableSpec],
}

pub static FIELD_SPECS: [FieldSpec; 11] = [
    FieldSpec {
        metric: Metric::Steps,
        category: None,
        variables: &[VariableSpec {
            ident: "Steps",
            name: "Steps",
            kind: VarKind::Int,
            profile: "~Steps",
            position: 10,
        }],
    },
    FieldSpec {
        metric: Metric::Distance,
        category: None,
        variables: &[VariableSpec {
            ident: "Distance",
            name: "Distance",
            kind: VarKind::Float,
            profile: "~Distance.km",
            position: 11,
        }],
    },
    FieldSpec {
        metric: Metric::TotalCaloriesBurned,
        category: None,
        variables: &[VariableSpec {
            ident: "TotalCaloriesBurned",
            name: "Calories (total)",
            kind: VarKind::Float,
            profile: "HB.kcal",
            position: 12,
        }],
    },
    FieldSpec {
        metric: Metric::ActiveCaloriesBurned,
        category: None,
        variables: &[VariableSpec {
            ident: "ActiveCaloriesBurned",
            name: "Calories (active)",
            kind: VarKind::Float,
            profile: "HB.kcal",
            position: 13,
        }],
    },
    FieldSpec {
        metric: Metric::Weight,
        category: None,
        variables: &[VariableSpec {
            ident: "Weight",
            name: "Weight",
            kind: VarKind::Float,
            profile: "~Weight.kg",
            position: 20,
        }],
    },
    FieldSpec {
        metric: Metric::HeartRate,
        category: None,
        variables: &[VariableSpec {
            ident: "HeartRate",
            name: "Heart rate",
            kind: VarKind::Int,
            profile: "~Heartbeat",
            position: 30,
        }],
    },
    FieldSpec {
        metric: Metric::RestingHeartRate,
        category: None,
        variables: &[VariableSpec {
            ident: "RestingHeartRate",
            name: "Resting heart rate",
            kind: VarKind::Int,
            profile: "~Heartbeat",
            position: 31,
        }],
    },
    FieldSpec {
        metric: Metric::BloodPressure,
        category: Some(CategorySpec {
            ident: "BloodPressure",
            name: "Blood pressure",
            position: 40,
        }),
        variables: &[
            VariableSpec {
                ident: "BloodPressureSystolic",
                name: "Systolic",
                kind: VarKind::Int,
                profile: "HB.mmHg",
                position: 1,
            },
            VariableSpec {
                ident: "BloodPressureDiastolic",
                name: "Diastolic",
                kind: VarKind::Int,
                profile: "HB.mmHg",
                position: 2,
            },
        ],
    },
    FieldSpec {
        metric: Metric::BodyTemperature,
        category: None,
        variables: &[VariableSpec {
            ident: "BodyTemperature",
            name: "Body temperature",
            kind: VarKind::Float,
            profile: "~Temperature",
            position: 41,
        }],
    },
    FieldSpec {
        metric: Metric::OxygenSaturation,
        category: None,
        variables: &[VariableSpec {
            ident: "OxygenSaturation",
            name: "Oxygen saturation",
            kind: VarKind::Float,
            profile: "HB.Percent",
            position: 42,
        }],
    },
    FieldSpec {
        metric: Metric::SleepSession,
        category: Some(CategorySpec {
            ident: "Sleep",
            name: "Sleep",
            position: 100,
        }),
        variables: &[
            VariableSpec {
                ident: "SleepDuration",
                name: "Sleep duration (total)",
                kind: VarKind::Int,
                profile: "~Duration.min",
                position: 1,
            },
            VariableSpec {
                ident: "SleepDurationDeep",
                name: "Deep sleep",
                kind: VarKind::Int,
                profile: "~Duration.min",
                position: 2,
            },
            VariableSpec {
                ident: "SleepDurationLight",
                name: "Light sleep",
                kind: VarKind::Int,
                profile: "~Duration.min",
                position: 3,
            },
            VariableSpec {
                ident: "SleepDurationRem",
                name: "REM sleep",
                kind: VarKind::Int,
                profile: "~Duration.min",
                position: 4,
            },
            VariableSpec {
                ident: "SleepDurationAwake",
                name: "Time awake",
                kind: VarKind::Int,
                profile: "~Duration.min",
                position: 5,
            },
            VariableSpec {
                ident: "SleepStart",
                name: "Sleep start",
                kind: VarKind::Text,
                profile: "",
                position: 6,
            },
            VariableSpec {
                ident: "SleepEnd",
                name: "Sleep end",
                kind: VarKind::Text,
                profile: "",
                position: 7,
            },
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_table_matches_enum_order() {
        for metric in Metric::ALL {
            assert_eq!(metric.spec().metric, metric);
        }
    }

    #[test]
    fn every_key_round_trips() {
        for metric in Metric::ALL {
            assert_eq!(Metric::from_key(metric.key()), Some(metric));
        }
        assert_eq!(Metric::from_key("unknown_stuff"), None);
    }

    #[test]
    fn grouped_metrics_carry_a_category() {
        assert!(Metric::BloodPressure.spec().category.is_some());
        assert!(Metric::SleepSession.spec().category.is_some());
        assert!(Metric::Steps.spec().category.is_none());
    }

    #[test]
    fn sleep_session_decomposes_into_seven_slots() {
        assert_eq!(Metric::SleepSession.spec().variables.len(), 7);
        assert_eq!(Metric::BloodPressure.spec().variables.len(), 2);
    }
}
