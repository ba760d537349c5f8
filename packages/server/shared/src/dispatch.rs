//! Per-key dispatch of incoming payloads through the metric registry.
//!
//! The envelope has already been validated by the caller; from here on every
//! failure is scoped to a single key. An unknown key is logged and skipped, a
//! disabled key is skipped silently, and a malformed record or sink error
//! drops that key's update without touching the rest of the payload.

use crate::config::SyncConfig;
use crate::records::{BloodPressureRecord, ScalarRecord, SleepSessionRecord, VarValue};
use crate::registry::{Metric, VarKind};
use crate::sink::StateSink;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("malformed {key} record: {source}")]
    BadRecord {
        key: &'static str,
        source: serde_json::Error,
    },
    #[error("sink rejected {ident}: {cause}")]
    Sink {
        ident: &'static str,
        cause: anyhow::Error,
    },
}

/// Outcome counts for one payload, used for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub applied: usize,
    pub unknown: usize,
    pub disabled: usize,
    pub failed: usize,
}

/// Dispatches every key of a parsed payload, in payload order.
pub async fn dispatch(
    config: &SyncConfig,
    payload: &Map<String, Value>,
    sink: &dyn StateSink,
) -> DispatchSummary {
    let mut summary = DispatchSummary::default();

    for (key, record) in payload {
        let Some(metric) = Metric::from_key(key) else {
            tracing::debug!(key = %key, "no handler registered for payload key");
            summary.unknown += 1;
            continue;
        };

        if !config.flags.is_enabled(metric) {
            summary.disabled += 1;
            continue;
        }

        match apply(metric, record, sink).await {
            Ok(()) => summary.applied += 1,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "dropping update for payload key");
                summary.failed += 1;
            }
        }
    }

    summary
}

/// Normalizes one record and writes its target values to the sink. Shared by
/// the webhook path and the poller.
pub async fn apply(
    metric: Metric,
    record: &Value,
    sink: &dyn StateSink,
) -> Result<(), DispatchError> {
    for (ident, value) in normalize(metric, record)? {
        sink.set_value(ident, value)
            .await
            .map_err(|cause| DispatchError::Sink { ident, cause })?;
    }
    Ok(())
}

/// Applies the metric's transform, producing one `(ident, value)` pair per
/// target slot in registry order.
pub fn normalize(
    metric: Metric,
    record: &Value,
) -> Result<Vec<(&'static str, VarValue)>, DispatchError> {
    let spec = metric.spec();

    let values = match metric {
        Metric::BloodPressure => {
            let rec: BloodPressureRecord = parse(metric, record)?;
            vec![VarValue::Int(rec.systolic), VarValue::Int(rec.diastolic)]
        }
        Metric::SleepSession => {
            let rec: SleepSessionRecord = parse(metric, record)?;
            vec![
                VarValue::Int(rec.duration_total_minutes),
                VarValue::Int(rec.duration_deep_minutes),
                VarValue::Int(rec.duration_light_minutes),
                VarValue::Int(rec.duration_rem_minutes),
                VarValue::Int(rec.duration_awake_minutes),
                VarValue::Text(rec.start_time),
                VarValue::Text(rec.end_time),
            ]
        }
        _ => {
            let rec: ScalarRecord = parse(metric, record)?;
            let raw = match metric {
                // The companion app reports meters; the tree stores km.
                Metric::Distance => rec.value / 1000.0,
                _ => rec.value,
            };
            let target = &spec.variables[0];
            vec![match target.kind {
                VarKind::Int => VarValue::Int(raw as i64),
                VarKind::Float => VarValue::Float(raw),
                VarKind::Text => VarValue::Text(raw.to_string()),
            }]
        }
    };

    Ok(spec.variables.iter().map(|v| v.ident).zip(values).collect())
}

fn parse<T: serde::de::DeserializeOwned>(
    metric: Metric,
    record: &Value,
) -> Result<T, DispatchError> {
    serde_json::from_value(record.clone()).map_err(|source| DispatchError::BadRecord {
        key: metric.key(),
        source,
    })
}
