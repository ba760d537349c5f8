//! Domain core shared by the webhook service and the poller: the metric
//! registry, record shapes, configuration snapshot, the state sink seam,
//! and the field dispatcher both ingestion paths feed into.

pub mod config;
pub mod dispatch;
pub mod records;
pub mod registry;
pub mod sink;
