//! In-memory variable tree — the state sink both ingestion paths write into.
//!
//! Slots are addressed by stable idents and hold the latest value only
//! (last-write-wins). `reconcile` walks the full field registry and keeps or
//! removes each category and variable slot according to its metric's enable
//! flag; re-running it with unchanged flags performs no structural mutations.

use anyhow::{bail, Result};
use shared::config::EnableFlags;
use shared::records::VarValue;
use shared::registry::{CategorySpec, VarKind, VariableSpec, FIELD_SPECS};
use shared::sink::StateSink;
use std::collections::HashMap;
use std::sync::Mutex;

/// One variable slot in the tree.
#[derive(Debug, Clone)]
pub struct Slot {
    pub name: String,
    pub kind: VarKind,
    pub profile: String,
    pub position: i32,
    pub parent: Option<String>,
    pub value: Option<VarValue>,
}

#[derive(Debug, Clone)]
pub struct Category {
    pub name: String,
    pub position: i32,
}

#[derive(Default)]
struct Inner {
    variables: HashMap<String, Slot>,
    categories: HashMap<String, Category>,
    // Structural creations and deletions only; value writes do not count.
    mutations: u64,
}

#[derive(Default)]
pub struct MemoryTree {
    inner: Mutex<Inner>,
}

impl MemoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, ident: &str) -> Option<VarValue> {
        self.inner
            .lock()
            .unwrap()
            .variables
            .get(ident)
            .and_then(|slot| slot.value.clone())
    }

    pub fn has_variable(&self, ident: &str) -> bool {
        self.inner.lock().unwrap().variables.contains_key(ident)
    }

    pub fn has_category(&self, ident: &str) -> bool {
        self.inner.lock().unwrap().categories.contains_key(ident)
    }

    pub fn parent_of(&self, ident: &str) -> Option<String> {
        self.inner
            .lock()
            .unwrap()
            .variables
            .get(ident)
            .and_then(|slot| slot.parent.clone())
    }

    /// Count of structural mutations since construction. Lets tests observe
    /// that reconciliation is idempotent.
    pub fn mutations(&self) -> u64 {
        self.inner.lock().unwrap().mutations
    }
}

#[async_trait::async_trait]
impl StateSink for MemoryTree {
    async fn set_value(&self, ident: &str, value: VarValue) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        match inner.variables.get_mut(ident) {
            Some(slot) => {
                slot.value = Some(value);
                Ok(())
            }
            None => bail!("no variable slot for ident {ident}"),
        }
    }

    async fn maintain_variable(
        &self,
        spec: &VariableSpec,
        parent: Option<&'static str>,
        keep: bool,
    ) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        let exists = inner.variables.contains_key(spec.ident);

        if keep && !exists {
            inner.variables.insert(
                spec.ident.to_string(),
                Slot {
                    name: spec.name.to_string(),
                    kind: spec.kind,
                    profile: spec.profile.to_string(),
                    position: spec.position,
                    parent: parent.map(str::to_string),
                    value: None,
                },
            );
            inner.mutations += 1;
            tracing::debug!(ident = spec.ident, "created variable slot");
        } else if !keep && exists {
            inner.variables.remove(spec.ident);
            inner.mutations += 1;
            tracing::debug!(ident = spec.ident, "deleted variable slot");
        }

        Ok(())
    }

    async fn maintain_category(&self, spec: &CategorySpec, keep: bool) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        let exists = inner.categories.contains_key(spec.ident);

        if keep && !exists {
            inner.categories.insert(
                spec.ident.to_string(),
                Category {
                    name: spec.name.to_string(),
                    position: spec.position,
                },
            );
            inner.mutations += 1;
        } else if !keep && exists {
            inner.categories.remove(spec.ident);
            inner.mutations += 1;
        }

        Ok(())
    }
}

/// Brings the tree's structure in line with the enable flags. Invoked at
/// startup and whenever the configuration changes.
pub async fn reconcile(sink: &dyn StateSink, flags: &EnableFlags) -> Result<()> {
    for spec in FIELD_SPECS.iter() {
        let keep = flags.is_enabled(spec.metric);

        let parent = match &spec.category {
            Some(category) => {
                sink.maintain_category(category, keep).await?;
                Some(category.ident)
            }
            None => None,
        };

        for variable in spec.variables {
            sink.maintain_variable(variable, parent, keep).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::registry::Metric;

    #[tokio::test]
    async fn reconcile_creates_slots_for_enabled_metrics_only() {
        let tree = MemoryTree::new();
        let flags = EnableFlags::none().with(Metric::Steps);

        reconcile(&tree, &flags).await.unwrap();

        assert!(tree.has_variable("Steps"));
        assert!(!tree.has_variable("Weight"));
        assert!(!tree.has_category("Sleep"));
    }

    #[tokio::test]
    async fn reconcile_is_idempotent() {
        let tree = MemoryTree::new();
        let flags = EnableFlags::none()
            .with(Metric::Steps)
            .with(Metric::SleepSession);

        reconcile(&tree, &flags).await.unwrap();
        let after_first = tree.mutations();

        reconcile(&tree, &flags).await.unwrap();
        reconcile(&tree, &flags).await.unwrap();

        assert_eq!(tree.mutations(), after_first);
    }

    #[tokio::test]
    async fn toggling_a_flag_off_then_on_recreates_the_slots() {
        let tree = MemoryTree::new();
        let on = EnableFlags::none().with(Metric::BloodPressure);
        let off = EnableFlags::none();

        reconcile(&tree, &on).await.unwrap();
        assert!(tree.has_category("BloodPressure"));
        assert!(tree.has_variable("BloodPressureSystolic"));

        reconcile(&tree, &off).await.unwrap();
        assert!(!tree.has_category("BloodPressure"));
        assert!(!tree.has_variable("BloodPressureSystolic"));
        assert!(!tree.has_variable("BloodPressureDiastolic"));

        reconcile(&tree, &on).await.unwrap();
        assert!(tree.has_variable("BloodPressureDiastolic"));
    }

    #[tokio::test]
    async fn grouped_variables_are_parented_under_their_category() {
        let tree = MemoryTree::new();
        reconcile(&tree, &EnableFlags::all()).await.unwrap();

        assert_eq!(tree.parent_of("SleepDuration").as_deref(), Some("Sleep"));
        assert_eq!(
            tree.parent_of("BloodPressureSystolic").as_deref(),
            Some("BloodPressure")
        );
        assert_eq!(tree.parent_of("Steps"), None);
    }

    #[tokio::test]
    async fn set_value_is_last_write_wins() {
        let tree = MemoryTree::new();
        reconcile(&tree, &EnableFlags::none().with(Metric::Steps))
            .await
            .unwrap();

        tree.set_value("Steps", VarValue::Int(100)).await.unwrap();
        tree.set_value("Steps", VarValue::Int(250)).await.unwrap();

        assert_eq!(tree.value("Steps"), Some(VarValue::Int(250)));
    }

    #[tokio::test]
    async fn set_value_rejects_missing_slots() {
        let tree = MemoryTree::new();
        let err = tree.set_value("Steps", VarValue::Int(1)).await.unwrap_err();
        assert!(err.to_string().contains("Steps"));
    }
}
