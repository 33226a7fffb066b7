use std::collections::HashMap;

use dashmap::DashMap;
use em_machine::{AttributeLifecycle, Record, Schema};
use em_types::{ChangeEvent, InstanceId};

type Baseline = HashMap<String, Option<String>>;

/// Last-persisted raw values, kept beside the hosts rather than inside them.
///
/// An instance without a baseline has never been saved; every attribute with
/// a value then reports a change from absent.
#[derive(Debug, Default)]
pub struct ChangeTracker {
    baselines: DashMap<InstanceId, Baseline>,
}

impl ChangeTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// The change of one attribute on `host` against its baseline, read at
    /// call time.
    pub fn change<H: Record + 'static>(
        &self,
        attribute: &dyn AttributeLifecycle<H>,
        host: &H,
    ) -> Option<ChangeEvent> {
        let persisted = self.persisted(host.instance_id(), attribute.name());
        let current = attribute.raw_value(host);
        ChangeEvent::detect(attribute.name(), persisted.as_deref(), current.as_deref())
    }

    /// One event per attribute whose current raw value differs from the
    /// baseline, in schema order.
    pub fn changes<H: Record + 'static>(&self, schema: &Schema<H>, host: &H) -> Vec<ChangeEvent> {
        schema
            .iter()
            .filter_map(|attribute| self.change(&**attribute, host))
            .collect()
    }

    /// Take the host's current raw values as its new baseline.
    pub fn record<H: Record + 'static>(&self, schema: &Schema<H>, host: &H) {
        let values: Baseline = schema
            .iter()
            .map(|attribute| (attribute.name().to_owned(), attribute.raw_value(host)))
            .collect();
        self.baselines.insert(host.instance_id(), values);
    }

    /// Last-persisted raw value of `attribute`. `None` when never persisted
    /// or persisted as absent.
    pub fn persisted(&self, id: InstanceId, attribute: &str) -> Option<String> {
        self.baselines.get(&id)?.get(attribute).cloned().flatten()
    }

    /// Whether `id` has a recorded baseline.
    pub fn is_persisted(&self, id: InstanceId) -> bool {
        self.baselines.contains_key(&id)
    }

    /// Drop the baseline of `id`. Returns whether one existed. Baselines are
    /// otherwise kept for as long as the tracker lives.
    pub fn forget(&self, id: InstanceId) -> bool {
        self.baselines.remove(&id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use em_machine::{EnumAttribute, RecordState};
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Order {
        status: Option<String>,
        channel: Option<String>,
        meta: RecordState,
    }

    impl Record for Order {
        fn record_state(&self) -> &RecordState {
            &self.meta
        }
    }

    fn schema() -> Schema<Order> {
        let status: Arc<EnumAttribute<Order>> = Arc::new(
            EnumAttribute::builder("status", ["placed", "shipped"], |o: &Order| o.status.as_deref())
                .build()
                .unwrap(),
        );
        let channel: Arc<EnumAttribute<Order>> = Arc::new(
            EnumAttribute::builder("channel", ["web", "phone"], |o: &Order| o.channel.as_deref())
                .build()
                .unwrap(),
        );
        Schema::for_type().with(status).unwrap().with(channel).unwrap()
    }

    #[test]
    fn unsaved_instance_changes_from_absent() {
        let schema = schema();
        let tracker = ChangeTracker::new();
        let order = Order {
            status: Some("placed".into()),
            ..Order::default()
        };

        let changes = tracker.changes(&schema, &order);
        assert_eq!(changes, vec![ChangeEvent::new("status", None, Some("placed"))]);
        assert!(!tracker.is_persisted(order.instance_id()));
    }

    #[test]
    fn recorded_baseline_hides_unchanged_attributes() {
        let schema = schema();
        let tracker = ChangeTracker::new();
        let mut order = Order {
            status: Some("placed".into()),
            channel: Some("web".into()),
            ..Order::default()
        };
        tracker.record(&schema, &order);
        assert!(tracker.changes(&schema, &order).is_empty());
        assert_eq!(tracker.persisted(order.instance_id(), "channel").as_deref(), Some("web"));

        order.status = Some("shipped".into());
        order.channel = None;
        assert_eq!(
            tracker.changes(&schema, &order),
            vec![
                ChangeEvent::new("status", Some("placed"), Some("shipped")),
                ChangeEvent::new("channel", Some("web"), None),
            ]
        );
    }

    #[test]
    fn single_attribute_change_reads_the_host_at_call_time() {
        let schema = schema();
        let tracker = ChangeTracker::new();
        let mut order = Order {
            status: Some("placed".into()),
            ..Order::default()
        };
        tracker.record(&schema, &order);
        let channel = schema.attribute("channel").unwrap();
        assert_eq!(tracker.change(&**channel, &order), None);

        order.channel = Some("phone".into());
        assert_eq!(
            tracker.change(&**channel, &order),
            Some(ChangeEvent::new("channel", None, Some("phone")))
        );
    }

    #[test]
    fn clones_are_tracked_separately() {
        let schema = schema();
        let tracker = ChangeTracker::new();
        let order = Order {
            status: Some("placed".into()),
            ..Order::default()
        };
        tracker.record(&schema, &order);

        let copy = order.clone();
        assert_eq!(tracker.changes(&schema, &copy).len(), 1);
        assert!(tracker.forget(order.instance_id()));
        assert!(!tracker.forget(order.instance_id()));
    }
}
