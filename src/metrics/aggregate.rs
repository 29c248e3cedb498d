//! Turning an alert list into label counts

use crate::alerts::AlertRecord;

use super::store::Snapshot;

/// Count alerts per `(alertname, state, instance)`.
///
/// The result only contains keys present in `records`; nothing carries over from
/// earlier cycles, so an empty input yields an empty snapshot.
pub fn aggregate(records: &[AlertRecord]) -> Snapshot {
    let mut snapshot = Snapshot::new();
    for record in records {
        *snapshot.entry(record.label_key()).or_insert(0) += 1;
    }
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::LabelKey;

    fn alert(state: &str, labels: &[(&str, &str)]) -> AlertRecord {
        let mut record = AlertRecord::default();
        record.status.state = state.to_string();
        for (k, v) in labels {
            record.labels.insert(k.to_string(), v.to_string());
        }
        record
    }

    #[test]
    fn test_empty_input_resets() {
        assert!(aggregate(&[]).is_empty());
    }

    #[test]
    fn test_identical_keys_are_counted() {
        let records = vec![
            alert("firing", &[("alertname", "HighCPU"), ("instance", "node1")]),
            alert("firing", &[("alertname", "HighCPU"), ("instance", "node1")]),
        ];

        let snapshot = aggregate(&records);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[&LabelKey::new("HighCPU", "firing", "node1")], 2);
    }

    #[test]
    fn test_missing_labels_fall_back() {
        let records = vec![
            alert("resolved", &[]),
            alert("firing", &[("instance", "node3")]),
            alert("firing", &[("alertname", "Disk")]),
        ];

        let snapshot = aggregate(&records);
        assert_eq!(snapshot[&LabelKey::new("unknown", "resolved", "unknown")], 1);
        assert_eq!(snapshot[&LabelKey::new("unknown", "firing", "node3")], 1);
        assert_eq!(snapshot[&LabelKey::new("Disk", "firing", "unknown")], 1);
    }

    #[test]
    fn test_extra_labels_ignored() {
        let records = vec![
            alert("firing", &[("alertname", "A"), ("instance", "i"), ("job", "x")]),
            alert("firing", &[("alertname", "A"), ("instance", "i"), ("job", "y")]),
        ];

        let snapshot = aggregate(&records);
        assert_eq!(snapshot[&LabelKey::new("A", "firing", "i")], 2);
    }

    #[test]
    fn test_order_independent() {
        let mut records = vec![
            alert("firing", &[("alertname", "A"), ("instance", "1")]),
            alert("suppressed", &[("alertname", "A"), ("instance", "1")]),
            alert("firing", &[("alertname", "B")]),
            alert("firing", &[("alertname", "A"), ("instance", "1")]),
        ];

        let forward = aggregate(&records);
        records.reverse();
        assert_eq!(aggregate(&records), forward);
        records.rotate_left(1);
        assert_eq!(aggregate(&records), forward);
    }
}
