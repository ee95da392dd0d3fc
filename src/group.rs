//! Collapses call events into one summary record per manager-client
//! relationship.
//!
//! A synthesized record represents the relationship as of its most recent
//! contact: identity fields come from the chronologically latest event,
//! numeric scores are historical means, and free-text fields concatenate
//! every non-empty entry in chronological order.

use std::collections::HashMap;

use crate::core::CallRecord;

/// Separator between concatenated free-text paragraphs.
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Group all records by (manager id, client id) and merge each partition.
/// Emission follows the insertion order of first-seen keys; partitions
/// with a single record pass through unchanged.
pub fn group_records(records: &[CallRecord]) -> Vec<CallRecord> {
    let mut key_order: Vec<(String, String)> = Vec::new();
    let mut partitions: HashMap<(String, String), Vec<&CallRecord>> = HashMap::new();

    for record in records {
        let key = record.relationship_key();
        if !partitions.contains_key(&key) {
            key_order.push(key.clone());
        }
        partitions.entry(key).or_default().push(record);
    }

    key_order
        .into_iter()
        .filter_map(|key| partitions.remove(&key))
        .map(merge_partition)
        .collect()
}

/// Round to two decimal places, the precision every averaged score uses.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn merge_partition(mut partition: Vec<&CallRecord>) -> CallRecord {
    if partition.len() == 1 {
        return partition[0].clone();
    }

    // Stable sort: equal timestamps keep input order, so the last element
    // is the latest contact with input order as the tie-break.
    partition.sort_by_key(|record| record.timestamp());

    let count = partition.len() as f64;
    let sums = partition.iter().fold([0.0; 5], |mut acc, record| {
        for (slot, score) in acc.iter_mut().zip(record.scores()) {
            *slot += score;
        }
        acc
    });

    let latest = partition[partition.len() - 1];
    CallRecord {
        quality_of_call: round2(sums[0] / count),
        script_match: round2(sums[1] / count),
        errors_free: round2(sums[2] / count),
        overall_rating: round2(sums[3] / count),
        kpi: round2(sums[4] / count),
        recommendations: join_texts(&partition, |record| &record.recommendations),
        brief: join_texts(&partition, |record| &record.brief),
        next_best_action: join_texts(&partition, |record| &record.next_best_action),
        ..latest.clone()
    }
}

fn join_texts<'a>(
    partition: &[&'a CallRecord],
    field: impl Fn(&'a CallRecord) -> &'a str,
) -> String {
    partition
        .iter()
        .copied()
        .map(field)
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(PARAGRAPH_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(date: &str, manager_id: &str, client_id: &str, rating: f64) -> CallRecord {
        CallRecord {
            date: date.to_string(),
            time: "09:00".to_string(),
            manager_id: manager_id.to_string(),
            manager_name: "Ann".to_string(),
            client_phone: "555".to_string(),
            client_id: client_id.to_string(),
            overall_rating: rating,
            ..CallRecord::default()
        }
    }

    #[test]
    fn singleton_partitions_pass_through_unchanged() {
        let records = vec![record("23.01.2025", "m-1", "c-1", 8.0)];
        assert_eq!(group_records(&records), records);
    }

    #[test]
    fn scores_average_with_two_decimal_rounding() {
        let records = vec![
            record("23.01.2025", "m-1", "c-1", 6.0),
            record("24.01.2025", "m-1", "c-1", 8.0),
        ];
        let grouped = group_records(&records);
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].overall_rating, 7.0);

        let thirds = vec![
            record("23.01.2025", "m-1", "c-1", 1.0),
            record("24.01.2025", "m-1", "c-1", 1.0),
            record("25.01.2025", "m-1", "c-1", 2.0),
        ];
        assert_eq!(group_records(&thirds)[0].overall_rating, 1.33);
    }

    #[test]
    fn text_fields_concatenate_chronologically() {
        let mut older = record("23.01.2025", "m-1", "c-1", 6.0);
        older.brief = "A".to_string();
        let mut newer = record("24.01.2025", "m-1", "c-1", 8.0);
        newer.brief = "B".to_string();

        // Arrival order is newest first; chronology must win.
        let grouped = group_records(&[newer, older]);
        assert_eq!(grouped[0].brief, "A\n\nB");
    }

    #[test]
    fn empty_text_entries_are_skipped() {
        let mut first = record("23.01.2025", "m-1", "c-1", 6.0);
        first.recommendations = "Call back".to_string();
        let second = record("24.01.2025", "m-1", "c-1", 8.0);

        let grouped = group_records(&[first, second]);
        assert_eq!(grouped[0].recommendations, "Call back");
    }

    #[test]
    fn identity_fields_come_from_latest_contact() {
        let mut older = record("23.01.2025", "m-1", "c-1", 6.0);
        older.duration = "02:00".to_string();
        let mut newer = record("24.01.2025", "m-1", "c-1", 8.0);
        newer.duration = "05:00".to_string();

        let grouped = group_records(&[older, newer]);
        assert_eq!(grouped[0].date, "24.01.2025");
        assert_eq!(grouped[0].duration, "05:00");
    }

    #[test]
    fn equal_timestamps_tie_break_by_input_order() {
        let mut first = record("23.01.2025", "m-1", "c-1", 6.0);
        first.duration = "first".to_string();
        let mut second = record("23.01.2025", "m-1", "c-1", 8.0);
        second.duration = "second".to_string();

        let grouped = group_records(&[first, second]);
        assert_eq!(grouped[0].duration, "second");
    }

    #[test]
    fn emission_follows_first_seen_key_order() {
        let records = vec![
            record("23.01.2025", "m-2", "c-9", 5.0),
            record("23.01.2025", "m-1", "c-1", 6.0),
            record("24.01.2025", "m-1", "c-1", 8.0),
        ];
        let grouped = group_records(&records);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].manager_id, "m-2");
        assert_eq!(grouped[1].manager_id, "m-1");
    }
}
