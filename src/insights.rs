//! Presentation-side aggregates derived from a filtered record set:
//! daily quality trends, per-manager breakdowns, rating bands, and the
//! latest interaction.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::PerformanceThresholds;
use crate::core::timestamp::CallTimestamp;
use crate::core::CallRecord;
use crate::group::round2;

/// Mean quality scores of all calls that share one day.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailyQuality {
    pub day: NaiveDate,
    pub quality: f64,
    pub script: f64,
    pub errors: f64,
}

/// Call count and mean overall rating of one manager.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ManagerPerformance {
    pub manager: String,
    pub calls: usize,
    pub rating: f64,
}

/// One overall-rating band with its population.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerformanceBand {
    pub label: String,
    pub count: usize,
}

/// Per-day means of quality, script-match, and errors-free scores, in
/// chronological day order. Records without a parseable date are skipped.
pub fn quality_trends(records: &[CallRecord]) -> Vec<DailyQuality> {
    let mut sums: HashMap<NaiveDate, ([f64; 3], usize)> = HashMap::new();
    for record in records {
        let Some(day) = record.timestamp().date() else {
            continue;
        };
        let (acc, count) = sums.entry(day).or_insert(([0.0; 3], 0));
        acc[0] += record.quality_of_call;
        acc[1] += record.script_match;
        acc[2] += record.errors_free;
        *count += 1;
    }

    let mut trends: Vec<DailyQuality> = sums
        .into_iter()
        .map(|(day, (acc, count))| {
            let count = count as f64;
            DailyQuality {
                day,
                quality: round2(acc[0] / count),
                script: round2(acc[1] / count),
                errors: round2(acc[2] / count),
            }
        })
        .collect();
    trends.sort_by_key(|trend| trend.day);
    trends
}

/// Call count and 1-decimal mean overall rating per manager, in first-seen
/// order. Blank and literal "undefined" manager names are skipped.
pub fn manager_performance(records: &[CallRecord]) -> Vec<ManagerPerformance> {
    let mut order: Vec<String> = Vec::new();
    let mut stats: HashMap<String, (usize, f64)> = HashMap::new();

    for record in records {
        let manager = record.manager_name.trim();
        if manager.is_empty() || manager.eq_ignore_ascii_case("undefined") {
            continue;
        }
        if !stats.contains_key(manager) {
            order.push(manager.to_string());
        }
        let (calls, total) = stats.entry(manager.to_string()).or_insert((0, 0.0));
        *calls += 1;
        *total += record.overall_rating;
    }

    order
        .into_iter()
        .filter_map(|manager| {
            let (calls, total) = stats.remove(&manager)?;
            Some(ManagerPerformance {
                manager,
                calls,
                rating: round1(total / calls as f64),
            })
        })
        .collect()
}

/// Population of the excellent/good/poor overall-rating bands; bands with
/// no calls are omitted.
pub fn performance_distribution(
    records: &[CallRecord],
    thresholds: &PerformanceThresholds,
) -> Vec<PerformanceBand> {
    let excellent = thresholds.excellent_min;
    let good = thresholds.good_min;

    let bands = [
        (
            format!("Excellent ({excellent}-10)"),
            records
                .iter()
                .filter(|r| r.overall_rating >= excellent)
                .count(),
        ),
        (
            format!("Good ({good}-{excellent})"),
            records
                .iter()
                .filter(|r| r.overall_rating >= good && r.overall_rating < excellent)
                .count(),
        ),
        (
            format!("Poor (0-{good})"),
            records.iter().filter(|r| r.overall_rating < good).count(),
        ),
    ];

    bands
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(label, count)| PerformanceBand { label, count })
        .collect()
}

/// The chronologically latest record of the set; equal timestamps resolve
/// to the later input position.
pub fn latest_record(records: &[CallRecord]) -> Option<&CallRecord> {
    let mut best: Option<(&CallRecord, CallTimestamp)> = None;
    for record in records {
        let timestamp = record.timestamp();
        if best.as_ref().is_none_or(|(_, best_ts)| timestamp >= *best_ts) {
            best = Some((record, timestamp));
        }
    }
    best.map(|(record, _)| record)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(manager: &str, date: &str, rating: f64) -> CallRecord {
        CallRecord {
            date: date.to_string(),
            manager_name: manager.to_string(),
            client_phone: "555".to_string(),
            quality_of_call: rating,
            script_match: rating,
            errors_free: rating,
            overall_rating: rating,
            ..CallRecord::default()
        }
    }

    #[test]
    fn trends_average_per_day_in_chronological_order() {
        let records = vec![
            record("Ann", "24.01.2025", 8.0),
            record("Ann", "23.01.2025", 4.0),
            record("Bob", "23.01.2025", 6.0),
        ];
        let trends = quality_trends(&records);
        assert_eq!(trends.len(), 2);
        assert_eq!(trends[0].day, NaiveDate::from_ymd_opt(2025, 1, 23).unwrap());
        assert_eq!(trends[0].quality, 5.0);
        assert_eq!(trends[1].quality, 8.0);
    }

    #[test]
    fn trends_skip_records_without_a_parseable_date() {
        let records = vec![record("Ann", "someday", 8.0)];
        assert!(quality_trends(&records).is_empty());
    }

    #[test]
    fn manager_breakdown_counts_and_averages_to_one_decimal() {
        let records = vec![
            record("Ann", "23.01.2025", 7.0),
            record("Ann", "24.01.2025", 8.0),
            record("Bob", "23.01.2025", 5.0),
        ];
        let breakdown = manager_performance(&records);
        assert_eq!(
            breakdown,
            vec![
                ManagerPerformance {
                    manager: "Ann".to_string(),
                    calls: 2,
                    rating: 7.5,
                },
                ManagerPerformance {
                    manager: "Bob".to_string(),
                    calls: 1,
                    rating: 5.0,
                },
            ]
        );
    }

    #[test]
    fn manager_breakdown_skips_blank_and_undefined_names() {
        let records = vec![
            record("  ", "23.01.2025", 7.0),
            record("undefined", "23.01.2025", 7.0),
            record("Ann", "23.01.2025", 7.0),
        ];
        assert_eq!(manager_performance(&records).len(), 1);
    }

    #[test]
    fn distribution_buckets_ratings_and_drops_empty_bands() {
        let thresholds = PerformanceThresholds::default();
        let records = vec![
            record("Ann", "23.01.2025", 9.0),
            record("Ann", "23.01.2025", 8.0),
            record("Bob", "23.01.2025", 6.5),
        ];
        let bands = performance_distribution(&records, &thresholds);
        assert_eq!(
            bands,
            vec![
                PerformanceBand {
                    label: "Excellent (8-10)".to_string(),
                    count: 2,
                },
                PerformanceBand {
                    label: "Good (6-8)".to_string(),
                    count: 1,
                },
            ]
        );
    }

    #[test]
    fn latest_record_prefers_later_input_on_ties() {
        let records = vec![
            record("Ann", "23.01.2025", 7.0),
            record("Bob", "23.01.2025", 5.0),
        ];
        assert_eq!(latest_record(&records).unwrap().manager_name, "Bob");
        assert!(latest_record(&[]).is_none());
    }
}
