/// Record grouping and recency selection.
///
/// The record source returns flat, unordered lists that may span every
/// station in a customer batch. `group_by_key` partitions such a list into
/// per-station sublists in one linear pass; `most_recent` selects the latest
/// record from a slice; `sort_by_time` orders a group ascending in place.
///
/// Sorting and selection are deliberately separate operations: the
/// aggregator picks the most recent forecast from a group and sorts that
/// same group for attachment, and neither call may disturb the other.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Partitions `records` into a map keyed by `key_fn`.
///
/// Every record lands in exactly one group, in its original relative order —
/// a key that occurs once produces a one-element group, and the first record
/// seen for a key is appended the same way as every later one.
pub fn group_by_key<T, F>(records: Vec<T>, key_fn: F) -> HashMap<String, Vec<T>>
where
    F: Fn(&T) -> &str,
{
    let mut grouped: HashMap<String, Vec<T>> = HashMap::new();

    for record in records {
        let key = key_fn(&record).to_string();
        grouped.entry(key).or_default().push(record);
    }

    grouped
}

// ---------------------------------------------------------------------------
// Recency selection
// ---------------------------------------------------------------------------

/// Returns the record with the maximum timestamp, or `None` for an empty
/// slice.
///
/// Ties resolve to the first such record in input order, so repeated runs
/// over identical input select the same record. The input is not reordered.
pub fn most_recent<'a, T, F>(records: &'a [T], timestamp: F) -> Option<&'a T>
where
    F: Fn(&T) -> DateTime<Utc>,
{
    records.iter().reduce(|best, candidate| {
        if timestamp(candidate) > timestamp(best) {
            candidate
        } else {
            best
        }
    })
}

/// Sorts records ascending by timestamp, in place. Stable, so records
/// sharing a timestamp keep their arrival order.
pub fn sort_by_time<T, F>(records: &mut [T], timestamp: F)
where
    F: Fn(&T) -> DateTime<Utc>,
{
    records.sort_by_key(|record| timestamp(record));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Transmission;
    use chrono::{Duration, TimeZone};

    /// Builds a transmission `minutes` past a fixed base instant.
    fn tx(station_id: &str, minutes: i64) -> Transmission {
        let base = Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap();
        Transmission {
            station_id: station_id.to_string(),
            sent_at: base + Duration::minutes(minutes),
            temperature_c: Some(18.5),
            relative_humidity_pct: Some(62.0),
            wind_speed_mps: Some(3.1),
            battery_voltage: Some(12.6),
        }
    }

    // --- Grouping ----------------------------------------------------------

    #[test]
    fn test_group_by_key_empty_input_returns_empty_map() {
        let grouped = group_by_key(Vec::<Transmission>::new(), |t| &t.station_id);
        assert!(grouped.is_empty(), "empty input should produce empty map");
    }

    #[test]
    fn test_group_by_key_singleton_key_keeps_its_record() {
        // A key seen exactly once must still produce a one-element group;
        // dropping the first record per key is the classic grouping bug.
        let grouped = group_by_key(vec![tx("WS-001", 0)], |t| &t.station_id);

        assert_eq!(grouped.len(), 1);
        assert_eq!(
            grouped["WS-001"].len(),
            1,
            "a single-record key should produce a group of size 1"
        );
    }

    #[test]
    fn test_group_by_key_retains_every_record() {
        let records = vec![
            tx("WS-001", 0),
            tx("WS-002", 5),
            tx("WS-001", 10),
            tx("WS-003", 2),
            tx("WS-002", 7),
        ];
        let total = records.len();
        let grouped = group_by_key(records, |t| &t.station_id);

        let regrouped: usize = grouped.values().map(|g| g.len()).sum();
        assert_eq!(
            regrouped, total,
            "sum of group sizes should equal input length"
        );
        assert_eq!(grouped.len(), 3, "should have one group per distinct key");
    }

    #[test]
    fn test_group_by_key_preserves_arrival_order_within_group() {
        let records = vec![
            tx("WS-001", 30),
            tx("WS-002", 0),
            tx("WS-001", 10),
            tx("WS-001", 20),
        ];
        let grouped = group_by_key(records, |t| &t.station_id);

        let minutes: Vec<i64> = grouped["WS-001"]
            .iter()
            .map(|t| t.sent_at.timestamp() / 60 % 60)
            .collect();
        assert_eq!(
            minutes,
            vec![30, 10, 20],
            "group should hold records in original relative order, not sorted"
        );
    }

    // --- Recency selection -------------------------------------------------

    #[test]
    fn test_most_recent_of_empty_slice_is_none() {
        let records: Vec<Transmission> = vec![];
        assert!(most_recent(&records, |t| t.sent_at).is_none());
    }

    #[test]
    fn test_most_recent_of_single_record_is_that_record() {
        let records = vec![tx("WS-001", 15)];
        let selected = most_recent(&records, |t| t.sent_at).expect("should select");
        assert_eq!(selected, &records[0]);
    }

    #[test]
    fn test_most_recent_selects_maximum_timestamp() {
        let records = vec![tx("WS-001", 10), tx("WS-001", 45), tx("WS-001", 30)];
        let selected = most_recent(&records, |t| t.sent_at).expect("should select");

        let max = records.iter().map(|t| t.sent_at).max().unwrap();
        assert_eq!(selected.sent_at, max);
    }

    #[test]
    fn test_most_recent_tie_resolves_to_first_in_input_order() {
        let mut first = tx("WS-001", 45);
        first.temperature_c = Some(1.0);
        let mut second = tx("WS-001", 45);
        second.temperature_c = Some(2.0);

        let records = vec![tx("WS-001", 10), first, second];
        let selected = most_recent(&records, |t| t.sent_at).expect("should select");

        assert_eq!(
            selected.temperature_c,
            Some(1.0),
            "on a timestamp tie the earlier input record wins"
        );
    }

    #[test]
    fn test_most_recent_does_not_reorder_input() {
        let records = vec![tx("WS-001", 30), tx("WS-001", 10), tx("WS-001", 20)];
        let before: Vec<_> = records.iter().map(|t| t.sent_at).collect();

        let _ = most_recent(&records, |t| t.sent_at);

        let after: Vec<_> = records.iter().map(|t| t.sent_at).collect();
        assert_eq!(before, after, "selection must not reorder the input slice");
    }

    // --- Sorting -----------------------------------------------------------

    #[test]
    fn test_sort_by_time_orders_ascending() {
        let mut records = vec![tx("WS-001", 30), tx("WS-001", 5), tx("WS-001", 20)];
        sort_by_time(&mut records, |t| t.sent_at);

        for pair in records.windows(2) {
            assert!(
                pair[0].sent_at <= pair[1].sent_at,
                "records should be non-decreasing by sent_at after sort"
            );
        }
    }

    #[test]
    fn test_sort_by_time_is_stable_for_equal_timestamps() {
        let mut early = tx("WS-001", 10);
        early.temperature_c = Some(1.0);
        let mut late = tx("WS-001", 10);
        late.temperature_c = Some(2.0);

        let mut records = vec![tx("WS-001", 40), early, late];
        sort_by_time(&mut records, |t| t.sent_at);

        assert_eq!(records[0].temperature_c, Some(1.0));
        assert_eq!(records[1].temperature_c, Some(2.0));
    }
}
