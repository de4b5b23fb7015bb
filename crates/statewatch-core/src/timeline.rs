// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Computed enrichment over state history entries.
//!
//! Nothing here is stored: per-entry durations, the status summary, and the
//! total timeline duration are derived on read from rows ordered by
//! sequence number.

use serde::Serialize;

use crate::persistence::StateHistoryRecord;

/// Longest JSON preview attached to a timeline entry, in characters.
const PREVIEW_CHARS: usize = 100;

/// A state history entry enriched with computed fields.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    /// The underlying history row.
    #[serde(flatten)]
    pub state: StateHistoryRecord,
    /// Milliseconds between start and end; None while the state has no
    /// recorded end.
    pub duration: Option<i64>,
    /// Truncated JSON rendering of the state input.
    pub input_preview: Option<String>,
    /// Truncated JSON rendering of the state output.
    pub output_preview: Option<String>,
}

/// Counts of history entries by status, restricted to the four statuses the
/// dashboard surfaces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HistorySummary {
    /// Entries that completed successfully.
    pub succeeded: i64,
    /// Entries that failed.
    pub failed: i64,
    /// Entries with a retry pending.
    pub retrying: i64,
    /// Entries waiting on an external message.
    pub waiting: i64,
}

/// Milliseconds between a state's start and end, if it has ended.
pub fn entry_duration_ms(state: &StateHistoryRecord) -> Option<i64> {
    state
        .end_time
        .map(|end| (end - state.start_time).num_milliseconds())
}

/// Enrich history rows (already in sequence order) with computed fields.
pub fn enrich(states: Vec<StateHistoryRecord>) -> Vec<TimelineEntry> {
    states
        .into_iter()
        .map(|state| TimelineEntry {
            duration: entry_duration_ms(&state),
            input_preview: preview(state.input.as_ref()),
            output_preview: preview(state.output.as_ref()),
            state,
        })
        .collect()
}

/// Count entries by status, restricted to SUCCEEDED/FAILED/RETRYING/WAITING.
pub fn summarize(states: &[StateHistoryRecord]) -> HistorySummary {
    let mut summary = HistorySummary::default();
    for state in states {
        match state.status.as_str() {
            "SUCCEEDED" => summary.succeeded += 1,
            "FAILED" => summary.failed += 1,
            "RETRYING" => summary.retrying += 1,
            "WAITING" => summary.waiting += 1,
            _ => {}
        }
    }
    summary
}

/// Milliseconds from the first entry's start to the last entry's end, by
/// sequence order. None when the slice is empty or the last entry has no
/// recorded end.
pub fn total_duration_ms(states: &[StateHistoryRecord]) -> Option<i64> {
    let first = states.first()?;
    let last = states.last()?;
    let end = last.end_time?;
    Some((end - first.start_time).num_milliseconds())
}

fn preview(value: Option<&serde_json::Value>) -> Option<String> {
    let rendered = serde_json::to_string(value?).ok()?;
    Some(rendered.chars().take(PREVIEW_CHARS).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use serde_json::json;

    fn entry(
        sequence: i32,
        status: &str,
        start: DateTime<Utc>,
        end: Option<DateTime<Utc>>,
    ) -> StateHistoryRecord {
        StateHistoryRecord {
            id: format!("entry-{sequence}"),
            execution_id: "exec-1".to_string(),
            execution_start_time: start,
            state_name: format!("State{sequence}"),
            state_type: "Task".to_string(),
            input: None,
            output: None,
            status: status.to_string(),
            start_time: start,
            end_time: end,
            error: None,
            retry_count: 0,
            sequence_number: sequence,
            metadata: None,
            created_at: start,
        }
    }

    #[test]
    fn test_running_then_failed_scenario() {
        let t0 = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let t1 = t0 + Duration::seconds(2);
        let t2 = t1 + Duration::seconds(3);

        let states = vec![
            entry(0, "RUNNING", t0, None),
            entry(1, "FAILED", t1, Some(t2)),
        ];

        let summary = summarize(&states);
        assert_eq!(
            summary,
            HistorySummary {
                succeeded: 0,
                failed: 1,
                retrying: 0,
                waiting: 0,
            }
        );

        assert_eq!(total_duration_ms(&states), Some((t2 - t0).num_milliseconds()));

        let enriched = enrich(states);
        assert_eq!(enriched[0].duration, None);
        assert_eq!(enriched[1].duration, Some(3000));
    }

    #[test]
    fn test_total_duration_none_without_final_end() {
        let t0 = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let states = vec![
            entry(0, "SUCCEEDED", t0, Some(t0 + Duration::seconds(1))),
            entry(1, "RUNNING", t0 + Duration::seconds(1), None),
        ];
        assert_eq!(total_duration_ms(&states), None);
        assert_eq!(total_duration_ms(&[]), None);
    }

    #[test]
    fn test_durations_non_negative_for_completed_states() {
        let t0 = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let states = vec![
            entry(0, "SUCCEEDED", t0, Some(t0)),
            entry(1, "SUCCEEDED", t0, Some(t0 + Duration::milliseconds(250))),
        ];
        for state in &states {
            let duration = entry_duration_ms(state).expect("completed state has duration");
            assert!(duration >= 0);
        }
        assert_eq!(total_duration_ms(&states), Some(250));
    }

    #[test]
    fn test_summary_ignores_other_statuses() {
        let t0 = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let states = vec![
            entry(0, "RUNNING", t0, None),
            entry(1, "CANCELLED", t0, None),
            entry(2, "TIMED_OUT", t0, None),
            entry(3, "WAITING", t0, None),
            entry(4, "RETRYING", t0, None),
        ];
        let summary = summarize(&states);
        assert_eq!(summary.succeeded, 0);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.retrying, 1);
        assert_eq!(summary.waiting, 1);
    }

    #[test]
    fn test_previews_truncate_long_payloads() {
        let t0 = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let mut state = entry(0, "SUCCEEDED", t0, Some(t0));
        state.input = Some(json!({ "items": "x".repeat(500) }));
        state.output = Some(json!({ "ok": true }));

        let enriched = enrich(vec![state]);
        let input_preview = enriched[0].input_preview.as_ref().unwrap();
        assert_eq!(input_preview.chars().count(), 100);
        assert_eq!(enriched[0].output_preview.as_deref(), Some("{\"ok\":true}"));
    }
}
