use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One row of the tabular event log consumed by process discovery.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseRecord {
    pub case_id: String,
    pub activity: String,
    pub timestamp: DateTime<Utc>,
}

/// Ordered event-log table: one record per processed log, in block/log
/// discovery order. Built once per analysis run.
#[derive(Debug, Default)]
pub struct EventLogTable {
    records: Vec<CaseRecord>,
}

impl EventLogTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: CaseRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[CaseRecord] {
        &self.records
    }

    /// Group records into per-case traces. Cases keep their first-seen order;
    /// within a case, records are stably sorted by timestamp so equal
    /// timestamps keep log order.
    pub fn traces(&self) -> Vec<Vec<&CaseRecord>> {
        let mut case_order: Vec<&str> = Vec::new();
        let mut by_case: HashMap<&str, Vec<&CaseRecord>> = HashMap::new();
        for record in &self.records {
            let trace = by_case.entry(record.case_id.as_str()).or_default();
            if trace.is_empty() {
                case_order.push(record.case_id.as_str());
            }
            trace.push(record);
        }
        case_order
            .into_iter()
            .map(|case_id| {
                let mut trace = by_case.remove(case_id).unwrap_or_default();
                trace.sort_by_key(|record| record.timestamp);
                trace
            })
            .collect()
    }
}

impl FromIterator<CaseRecord> for EventLogTable {
    fn from_iter<I: IntoIterator<Item = CaseRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(case_id: &str, activity: &str, seconds: i64) -> CaseRecord {
        CaseRecord {
            case_id: case_id.into(),
            activity: activity.into(),
            timestamp: DateTime::from_timestamp(seconds, 0).unwrap(),
        }
    }

    #[test]
    fn traces_group_by_case_and_sort_by_timestamp() {
        let table: EventLogTable = vec![
            record("a", "start", 30),
            record("b", "start", 10),
            record("a", "finish", 20),
        ]
        .into_iter()
        .collect();

        let traces = table.traces();
        assert_eq!(traces.len(), 2);
        // Case "a" was seen first and is timestamp-sorted within the trace.
        assert_eq!(traces[0][0].activity, "finish");
        assert_eq!(traces[0][1].activity, "start");
        assert_eq!(traces[1][0].case_id, "b");
    }

    #[test]
    fn equal_timestamps_keep_log_order() {
        let table: EventLogTable = vec![
            record("a", "first", 10),
            record("a", "second", 10),
            record("a", "third", 10),
        ]
        .into_iter()
        .collect();

        let traces = table.traces();
        let activities: Vec<_> = traces[0].iter().map(|r| r.activity.as_str()).collect();
        assert_eq!(activities, ["first", "second", "third"]);
    }
}
