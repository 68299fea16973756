//! Directly-follows graph discovery.

use std::collections::BTreeMap;

use crate::models::records::EventLogTable;

/// Directly-follows edge frequencies plus start/end activity frequencies
/// across all cases.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DfgModel {
    pub edges: BTreeMap<(String, String), u64>,
    pub start_activities: BTreeMap<String, u64>,
    pub end_activities: BTreeMap<String, u64>,
}

pub fn discover(table: &EventLogTable) -> DfgModel {
    let mut model = DfgModel::default();
    for trace in table.traces() {
        let Some(first) = trace.first() else { continue };
        *model
            .start_activities
            .entry(first.activity.clone())
            .or_insert(0) += 1;
        if let Some(last) = trace.last() {
            *model.end_activities.entry(last.activity.clone()).or_insert(0) += 1;
        }
        for pair in trace.windows(2) {
            let edge = (pair[0].activity.clone(), pair[1].activity.clone());
            *model.edges.entry(edge).or_insert(0) += 1;
        }
    }
    model
}
