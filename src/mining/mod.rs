//! The mining adapter: turns the event-log table into a process model.

pub mod alpha;
pub mod dfg;
pub mod dot;

use tracing::info;

use crate::models::errors::MiningError;
use crate::models::records::EventLogTable;

pub use alpha::{PetriNet, Place};
pub use dfg::DfgModel;

/// A discovered process model.
#[derive(Debug)]
pub struct ProcessModel {
    pub dfg: DfgModel,
    pub petri_net: Option<PetriNet>,
}

/// Seam between the pipeline and the discovery algorithms: the adapter
/// depends on this contract only, not on how models are computed.
pub trait DiscoveryEngine {
    fn discover_dfg(&self, table: &EventLogTable) -> DfgModel;
    fn discover_petri_net(&self, table: &EventLogTable) -> Option<PetriNet>;
}

/// In-process engine: DFG counting plus the alpha algorithm.
#[derive(Debug, Default, Clone)]
pub struct AlphaMinerEngine;

impl DiscoveryEngine for AlphaMinerEngine {
    fn discover_dfg(&self, table: &EventLogTable) -> DfgModel {
        dfg::discover(table)
    }

    fn discover_petri_net(&self, table: &EventLogTable) -> Option<PetriNet> {
        Some(alpha::discover(table))
    }
}

/// Run discovery over a non-empty table. An empty table is a hard error and
/// the engine is never invoked for it.
pub fn discover<E: DiscoveryEngine>(
    table: &EventLogTable,
    engine: &E,
) -> Result<ProcessModel, MiningError> {
    if table.is_empty() {
        return Err(MiningError::EmptyLog);
    }

    let dfg = engine.discover_dfg(table);
    info!(
        "Discovered DFG: {} edges, {} start activities, {} end activities",
        dfg.edges.len(),
        dfg.start_activities.len(),
        dfg.end_activities.len()
    );
    let petri_net = engine.discover_petri_net(table);

    Ok(ProcessModel { dfg, petri_net })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::records::CaseRecord;
    use chrono::DateTime;

    struct PanickingEngine;

    impl DiscoveryEngine for PanickingEngine {
        fn discover_dfg(&self, _table: &EventLogTable) -> DfgModel {
            panic!("engine must not run on an empty log");
        }

        fn discover_petri_net(&self, _table: &EventLogTable) -> Option<PetriNet> {
            panic!("engine must not run on an empty log");
        }
    }

    #[test]
    fn empty_table_fails_without_invoking_the_engine() {
        let table = EventLogTable::new();
        let result = discover(&table, &PanickingEngine);
        assert!(matches!(result, Err(MiningError::EmptyLog)));
    }

    #[test]
    fn non_empty_table_produces_a_model() {
        let mut table = EventLogTable::new();
        table.push(CaseRecord {
            case_id: "case".into(),
            activity: "only".into(),
            timestamp: DateTime::from_timestamp(0, 0).unwrap(),
        });
        let model = discover(&table, &AlphaMinerEngine).unwrap();
        assert_eq!(model.dfg.start_activities.get("only"), Some(&1));
        assert!(model.petri_net.is_some());
    }
}
