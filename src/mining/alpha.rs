//! Petri-net discovery with the alpha algorithm.
//!
//! Transitions are the observed activities. Internal places come from the
//! maximal (A, B) pairs where every activity in A causally precedes every
//! activity in B, and A and B are each internally unrelated. A dedicated
//! source place feeds the start activities and a sink place collects the end
//! activities; the initial and final markings put one token on those.

use std::collections::BTreeSet;

use crate::models::records::EventLogTable;

/// A place with its input and output transitions.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Place {
    pub inputs: BTreeSet<String>,
    pub outputs: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PetriNet {
    pub transitions: BTreeSet<String>,
    pub places: Vec<Place>,
    pub source: Place,
    pub sink: Place,
}

impl PetriNet {
    /// Initial marking: one token on the source place.
    pub fn initial_marking(&self) -> &Place {
        &self.source
    }

    /// Final marking: one token on the sink place.
    pub fn final_marking(&self) -> &Place {
        &self.sink
    }
}

pub fn discover(table: &EventLogTable) -> PetriNet {
    // Index activities so the footprint relations work on small integers.
    let mut names: Vec<String> = Vec::new();
    let index_of = |activity: &str, names: &mut Vec<String>| -> usize {
        match names.iter().position(|name| name == activity) {
            Some(index) => index,
            None => {
                names.push(activity.to_string());
                names.len() - 1
            }
        }
    };

    let mut traces: Vec<Vec<usize>> = Vec::new();
    for trace in table.traces() {
        traces.push(
            trace
                .iter()
                .map(|record| index_of(&record.activity, &mut names))
                .collect(),
        );
    }

    let mut starts: BTreeSet<usize> = BTreeSet::new();
    let mut ends: BTreeSet<usize> = BTreeSet::new();
    let mut follows: BTreeSet<(usize, usize)> = BTreeSet::new();
    for trace in &traces {
        if let Some(first) = trace.first() {
            starts.insert(*first);
        }
        if let Some(last) = trace.last() {
            ends.insert(*last);
        }
        for pair in trace.windows(2) {
            follows.insert((pair[0], pair[1]));
        }
    }

    let causal = |a: usize, b: usize| follows.contains(&(a, b)) && !follows.contains(&(b, a));
    let unrelated = |a: usize, b: usize| !follows.contains(&(a, b)) && !follows.contains(&(b, a));

    // All non-empty pairwise-unrelated activity sets. An activity with a
    // self-loop relates to itself and cannot appear in any set.
    let mut unrelated_sets: Vec<BTreeSet<usize>> = Vec::new();
    for activity in 0..names.len() {
        if !unrelated(activity, activity) {
            continue;
        }
        let mut additions: Vec<BTreeSet<usize>> = vec![BTreeSet::from([activity])];
        for existing in &unrelated_sets {
            if existing.iter().all(|member| unrelated(*member, activity)) {
                let mut grown = existing.clone();
                grown.insert(activity);
                additions.push(grown);
            }
        }
        unrelated_sets.extend(additions);
    }

    // Candidate (A, B) pairs: full causality from A into B.
    let mut candidates: Vec<(&BTreeSet<usize>, &BTreeSet<usize>)> = Vec::new();
    for a_set in &unrelated_sets {
        for b_set in &unrelated_sets {
            if a_set.iter().all(|a| b_set.iter().all(|b| causal(*a, *b))) {
                candidates.push((a_set, b_set));
            }
        }
    }

    // Keep only maximal pairs: no other candidate strictly contains both
    // sides.
    let resolve = |set: &BTreeSet<usize>| -> BTreeSet<String> {
        set.iter().map(|index| names[*index].clone()).collect()
    };
    let places: Vec<Place> = candidates
        .iter()
        .filter(|(a_set, b_set)| {
            !candidates.iter().any(|(other_a, other_b)| {
                !(other_a == a_set && other_b == b_set)
                    && a_set.is_subset(other_a)
                    && b_set.is_subset(other_b)
            })
        })
        .map(|(a_set, b_set)| Place {
            inputs: resolve(a_set),
            outputs: resolve(b_set),
        })
        .collect();

    PetriNet {
        transitions: names.iter().cloned().collect(),
        places,
        source: Place {
            inputs: BTreeSet::new(),
            outputs: resolve(&starts),
        },
        sink: Place {
            inputs: resolve(&ends),
            outputs: BTreeSet::new(),
        },
    }
}
