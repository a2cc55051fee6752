// VDB - Verification Debugger
// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! State graph of a completed verification run
//!
//! The graph is an arena: every [`Step`] lives in one vector and refers to
//! other steps by index. Two relations coexist and must not be confused:
//!
//! - the *structural parent* ([`StateGraph::parent`]), recorded in the proof
//!   log, which links a state to the state it was derived from;
//! - the *creation-order predecessor* ([`StateGraph::predecessor_by_index`]),
//!   which is simply the state created right before it.
//!
//! Depths and decoration indices are computed once at construction; the
//! graph is immutable afterwards.

mod verifiable;

pub use verifiable::{Verifiable, VerifiableRef};

use tracing::{debug, warn};
use vdb_common::types::{Position, StepRecord};

use crate::error::DebugError;

/// Index of a step in creation order
pub type StepId = usize;

/// One symbolic-execution state of a verification run
#[derive(Debug, Clone)]
pub struct Step {
    index: StepId,
    parent: Option<StepId>,
    depth: usize,
    decoration_index: Option<usize>,
    children: Vec<StepId>,
    record: StepRecord,
}

impl Step {
    /// Position in creation order
    pub fn index(&self) -> StepId {
        self.index
    }

    /// Structural parent, if any
    pub fn parent(&self) -> Option<StepId> {
        self.parent
    }

    /// Whether execution forks at this state
    pub fn is_branch(&self) -> bool {
        self.record.is_branch
    }

    /// Distance from the root of the state's tree
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Whether the state is shown to the user
    pub fn can_be_shown_as_decoration(&self) -> bool {
        self.record.can_be_shown_as_decoration
    }

    /// Client-visible number of the state, if it is shown
    pub fn decoration_index(&self) -> Option<usize> {
        self.decoration_index
    }

    /// Structural children in creation order
    pub fn children(&self) -> &[StepId] {
        &self.children
    }

    /// Index of the verifiable the state belongs to
    pub fn verifiable(&self) -> usize {
        self.record.verifiable
    }

    /// Source file of the verifiable
    pub fn file_name(&self) -> &str {
        &self.record.file_name
    }

    /// Name of the verifiable
    pub fn method_name(&self) -> &str {
        &self.record.method_name
    }

    /// Kind of the verifiable
    pub fn method_type(&self) -> &str {
        &self.record.method_type
    }

    /// Index of the verifiable's first state
    pub fn method_offset(&self) -> usize {
        self.record.method_offset
    }

    /// Source position of the state
    pub fn position(&self) -> Position {
        self.record.position
    }

    /// The proof-log record the state was built from
    pub fn record(&self) -> &StepRecord {
        &self.record
    }
}

/// Arena of all states of one verification run
#[derive(Debug, Clone, Default)]
pub struct StateGraph {
    steps: Vec<Step>,
    verifiables: Vec<Verifiable>,
}

impl StateGraph {
    /// Build the graph from proof-log records given in creation order.
    ///
    /// Inconsistent records are degraded rather than rejected: parent indices
    /// outside the log are dropped and a parent cycle is broken by turning
    /// the step where it was detected into a root.
    pub fn from_records(records: Vec<StepRecord>) -> Self {
        let total = records.len();
        let mut parents: Vec<Option<StepId>> = records
            .iter()
            .enumerate()
            .map(|(index, record)| match record.parent {
                Some(parent) if parent >= total => {
                    warn!(step = index, parent, "dropping parent outside of the proof log");
                    None
                }
                parent => parent,
            })
            .collect();

        let depths = compute_depths(&mut parents);

        let mut next_decoration = 0;
        let mut steps: Vec<Step> = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| {
                let decoration_index = record.can_be_shown_as_decoration.then(|| {
                    next_decoration += 1;
                    next_decoration - 1
                });
                Step {
                    index,
                    parent: parents[index],
                    depth: depths[index],
                    decoration_index,
                    children: Vec::new(),
                    record,
                }
            })
            .collect();

        for index in 0..total {
            if let Some(parent) = steps[index].parent {
                steps[parent].children.push(index);
            }
        }

        let verifiables = Verifiable::group(&steps);

        debug!(
            steps = total,
            decorated = next_decoration,
            verifiables = verifiables.len(),
            "built state graph"
        );

        Self { steps, verifiables }
    }

    /// Get a step by index
    pub fn step(&self, id: StepId) -> Option<&Step> {
        self.steps.get(id)
    }

    /// All steps in creation order
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Number of steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if the graph has no steps
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Depth of a step
    pub fn depth_level(&self, id: StepId) -> Option<usize> {
        self.step(id).map(Step::depth)
    }

    /// Whether a step is a branch point
    pub fn is_branch(&self, id: StepId) -> bool {
        self.step(id).is_some_and(Step::is_branch)
    }

    /// Structural parent of a step
    pub fn parent(&self, id: StepId) -> Option<&Step> {
        self.step(id)?.parent.and_then(|parent| self.step(parent))
    }

    /// The step created right before `id`, regardless of structure
    pub fn predecessor_by_index(&self, id: StepId) -> Option<&Step> {
        id.checked_sub(1).and_then(|prev| self.step(prev))
    }

    /// All verifiables of the run
    pub fn verifiables(&self) -> &[Verifiable] {
        &self.verifiables
    }

    /// The verifiable a step belongs to
    pub fn verifiable_of(&self, id: StepId) -> Option<VerifiableRef<'_>> {
        let step = self.step(id)?;
        self.verifiables
            .iter()
            .find(|verifiable| verifiable.index() == step.verifiable())
            .map(|verifiable| VerifiableRef::new(self, verifiable))
    }
}

/// Compute the depth of every step, breaking parent cycles in place.
fn compute_depths(parents: &mut [Option<StepId>]) -> Vec<usize> {
    let total = parents.len();
    let mut depths: Vec<Option<usize>> = vec![None; total];
    let mut on_chain = vec![false; total];

    for start in 0..total {
        let mut chain = Vec::new();
        let mut current = start;
        let mut base = loop {
            if let Some(depth) = depths[current] {
                break Some(depth);
            }
            if on_chain[current] {
                let err = DebugError::MalformedGraph(format!("parent cycle through step {current}"));
                warn!("{err}, treating step as a root");
                parents[current] = None;
                let cut = chain.iter().position(|&step| step == current).unwrap_or(0);
                for &step in &chain[cut + 1..] {
                    on_chain[step] = false;
                }
                chain.truncate(cut + 1);
                break None;
            }
            on_chain[current] = true;
            chain.push(current);
            match parents[current] {
                Some(parent) => current = parent,
                None => break None,
            }
        };

        for &step in chain.iter().rev() {
            let depth = base.map_or(0, |depth| depth + 1);
            depths[step] = Some(depth);
            on_chain[step] = false;
            base = Some(depth);
        }
    }

    depths.into_iter().map(|depth| depth.unwrap_or(0)).collect()
}
