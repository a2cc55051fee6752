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

use std::collections::BTreeMap;

use super::{StateGraph, Step, StepId};

/// A method or function under proof and the states its proof produced
#[derive(Debug, Clone)]
pub struct Verifiable {
    index: usize,
    method_type: String,
    method_name: String,
    steps: Vec<StepId>,
    top_level: Vec<StepId>,
}

impl Verifiable {
    /// Group steps by the verifiable they belong to, keeping creation order
    pub(super) fn group(steps: &[Step]) -> Vec<Self> {
        let mut grouped: BTreeMap<usize, Self> = BTreeMap::new();
        for step in steps {
            let verifiable = grouped.entry(step.verifiable()).or_insert_with(|| Self {
                index: step.verifiable(),
                method_type: step.method_type().to_string(),
                method_name: step.method_name().to_string(),
                steps: Vec::new(),
                top_level: Vec::new(),
            });
            verifiable.steps.push(step.index());
            if step.parent().is_none() {
                verifiable.top_level.push(step.index());
            }
        }
        grouped.into_values().collect()
    }

    /// Index of the verifiable in the proof log
    pub fn index(&self) -> usize {
        self.index
    }

    /// Kind of the verifiable
    pub fn method_type(&self) -> &str {
        &self.method_type
    }

    /// Name of the verifiable
    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    /// States of the verifiable in creation order
    pub fn steps(&self) -> &[StepId] {
        &self.steps
    }

    /// States without a structural parent
    pub fn top_level(&self) -> &[StepId] {
        &self.top_level
    }
}

/// A verifiable together with the graph its states live in
#[derive(Debug, Clone, Copy)]
pub struct VerifiableRef<'a> {
    graph: &'a StateGraph,
    verifiable: &'a Verifiable,
}

impl<'a> VerifiableRef<'a> {
    pub(super) fn new(graph: &'a StateGraph, verifiable: &'a Verifiable) -> Self {
        Self { graph, verifiable }
    }

    /// The underlying verifiable
    pub fn verifiable(&self) -> &'a Verifiable {
        self.verifiable
    }

    /// Visit every decorated expansion state of `anchor`.
    ///
    /// Expansion states are the states produced beneath the anchor while the
    /// verifier unfolded it. They are visited depth-first, children in
    /// creation order. States of other verifiables are skipped.
    pub fn for_all_expansion_states_with_decoration(
        &self,
        anchor: StepId,
        mut visit: impl FnMut(&'a Step),
    ) {
        let Some(anchor) = self.graph.step(anchor) else {
            return;
        };

        let mut pending: Vec<StepId> = anchor.children().iter().rev().copied().collect();
        while let Some(id) = pending.pop() {
            let Some(step) = self.graph.step(id) else {
                continue;
            };
            if step.verifiable() != self.verifiable.index {
                continue;
            }
            if step.can_be_shown_as_decoration() {
                visit(step);
            }
            pending.extend(step.children().iter().rev().copied());
        }
    }

    /// Decorated states owned directly by the verifiable
    pub fn top_level_states_with_decoration(&self) -> Vec<&'a Step> {
        self.verifiable
            .top_level
            .iter()
            .filter_map(|&id| self.graph.step(id))
            .filter(|step| step.can_be_shown_as_decoration())
            .collect()
    }
}
