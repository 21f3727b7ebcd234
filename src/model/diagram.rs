// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use super::element::DiagramElement;
use super::ids::{DiagramId, ElementId};

/// The in-memory diagram store the interaction layer reads and flags.
///
/// Structural changes (placing, moving, connecting, removing) go through `ops::apply_ops`, which
/// bumps `rev`. Selection and affordance flags are written directly and do not bump `rev`.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagram {
    diagram_id: DiagramId,
    name: String,
    elements: BTreeMap<ElementId, DiagramElement>,
    rev: u64,
}

impl Diagram {
    pub fn new(diagram_id: DiagramId, name: impl Into<String>) -> Self {
        Self {
            diagram_id,
            name: name.into(),
            elements: BTreeMap::new(),
            rev: 0,
        }
    }

    pub fn diagram_id(&self) -> &DiagramId {
        &self.diagram_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn elements(&self) -> &BTreeMap<ElementId, DiagramElement> {
        &self.elements
    }

    pub fn elements_mut(&mut self) -> &mut BTreeMap<ElementId, DiagramElement> {
        &mut self.elements
    }

    pub fn element(&self, element_id: &ElementId) -> Option<&DiagramElement> {
        self.elements.get(element_id)
    }

    pub fn element_mut(&mut self, element_id: &ElementId) -> Option<&mut DiagramElement> {
        self.elements.get_mut(element_id)
    }

    pub fn contains(&self, element_id: &ElementId) -> bool {
        self.elements.contains_key(element_id)
    }

    /// Ids of connections that start or end at `element_id`.
    pub fn connections_touching(&self, element_id: &ElementId) -> Vec<ElementId> {
        connections_touching(&self.elements, element_id)
    }

    pub fn rev(&self) -> u64 {
        self.rev
    }

    pub fn bump_rev(&mut self) {
        self.rev = self.rev.saturating_add(1);
    }
}

pub(crate) fn connections_touching(
    elements: &BTreeMap<ElementId, DiagramElement>,
    element_id: &ElementId,
) -> Vec<ElementId> {
    elements
        .values()
        .filter(|element| {
            element.endpoints().is_some_and(|(source, destination)| {
                source == element_id || destination == element_id
            })
        })
        .map(|element| element.element_id().clone())
        .collect()
}
