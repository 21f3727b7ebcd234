// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeSet;

use tracing::debug;

use super::input::PointerDown;
use crate::model::{Diagram, ElementId};

/// What a pointer-down did to the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The target has no pointer-down listener; the event was left to propagate.
    NotListening,
    AlreadySelected,
    /// Shift-click is reserved for additive selection, which is not implemented.
    ShiftHeld,
    Selected,
}

impl SelectOutcome {
    pub fn changed(self) -> bool {
        matches!(self, Self::Selected)
    }
}

/// Owns the selection set and the set of elements listening for pointer-down.
///
/// The manager is the only writer of the selection and of the `selected` flag on elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionManager {
    selected: BTreeSet<ElementId>,
    active: BTreeSet<ElementId>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &BTreeSet<ElementId> {
        &self.selected
    }

    pub fn is_selected(&self, element_id: &ElementId) -> bool {
        self.selected.contains(element_id)
    }

    pub fn is_active(&self, element_id: &ElementId) -> bool {
        self.active.contains(element_id)
    }

    /// Registers the pointer-down listener on `element_ids`. Returns how many were newly activated.
    pub fn activate<I>(&mut self, element_ids: I) -> usize
    where
        I: IntoIterator<Item = ElementId>,
    {
        element_ids.into_iter().filter(|id| self.active.insert(id.clone())).count()
    }

    /// Removes the pointer-down listener from `element_ids`. Returns how many were removed.
    pub fn deactivate<'a, I>(&mut self, element_ids: I) -> usize
    where
        I: IntoIterator<Item = &'a ElementId>,
    {
        element_ids.into_iter().filter(|id| self.active.remove(*id)).count()
    }

    /// Dispatches a pointer-down to the listener on its target, if there is one.
    pub fn pointer_down(
        &mut self,
        diagram: &mut Diagram,
        event: &mut PointerDown,
    ) -> SelectOutcome {
        if !self.active.contains(event.target()) || !diagram.contains(event.target()) {
            return SelectOutcome::NotListening;
        }
        self.select(diagram, event)
    }

    /// Single-selects the event target unless it is already selected or shift is held.
    ///
    /// The event is consumed in every case.
    pub fn select(&mut self, diagram: &mut Diagram, event: &mut PointerDown) -> SelectOutcome {
        event.stop_propagation();

        let target = event.target();
        if self.selected.contains(target) {
            return SelectOutcome::AlreadySelected;
        }
        if event.shift_held() {
            debug!(element_id = %target, "shift pointer-down left selection unchanged");
            return SelectOutcome::ShiftHeld;
        }

        for previous in std::mem::take(&mut self.selected) {
            if let Some(element) = diagram.element_mut(&previous) {
                element.set_selected(false);
            }
        }
        if let Some(element) = diagram.element_mut(target) {
            element.set_selected(true);
        }
        self.selected.insert(target.clone());

        debug!(element_id = %target, "selection replaced");
        SelectOutcome::Selected
    }

    /// Deselects everything, returning the ids that were selected.
    pub fn clear(&mut self, diagram: &mut Diagram) -> Vec<ElementId> {
        let previous = std::mem::take(&mut self.selected);
        for element_id in &previous {
            if let Some(element) = diagram.element_mut(element_id) {
                element.set_selected(false);
            }
        }
        previous.into_iter().collect()
    }

    /// Drops deleted elements from both the selection and the listener set.
    ///
    /// Returns the removed ids that were selected.
    pub fn forget<'a, I>(&mut self, element_ids: I) -> Vec<ElementId>
    where
        I: IntoIterator<Item = &'a ElementId>,
    {
        let mut deselected = Vec::new();
        for element_id in element_ids {
            self.active.remove(element_id);
            if self.selected.remove(element_id) {
                deselected.push(element_id.clone());
            }
        }
        deselected
    }
}
