// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Pointer input to selection and editability state.
//!
//! [`InteractionState`] is owned by a diagram session and passed to input handlers by
//! reference. It wires the selection manager, the editable gate and the notifier together:
//! every selection change re-evaluates affordances, and every change is published.

pub mod editable;
pub mod events;
pub mod input;
pub mod selection;

use std::collections::BTreeSet;

use tracing::debug;

pub use editable::{
    AffordanceReport, AllowAll, DenyAll, EditableGate, PermissionCheck, Role, RolePermissions,
};
pub use events::{InteractionEvent, Notifier, SubscriptionId};
pub use input::PointerDown;
pub use selection::{SelectOutcome, SelectionManager};

use crate::create::{CreatedEntity, CreationFuture, CreationRegistry};
use crate::model::{ComponentKind, Diagram, ElementId, Position};
use crate::ops::{apply_ops, ApplyError, ApplyResult, Op};

pub struct InteractionState {
    diagram: Diagram,
    selection: SelectionManager,
    gate: EditableGate,
    permission: Box<dyn PermissionCheck>,
    notifier: Notifier<InteractionEvent>,
    creation: CreationRegistry,
}

impl std::fmt::Debug for InteractionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionState")
            .field("diagram", &self.diagram)
            .field("selection", &self.selection)
            .field("notifier", &self.notifier)
            .field("creation", &self.creation)
            .finish_non_exhaustive()
    }
}

impl InteractionState {
    /// Takes ownership of `diagram` and activates the pointer-down listener on every element.
    pub fn new(diagram: Diagram, permission: impl PermissionCheck + 'static) -> Self {
        let mut selection = SelectionManager::new();
        selection.activate(diagram.elements().keys().cloned());
        let mut state = Self {
            diagram,
            selection,
            gate: EditableGate::new(),
            permission: Box::new(permission),
            notifier: Notifier::new(),
            creation: CreationRegistry::new(),
        };
        state.refresh_affordances();
        state
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    pub fn selection(&self) -> &BTreeSet<ElementId> {
        self.selection.selection()
    }

    pub fn selection_manager(&self) -> &SelectionManager {
        &self.selection
    }

    pub fn subscribe(
        &mut self,
        subscriber: impl FnMut(&InteractionEvent) + 'static,
    ) -> SubscriptionId {
        self.notifier.subscribe(subscriber)
    }

    pub fn creation(&self) -> &CreationRegistry {
        &self.creation
    }

    pub fn creation_mut(&mut self) -> &mut CreationRegistry {
        &mut self.creation
    }

    pub fn activate<I>(&mut self, element_ids: I) -> usize
    where
        I: IntoIterator<Item = ElementId>,
    {
        self.selection.activate(element_ids)
    }

    pub fn deactivate<'a, I>(&mut self, element_ids: I) -> usize
    where
        I: IntoIterator<Item = &'a ElementId>,
    {
        self.selection.deactivate(element_ids)
    }

    /// Routes a pointer-down to the selection manager.
    ///
    /// A changed selection is published, then affordances are re-evaluated for it.
    pub fn pointer_down(&mut self, event: &mut PointerDown) -> SelectOutcome {
        let outcome = self.selection.pointer_down(&mut self.diagram, event);
        if outcome.changed() {
            self.notifier
                .emit(&InteractionEvent::SelectionChanged { element_id: event.target().clone() });
            self.refresh_affordances();
        }
        outcome
    }

    /// Convenience for hosts that do not track propagation themselves.
    pub fn select(&mut self, target: &ElementId, shift_held: bool) -> SelectOutcome {
        let mut event = PointerDown::new(target.clone()).with_shift(shift_held);
        self.pointer_down(&mut event)
    }

    pub fn clear_selection(&mut self) -> Vec<ElementId> {
        let previous = self.selection.clear(&mut self.diagram);
        if !previous.is_empty() {
            self.notifier.emit(&InteractionEvent::SelectionCleared { previous: previous.clone() });
            self.refresh_affordances();
        }
        previous
    }

    /// Swaps the permission context (e.g. after a role change) and re-evaluates affordances
    /// across the whole diagram.
    pub fn set_permission(
        &mut self,
        permission: impl PermissionCheck + 'static,
    ) -> AffordanceReport {
        self.permission = Box::new(permission);
        self.refresh_affordances()
    }

    pub fn refresh_affordances(&mut self) -> AffordanceReport {
        let report = self.gate.apply(
            &mut self.diagram,
            self.selection.selection(),
            self.permission.as_ref(),
        );
        if !report.is_empty() {
            self.notifier.emit(&InteractionEvent::AffordancesChanged(report.clone()));
        }
        report
    }

    /// Applies structural ops, then keeps listeners and selection consistent with the result.
    pub fn apply_ops(&mut self, base_rev: u64, ops: &[Op]) -> Result<ApplyResult, ApplyError> {
        let result = apply_ops(&mut self.diagram, base_rev, ops)?;

        self.selection.activate(result.delta.added.iter().cloned());
        let deselected = self.selection.forget(&result.delta.removed);
        if !deselected.is_empty() {
            debug!(count = deselected.len(), "removed elements dropped from selection");
            self.notifier.emit(&InteractionEvent::SelectionCleared { previous: deselected });
        }
        Ok(result)
    }

    /// Starts creating a component; ids already in the diagram are never proposed.
    pub fn create(&mut self, kind: ComponentKind, position: Position) -> CreationFuture {
        let diagram = &self.diagram;
        self.creation.create_avoiding(kind, position, |id| diagram.contains(id))
    }

    /// Places a created component at `position` on the current revision.
    pub fn place(
        &mut self,
        entity: &CreatedEntity,
        position: Position,
    ) -> Result<ApplyResult, ApplyError> {
        let op = Op::Place {
            element_id: entity.id.clone(),
            kind: entity.kind,
            position,
            details: entity.details.clone(),
        };
        let rev = self.diagram.rev();
        self.apply_ops(rev, &[op])
    }

    /// Ids of selected elements that currently carry both affordances.
    pub fn editable_selection(&self) -> Vec<ElementId> {
        self.selection
            .selection()
            .iter()
            .filter(|id| {
                self.diagram.element(id).is_some_and(|element| {
                    element.is_draggable()
                        && (element.is_connectable() || element.kind().is_edge())
                })
            })
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests;
