// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Keeps drag and connect affordances in step with modify permission.
//!
//! Denied permission is not an error: affordances simply stay (or become) disabled.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{Diagram, ElementId};

/// Answers whether the current actor may modify a set of elements.
pub trait PermissionCheck {
    fn can_modify(&self, diagram: &Diagram, selection: &BTreeSet<ElementId>) -> bool;
}

impl<F> PermissionCheck for F
where
    F: Fn(&Diagram, &BTreeSet<ElementId>) -> bool,
{
    fn can_modify(&self, diagram: &Diagram, selection: &BTreeSet<ElementId>) -> bool {
        self(diagram, selection)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl PermissionCheck for AllowAll {
    fn can_modify(&self, _diagram: &Diagram, _selection: &BTreeSet<ElementId>) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DenyAll;

impl PermissionCheck for DenyAll {
    fn can_modify(&self, _diagram: &Diagram, _selection: &BTreeSet<ElementId>) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Viewer,
    Editor,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Viewer => f.write_str("viewer"),
            Self::Editor => f.write_str("editor"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "viewer" => Ok(Self::Viewer),
            "editor" => Ok(Self::Editor),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

/// Editors may modify anything except locked elements; viewers may modify nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RolePermissions {
    role: Role,
    locked: BTreeSet<ElementId>,
}

impl RolePermissions {
    pub fn new(role: Role) -> Self {
        Self { role, locked: BTreeSet::new() }
    }

    pub fn with_locked(mut self, locked: impl IntoIterator<Item = ElementId>) -> Self {
        self.locked.extend(locked);
        self
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

impl PermissionCheck for RolePermissions {
    fn can_modify(&self, _diagram: &Diagram, selection: &BTreeSet<ElementId>) -> bool {
        self.role == Role::Editor && self.locked.is_disjoint(selection)
    }
}

/// Elements whose affordance flags flipped during one gate evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AffordanceReport {
    pub granted: bool,
    pub connect_enabled: Vec<ElementId>,
    pub connect_disabled: Vec<ElementId>,
    pub drag_enabled: Vec<ElementId>,
    pub drag_disabled: Vec<ElementId>,
}

impl AffordanceReport {
    pub fn is_empty(&self) -> bool {
        self.connect_enabled.is_empty()
            && self.connect_disabled.is_empty()
            && self.drag_enabled.is_empty()
            && self.drag_disabled.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EditableGate;

impl EditableGate {
    pub fn new() -> Self {
        Self
    }

    /// Enables or disables drag/connect on `selection` according to `permission`.
    ///
    /// Elements outside `selection` always end up with both affordances off, so a role change
    /// or a selection switch never leaves stale rights behind. Flags already in the target state
    /// are left untouched, so repeating a call with the same permission result reports no
    /// changes. Connections never become connectable.
    pub fn apply(
        &self,
        diagram: &mut Diagram,
        selection: &BTreeSet<ElementId>,
        permission: &dyn PermissionCheck,
    ) -> AffordanceReport {
        let granted = permission.can_modify(diagram, selection);
        let mut report = AffordanceReport { granted, ..AffordanceReport::default() };

        for (element_id, element) in diagram.elements_mut().iter_mut() {
            if granted && selection.contains(element_id) {
                if !element.is_connectable() && !element.kind().is_edge() {
                    element.set_connectable(true);
                    report.connect_enabled.push(element_id.clone());
                }
                if !element.is_draggable() {
                    element.set_draggable(true);
                    report.drag_enabled.push(element_id.clone());
                }
            } else {
                if element.is_connectable() {
                    element.set_connectable(false);
                    report.connect_disabled.push(element_id.clone());
                }
                if element.is_draggable() {
                    element.set_draggable(false);
                    report.drag_disabled.push(element_id.clone());
                }
            }
        }

        if !report.is_empty() {
            debug!(
                granted,
                connect_enabled = report.connect_enabled.len(),
                connect_disabled = report.connect_disabled.len(),
                drag_enabled = report.drag_enabled.len(),
                drag_disabled = report.drag_disabled.len(),
                "affordances updated"
            );
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rstest::{fixture, rstest};

    use super::{AllowAll, DenyAll, EditableGate, PermissionCheck, Role, RolePermissions};
    use crate::model::fixtures::{eid, small_flow};
    use crate::model::{Diagram, ElementId};

    #[fixture]
    fn diagram() -> Diagram {
        small_flow()
    }

    fn only(id: &str) -> BTreeSet<ElementId> {
        BTreeSet::from([eid(id)])
    }

    #[rstest]
    fn granted_permission_enables_both_affordances(mut diagram: Diagram) {
        let report = EditableGate::new().apply(&mut diagram, &only("proc-a"), &AllowAll);

        assert!(report.granted);
        assert_eq!(report.connect_enabled, vec![eid("proc-a")]);
        assert_eq!(report.drag_enabled, vec![eid("proc-a")]);
        let element = diagram.element(&eid("proc-a")).expect("element");
        assert!(element.is_connectable());
        assert!(element.is_draggable());
    }

    #[rstest]
    fn denied_permission_disables_both_affordances(mut diagram: Diagram) {
        let element = diagram.element_mut(&eid("proc-a")).expect("element");
        element.set_connectable(true);
        element.set_draggable(true);

        let report = EditableGate::new().apply(&mut diagram, &only("proc-a"), &DenyAll);

        assert!(!report.granted);
        assert_eq!(report.connect_disabled, vec![eid("proc-a")]);
        assert_eq!(report.drag_disabled, vec![eid("proc-a")]);
        let element = diagram.element(&eid("proc-a")).expect("element");
        assert!(!element.is_connectable());
        assert!(!element.is_draggable());
    }

    #[rstest]
    #[case::granted(true)]
    #[case::denied(false)]
    fn repeated_apply_is_a_no_op(mut diagram: Diagram, #[case] granted: bool) {
        let check = move |_: &Diagram, _: &BTreeSet<ElementId>| granted;
        let gate = EditableGate::new();
        let selection = only("funnel-b");

        gate.apply(&mut diagram, &selection, &check);
        let snapshot = diagram.clone();
        let second = gate.apply(&mut diagram, &selection, &check);

        assert!(second.is_empty());
        assert_eq!(second.granted, granted);
        assert_eq!(diagram, snapshot);
    }

    #[rstest]
    fn elements_outside_selection_lose_affordances(mut diagram: Diagram) {
        let gate = EditableGate::new();
        gate.apply(&mut diagram, &only("proc-a"), &AllowAll);

        let report = gate.apply(&mut diagram, &only("funnel-b"), &AllowAll);

        assert_eq!(report.connect_disabled, vec![eid("proc-a")]);
        assert_eq!(report.drag_disabled, vec![eid("proc-a")]);
        assert_eq!(report.drag_enabled, vec![eid("funnel-b")]);
        let element = diagram.element(&eid("proc-a")).expect("element");
        assert!(!element.is_connectable());
        assert!(!element.is_draggable());
    }

    #[rstest]
    fn connections_get_drag_but_never_connect(mut diagram: Diagram) {
        let report = EditableGate::new().apply(&mut diagram, &only("conn-ab"), &AllowAll);

        assert!(report.connect_enabled.is_empty());
        assert_eq!(report.drag_enabled, vec![eid("conn-ab")]);
    }

    #[rstest]
    fn role_permissions_respect_role_and_locks(diagram: Diagram) {
        let editor = RolePermissions::new(Role::Editor).with_locked([eid("rpg-c")]);
        assert!(editor.can_modify(&diagram, &only("proc-a")));
        assert!(!editor.can_modify(&diagram, &only("rpg-c")));

        let viewer = RolePermissions::new(Role::Viewer);
        assert!(!viewer.can_modify(&diagram, &only("proc-a")));
    }

    #[test]
    fn role_parses_from_lowercase_names() {
        assert_eq!("editor".parse::<Role>(), Ok(Role::Editor));
        assert_eq!("viewer".parse::<Role>(), Ok(Role::Viewer));
        assert!("admin".parse::<Role>().is_err());
    }
}
