// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use rstest::{fixture, rstest};

use crate::create::{ChannelProvider, ProviderPayload};
use crate::model::fixtures::{eid, small_flow};
use crate::model::{ComponentKind, DiagramElement, ElementDetails, ElementId, Position};
use crate::ops::Op;

use super::{
    AffordanceReport, AllowAll, DenyAll, InteractionEvent, InteractionState, PointerDown, Role,
    RolePermissions, SelectOutcome,
};

struct Recorded {
    state: InteractionState,
    events: Rc<RefCell<Vec<InteractionEvent>>>,
}

impl Recorded {
    fn new(state: InteractionState) -> Self {
        let mut state = state;
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        state.subscribe(move |event| sink.borrow_mut().push(event.clone()));
        Self { state, events }
    }
}

fn drain(events: &Rc<RefCell<Vec<InteractionEvent>>>) -> Vec<InteractionEvent> {
    std::mem::take(&mut *events.borrow_mut())
}

#[fixture]
fn editor() -> Recorded {
    Recorded::new(InteractionState::new(small_flow(), AllowAll))
}

fn selection_of(ids: &[&str]) -> BTreeSet<ElementId> {
    ids.iter().map(|id| eid(id)).collect()
}

fn flags(state: &InteractionState, id: &str) -> (bool, bool, bool) {
    let element = state.diagram().element(&eid(id)).expect("element");
    (element.is_selected(), element.is_draggable(), element.is_connectable())
}

#[rstest]
#[case::processor("proc-a")]
#[case::funnel("funnel-b")]
#[case::remote("rpg-c")]
#[case::connection("conn-ab")]
fn plain_pointer_down_selects_exactly_the_target(editor: Recorded, #[case] target: &str) {
    let Recorded { mut state, .. } = editor;
    state.select(&eid("funnel-d"), false);

    let mut event = PointerDown::new(eid(target));
    let outcome = state.pointer_down(&mut event);

    assert_eq!(outcome, SelectOutcome::Selected);
    assert!(event.is_propagation_stopped());
    assert_eq!(state.selection(), &selection_of(&[target]));
    assert!(!flags(&state, "funnel-d").0);
    let selected_flags = state
        .diagram()
        .elements()
        .values()
        .filter(|element| element.is_selected())
        .map(|element| element.element_id().clone())
        .collect::<BTreeSet<_>>();
    assert_eq!(selected_flags, selection_of(&[target]));
}

#[rstest]
fn selecting_selected_element_is_a_consumed_no_op(editor: Recorded) {
    let Recorded { mut state, events } = editor;
    state.select(&eid("proc-a"), false);
    drain(&events);

    let mut event = PointerDown::new(eid("proc-a"));
    let outcome = state.pointer_down(&mut event);

    assert_eq!(outcome, SelectOutcome::AlreadySelected);
    assert!(event.is_propagation_stopped());
    assert_eq!(state.selection(), &selection_of(&["proc-a"]));
    assert!(events.borrow().is_empty());
}

#[rstest]
#[case::from_empty(None)]
#[case::from_other(Some("funnel-b"))]
#[case::from_same(Some("proc-a"))]
fn shift_pointer_down_never_changes_selection(editor: Recorded, #[case] prior: Option<&str>) {
    let Recorded { mut state, .. } = editor;
    if let Some(prior) = prior {
        state.select(&eid(prior), false);
    }
    let before = state.selection().clone();

    let mut event = PointerDown::new(eid("proc-a")).with_shift(true);
    let outcome = state.pointer_down(&mut event);

    assert_ne!(outcome, SelectOutcome::Selected);
    assert!(event.is_propagation_stopped());
    assert_eq!(state.selection(), &before);
}

#[rstest]
fn switching_selection_emits_change_and_moves_flags(editor: Recorded) {
    let Recorded { mut state, events } = editor;
    state.select(&eid("proc-a"), false);
    assert_eq!(flags(&state, "proc-a"), (true, true, true));
    drain(&events);

    state.select(&eid("funnel-b"), false);

    assert_eq!(flags(&state, "proc-a"), (false, false, false));
    assert!(flags(&state, "funnel-b").0);
    let events = drain(&events);
    assert_eq!(
        events.first(),
        Some(&InteractionEvent::SelectionChanged { element_id: eid("funnel-b") })
    );
    assert!(matches!(events.get(1), Some(InteractionEvent::AffordancesChanged(_))));
}

#[rstest]
fn inactive_element_lets_event_propagate(editor: Recorded) {
    let Recorded { mut state, .. } = editor;
    assert_eq!(state.deactivate([&eid("proc-a")]), 1);
    assert_eq!(state.deactivate([&eid("proc-a")]), 0);

    let mut event = PointerDown::new(eid("proc-a"));
    let outcome = state.pointer_down(&mut event);

    assert_eq!(outcome, SelectOutcome::NotListening);
    assert!(!event.is_propagation_stopped());
    assert!(state.selection().is_empty());

    assert_eq!(state.activate([eid("proc-a")]), 1);
    assert_eq!(state.activate([eid("proc-a")]), 0);
    assert_eq!(state.select(&eid("proc-a"), false), SelectOutcome::Selected);
}

#[rstest]
fn unknown_target_is_not_listening(editor: Recorded) {
    let Recorded { mut state, .. } = editor;
    assert_eq!(state.select(&eid("ghost"), false), SelectOutcome::NotListening);
}

#[test]
fn denied_selection_drops_existing_affordances() {
    let mut diagram = small_flow();
    let element = diagram.element_mut(&eid("proc-a")).expect("element");
    element.set_connectable(true);
    element.set_draggable(true);
    let mut state = InteractionState::new(diagram, DenyAll);

    state.select(&eid("proc-a"), false);

    assert_eq!(flags(&state, "proc-a"), (true, false, false));
    assert!(state.editable_selection().is_empty());
}

#[rstest]
fn refresh_with_unchanged_permission_is_silent(editor: Recorded) {
    let Recorded { mut state, events } = editor;
    state.select(&eid("proc-a"), false);
    drain(&events);

    let report = state.refresh_affordances();

    assert!(report.is_empty());
    assert!(report.granted);
    assert!(drain(&events).is_empty());
}

#[test]
fn role_change_reevaluates_affordances() {
    let mut state = InteractionState::new(small_flow(), RolePermissions::new(Role::Editor));
    state.select(&eid("funnel-b"), false);
    assert_eq!(state.editable_selection(), vec![eid("funnel-b")]);

    let report = state.set_permission(RolePermissions::new(Role::Viewer));

    assert_eq!(
        report,
        AffordanceReport {
            granted: false,
            connect_enabled: Vec::new(),
            connect_disabled: vec![eid("funnel-b")],
            drag_enabled: Vec::new(),
            drag_disabled: vec![eid("funnel-b")],
        }
    );
    assert_eq!(flags(&state, "funnel-b"), (true, false, false));
}

#[test]
fn role_downgrade_leaves_previously_selected_elements_locked() {
    let mut state = InteractionState::new(small_flow(), RolePermissions::new(Role::Editor));
    state.select(&eid("proc-a"), false);
    state.select(&eid("funnel-b"), false);

    state.set_permission(RolePermissions::new(Role::Viewer));

    assert_eq!(flags(&state, "proc-a"), (false, false, false));
    assert_eq!(flags(&state, "funnel-b"), (true, false, false));
    let still_editable = state
        .diagram()
        .elements()
        .values()
        .filter(|element| element.is_draggable() || element.is_connectable())
        .count();
    assert_eq!(still_editable, 0);
}

#[test]
fn preloaded_affordances_are_normalized_on_construction() {
    let mut diagram = small_flow();
    let element = diagram.element_mut(&eid("rpg-c")).expect("element");
    element.set_draggable(true);
    element.set_connectable(true);

    let state = InteractionState::new(diagram, AllowAll);

    assert_eq!(flags(&state, "rpg-c"), (false, false, false));
}

#[rstest]
fn clear_selection_reports_previous_once(editor: Recorded) {
    let Recorded { mut state, events } = editor;
    state.select(&eid("rpg-c"), false);
    drain(&events);

    assert_eq!(state.clear_selection(), vec![eid("rpg-c")]);
    assert!(state.clear_selection().is_empty());

    assert_eq!(flags(&state, "rpg-c"), (false, false, false));
    let events = drain(&events);
    assert_eq!(events.len(), 2);
    assert_eq!(events[0], InteractionEvent::SelectionCleared { previous: vec![eid("rpg-c")] });
    assert!(matches!(
        &events[1],
        InteractionEvent::AffordancesChanged(report) if report.drag_disabled == vec![eid("rpg-c")]
    ));
}

#[rstest]
fn removing_selected_element_prunes_selection_and_listener(editor: Recorded) {
    let Recorded { mut state, events } = editor;
    state.select(&eid("conn-ab"), false);
    drain(&events);

    state.apply_ops(0, &[Op::Remove { element_id: eid("proc-a") }]).expect("apply");

    assert!(state.selection().is_empty());
    assert!(!state.selection_manager().is_active(&eid("conn-ab")));
    assert!(!state.selection_manager().is_active(&eid("proc-a")));
    assert_eq!(
        drain(&events),
        vec![InteractionEvent::SelectionCleared { previous: vec![eid("conn-ab")] }]
    );
}

#[tokio::test]
async fn created_funnel_is_placed_and_selectable() {
    let mut state = InteractionState::new(small_flow(), AllowAll);

    let entity =
        state.create(ComponentKind::Funnel, Position::new(1.0, 1.0)).await.expect("funnel");
    let result = state.place(&entity, Position::new(1.0, 1.0)).expect("place");

    assert_eq!(result.delta.added, vec![entity.id.clone()]);
    assert!(state.selection_manager().is_active(&entity.id));
    assert_eq!(state.select(&entity.id, false), SelectOutcome::Selected);
}

#[tokio::test]
async fn pending_creation_resolves_against_later_state() {
    let mut state = InteractionState::new(small_flow(), AllowAll);
    let (provider, mut pending) = ChannelProvider::new();
    state.creation_mut().register(ComponentKind::Processor, provider);

    let creation = state.create(ComponentKind::Processor, Position::new(5.0, 5.0));
    state.select(&eid("funnel-d"), false);
    pending
        .try_next()
        .expect("pending")
        .resolve(ProviderPayload::Identified {
            id: "1111".to_owned(),
            component_type: Some("LogAttribute".to_owned()),
        });

    let entity = creation.await.expect("processor");
    state.place(&entity, Position::new(5.0, 5.0)).expect("place");

    assert_eq!(state.selection(), &selection_of(&["funnel-d"]));
    assert_eq!(
        state.diagram().element(&eid("1111")).map(|element| element.details().clone()),
        Some(ElementDetails::Processor { component_type: Some("LogAttribute".to_owned()) })
    );
}

#[tokio::test]
async fn created_ids_avoid_existing_elements() {
    let mut diagram = small_flow();
    let funnel = DiagramElement::new(eid("funnel-1"), ComponentKind::Funnel, Position::default());
    diagram.elements_mut().insert(eid("funnel-1"), funnel);
    let mut state = InteractionState::new(diagram, AllowAll);

    let entity = state.create(ComponentKind::Funnel, Position::default()).await.expect("funnel");

    assert_eq!(entity.id.as_str(), "funnel-2");
}
