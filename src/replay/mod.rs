// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Scripted canvas sessions.
//!
//! A replay script (JSON) describes a starting diagram, the editing role, canned answers for
//! the creation dialogs and a list of input steps. Running it drives an [`InteractionState`]
//! exactly as a host would and reports what happened.

mod script;

use std::fmt;
use std::future::ready;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

pub use script::{
    ElementState, ProviderAnswer, ReplayReport, ReplayScript, ScriptDiagram, ScriptElement, Step,
};

use crate::create::{
    CreationError, CreationFailure, CreationProvider, CreationRequest, ProviderFuture,
    ProviderPayload,
};
use crate::interaction::{
    AffordanceReport, InteractionState, PointerDown, Role, RolePermissions, SelectOutcome,
};
use crate::model::{Diagram, ElementDetails, ElementId, Position};
use crate::ops::{ApplyError, Op};

#[derive(Debug)]
pub enum ReplayError {
    Io { path: PathBuf, source: io::Error },
    Json { path: PathBuf, source: serde_json::Error },
    MissingEndpoints { element_id: ElementId },
    Setup { source: ApplyError },
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "failed to read {}: {source}", path.display()),
            Self::Json { path, source } => {
                write!(f, "invalid replay script {}: {source}", path.display())
            }
            Self::MissingEndpoints { element_id } => {
                write!(f, "connection {element_id} needs both source and destination")
            }
            Self::Setup { source } => write!(f, "failed to build starting diagram: {source}"),
        }
    }
}

impl std::error::Error for ReplayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::MissingEndpoints { .. } => None,
            Self::Setup { source } => Some(source),
        }
    }
}

pub fn load_script(path: impl AsRef<Path>) -> Result<ReplayScript, ReplayError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|source| ReplayError::Io { path: path.to_owned(), source })?;
    serde_json::from_str(&text)
        .map_err(|source| ReplayError::Json { path: path.to_owned(), source })
}

fn permissions_for(script: &ReplayScript, role: Role) -> RolePermissions {
    RolePermissions::new(role).with_locked(script.locked.iter().cloned())
}

fn canned_provider(answer: ProviderAnswer) -> impl CreationProvider {
    move |_request: CreationRequest| -> ProviderFuture {
        let result = match &answer {
            ProviderAnswer::Resolve { id, component_type } => Ok(ProviderPayload::Identified {
                id: id.clone(),
                component_type: component_type.clone(),
            }),
            ProviderAnswer::TargetUri { uri } => Ok(ProviderPayload::TargetUri(uri.clone())),
            ProviderAnswer::Fail { reason } => {
                Err(CreationError::Failed(CreationFailure::Provider { reason: reason.clone() }))
            }
            ProviderAnswer::Cancel => Err(CreationError::Cancelled),
        };
        Box::pin(ready(result))
    }
}

/// Builds the starting state: nodes first, then connections, then providers.
pub fn build_state(script: &ReplayScript) -> Result<InteractionState, ReplayError> {
    let diagram = Diagram::new(script.diagram.id.clone(), script.diagram.name.clone());
    let mut state = InteractionState::new(diagram, permissions_for(script, script.role));

    let mut ops = Vec::with_capacity(script.diagram.elements.len());
    for element in script.diagram.elements.iter().filter(|e| !e.kind.is_edge()) {
        let details = match (&element.component_type, &element.target_uri) {
            (_, Some(target_uri)) => {
                ElementDetails::RemoteProcessGroup { target_uri: target_uri.clone() }
            }
            (Some(component_type), None) => {
                ElementDetails::Processor { component_type: Some(component_type.clone()) }
            }
            (None, None) => ElementDetails::None,
        };
        ops.push(Op::Place {
            element_id: element.id.clone(),
            kind: element.kind,
            position: Position::new(element.x, element.y),
            details,
        });
    }
    for element in script.diagram.elements.iter().filter(|e| e.kind.is_edge()) {
        let (Some(source), Some(destination)) = (&element.source, &element.destination) else {
            return Err(ReplayError::MissingEndpoints { element_id: element.id.clone() });
        };
        ops.push(Op::Connect {
            connection_id: element.id.clone(),
            source: source.clone(),
            destination: destination.clone(),
        });
    }
    state.apply_ops(0, &ops).map_err(|source| ReplayError::Setup { source })?;

    for (kind, answer) in &script.providers {
        state.creation_mut().register(*kind, canned_provider(answer.clone()));
    }
    Ok(state)
}

/// Runs every step. Failed steps are logged in the report and do not stop the replay.
pub async fn run(script: &ReplayScript) -> Result<ReplayReport, ReplayError> {
    let mut state = build_state(script)?;
    let mut report = ReplayReport::default();

    for step in &script.steps {
        let line = run_step(&mut state, script, step).await;
        debug!("{line}");
        report.log.push(line);
    }

    report.selection = state.selection().iter().map(ToString::to_string).collect();
    report.elements = state
        .diagram()
        .elements()
        .values()
        .map(|element| ElementState {
            id: element.element_id().to_string(),
            kind: element.kind(),
            selected: element.is_selected(),
            draggable: element.is_draggable(),
            connectable: element.is_connectable(),
        })
        .collect();
    report.rev = state.diagram().rev();
    info!(steps = script.steps.len(), rev = report.rev, "replay finished");
    Ok(report)
}

async fn run_step(state: &mut InteractionState, script: &ReplayScript, step: &Step) -> String {
    match step {
        Step::PointerDown { target, shift } => {
            let mut event = PointerDown::new(target.clone()).with_shift(*shift);
            let outcome = state.pointer_down(&mut event);
            let what = match outcome {
                SelectOutcome::NotListening => "not listening, propagated",
                SelectOutcome::AlreadySelected => "already selected",
                SelectOutcome::ShiftHeld => "shift held, unchanged",
                SelectOutcome::Selected => "selected",
            };
            format!("pointer_down {target}: {what}")
        }
        Step::ClearSelection => {
            let previous = state.clear_selection();
            format!("clear_selection: {} deselected", previous.len())
        }
        Step::SetRole { role } => {
            let report = state.set_permission(permissions_for(script, *role));
            let verdict = if report.granted { "granted" } else { "denied" };
            format!("set_role {role}: {verdict}, {} flag(s) changed", flag_changes(&report))
        }
        Step::Create { kind, x, y } => {
            let position = Position::new(*x, *y);
            match state.create(*kind, position).await {
                Ok(entity) => match state.place(&entity, position) {
                    Ok(_) => format!("create {kind}: placed {}", entity.id),
                    Err(err) => format!("create {kind}: {err}"),
                },
                Err(err) => format!("create {kind}: {err}"),
            }
        }
        Step::Move { target, x, y } => {
            let op = Op::Move { element_id: target.clone(), position: Position::new(*x, *y) };
            apply_line(state, "move", target, op)
        }
        Step::Connect { id, source, destination } => {
            let op = Op::Connect {
                connection_id: id.clone(),
                source: source.clone(),
                destination: destination.clone(),
            };
            apply_line(state, "connect", id, op)
        }
        Step::Remove { target } => {
            let op = Op::Remove { element_id: target.clone() };
            apply_line(state, "remove", target, op)
        }
    }
}

fn apply_line(state: &mut InteractionState, verb: &str, target: &ElementId, op: Op) -> String {
    let rev = state.diagram().rev();
    match state.apply_ops(rev, &[op]) {
        Ok(result) => {
            let delta = &result.delta;
            format!(
                "{verb} {target}: rev {} (+{} -{} ~{})",
                result.new_rev,
                delta.added.len(),
                delta.removed.len(),
                delta.updated.len()
            )
        }
        Err(err) => format!("{verb} {target}: {err}"),
    }
}

fn flag_changes(report: &AffordanceReport) -> usize {
    report.connect_enabled.len()
        + report.connect_disabled.len()
        + report.drag_enabled.len()
        + report.drag_disabled.len()
}

/// Plain-text rendering used by the CLI.
pub fn format_report(report: &ReplayReport) -> String {
    let mut out = String::new();
    for line in &report.log {
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(&format!("rev: {}\n", report.rev));
    out.push_str(&format!("selection: [{}]\n", report.selection.join(", ")));
    for element in &report.elements {
        let mut flags = Vec::new();
        if element.selected {
            flags.push("selected");
        }
        if element.draggable {
            flags.push("draggable");
        }
        if element.connectable {
            flags.push("connectable");
        }
        let line = format!("  {} ({}) {}", element.id, element.kind, flags.join(" "));
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
