// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Structural mutations for diagrams.
//!
//! Operations are applied with optimistic concurrency (revision checks) and produce a minimal
//! delta that the interaction layer uses to prune selection and listener state.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::model::diagram::connections_touching;
use crate::model::{ComponentKind, Diagram, DiagramElement, ElementDetails, ElementId, Position};

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Place {
        element_id: ElementId,
        kind: ComponentKind,
        position: Position,
        details: ElementDetails,
    },
    Move {
        element_id: ElementId,
        position: Position,
    },
    Connect {
        connection_id: ElementId,
        source: ElementId,
        destination: ElementId,
    },
    Remove {
        element_id: ElementId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyResult {
    pub new_rev: u64,
    pub applied: usize,
    pub delta: Delta,
}

/// Minimal delta describing which elements changed as the result of applying ops.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Delta {
    pub added: Vec<ElementId>,
    pub removed: Vec<ElementId>,
    pub updated: Vec<ElementId>,
}

#[derive(Debug, Default)]
struct DeltaBuilder {
    added: HashSet<ElementId>,
    removed: HashSet<ElementId>,
    updated: HashSet<ElementId>,
}

impl DeltaBuilder {
    fn record_added(&mut self, element_id: ElementId) {
        self.removed.remove(&element_id);
        self.updated.remove(&element_id);
        self.added.insert(element_id);
    }

    fn record_removed(&mut self, element_id: ElementId) {
        // Placed and removed within one batch: the caller never saw it.
        if self.added.remove(&element_id) {
            self.updated.remove(&element_id);
            return;
        }
        self.updated.remove(&element_id);
        self.removed.insert(element_id);
    }

    fn record_updated(&mut self, element_id: ElementId) {
        if self.added.contains(&element_id) || self.removed.contains(&element_id) {
            return;
        }
        self.updated.insert(element_id);
    }

    fn finish(self) -> Delta {
        let mut added = self.added.into_iter().collect::<Vec<_>>();
        let mut removed = self.removed.into_iter().collect::<Vec<_>>();
        let mut updated = self.updated.into_iter().collect::<Vec<_>>();

        added.sort();
        removed.sort();
        updated.sort();

        Delta { added, removed, updated }
    }
}

pub fn apply_ops(
    diagram: &mut Diagram,
    base_rev: u64,
    ops: &[Op],
) -> Result<ApplyResult, ApplyError> {
    let current_rev = diagram.rev();
    if base_rev != current_rev {
        return Err(ApplyError::Conflict { base_rev, current_rev });
    }

    if ops.is_empty() {
        return Ok(ApplyResult { new_rev: current_rev, applied: 0, delta: Delta::default() });
    }

    let mut elements = diagram.elements().clone();
    let mut delta = DeltaBuilder::default();

    for op in ops {
        apply_op(&mut elements, op, &mut delta)?;
    }

    *diagram.elements_mut() = elements;
    diagram.bump_rev();
    let new_rev = diagram.rev();

    Ok(ApplyResult { new_rev, applied: ops.len(), delta: delta.finish() })
}

fn apply_op(
    elements: &mut BTreeMap<ElementId, DiagramElement>,
    op: &Op,
    delta: &mut DeltaBuilder,
) -> Result<(), ApplyError> {
    match op {
        Op::Place { element_id, kind, position, details } => {
            if elements.contains_key(element_id) {
                return Err(ApplyError::AlreadyExists { element_id: element_id.clone() });
            }
            if kind.is_edge() {
                return Err(ApplyError::EdgeRequiresEndpoints { element_id: element_id.clone() });
            }
            if !details_match_kind(*kind, details) {
                return Err(ApplyError::DetailsMismatch {
                    element_id: element_id.clone(),
                    kind: *kind,
                });
            }
            let element = DiagramElement::new(element_id.clone(), *kind, *position)
                .with_details(details.clone());
            elements.insert(element_id.clone(), element);
            delta.record_added(element_id.clone());
            Ok(())
        }
        Op::Move { element_id, position } => {
            let Some(existing) = elements.get_mut(element_id) else {
                return Err(ApplyError::NotFound { element_id: element_id.clone() });
            };
            existing.set_position(*position);
            delta.record_updated(element_id.clone());
            Ok(())
        }
        Op::Connect { connection_id, source, destination } => {
            if elements.contains_key(connection_id) {
                return Err(ApplyError::AlreadyExists { element_id: connection_id.clone() });
            }
            let source_position = endpoint_position(elements, source)?;
            let destination_position = endpoint_position(elements, destination)?;
            let midpoint = Position::new(
                (source_position.x + destination_position.x) / 2.0,
                (source_position.y + destination_position.y) / 2.0,
            );
            let connection =
                DiagramElement::new(connection_id.clone(), ComponentKind::Connection, midpoint)
                    .with_details(ElementDetails::Connection {
                        source: source.clone(),
                        destination: destination.clone(),
                    });
            elements.insert(connection_id.clone(), connection);
            delta.record_added(connection_id.clone());
            Ok(())
        }
        Op::Remove { element_id } => {
            if elements.remove(element_id).is_none() {
                return Err(ApplyError::NotFound { element_id: element_id.clone() });
            }
            for connection_id in connections_touching(elements, element_id) {
                elements.remove(&connection_id);
                delta.record_removed(connection_id);
            }
            delta.record_removed(element_id.clone());
            Ok(())
        }
    }
}

fn endpoint_position(
    elements: &BTreeMap<ElementId, DiagramElement>,
    element_id: &ElementId,
) -> Result<Position, ApplyError> {
    let Some(endpoint) = elements.get(element_id) else {
        return Err(ApplyError::MissingEndpoint { element_id: element_id.clone() });
    };
    if endpoint.kind().is_edge() {
        return Err(ApplyError::EndpointIsConnection { element_id: element_id.clone() });
    }
    Ok(endpoint.position())
}

fn details_match_kind(kind: ComponentKind, details: &ElementDetails) -> bool {
    matches!(
        (kind, details),
        (_, ElementDetails::None)
            | (ComponentKind::Processor, ElementDetails::Processor { .. })
            | (ComponentKind::RemoteProcessGroup, ElementDetails::RemoteProcessGroup { .. })
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyError {
    Conflict { base_rev: u64, current_rev: u64 },
    AlreadyExists { element_id: ElementId },
    NotFound { element_id: ElementId },
    EdgeRequiresEndpoints { element_id: ElementId },
    DetailsMismatch { element_id: ElementId, kind: ComponentKind },
    MissingEndpoint { element_id: ElementId },
    EndpointIsConnection { element_id: ElementId },
}

impl fmt::Display for ApplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conflict { base_rev, current_rev } => {
                write!(f, "stale base_rev (base_rev={base_rev}, current_rev={current_rev})")
            }
            Self::AlreadyExists { element_id } => {
                write!(f, "element already exists (id={element_id})")
            }
            Self::NotFound { element_id } => write!(f, "element not found (id={element_id})"),
            Self::EdgeRequiresEndpoints { element_id } => {
                write!(f, "connections are created with Connect, not Place (id={element_id})")
            }
            Self::DetailsMismatch { element_id, kind } => {
                write!(f, "details do not match kind {kind} (id={element_id})")
            }
            Self::MissingEndpoint { element_id } => {
                write!(f, "connection endpoint not found (id={element_id})")
            }
            Self::EndpointIsConnection { element_id } => {
                write!(f, "connection endpoint is itself a connection (id={element_id})")
            }
        }
    }
}

impl std::error::Error for ApplyError {}
