// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ids::ElementId;

/// The kind of component placed on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentKind {
    Processor,
    Funnel,
    RemoteProcessGroup,
    Connection,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 4] = [
        ComponentKind::Processor,
        ComponentKind::Funnel,
        ComponentKind::RemoteProcessGroup,
        ComponentKind::Connection,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Processor => "processor",
            Self::Funnel => "funnel",
            Self::RemoteProcessGroup => "remote-process-group",
            Self::Connection => "connection",
        }
    }

    /// Edges are drawn between two components rather than dropped at a position.
    pub fn is_edge(self) -> bool {
        matches!(self, Self::Connection)
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseComponentKindError {
    value: String,
}

impl fmt::Display for ParseComponentKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown component kind '{}'", self.value)
    }
}

impl std::error::Error for ParseComponentKindError {}

impl FromStr for ComponentKind {
    type Err = ParseComponentKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ParseComponentKindError { value: s.to_owned() })
    }
}

/// Canvas coordinates, in canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Kind-specific details carried by an element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ElementDetails {
    #[default]
    None,
    Processor {
        component_type: Option<String>,
    },
    RemoteProcessGroup {
        target_uri: String,
    },
    Connection {
        source: ElementId,
        destination: ElementId,
    },
}

/// A node or edge placed on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramElement {
    element_id: ElementId,
    kind: ComponentKind,
    position: Position,
    details: ElementDetails,
    selected: bool,
    draggable: bool,
    connectable: bool,
}

impl DiagramElement {
    pub fn new(element_id: ElementId, kind: ComponentKind, position: Position) -> Self {
        Self {
            element_id,
            kind,
            position,
            details: ElementDetails::None,
            selected: false,
            draggable: false,
            connectable: false,
        }
    }

    pub fn with_details(mut self, details: ElementDetails) -> Self {
        self.details = details;
        self
    }

    pub fn element_id(&self) -> &ElementId {
        &self.element_id
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub fn details(&self) -> &ElementDetails {
        &self.details
    }

    /// Source and destination ids when this element is a connection.
    pub fn endpoints(&self) -> Option<(&ElementId, &ElementId)> {
        match &self.details {
            ElementDetails::Connection {
                source,
                destination,
            } => Some((source, destination)),
            _ => None,
        }
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub fn is_draggable(&self) -> bool {
        self.draggable
    }

    pub fn set_draggable(&mut self, draggable: bool) {
        self.draggable = draggable;
    }

    pub fn is_connectable(&self) -> bool {
        self.connectable
    }

    pub fn set_connectable(&mut self, connectable: bool) {
        self.connectable = connectable;
    }
}
