// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::interaction::Role;
use crate::model::{ComponentKind, DiagramId, ElementId};

/// A canned canvas session: the starting diagram, who is editing, how creation dialogs answer,
/// and the input to feed through.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReplayScript {
    pub diagram: ScriptDiagram,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub locked: Vec<ElementId>,
    #[serde(default)]
    pub providers: BTreeMap<ComponentKind, ProviderAnswer>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScriptDiagram {
    pub id: DiagramId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub elements: Vec<ScriptElement>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScriptElement {
    pub id: ElementId,
    pub kind: ComponentKind,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub component_type: Option<String>,
    #[serde(default)]
    pub target_uri: Option<String>,
    #[serde(default)]
    pub source: Option<ElementId>,
    #[serde(default)]
    pub destination: Option<ElementId>,
}

/// How the creation dialog for a kind answers every request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderAnswer {
    Resolve {
        id: String,
        #[serde(default)]
        component_type: Option<String>,
    },
    TargetUri {
        uri: String,
    },
    Fail {
        reason: String,
    },
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    PointerDown {
        target: ElementId,
        #[serde(default)]
        shift: bool,
    },
    ClearSelection,
    SetRole {
        role: Role,
    },
    Create {
        kind: ComponentKind,
        #[serde(default)]
        x: f64,
        #[serde(default)]
        y: f64,
    },
    Move {
        target: ElementId,
        x: f64,
        y: f64,
    },
    Connect {
        id: ElementId,
        source: ElementId,
        destination: ElementId,
    },
    Remove {
        target: ElementId,
    },
}

/// Outcome of a replay, one line per step plus the final canvas state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ReplayReport {
    pub log: Vec<String>,
    pub selection: Vec<String>,
    pub elements: Vec<ElementState>,
    pub rev: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementState {
    pub id: String,
    pub kind: ComponentKind,
    pub selected: bool,
    pub draggable: bool,
    pub connectable: bool,
}
