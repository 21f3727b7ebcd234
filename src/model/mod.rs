// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A diagram holds processors, funnels, remote process groups and the connections between them.

pub mod diagram;
pub mod element;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod ids;

pub use diagram::Diagram;
pub use element::{
    ComponentKind, DiagramElement, ElementDetails, ParseComponentKindError, Position,
};
pub use ids::{DiagramId, ElementId, Id, IdError, IdSource};
