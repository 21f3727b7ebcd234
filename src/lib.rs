// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Flowcanvas: the interaction core of a flow-design canvas.
//!
//! Pointer input becomes selection state, modify permission becomes drag/connect affordances,
//! and new components are created through per-kind asynchronous providers.

pub mod create;
pub mod interaction;
pub mod model;
pub mod ops;
pub mod replay;
