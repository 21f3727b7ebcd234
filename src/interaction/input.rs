// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::ElementId;

/// A pointer-down on a canvas element, as delivered by the host.
///
/// Handlers that act on the event call [`PointerDown::stop_propagation`]; the host must not
/// forward a stopped event to the containing canvas handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerDown {
    target: ElementId,
    shift: bool,
    propagation_stopped: bool,
}

impl PointerDown {
    pub fn new(target: ElementId) -> Self {
        Self { target, shift: false, propagation_stopped: false }
    }

    pub fn with_shift(mut self, shift: bool) -> Self {
        self.shift = shift;
        self
    }

    pub fn target(&self) -> &ElementId {
        &self.target
    }

    pub fn shift_held(&self) -> bool {
        self.shift
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}
