// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use super::PersistentProperty;

/// Link between an owning property and an optional back-reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Association {
    inverse: Arc<PersistentProperty>,
    obverse: Option<Arc<PersistentProperty>>
}

impl Association {
    /// Association owned by `inverse`, optionally mirrored by `obverse`.
    #[must_use]
    pub const fn new(
        inverse: Arc<PersistentProperty>,
        obverse: Option<Arc<PersistentProperty>>
    ) -> Self {
        Self { inverse, obverse }
    }

    /// Owning side.
    #[must_use]
    pub const fn inverse(&self) -> &Arc<PersistentProperty> {
        &self.inverse
    }

    /// Back-reference side, if any.
    #[must_use]
    pub const fn obverse(&self) -> Option<&Arc<PersistentProperty>> {
        self.obverse.as_ref()
    }
}
