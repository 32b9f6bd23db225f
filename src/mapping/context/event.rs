// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Registration notifications.

use std::sync::{Arc, mpsc::Sender};

use super::MappingContext;
use crate::{mapping::PersistentEntity, typeinfo::TypeInformation};

/// Error a listener may report; logged by the context, never propagated.
pub type ListenerError = Box<dyn std::error::Error + Send + Sync>;

/// Emitted once per newly registered entity.
#[derive(Debug, Clone)]
pub struct MappingContextEvent {
    source: u64,
    entity: Arc<PersistentEntity>
}

impl MappingContextEvent {
    pub(crate) const fn new(source: u64, entity: Arc<PersistentEntity>) -> Self {
        Self { source, entity }
    }

    /// Registered entity.
    #[must_use]
    pub const fn entity(&self) -> &Arc<PersistentEntity> {
        &self.entity
    }

    /// Type of the registered entity.
    #[must_use]
    pub fn type_information(&self) -> &TypeInformation {
        self.entity.type_information()
    }

    /// Whether `context` emitted this event.
    #[must_use]
    pub fn was_emitted_by<F>(&self, context: &MappingContext<F>) -> bool {
        self.source == context.id()
    }
}

/// Receives [`MappingContextEvent`]s after registrations complete.
///
/// Listeners run synchronously on the registering thread, after the
/// registration lock is released.
pub trait MappingListener: Send + Sync {
    /// Handle one event.
    ///
    /// # Errors
    ///
    /// Any failure; the registration stays in place.
    fn on_entity_registered(&self, event: &MappingContextEvent) -> Result<(), ListenerError>;
}

impl MappingListener for Sender<MappingContextEvent> {
    fn on_entity_registered(&self, event: &MappingContextEvent) -> Result<(), ListenerError> {
        self.send(event.clone())?;
        Ok(())
    }
}
