//! Ordered registry of event descriptors.
//!
//! # Design Decisions
//! - Registration order is preserved; route derivation iterates in that order
//! - Names are unique; a second registration under the same name is an error
//! - Frozen once handed to the server (shared via `Arc`, never mutated)

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::events::{EventDescriptor, EventType};

/// Errors raised while populating the registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("event {0} is already registered")]
    Duplicate(String),
}

/// Event name → descriptor mapping, in registration order.
#[derive(Debug, Clone, Default)]
pub struct EventRegistry {
    descriptors: Vec<Arc<EventDescriptor>>,
    index: HashMap<String, usize>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a statically typed event.
    pub fn register<E: EventType>(&mut self) -> Result<&mut Self, RegistryError> {
        self.insert(EventDescriptor::of::<E>())
    }

    /// Register a prebuilt descriptor.
    pub fn insert(&mut self, descriptor: EventDescriptor) -> Result<&mut Self, RegistryError> {
        if self.index.contains_key(descriptor.name()) {
            return Err(RegistryError::Duplicate(descriptor.name().to_string()));
        }
        self.index
            .insert(descriptor.name().to_string(), self.descriptors.len());
        self.descriptors.push(Arc::new(descriptor));
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<EventDescriptor>> {
        self.index.get(name).map(|&i| &self.descriptors[i])
    }

    /// Descriptors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<EventDescriptor>> {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
