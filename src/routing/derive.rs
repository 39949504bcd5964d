//! Route derivation from the event registry.
//!
//! # Responsibilities
//! - Select descriptors carrying an action
//! - Compute the route path for each action
//! - Reject paths that would collide or change matching semantics

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::events::{ActionSpec, EventDescriptor, EventRegistry};
use crate::health::HEALTH_PATH;
use crate::routing::kebab_case;

/// Characters that would turn a literal path into a route pattern.
const PATTERN_CHARS: &[char] = &['{', '}', '*', ':', '?', '#'];

/// Errors detected while deriving routes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("events {first} and {second} both derive route POST {path}")]
    DuplicatePath {
        path: String,
        first: String,
        second: String,
    },

    #[error("event {event} derives reserved route {path}")]
    ReservedPath { path: String, event: String },

    #[error("event {event} derives invalid route {path:?}")]
    InvalidPath { path: String, event: String },
}

/// A POST route exposing one action-bearing event.
#[derive(Debug, Clone)]
pub struct ActionRoute {
    pub path: String,
    pub action_name: String,
    pub descriptor: Arc<EventDescriptor>,
}

impl ActionRoute {
    pub fn event_name(&self) -> &str {
        self.descriptor.name()
    }
}

/// Compute the route path for an action.
///
/// An explicit, non-empty `path` wins (one leading `/` tolerated); otherwise
/// the kebab-cased action name is used.
pub fn derive_path(action: &ActionSpec) -> String {
    match action.path.as_deref() {
        Some(path) if !path.is_empty() => {
            format!("/{}", path.strip_prefix('/').unwrap_or(path))
        }
        _ => format!("/{}", kebab_case(&action.name)),
    }
}

/// Build the route table, in registry order.
pub fn derive_routes(registry: &EventRegistry) -> Result<Vec<ActionRoute>, RouteError> {
    let mut routes = Vec::new();
    let mut seen: HashMap<String, String> = HashMap::new();

    for descriptor in registry.iter() {
        let Some(action) = descriptor.action() else {
            tracing::debug!(
                event = %descriptor.name(),
                "Event has no action defined, will not be exposed"
            );
            continue;
        };

        let path = derive_path(action);
        validate_path(&path, descriptor.name())?;

        if let Some(first) = seen.get(&path) {
            return Err(RouteError::DuplicatePath {
                path,
                first: first.clone(),
                second: descriptor.name().to_string(),
            });
        }
        seen.insert(path.clone(), descriptor.name().to_string());

        tracing::debug!(
            action = %action.name,
            event = %descriptor.name(),
            method = "POST",
            path = %path,
            "Exposing action"
        );

        routes.push(ActionRoute {
            path,
            action_name: action.name.clone(),
            descriptor: descriptor.clone(),
        });
    }

    Ok(routes)
}

fn validate_path(path: &str, event: &str) -> Result<(), RouteError> {
    let invalid = path.len() <= 1
        || path.contains("//")
        || path.chars().any(|c| c.is_whitespace() || PATTERN_CHARS.contains(&c));
    if invalid {
        return Err(RouteError::InvalidPath {
            path: path.to_string(),
            event: event.to_string(),
        });
    }
    if path == HEALTH_PATH {
        return Err(RouteError::ReservedPath {
            path: path.to_string(),
            event: event.to_string(),
        });
    }
    Ok(())
}
