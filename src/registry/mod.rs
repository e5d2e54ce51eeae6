// Package registry provides the static catalog of launchable services.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{info, warn};


/// A single launchable service: a unique name, a shell command line and
/// optional environment overrides. Loaded once at startup, never mutated.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceDefinition {
    pub name: String,
    pub command: String,
    #[serde(default)]
    pub env: HashMap<String, String>,
}

/// Catalog of service definitions keyed by name.
pub struct ServiceRegistry {
    services: HashMap<String, ServiceDefinition>,
}

impl ServiceRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            services: HashMap::new(),
        }
    }

    /// Loads service definitions from a JSON array of
    /// `{name, command, env?}` objects at `path`.
    ///
    /// A duplicate name silently overwrites the earlier definition (last one
    /// wins). An unreadable or malformed file leaves the registry untouched;
    /// the condition is logged, never raised, so the supervisor can still
    /// serve with zero services.
    pub fn load(&mut self, path: &Path) {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(
                    component = "registry",
                    event = "load_skipped",
                    path = %path.display(),
                    error = %e,
                    "services file not readable, registry left unchanged"
                );
                return;
            }
        };

        let defs: Vec<ServiceDefinition> = match serde_json::from_str(&raw) {
            Ok(defs) => defs,
            Err(e) => {
                warn!(
                    component = "registry",
                    event = "load_skipped",
                    path = %path.display(),
                    error = %e,
                    "services file malformed, registry left unchanged"
                );
                return;
            }
        };

        let loaded = defs.len();
        for def in defs {
            self.insert(def);
        }

        info!(
            component = "registry",
            event = "load_success",
            path = %path.display(),
            entries = loaded,
            services = self.services.len(),
            "service definitions loaded"
        );
    }

    /// Inserts a definition, overwriting any prior one with the same name.
    pub fn insert(&mut self, def: ServiceDefinition) {
        self.services.insert(def.name.clone(), def);
    }

    /// Looks up a definition by name.
    pub fn get(&self, name: &str) -> Option<&ServiceDefinition> {
        self.services.get(name)
    }

    /// Returns all definitions, ordered by name so the catalog iterates
    /// the same way for the lifetime of the process.
    pub fn list(&self) -> Vec<&ServiceDefinition> {
        let mut defs: Vec<&ServiceDefinition> = self.services.values().collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    /// Number of known services.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// True when no services are known.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
