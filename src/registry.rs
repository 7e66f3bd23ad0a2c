//! Check registry.
//!
//! The registry maps stable check names to checks. Registration order is the
//! canonical order used when the `all` wildcard is requested.
//!
//! # Example
//!
//! ```
//! use formcheck::registry::CheckRegistry;
//!
//! let registry = CheckRegistry::with_defaults();
//! let resolution = registry.resolve(&["missing_pages", "bogus"]);
//! assert_eq!(resolution.checks.len(), 1);
//! assert_eq!(resolution.unknown, vec!["bogus".to_string()]);
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use crate::checks::{builtin_checks, names, DocumentCheck};

/// Checks selected for a request.
#[derive(Clone, Default)]
pub struct Resolution {
    /// Checks to run, in resolved order
    pub checks: Vec<Arc<dyn DocumentCheck>>,
    /// Requested names with no registered check, in request order
    pub unknown: Vec<String>,
}

impl Resolution {
    /// Names of the resolved checks.
    pub fn names(&self) -> Vec<&str> {
        self.checks.iter().map(|c| c.name()).collect()
    }
}

impl std::fmt::Debug for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolution")
            .field("checks", &self.names())
            .field("unknown", &self.unknown)
            .finish()
    }
}

/// Registry of document checks.
#[derive(Clone, Default)]
pub struct CheckRegistry {
    checks: Vec<Arc<dyn DocumentCheck>>,
    by_name: HashMap<String, usize>,
}

impl CheckRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in checks in canonical order.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for check in builtin_checks() {
            registry.register(Arc::new(check));
        }
        registry
    }

    /// Register a check.
    ///
    /// Registering a name twice replaces the earlier check but keeps its
    /// position in the canonical order.
    pub fn register(&mut self, check: Arc<dyn DocumentCheck>) {
        let name = check.name().to_string();
        match self.by_name.get(&name) {
            Some(&slot) => {
                log::debug!("Replacing check '{}'", name);
                self.checks[slot] = check;
            }
            None => {
                self.by_name.insert(name, self.checks.len());
                self.checks.push(check);
            }
        }
    }

    /// Get a check by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn DocumentCheck>> {
        self.by_name.get(name).map(|&slot| self.checks[slot].clone())
    }

    /// Whether a check is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Registered names in canonical order.
    pub fn names(&self) -> Vec<&str> {
        self.checks.iter().map(|c| c.name()).collect()
    }

    /// `(name, description)` pairs in canonical order.
    pub fn descriptions(&self) -> Vec<(&str, &str)> {
        self.checks
            .iter()
            .map(|c| (c.name(), c.description()))
            .collect()
    }

    /// Number of registered checks.
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Resolve requested names to checks.
    ///
    /// If any entry is exactly `all`, every registered check is selected in
    /// canonical order and the other entries are ignored. Otherwise names
    /// resolve one by one in request order; unknown names are collected.
    pub fn resolve<S: AsRef<str>>(&self, requested: &[S]) -> Resolution {
        if requested.iter().any(|name| name.as_ref() == names::ALL) {
            return Resolution {
                checks: self.checks.clone(),
                unknown: Vec::new(),
            };
        }

        let mut resolution = Resolution::default();
        for name in requested {
            let name = name.as_ref();
            match self.get(name) {
                Some(check) => resolution.checks.push(check),
                None => resolution.unknown.push(name.to_string()),
            }
        }
        resolution
    }
}

impl std::fmt::Debug for CheckRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckRegistry")
            .field("checks", &self.names())
            .finish()
    }
}
