//! Route declarations and lookup.
//!
//! # Design Decisions
//! - Compiled once, immutable afterwards (shareable without locks)
//! - Exact path equality, no wildcards or parameters
//! - First match in declaration order wins
//! - Explicit `None` for unmatched paths; the not-found view is the caller's concern

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use locus_core::error::LocusError;
use locus_core::utils::{join_route_path, normalize_route_path};
use crate::RouterResult;

/// View mounted for a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Component {
    /// Shared shell around every page
    Layout,
    Dashboard,
    Locations,
    Compare,
    Login,
}

impl Component {
    pub fn name(&self) -> &'static str {
        match self {
            Component::Layout => "Layout",
            Component::Dashboard => "Dashboard",
            Component::Locations => "Locations",
            Component::Compare => "Compare",
            Component::Login => "Login",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One declared route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    /// Absolute path, or path relative to the parent for children
    pub path: String,
    /// View for this entry
    pub component: Component,
    /// Nested pages rendered inside this entry's component
    pub children: Vec<RouteEntry>,
}

impl RouteEntry {
    pub fn new(path: impl Into<String>, component: Component) -> Self {
        Self {
            path: path.into(),
            component,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<RouteEntry>) -> Self {
        self.children = children;
        self
    }
}

/// Result of resolving a location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    /// Location as requested, query and fragment included
    pub location: String,
    /// Declared full path that matched
    pub path: String,
    /// Enclosing layout, if the page is nested
    pub layout: Option<Component>,
    /// Page component
    pub page: Component,
}

/// Flattened route ready for lookup
#[derive(Debug, Clone, PartialEq, Eq)]
struct CompiledRoute {
    full_path: String,
    layout: Option<Component>,
    page: Component,
}

/// Immutable route table
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<CompiledRoute>,
}

/// Routes of the dashboard application, all nested under the shared layout
pub fn app_route_entries() -> Vec<RouteEntry> {
    vec![RouteEntry::new("/", Component::Layout).with_children(vec![
        RouteEntry::new("", Component::Dashboard),
        RouteEntry::new("/locations", Component::Locations),
        RouteEntry::new("/compare", Component::Compare),
        RouteEntry::new("/login", Component::Login),
    ])]
}

impl RouteTable {
    /// Validate and compile route declarations.
    ///
    /// Children may not declare children of their own, and no two routes may
    /// resolve to the same full path.
    pub fn new(entries: Vec<RouteEntry>) -> RouterResult<Self> {
        for entry in &entries {
            for child in &entry.children {
                if !child.children.is_empty() {
                    return Err(LocusError::RouteTable {
                        reason: format!(
                            "route '{}' under '{}' declares children; nesting is limited to one level",
                            child.path, entry.path
                        ),
                    });
                }
            }
        }

        let table = Self::compile(&entries);

        let mut seen = HashSet::new();
        for route in &table.routes {
            if !seen.insert(route.full_path.as_str()) {
                return Err(LocusError::RouteTable {
                    reason: format!("path '{}' is declared more than once", route.full_path),
                });
            }
        }

        Ok(table)
    }

    /// The dashboard's route table
    pub fn app_routes() -> Self {
        Self::compile(&app_route_entries())
    }

    fn compile(entries: &[RouteEntry]) -> Self {
        let mut routes = Vec::new();

        for entry in entries {
            if entry.children.is_empty() {
                routes.push(CompiledRoute {
                    full_path: normalize_route_path(&entry.path),
                    layout: None,
                    page: entry.component,
                });
                continue;
            }

            for child in &entry.children {
                routes.push(CompiledRoute {
                    full_path: join_route_path(&entry.path, &child.path),
                    layout: Some(entry.component),
                    page: child.component,
                });
            }
        }

        Self { routes }
    }

    /// Resolve a location to its page, or `None` when nothing matches
    pub fn resolve(&self, location: &str) -> Option<RouteMatch> {
        let path = normalize_route_path(location);

        let found = self
            .routes
            .iter()
            .find(|route| route.full_path == path)
            .map(|route| RouteMatch {
                location: location.to_string(),
                path: route.full_path.clone(),
                layout: route.layout,
                page: route.page,
            });

        if found.is_none() {
            debug!("No route for '{}'", location);
        }

        found
    }

    /// Resolve or fail with `RouteNotFound`
    pub fn require(&self, location: &str) -> RouterResult<RouteMatch> {
        self.resolve(location).ok_or_else(|| LocusError::RouteNotFound {
            path: location.to_string(),
        })
    }

    /// All routes as `(full_path, layout, page)` in declaration order
    pub fn entries(&self) -> impl Iterator<Item = (&str, Option<Component>, Component)> + '_ {
        self.routes
            .iter()
            .map(|route| (route.full_path.as_str(), route.layout, route.page))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::app_routes()
    }
}
