//! Navigation history over a route table.
//!
//! Behaves like the browser history stack: `push` drops any forward entries,
//! `back`/`forward` move within the stack without resolving again.

use std::sync::Arc;

use tracing::debug;

use crate::table::{RouteMatch, RouteTable};
use crate::RouterResult;

/// History stack of resolved locations
#[derive(Debug, Clone)]
pub struct History {
    table: Arc<RouteTable>,
    entries: Vec<RouteMatch>,
    position: usize,
}

impl History {
    /// Start at `initial`, which must resolve
    pub fn new(table: Arc<RouteTable>, initial: &str) -> RouterResult<Self> {
        let first = table.require(initial)?;
        Ok(Self {
            table,
            entries: vec![first],
            position: 0,
        })
    }

    /// Current entry
    pub fn current(&self) -> &RouteMatch {
        &self.entries[self.position]
    }

    /// Navigate to a new location.
    ///
    /// An unmatched location is rejected and the history is left unchanged.
    pub fn push(&mut self, location: &str) -> RouterResult<&RouteMatch> {
        let matched = self.table.require(location)?;
        debug!("Navigating to {} ({})", matched.path, matched.page);

        self.entries.truncate(self.position + 1);
        self.entries.push(matched);
        self.position += 1;
        Ok(self.current())
    }

    /// Replace the current entry without growing the stack
    pub fn replace(&mut self, location: &str) -> RouterResult<&RouteMatch> {
        let matched = self.table.require(location)?;
        self.entries[self.position] = matched;
        Ok(self.current())
    }

    /// Step back, or `None` at the oldest entry
    pub fn back(&mut self) -> Option<&RouteMatch> {
        if self.position == 0 {
            return None;
        }
        self.position -= 1;
        Some(self.current())
    }

    /// Step forward, or `None` at the newest entry
    pub fn forward(&mut self) -> Option<&RouteMatch> {
        if self.position + 1 >= self.entries.len() {
            return None;
        }
        self.position += 1;
        Some(self.current())
    }

    pub fn can_go_back(&self) -> bool {
        self.position > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.position + 1 < self.entries.len()
    }

    /// Number of entries in the stack
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
