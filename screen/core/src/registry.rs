//! Element Registry
//!
//! Owns the live set of element descriptors for one screen, in placement
//! order, together with the `last_line` cursor used for sequential text and
//! the handle counter. Elements are addressable two ways:
//!
//! - by remote id (`remove_by_id`), assigned by the sender
//! - by line row (`remove_by_line`), for line-addressable text only
//!
//! # Duplicate remote ids
//!
//! [`ElementRegistry::insert`] never replaces an element that carries the same
//! remote id. Both stay live until the sender removes them, and a later
//! `remove_by_id` removes all of them.
//!
//! The registry is single-owner: the interpreter holds it by value and all
//! mutation goes through `&mut self`.

use std::collections::HashSet;

use crate::element::{ElementDescriptor, ElementHandle};

/// Value of the line cursor before any text has been placed
pub const NO_LINE: i32 = -1;

/// Live element descriptors and the line cursor
#[derive(Debug)]
pub struct ElementRegistry {
    /// Live descriptors in placement order
    elements: Vec<ElementDescriptor>,
    /// Row of the most recently placed sequential text
    last_line: i32,
    /// Next handle value
    next_handle: u64,
}

impl Default for ElementRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            last_line: NO_LINE,
            next_handle: 1,
        }
    }

    /// Allocate a fresh element handle
    pub fn allocate_handle(&mut self) -> ElementHandle {
        let handle = ElementHandle::from_raw(self.next_handle);
        self.next_handle += 1;
        handle
    }

    /// Append a descriptor
    ///
    /// Remote id collisions are not resolved here (see module docs).
    pub fn insert(&mut self, descriptor: ElementDescriptor) {
        if let Some(id) = descriptor.remote_id {
            if self.elements.iter().any(|e| e.remote_id == Some(id)) {
                tracing::debug!(remote_id = id, "Duplicate remote id inserted");
            }
        }
        self.elements.push(descriptor);
    }

    /// Remove every line-addressable text element on row `line`
    ///
    /// Returns the removed descriptors in placement order.
    pub fn remove_by_line(&mut self, line: i32) -> Vec<ElementDescriptor> {
        self.remove_where(|e| e.is_line_text() && e.line == Some(line))
    }

    /// Remove every element whose remote id is `id`
    ///
    /// Returns the removed descriptors in placement order.
    pub fn remove_by_id(&mut self, id: i32) -> Vec<ElementDescriptor> {
        self.remove_where(|e| e.remote_id == Some(id))
    }

    /// Remove everything and reset the line cursor
    ///
    /// Returns the removed descriptors in placement order.
    pub fn clear(&mut self) -> Vec<ElementDescriptor> {
        self.last_line = NO_LINE;
        std::mem::take(&mut self.elements)
    }

    /// Row the next sequential text would land on
    ///
    /// Does not move the cursor.
    #[must_use]
    pub fn next_line(&self) -> i32 {
        self.last_line + 1
    }

    /// Row of the most recently placed sequential text (`-1` if none)
    #[must_use]
    pub fn last_line(&self) -> i32 {
        self.last_line
    }

    /// Move the cursor to a row that sequential text was just placed on
    ///
    /// The cursor never moves backwards; only [`clear`](Self::clear) resets it.
    pub fn advance_line(&mut self, line: i32) {
        if line > self.last_line {
            self.last_line = line;
        }
    }

    /// Look up a live element by handle
    #[must_use]
    pub fn get(&self, handle: ElementHandle) -> Option<&ElementDescriptor> {
        self.elements.iter().find(|e| e.handle == handle)
    }

    /// Live elements carrying a remote id
    pub fn by_id(&self, id: i32) -> impl Iterator<Item = &ElementDescriptor> {
        self.elements.iter().filter(move |e| e.remote_id == Some(id))
    }

    /// Live line-addressable text on a row
    pub fn on_line(&self, line: i32) -> impl Iterator<Item = &ElementDescriptor> {
        self.elements
            .iter()
            .filter(move |e| e.is_line_text() && e.line == Some(line))
    }

    /// All live elements in placement order
    #[must_use]
    pub fn elements(&self) -> &[ElementDescriptor] {
        &self.elements
    }

    /// Number of live elements
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether no element is live
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn remove_where<F>(&mut self, predicate: F) -> Vec<ElementDescriptor>
    where
        F: Fn(&ElementDescriptor) -> bool,
    {
        let (removed, kept): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.elements).into_iter().partition(predicate);
        self.elements = kept;
        removed
    }
}

/// Enabled sensor keys (`"<Service>:<Message>"`)
///
/// Sensors are tracked but not otherwise consumed by the screen core. A full
/// screen clear leaves them untouched.
#[derive(Debug, Default, Clone)]
pub struct SensorSet {
    active: HashSet<String>,
}

impl SensorSet {
    /// Create an empty sensor set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a sensor active
    ///
    /// Returns `true` if it was not active before.
    pub fn enable(&mut self, key: impl Into<String>) -> bool {
        self.active.insert(key.into())
    }

    /// Mark a sensor inactive
    ///
    /// Returns `true` if it was active. Disabling an unknown key is a no-op.
    pub fn disable(&mut self, key: &str) -> bool {
        self.active.remove(key)
    }

    /// Whether a sensor is active
    #[must_use]
    pub fn is_enabled(&self, key: &str) -> bool {
        self.active.contains(key)
    }

    /// Number of active sensors
    #[must_use]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Whether no sensor is active
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}
