//! The root document element that carries the rendered theme attribute.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// Attribute access on the root element of whatever is being styled.
pub trait DocumentRoot {
    fn set_attribute(&self, name: &str, value: &str);
    fn attribute(&self, name: &str) -> Option<String>;
}

/// A document that only exists in memory.
///
/// Used headless, in tests, and by hosts that read the attribute back
/// to drive their own styling.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    attributes: RefCell<HashMap<String, String>>,
    writes: Cell<usize>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `set_attribute` calls seen so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl DocumentRoot for MemoryDocument {
    fn set_attribute(&self, name: &str, value: &str) {
        self.writes.set(self.writes.get() + 1);
        self.attributes
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.borrow().get(name).cloned()
    }
}
