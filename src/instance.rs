// src/instance.rs

use once_cell::sync::OnceCell;

/// Holds at most one value for the life of the cell.
///
/// The first successful `get_or_try_init` stores its value; every later call
/// returns that same value without running its factory. Concurrent first
/// calls block until one factory finishes. A factory error leaves the cell
/// empty so the next caller runs its own factory.
#[derive(Debug)]
pub struct InstanceCell<T> {
    slot: OnceCell<T>,
}

impl<T> InstanceCell<T> {
    pub const fn new() -> Self {
        Self {
            slot: OnceCell::new(),
        }
    }

    pub fn get_or_try_init<E, F>(&self, factory: F) -> Result<&T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        self.slot.get_or_try_init(factory)
    }

    /// The stored value, if initialisation has completed.
    pub fn get(&self) -> Option<&T> {
        self.slot.get()
    }

    pub fn is_initialized(&self) -> bool {
        self.slot.get().is_some()
    }
}

impl<T> Default for InstanceCell<T> {
    fn default() -> Self {
        Self::new()
    }
}
