//! Session-scoped shared slot
//!
//! Holds one shared instance for the lifetime of an application session.
//! Releasing the slot bumps its generation, so holders of a stale instance
//! can tell they must look it up again.

use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug)]
struct SlotState<T: ?Sized> {
    value: Option<Arc<T>>,
    generation: u64,
}

/// Lazily filled, explicitly released shared instance
#[derive(Debug)]
pub struct SharedSlot<T: ?Sized> {
    state: Mutex<SlotState<T>>,
}

impl<T: ?Sized> SharedSlot<T> {
    /// Empty slot
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SlotState {
                value: None,
                generation: 0,
            }),
        }
    }

    /// Current instance, if any
    pub fn get(&self) -> Option<Arc<T>> {
        self.state.lock().value.clone()
    }

    /// Current instance, creating it first if the slot is empty
    ///
    /// The flag is `true` when `create` ran.
    pub fn get_or_create(&self, create: impl FnOnce() -> Arc<T>) -> (Arc<T>, bool) {
        let mut state = self.state.lock();
        if let Some(value) = &state.value {
            return (Arc::clone(value), false);
        }
        let value = create();
        state.value = Some(Arc::clone(&value));
        (value, true)
    }

    /// Take the instance out, starting a new generation
    pub fn release(&self) -> Option<Arc<T>> {
        let mut state = self.state.lock();
        state.generation += 1;
        state.value.take()
    }

    /// Number of releases so far
    pub fn generation(&self) -> u64 {
        self.state.lock().generation
    }
}

impl<T: ?Sized> Default for SharedSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_creation_wins() {
        let slot: SharedSlot<String> = SharedSlot::new();
        let (first, created) = slot.get_or_create(|| Arc::new("first".to_string()));
        assert!(created);

        let (second, created) = slot.get_or_create(|| Arc::new("second".to_string()));
        assert!(!created);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_release_starts_new_generation() {
        let slot: SharedSlot<String> = SharedSlot::new();
        let (old, _) = slot.get_or_create(|| Arc::new("old".to_string()));
        assert_eq!(slot.generation(), 0);

        let released = slot.release().unwrap();
        assert!(Arc::ptr_eq(&old, &released));
        assert_eq!(slot.generation(), 1);
        assert!(slot.get().is_none());

        let (fresh, created) = slot.get_or_create(|| Arc::new("fresh".to_string()));
        assert!(created);
        assert!(!Arc::ptr_eq(&old, &fresh));
    }

    #[test]
    fn test_release_empty_slot() {
        let slot: SharedSlot<String> = SharedSlot::new();
        assert!(slot.release().is_none());
        assert_eq!(slot.generation(), 1);
    }
}
