//! Hardware back handling
//!
//! The platform back button is a request that one handler may consume.
//! Handlers are asked from the highest priority down, in registration
//! order within a priority, until one of them answers `true`.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Reacts to the platform back signal
#[async_trait]
pub trait BackHandler: Send + Sync {
    /// Handle the signal, returning `true` to suppress default back navigation
    async fn on_hardware_back(&self) -> bool;
}

/// Handler priority (higher runs first)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BackPriority(pub i32);

impl BackPriority {
    /// Reserved for the menu launcher
    pub const HIGHEST: BackPriority = BackPriority(i32::MAX);
    /// Page-level handlers
    pub const PAGE: BackPriority = BackPriority(0);
    /// Last resort handlers
    pub const LOWEST: BackPriority = BackPriority(i32::MIN);
}

/// Registration receipt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BackHandlerId(u64);

struct Entry {
    id: BackHandlerId,
    priority: BackPriority,
    handler: Arc<dyn BackHandler>,
}

/// Prioritised back handler registry
#[derive(Default)]
pub struct BackHandlers {
    entries: Mutex<Vec<Entry>>,
    next_id: AtomicU64,
}

impl BackHandlers {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler
    pub fn register(&self, priority: BackPriority, handler: Arc<dyn BackHandler>) -> BackHandlerId {
        let id = BackHandlerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut entries = self.entries.lock();
        let index = entries
            .iter()
            .position(|e| e.priority < priority)
            .unwrap_or(entries.len());
        entries.insert(index, Entry { id, priority, handler });
        id
    }

    /// Remove a handler, returning whether it was registered
    pub fn unregister(&self, id: BackHandlerId) -> bool {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|e| e.id != id);
        entries.len() != before
    }

    /// Number of registered handlers
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether no handler is registered
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Offer the signal to handlers, returning whether one consumed it
    pub async fn dispatch(&self) -> bool {
        let handlers: Vec<Arc<dyn BackHandler>> = self
            .entries
            .lock()
            .iter()
            .map(|e| Arc::clone(&e.handler))
            .collect();

        for handler in handlers {
            if handler.on_hardware_back().await {
                return true;
            }
        }

        false
    }
}

impl std::fmt::Debug for BackHandlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackHandlers").field("len", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recorder {
        name: &'static str,
        consume: bool,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    #[async_trait]
    impl BackHandler for Recorder {
        async fn on_hardware_back(&self) -> bool {
            self.log.lock().push(self.name);
            self.consume
        }
    }

    fn recorder(
        name: &'static str,
        consume: bool,
        log: &Arc<Mutex<Vec<&'static str>>>,
    ) -> Arc<dyn BackHandler> {
        Arc::new(Recorder {
            name,
            consume,
            log: Arc::clone(log),
        })
    }

    #[tokio::test]
    async fn test_highest_priority_runs_first() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let handlers = BackHandlers::new();
        handlers.register(BackPriority::PAGE, recorder("page", false, &log));
        handlers.register(BackPriority::HIGHEST, recorder("menu", true, &log));

        assert!(handlers.dispatch().await);
        assert_eq!(*log.lock(), vec!["menu"]);
    }

    #[tokio::test]
    async fn test_falls_through_until_consumed() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let handlers = BackHandlers::new();
        handlers.register(BackPriority::PAGE, recorder("first", false, &log));
        handlers.register(BackPriority::PAGE, recorder("second", true, &log));
        handlers.register(BackPriority::LOWEST, recorder("last", true, &log));

        assert!(handlers.dispatch().await);
        assert_eq!(*log.lock(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_unregister() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let handlers = BackHandlers::new();
        let id = handlers.register(BackPriority::HIGHEST, recorder("menu", true, &log));

        assert!(handlers.unregister(id));
        assert!(!handlers.unregister(id));
        assert!(handlers.is_empty());
        assert!(!handlers.dispatch().await);
    }
}
