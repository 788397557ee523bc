//! Property bindings between views
//!
//! A binding evaluates once immediately and then again every time the
//! source view's properties change, until the callback reports that its
//! target is gone or the source view is dropped.

use chrome_core::{View, ViewProps};
use std::sync::Arc;

/// Follow `source`, calling `apply` with its properties
///
/// `apply` returns `false` to end the binding.
pub fn bind<F>(source: &Arc<View>, apply: F)
where
    F: Fn(&ViewProps) -> bool + Send + 'static,
{
    let mut rx = source.subscribe();
    let initial = rx.borrow_and_update().clone();
    if !apply(&initial) {
        return;
    }

    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let props = rx.borrow_and_update().clone();
            if !apply(&props) {
                break;
            }
        }
    });
}
