//! Retained view handles
//!
//! A [`View`] is the chrome's handle onto a node owned by the rendering
//! layer. Its visual properties live in a `watch` channel so layout
//! bindings can follow changes, and attachment is confirmed through the
//! same channel instead of polling.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

use crate::animation::PropertySet;

static NEXT_VIEW_ID: AtomicU64 = AtomicU64::new(1);

/// Unique view identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewId(u64);

/// Observable visual properties
#[derive(Debug, Clone, PartialEq)]
pub struct ViewProps {
    /// Horizontal position
    pub x: f32,
    /// Vertical position
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
    /// Opacity (0.0 - 1.0)
    pub opacity: f32,
    /// Visibility
    pub visible: bool,
    /// Stacking order
    pub z_index: i32,
    /// Top padding
    pub padding_top: f32,
    /// Left padding
    pub padding_left: f32,
    /// Right padding
    pub padding_right: f32,
    /// Bottom padding
    pub padding_bottom: f32,
    /// Whether the rendering layer has attached the view
    pub attached: bool,
    /// "active" pseudo state
    pub active: bool,
}

impl Default for ViewProps {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            opacity: 1.0,
            visible: true,
            z_index: 0,
            padding_top: 0.0,
            padding_left: 0.0,
            padding_right: 0.0,
            padding_bottom: 0.0,
            attached: false,
            active: false,
        }
    }
}

/// Retained view handle
#[derive(Debug)]
pub struct View {
    id: ViewId,
    name: String,
    props: watch::Sender<ViewProps>,
    generation: AtomicU64,
}

impl View {
    /// Create a detached view
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        let (props, _) = watch::channel(ViewProps::default());
        Arc::new(Self {
            id: ViewId(NEXT_VIEW_ID.fetch_add(1, Ordering::Relaxed)),
            name: name.into(),
            props,
            generation: AtomicU64::new(0),
        })
    }

    /// View identifier
    pub fn id(&self) -> ViewId {
        self.id
    }

    /// Debug name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Snapshot of all properties
    pub fn props(&self) -> ViewProps {
        self.props.borrow().clone()
    }

    /// Follow property changes
    pub fn subscribe(&self) -> watch::Receiver<ViewProps> {
        self.props.subscribe()
    }

    /// Current opacity
    pub fn opacity(&self) -> f32 {
        self.props.borrow().opacity
    }

    /// Current visibility
    pub fn is_visible(&self) -> bool {
        self.props.borrow().visible
    }

    /// Current x
    pub fn x(&self) -> f32 {
        self.props.borrow().x
    }

    /// Current y
    pub fn y(&self) -> f32 {
        self.props.borrow().y
    }

    /// Current width
    pub fn width(&self) -> f32 {
        self.props.borrow().width
    }

    /// Current height
    pub fn height(&self) -> f32 {
        self.props.borrow().height
    }

    /// Bottom edge (`y + height`)
    pub fn bottom(&self) -> f32 {
        let props = self.props.borrow();
        props.y + props.height
    }

    /// Whether the view carries the "active" pseudo state
    pub fn is_active(&self) -> bool {
        self.props.borrow().active
    }

    /// Whether the rendering layer has attached the view
    pub fn is_attached(&self) -> bool {
        self.props.borrow().attached
    }

    /// Mutate properties in place, notifying observers
    pub fn update(&self, f: impl FnOnce(&mut ViewProps)) {
        self.props.send_modify(f);
    }

    /// Apply a property set without touching running animations
    pub fn apply(&self, set: &PropertySet) {
        self.props.send_modify(|props| set.apply_to(props));
    }

    /// Apply a property set immediately, superseding running animations
    pub fn snap(&self, set: &PropertySet) {
        self.bump_generation();
        self.apply(set);
    }

    /// Set opacity
    pub fn set_opacity(&self, opacity: f32) {
        self.props.send_modify(|p| p.opacity = opacity);
    }

    /// Set visibility
    pub fn set_visible(&self, visible: bool) {
        self.props.send_modify(|p| p.visible = visible);
    }

    /// Set x
    pub fn set_x(&self, x: f32) {
        self.props.send_modify(|p| p.x = x);
    }

    /// Set y
    pub fn set_y(&self, y: f32) {
        self.props.send_modify(|p| p.y = y);
    }

    /// Set size
    pub fn set_size(&self, width: f32, height: f32) {
        self.props.send_modify(|p| {
            p.width = width;
            p.height = height;
        });
    }

    /// Set height
    pub fn set_height(&self, height: f32) {
        self.props.send_modify(|p| p.height = height);
    }

    /// Set top padding
    pub fn set_padding_top(&self, padding: f32) {
        self.props.send_modify(|p| p.padding_top = padding);
    }

    /// Set stacking order
    pub fn set_z_index(&self, z_index: i32) {
        self.props.send_modify(|p| p.z_index = z_index);
    }

    /// Set or clear the "active" pseudo state
    pub fn set_active(&self, active: bool) {
        self.props.send_modify(|p| p.active = active);
    }

    /// Called by the rendering layer once the view is on screen
    pub fn mark_attached(&self) {
        self.props.send_if_modified(|p| !std::mem::replace(&mut p.attached, true));
    }

    /// Called by the rendering layer once the view is removed
    pub fn mark_detached(&self) {
        self.props.send_if_modified(|p| std::mem::replace(&mut p.attached, false));
    }

    /// Wait until the rendering layer confirms attachment
    pub async fn attached(&self) {
        let mut rx = self.props.subscribe();
        // The sender lives as long as `self`, so this cannot fail.
        let _ = rx.wait_for(|p| p.attached).await;
    }

    /// Start a new animation generation, superseding older ones
    pub fn bump_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Current animation generation
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}
