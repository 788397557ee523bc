//! Page identity
//!
//! Pages are opaque to the chrome: all it needs is the Rust type a page was
//! declared from, whether it is a popup, which chrome it carries, the
//! transition it declares, and a bag of string metadata set by the host.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Metadata attached to a page by the host
pub type PageData = HashMap<String, String>;

/// Shared page handle
pub type PageRef = Arc<PageIdentity>;

/// Well-known metadata keys
pub mod keys {
    /// Page wants a menu icon in its navigation bar
    pub const TOP_MENU: &str = "TopMenu";
    /// Label of the tab to highlight while this page is active
    pub const CURRENT_TAB: &str = "CurrentTab";
}

/// Type tag comparing by [`TypeId`] and keeping the type name for logs
#[derive(Clone, Copy)]
pub struct TypeTag {
    id: TypeId,
    name: &'static str,
}

impl TypeTag {
    /// Tag for type `T`
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Full type name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name without its module path
    pub fn short_name(&self) -> &'static str {
        self.name.rsplit("::").next().unwrap_or(self.name)
    }
}

impl PartialEq for TypeTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeTag {}

impl Hash for TypeTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Type of a navigable page
pub type PageType = TypeTag;

/// Type of a tab set shared by tab-bearing pages
pub type TabSetType = TypeTag;

/// Page kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageKind {
    /// Regular page taking part in chrome coordination
    #[default]
    Regular,
    /// Transient overlay page, ignored by chrome coordination
    Popup,
}

/// Transition a page declares for its arrival
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageTransition {
    /// Instant switch
    None,
    /// Cross fade
    Fade,
    /// Slide in from the trailing edge
    #[default]
    SlideForward,
    /// Slide in from the leading edge
    SlideBack,
    /// Slide up from the bottom
    SlideUp,
    /// Slide down from the top
    SlideDown,
}

/// Identity of one page instance
#[derive(Debug, Clone)]
pub struct PageIdentity {
    key: String,
    page_type: PageType,
    kind: PageKind,
    has_nav_bar: bool,
    tab_set: Option<TabSetType>,
    transition: PageTransition,
    data: PageData,
    has_text_input: bool,
}

impl PageIdentity {
    /// Regular page declared from type `P`
    pub fn new<P: 'static>() -> Self {
        Self {
            key: uuid::Uuid::new_v4().to_string(),
            page_type: PageType::of::<P>(),
            kind: PageKind::Regular,
            has_nav_bar: false,
            tab_set: None,
            transition: PageTransition::default(),
            data: PageData::new(),
            has_text_input: false,
        }
    }

    /// Popup page declared from type `P`
    pub fn popup<P: 'static>() -> Self {
        Self {
            kind: PageKind::Popup,
            ..Self::new::<P>()
        }
    }

    /// Page shows a navigation bar
    pub fn with_nav_bar(mut self) -> Self {
        self.has_nav_bar = true;
        self
    }

    /// Page shows the shared tab bar of tab set `T` (implies a nav bar)
    pub fn with_tabs<T: 'static>(mut self) -> Self {
        self.has_nav_bar = true;
        self.tab_set = Some(TabSetType::of::<T>());
        self
    }

    /// Declared arrival transition
    pub fn with_transition(mut self, transition: PageTransition) -> Self {
        self.transition = transition;
        self
    }

    /// Attach a metadata value
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Page contains a text input somewhere in its tree
    pub fn with_text_input(mut self) -> Self {
        self.has_text_input = true;
        self
    }

    /// Wrap into a shared handle
    pub fn shared(self) -> PageRef {
        Arc::new(self)
    }

    /// Unique instance key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Declaring type
    pub fn page_type(&self) -> PageType {
        self.page_type
    }

    /// Page kind
    pub fn kind(&self) -> PageKind {
        self.kind
    }

    /// Whether this is a popup
    pub fn is_popup(&self) -> bool {
        self.kind == PageKind::Popup
    }

    /// Whether this page displays a navigation bar
    pub fn is_chrome_bearing(&self) -> bool {
        self.has_nav_bar
    }

    /// Tab set displayed by this page
    pub fn tab_set(&self) -> Option<TabSetType> {
        self.tab_set
    }

    /// Whether this page displays the tab bar of `tab_set`
    pub fn is_tab_bearing_for(&self, tab_set: TabSetType) -> bool {
        self.tab_set == Some(tab_set)
    }

    /// Declared transition
    pub fn transition(&self) -> PageTransition {
        self.transition
    }

    /// Look up a metadata value
    pub fn data(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    /// Whether the page asks for a menu icon
    pub fn has_top_menu(&self) -> bool {
        self.data.contains_key(keys::TOP_MENU)
    }

    /// Explicit tab override, ignoring empty values
    pub fn current_tab(&self) -> Option<&str> {
        self.data(keys::CURRENT_TAB).filter(|label| !label.is_empty())
    }

    /// Whether the page contains a text input
    pub fn has_text_input(&self) -> bool {
        self.has_text_input
    }

    /// Same page instance
    pub fn same_instance(&self, other: &PageIdentity) -> bool {
        self.key == other.key
    }
}

/// A page type that knows how to build fresh instances of itself
pub trait PageTemplate: 'static {
    /// Build a new page instance
    fn build() -> PageIdentity;
}
