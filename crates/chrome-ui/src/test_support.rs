//! Fixtures shared by the chrome-ui unit tests

use mockall::mock;
use std::sync::Arc;

use chrome_core::test_utils::pages::{HomePage, MainTabs, SearchPage, SettingsTabs};
use chrome_core::test_utils::RecordingRenderer;
use chrome_core::{Animation, AnimationHandle, ChromeConfig, RenderLayer, View};
use chrome_platform::DevicePlatform;
use chrome_state::{NavigationBus, Navigator};

use crate::menu_launcher::MenuContent;
use crate::session::ChromeSession;
use crate::tab_bar::{TabSet, TabSpec};

impl TabSet for MainTabs {
    fn tabs(&self) -> Vec<TabSpec> {
        vec![
            TabSpec::to::<HomePage>("Home").with_icon("home"),
            TabSpec::to::<SearchPage>("Search").with_icon("search"),
            TabSpec::new("Inbox"),
        ]
    }
}

impl TabSet for SettingsTabs {
    fn tabs(&self) -> Vec<TabSpec> {
        vec![TabSpec::new("General"), TabSpec::new("Privacy")]
    }
}

/// Menu content fixture
#[derive(Debug, Default)]
pub struct SideMenu;

impl MenuContent for SideMenu {}

/// Second menu content fixture
#[derive(Debug, Default)]
pub struct OtherMenu;

impl MenuContent for OtherMenu {}

mock! {
    pub Renderer {}

    impl RenderLayer for Renderer {
        fn animate(&self, view: &Arc<View>, animation: Animation) -> AnimationHandle;
        fn attach(&self, view: &Arc<View>);
        fn detach(&self, view: &Arc<View>);
        fn bring_to_front(&self, view: &Arc<View>);
    }
}

/// Session on an iOS-sized root with tabs at the bottom
pub fn session_with(
    renderer: Arc<RecordingRenderer>,
    config: ChromeConfig,
) -> Arc<ChromeSession> {
    let navigator = Navigator::new(NavigationBus::new());
    ChromeSession::builder(renderer, navigator)
        .config(config)
        .platform(DevicePlatform::Ios)
        .root_size(400.0, 800.0)
        .build()
}

/// Let spawned continuations run
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}
