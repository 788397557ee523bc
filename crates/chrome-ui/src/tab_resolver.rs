//! Tab selection resolver
//!
//! Decides which tab should look selected for the active page:
//! 1. An explicit `CurrentTab` override on the active page, matched by label
//! 2. Otherwise the tab whose target page type appears closest to the top
//!    of the navigation path (stack oldest to newest, then the active page)
//!
//! `None` means the selection should be left as it is.

use chrome_core::{PageRef, PageType};

use crate::tab_bar::TabSpec;

/// Index of the tab to select, if any
pub fn resolve_selected_tab<'a, I>(tabs: I, stack: &[PageRef], active: Option<&PageRef>) -> Option<usize>
where
    I: IntoIterator<Item = &'a TabSpec>,
{
    if let Some(label) = active.and_then(|page| page.current_tab()) {
        let found = tabs.into_iter().position(|tab| tab.label() == label);
        if found.is_none() {
            tracing::debug!(label, "current tab override matches no tab");
        }
        return found;
    }

    let path: Vec<PageType> = stack
        .iter()
        .chain(active)
        .map(|page| page.page_type())
        .collect();

    tabs.into_iter()
        .enumerate()
        .filter_map(|(index, tab)| {
            let target = tab.target()?;
            let distance = path.iter().rev().position(|page_type| *page_type == target)?;
            Some((distance, index))
        })
        .min()
        .map(|(_, index)| index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrome_core::test_utils::pages::{self, DetailPage, HomePage, SearchPage};
    use chrome_core::{keys, PageIdentity};

    fn tabs() -> Vec<TabSpec> {
        vec![
            TabSpec::to::<HomePage>("Home"),
            TabSpec::to::<SearchPage>("Search"),
            TabSpec::new("Inbox"),
        ]
    }

    #[test]
    fn test_nearest_match_wins() {
        // Path [Home, Search, Detail] with tabs for Home and Detail
        let tabs = vec![TabSpec::to::<HomePage>("Home"), TabSpec::to::<DetailPage>("Detail")];
        let stack = vec![pages::home(), pages::search()];
        let active = pages::detail();

        assert_eq!(resolve_selected_tab(&tabs, &stack, Some(&active)), Some(1));
    }

    #[test]
    fn test_ancestor_match() {
        let stack = vec![pages::home(), pages::search()];
        let active = pages::detail();
        assert_eq!(resolve_selected_tab(&tabs(), &stack, Some(&active)), Some(1));

        let stack = vec![pages::search(), pages::home()];
        assert_eq!(resolve_selected_tab(&tabs(), &stack, Some(&active)), Some(0));
    }

    #[test]
    fn test_no_match_leaves_selection() {
        let active = pages::login();
        assert_eq!(resolve_selected_tab(&tabs(), &[], Some(&active)), None);
        assert_eq!(resolve_selected_tab(&tabs(), &[], None), None);
    }

    #[test]
    fn test_override_by_label() {
        let active = PageIdentity::new::<SearchPage>()
            .with_data(keys::CURRENT_TAB, "Inbox")
            .shared();
        assert_eq!(resolve_selected_tab(&tabs(), &[pages::home()], Some(&active)), Some(2));
    }

    #[test]
    fn test_unmatched_override_does_not_fall_back() {
        let active = PageIdentity::new::<SearchPage>()
            .with_data(keys::CURRENT_TAB, "Missing")
            .shared();
        assert_eq!(resolve_selected_tab(&tabs(), &[], Some(&active)), None);
    }

    #[test]
    fn test_empty_override_is_ignored() {
        let active = PageIdentity::new::<SearchPage>()
            .with_data(keys::CURRENT_TAB, "")
            .shared();
        assert_eq!(resolve_selected_tab(&tabs(), &[], Some(&active)), Some(1));
    }
}
