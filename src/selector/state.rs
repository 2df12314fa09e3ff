//! Selector state and the external inputs it is derived from.

use serde::{Deserialize, Serialize};

use super::range::FIRST_PAGE;

/// Values owned by whoever embeds the selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageProps {
    pub selected_page: i64,
    pub total_pages: i64,
}

impl PageProps {
    pub fn new(selected_page: i64, total_pages: i64) -> Self {
        Self {
            selected_page,
            total_pages,
        }
    }
}

impl Default for PageProps {
    fn default() -> Self {
        Self::new(FIRST_PAGE, FIRST_PAGE)
    }
}

/// Locally held selector state.
///
/// `selected_page` may be transiently out of range while the user is typing;
/// `draft` then carries the raw text of the field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorState {
    pub selected_page: i64,
    pub can_go_up: bool,
    pub can_go_down: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft: Option<String>,
}

impl SelectorState {
    /// Derive the arrow flags from a page and the page count
    pub fn derive(selected_page: i64, total_pages: i64) -> Self {
        Self {
            selected_page,
            can_go_up: selected_page != FIRST_PAGE,
            can_go_down: selected_page != total_pages,
            draft: None,
        }
    }

    pub fn from_props(props: PageProps) -> Self {
        Self::derive(props.selected_page, props.total_pages)
    }

    /// Text shown in the page field
    pub fn display_value(&self) -> String {
        match &self.draft {
            Some(text) => text.clone(),
            None => self.selected_page.to_string(),
        }
    }
}

/// Arrow direction. Up moves towards the first page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn delta(self) -> i64 {
        match self {
            Direction::Up => -1,
            Direction::Down => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page_disables_up() {
        let state = SelectorState::derive(1, 10);
        assert!(!state.can_go_up);
        assert!(state.can_go_down);
    }

    #[test]
    fn test_last_page_disables_down() {
        let state = SelectorState::derive(10, 10);
        assert!(state.can_go_up);
        assert!(!state.can_go_down);
    }

    #[test]
    fn test_single_page_disables_both() {
        let state = SelectorState::from_props(PageProps::default());
        assert!(!state.can_go_up);
        assert!(!state.can_go_down);
    }

    #[test]
    fn test_flags_only_depend_on_equality() {
        // Out-of-range pages keep both arrows live; clamping happens on commit.
        let state = SelectorState::derive(42, 10);
        assert!(state.can_go_up);
        assert!(state.can_go_down);
    }

    #[test]
    fn test_display_value_prefers_draft() {
        let mut state = SelectorState::derive(4, 10);
        assert_eq!(state.display_value(), "4");

        state.draft = Some("12".to_string());
        assert_eq!(state.display_value(), "12");
    }

    #[test]
    fn test_direction_delta() {
        assert_eq!(Direction::Up.delta(), -1);
        assert_eq!(Direction::Down.delta(), 1);
    }
}
