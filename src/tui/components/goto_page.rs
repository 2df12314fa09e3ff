//! "Go to page" selector: up/down arrows, a numeric field and the page count.
//!
//! Rendering and input mapping only; page logic lives in
//! [`crate::selector::PageSelector`].

use super::{Component, ComponentState};
use crate::selector::{Clock, PageSelector, SelectorState, SystemClock};
use crate::tui::keys::{KeyAction, KeyMap};
use crate::tui::{styles::Theme, Frame};
use anyhow::Result;
use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tracing::trace;

const ARROW_WIDTH: u16 = 3;

/// Page selector widget
pub struct GoToPage<C: Clock = SystemClock> {
    selector: PageSelector<C>,
    state: ComponentState,
    key_map: KeyMap,
    up_area: Rect,
    down_area: Rect,
    field_area: Rect,
}

impl<C: Clock> GoToPage<C> {
    pub fn new(selector: PageSelector<C>) -> Self {
        Self {
            selector,
            state: ComponentState::new().with_focus(true),
            key_map: KeyMap::default(),
            up_area: Rect::default(),
            down_area: Rect::default(),
            field_area: Rect::default(),
        }
    }

    pub fn selector(&self) -> &PageSelector<C> {
        &self.selector
    }

    /// Pass the owner's values through to the selector
    pub fn sync(&mut self, selected_page: i64, total_pages: i64) {
        self.selector.sync(selected_page, total_pages);
    }

    fn state_view(&self) -> &SelectorState {
        self.selector.state()
    }

    /// Leave the field, scheduling a check against the owner's page
    fn blur(&mut self) {
        if self.state.has_focus {
            self.state.has_focus = false;
            self.selector.flush_uncommitted();
        }
    }

    fn type_text(&mut self, update: impl FnOnce(&mut String)) {
        self.state.has_focus = true;
        let mut text = self.state_view().display_value();
        update(&mut text);
        trace!(text = %text, "page field edited");
        self.selector.edit(text);
    }

    fn field_width(&self) -> usize {
        let total_digits = self.selector.props().total_pages.to_string().len();
        total_digits.max(self.state_view().display_value().len())
    }

    /// The widget as a single line of spans
    pub fn line(&self, theme: &Theme) -> Line<'static> {
        let view = self.state_view();
        let stale = self.selector.model().is_stale();
        let width = self.field_width();

        Line::from(vec![
            Span::styled(" ▲ ", theme.arrow_style(view.can_go_up)),
            Span::styled(" ▼ ", theme.arrow_style(view.can_go_down)),
            Span::raw(" "),
            Span::styled(
                format!(" {:>width$} ", view.display_value(), width = width),
                theme.field_style(self.state.has_focus, stale),
            ),
            Span::styled(
                format!(" / {}", self.selector.props().total_pages),
                theme.text_style(),
            ),
        ])
    }

    fn update_hit_areas(&mut self, inner: Rect) {
        let row = |x: u16, width: u16| {
            let width = width.min(inner.right().saturating_sub(x));
            Rect::new(x, inner.y, width, inner.height.min(1))
        };

        self.up_area = row(inner.x, ARROW_WIDTH);
        self.down_area = row(inner.x.saturating_add(ARROW_WIDTH), ARROW_WIDTH);
        let field_x = inner.x.saturating_add(ARROW_WIDTH * 2 + 1);
        let field_width = u16::try_from(self.field_width()).unwrap_or(u16::MAX);
        self.field_area = row(field_x, field_width.saturating_add(2));
    }
}

fn hit(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x && column < area.right() && row >= area.y && row < area.bottom()
}

#[async_trait]
impl<C: Clock + 'static> Component for GoToPage<C> {
    async fn handle_key_event(&mut self, event: KeyEvent) -> Result<()> {
        if event.kind != KeyEventKind::Press {
            return Ok(());
        }

        match self.key_map.action(&event) {
            Some(KeyAction::StepUp) => self.selector.step_up(),
            Some(KeyAction::StepDown) => self.selector.step_down(),
            Some(KeyAction::Commit) => {
                self.state.has_focus = true;
                self.selector.commit();
            }
            Some(KeyAction::Blur) => self.blur(),
            Some(KeyAction::Quit) => {}
            None => match event.code {
                KeyCode::Char(c) if !event.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.type_text(|text| text.push(c));
                }
                KeyCode::Backspace => {
                    self.type_text(|text| {
                        text.pop();
                    });
                }
                _ => {}
            },
        }

        Ok(())
    }

    async fn handle_mouse_event(&mut self, event: MouseEvent) -> Result<()> {
        if event.kind != MouseEventKind::Down(MouseButton::Left) {
            return Ok(());
        }

        let (column, row) = (event.column, event.row);
        if hit(self.up_area, column, row) {
            self.selector.step_up();
        } else if hit(self.down_area, column, row) {
            self.selector.step_down();
        } else if hit(self.field_area, column, row) {
            self.state.has_focus = true;
        } else {
            self.blur();
        }

        Ok(())
    }

    async fn tick(&mut self) -> Result<()> {
        self.selector.tick();
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Go to page")
            .border_style(theme.border_style(self.state.has_focus));
        let inner = block.inner(area);
        self.update_hit_areas(inner);

        let paragraph = Paragraph::new(self.line(theme))
            .block(block)
            .style(theme.base_style());
        frame.render_widget(paragraph, area);
    }

    fn has_focus(&self) -> bool {
        self.state.has_focus
    }

    fn set_focus(&mut self, focus: bool) {
        if !focus {
            self.blur();
        } else {
            self.state.has_focus = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::{ManualClock, PageProps};
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Duration;

    fn widget(selected: i64, total: i64) -> (GoToPage<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let selector = PageSelector::with_clock(PageProps::new(selected, total), clock.clone());
        (GoToPage::new(selector), clock)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::empty(),
        }
    }

    fn text(line: &Line) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[tokio::test]
    async fn test_arrow_keys_step() {
        let (mut widget, _) = widget(1, 10);
        widget.handle_key_event(key(KeyCode::Up)).await.unwrap();
        assert_eq!(widget.selector().selected_page(), 1);

        widget.handle_key_event(key(KeyCode::Down)).await.unwrap();
        assert_eq!(widget.selector().selected_page(), 2);
    }

    #[tokio::test]
    async fn test_typing_and_enter_commits() {
        let (mut widget, _) = widget(1, 10);
        widget.handle_key_event(key(KeyCode::Backspace)).await.unwrap();
        widget.handle_key_event(key(KeyCode::Char('1'))).await.unwrap();
        widget.handle_key_event(key(KeyCode::Char('5'))).await.unwrap();
        assert_eq!(widget.selector().state().draft.as_deref(), Some("15"));

        widget.handle_key_event(key(KeyCode::Enter)).await.unwrap();
        assert_eq!(widget.selector().selected_page(), 10);
        assert_eq!(widget.selector().state().draft, None);
    }

    #[tokio::test]
    async fn test_letters_are_dropped() {
        let (mut widget, _) = widget(3, 10);
        widget.handle_key_event(key(KeyCode::Char('x'))).await.unwrap();
        assert_eq!(widget.selector().selected_page(), 3);
        assert_eq!(widget.selector().state().draft, None);
    }

    #[tokio::test]
    async fn test_blur_then_tick_reverts() {
        let (mut widget, clock) = widget(1, 10);
        widget.handle_key_event(key(KeyCode::Char('4'))).await.unwrap();
        widget.handle_key_event(key(KeyCode::Tab)).await.unwrap();
        assert!(!widget.has_focus());
        assert_eq!(widget.selector().pending_checks(), 1);

        clock.advance(Duration::from_millis(150));
        widget.tick().await.unwrap();
        assert_eq!(widget.selector().selected_page(), 1);
    }

    #[tokio::test]
    async fn test_second_blur_without_focus_is_ignored() {
        let (mut widget, _) = widget(1, 10);
        widget.handle_key_event(key(KeyCode::Esc)).await.unwrap();
        widget.handle_key_event(key(KeyCode::Esc)).await.unwrap();
        assert_eq!(widget.selector().pending_checks(), 1);
    }

    #[test]
    fn test_line_shows_page_and_total() {
        let (widget, _) = widget(4, 12);
        let line = widget.line(&Theme::dark());
        assert_eq!(text(&line), " ▲  ▼    4  / 12");
    }

    #[test]
    fn test_line_dims_disabled_arrows() {
        let theme = Theme::dark();
        let (widget, _) = widget(1, 12);
        let line = widget.line(&theme);
        assert_eq!(line.spans[0].style, theme.arrow_style(false));
        assert_eq!(line.spans[1].style, theme.arrow_style(true));
    }

    #[test]
    fn test_render_with_oversized_draft() {
        let theme = Theme::dark();
        let (mut widget, _) = widget(1, 10);
        widget.selector.edit("1".repeat(70_000));

        let mut terminal = Terminal::new(TestBackend::new(30, 3)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.size();
                widget.render(frame, area, &theme);
            })
            .unwrap();

        assert_eq!(widget.field_area.x, 8);
        assert!(widget.field_area.right() <= 29);
    }

    #[tokio::test]
    async fn test_mouse_clicks_on_arrows() {
        let theme = Theme::dark();
        let (mut widget, _) = widget(5, 10);
        let mut terminal = Terminal::new(TestBackend::new(30, 3)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.size();
                widget.render(frame, area, &theme);
            })
            .unwrap();

        // Inside the border: row 1, arrows start at column 1.
        widget.handle_mouse_event(click(2, 1)).await.unwrap();
        assert_eq!(widget.selector().selected_page(), 4);

        widget.handle_mouse_event(click(5, 1)).await.unwrap();
        widget.handle_mouse_event(click(5, 1)).await.unwrap();
        assert_eq!(widget.selector().selected_page(), 6);

        widget.handle_mouse_event(click(25, 2)).await.unwrap();
        assert!(!widget.has_focus());
    }
}
