use crate::config::Config;
use crate::version;
use crate::selector::{Notification, PageCallbacks, PageRange, PageSelector};
use crate::tui::{components::{Component, GoToPage}, events::Event, keys::KeyMap, styles::Theme, Frame};
use anyhow::Result;
use crossterm::event::KeyEventKind;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::Paragraph;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Main application state and controller.
///
/// Besides hosting the widget, the app plays the page owner: requests from
/// the selector come back over the event channel and are accepted after
/// `owner_latency`.
pub struct App {
    /// Whether the application should quit
    pub should_quit: bool,

    /// Current application dimensions
    pub size: Rect,

    /// Key mappings for the application
    pub key_map: KeyMap,

    /// Current theme for styling
    pub theme: Theme,

    /// Status message to display
    pub status_message: Option<String>,

    /// Authoritative page held by the owner
    pub owner_page: i64,

    /// Page count held by the owner
    pub total_pages: i64,

    /// Delay before the owner accepts a request
    pub owner_latency: Duration,

    goto_page: GoToPage,

    /// Event sender for internal communication
    event_sender: mpsc::UnboundedSender<Event>,
}

impl App {
    /// Create a new application instance
    pub fn new(config: &Config, event_sender: mpsc::UnboundedSender<Event>) -> Self {
        let requests = event_sender.clone();
        let callbacks = PageCallbacks::forward_all(move |notification| {
            // The receiver only goes away on shutdown.
            let _ = requests.send(Event::OwnerRequest(notification));
        });

        let selector = PageSelector::new(config.props())
            .with_reconcile_delay(config.reconcile_delay())
            .with_callbacks(callbacks);

        Self {
            should_quit: false,
            size: Rect::default(),
            key_map: KeyMap::default(),
            theme: Theme::default(),
            status_message: None,
            owner_page: config.selected_page,
            total_pages: config.total_pages,
            owner_latency: config.owner_latency(),
            goto_page: GoToPage::new(selector),
            event_sender,
        }
    }

    pub fn goto_page(&self) -> &GoToPage {
        &self.goto_page
    }

    /// Handle incoming events
    pub async fn handle_event(&mut self, event: Event) -> Result<bool> {
        match event {
            Event::Key(key_event) => {
                if key_event.kind == KeyEventKind::Press && self.key_map.should_quit(&key_event) {
                    self.should_quit = true;
                    return Ok(true);
                }

                self.goto_page.handle_key_event(key_event).await?;
            }

            Event::Mouse(mouse_event) => {
                self.goto_page.handle_mouse_event(mouse_event).await?;
            }

            Event::Resize(width, height) => {
                self.size = Rect::new(0, 0, width, height);
            }

            Event::Tick => {}

            Event::OwnerRequest(notification) => {
                self.accept_later(notification);
            }

            Event::OwnerUpdate(page) => {
                self.owner_page = PageRange::up_to(self.total_pages).clamp(page);
                info!(page = self.owner_page, "owner moved to page");
                self.goto_page.sync(self.owner_page, self.total_pages);
                self.status_message = Some(format!("Owner moved to page {}", self.owner_page));
            }
        }

        // Deadlines are checked on every event: a steady stream of input
        // (mouse motion, key repeat) never yields a Tick.
        self.goto_page.tick().await?;

        Ok(self.should_quit)
    }

    /// Simulate an owner that takes `owner_latency` to accept a page
    fn accept_later(&self, notification: Notification) {
        debug!(?notification, latency_ms = self.owner_latency.as_millis() as u64, "owner received request");

        let sender = self.event_sender.clone();
        let latency = self.owner_latency;
        tokio::spawn(async move {
            tokio::time::sleep(latency).await;
            let _ = sender.send(Event::OwnerUpdate(notification.page()));
        });
    }

    /// Render the application UI
    pub fn render(&mut self, frame: &mut Frame) {
        self.size = frame.size();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Selector
                Constraint::Min(0),    // Spacer
                Constraint::Length(1), // Status bar
            ])
            .split(frame.size());

        self.goto_page.render(frame, chunks[0], &self.theme);
        self.render_status_bar(frame, chunks[2]);
    }

    /// Render the status bar
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let status_paragraph = Paragraph::new(self.status_text())
            .style(self.theme.status_bar_style());

        frame.render_widget(status_paragraph, area);
    }

    fn status_text(&self) -> String {
        let selector = self.goto_page.selector();
        let owner = format!(
            "owner: {}/{} | pending checks: {}",
            self.owner_page,
            self.total_pages,
            selector.pending_checks()
        );

        match self.status_message {
            Some(ref message) => format!("{} | {}", message, owner),
            None => format!("{} | {} | {}", owner, self.key_map.help_text(), version::display_version()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
    use ratatui::{backend::TestBackend, Terminal};

    fn app(latency_ms: u64) -> (App, mpsc::UnboundedReceiver<Event>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let config = Config {
            owner_latency_ms: latency_ms,
            ..Config::default()
        };
        (App::new(&config, sender), receiver)
    }

    #[tokio::test]
    async fn test_step_reaches_owner_and_syncs_back() {
        let (mut app, mut receiver) = app(0);
        app.handle_event(Event::Key(KeyEvent::from(KeyCode::Down))).await.unwrap();
        assert_eq!(app.goto_page().selector().selected_page(), 2);

        let request = receiver.recv().await.unwrap();
        assert!(matches!(request, Event::OwnerRequest(Notification::StepDown(2))));
        app.handle_event(request).await.unwrap();

        let update = receiver.recv().await.unwrap();
        assert!(matches!(update, Event::OwnerUpdate(2)));
        app.handle_event(update).await.unwrap();

        assert_eq!(app.owner_page, 2);
        assert_eq!(app.goto_page().selector().props().selected_page, 2);
    }

    #[tokio::test]
    async fn test_mouse_motion_alone_fires_revert_check() {
        let (sender, _receiver) = mpsc::unbounded_channel();
        let config = Config {
            reconcile_delay_ms: 20,
            ..Config::default()
        };
        let mut app = App::new(&config, sender);

        app.handle_event(Event::Key(KeyEvent::from(KeyCode::Char('4')))).await.unwrap();
        app.handle_event(Event::Key(KeyEvent::from(KeyCode::Tab))).await.unwrap();
        assert_eq!(app.goto_page().selector().selected_page(), 14);
        assert_eq!(app.goto_page().selector().pending_checks(), 1);

        tokio::time::sleep(Duration::from_millis(40)).await;
        let moved = MouseEvent {
            kind: MouseEventKind::Moved,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::empty(),
        };
        app.handle_event(Event::Mouse(moved)).await.unwrap();

        assert_eq!(app.goto_page().selector().selected_page(), 1);
        assert_eq!(app.goto_page().selector().pending_checks(), 0);
    }

    #[tokio::test]
    async fn test_owner_update_is_clamped() {
        let (mut app, _receiver) = app(0);
        app.handle_event(Event::OwnerUpdate(99)).await.unwrap();
        assert_eq!(app.owner_page, 10);
        assert_eq!(app.goto_page().selector().selected_page(), 10);
    }

    #[tokio::test]
    async fn test_quit_key() {
        let (mut app, _receiver) = app(0);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(app.handle_event(Event::Key(ctrl_c)).await.unwrap());
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_render_does_not_panic_on_small_terminal() {
        let (mut app, _receiver) = app(0);
        let mut terminal = Terminal::new(TestBackend::new(12, 2)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        assert_eq!(app.size, Rect::new(0, 0, 12, 2));
    }

    #[test]
    fn test_status_text_reports_owner() {
        let (sender, _receiver) = mpsc::unbounded_channel();
        let app = App::new(&Config::default(), sender);
        assert!(app.status_text().starts_with("owner: 1/10 | pending checks: 0"));
    }
}
