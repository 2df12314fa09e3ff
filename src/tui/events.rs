use crossterm::event::{Event as CrosstermEvent, KeyEvent, MouseEvent};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::warn;

use crate::selector::Notification;

/// Application events
#[derive(Debug, Clone)]
pub enum Event {
    /// Keyboard input event
    Key(KeyEvent),

    /// Mouse input event
    Mouse(MouseEvent),

    /// Terminal resize event
    Resize(u16, u16),

    /// Periodic tick event
    Tick,

    /// The selector asked the owner to move to a page
    OwnerRequest(Notification),

    /// The owner settled on a page
    OwnerUpdate(i64),
}

/// Event handler for managing input events
pub struct EventHandler {
    /// Event receiver channel
    receiver: mpsc::UnboundedReceiver<Event>,

    /// Event sender channel
    sender: mpsc::UnboundedSender<Event>,

    /// Tick interval for periodic events
    tick_interval: Duration,
}

impl EventHandler {
    /// Create a new event handler
    pub fn new(tick_interval: Duration) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();

        Self {
            receiver,
            sender,
            tick_interval,
        }
    }

    /// Get the next event
    pub async fn next(&mut self) -> Option<Event> {
        // Internal events first so owner updates are never starved by input
        if let Ok(event) = self.receiver.try_recv() {
            return Some(event);
        }

        let tick = self.tick_interval;
        let polled = tokio::task::spawn_blocking(move || -> std::io::Result<Option<CrosstermEvent>> {
            if crossterm::event::poll(tick)? {
                crossterm::event::read().map(Some)
            } else {
                Ok(None)
            }
        })
        .await;

        match polled {
            Ok(Ok(Some(event))) => self.convert_crossterm_event(event).or(Some(Event::Tick)),
            Ok(Ok(None)) => Some(Event::Tick),
            Ok(Err(e)) => {
                warn!("Failed to read terminal event: {}", e);
                Some(Event::Tick)
            }
            Err(e) => {
                warn!("Event polling task failed: {}", e);
                None
            }
        }
    }

    /// Convert crossterm events to application events
    fn convert_crossterm_event(&self, event: CrosstermEvent) -> Option<Event> {
        match event {
            CrosstermEvent::Key(key_event) => Some(Event::Key(key_event)),
            CrosstermEvent::Mouse(mouse_event) => Some(Event::Mouse(mouse_event)),
            CrosstermEvent::Resize(width, height) => Some(Event::Resize(width, height)),
            CrosstermEvent::FocusGained | CrosstermEvent::FocusLost | CrosstermEvent::Paste(_) => None,
        }
    }

    /// Get a clone of the sender
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.sender.clone()
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new(Duration::from_millis(50))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sender_queues_internal_event() {
        let mut handler = EventHandler::new(Duration::from_millis(1));
        handler.sender().send(Event::OwnerUpdate(4)).unwrap();

        match handler.receiver.try_recv() {
            Ok(Event::OwnerUpdate(page)) => assert_eq!(page, 4),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_sender_feeds_receiver() {
        let mut handler = EventHandler::default();
        handler.sender().send(Event::Tick).unwrap();
        assert!(matches!(handler.receiver.try_recv(), Ok(Event::Tick)));
    }
}
