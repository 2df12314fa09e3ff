//! Pure state transitions for the page selector.
//!
//! [`reduce`] never performs side effects. It returns the next model together
//! with at most one [`Effect`] that the caller must run *after* storing the
//! new model, so that owners reacting to a notification always observe the
//! updated local state.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::range::{clamp, PageRange};
use super::state::{Direction, PageProps, SelectorState};

/// Everything the selector knows: the owner's values and the local copy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorModel {
    pub props: PageProps,
    pub local: SelectorState,
}

impl SelectorModel {
    pub fn new(props: PageProps) -> Self {
        Self {
            props,
            local: SelectorState::from_props(props),
        }
    }

    /// Whether the local page differs from the owner's page
    pub fn is_stale(&self) -> bool {
        self.local.selected_page != self.props.selected_page
    }
}

/// Inputs to the selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorEvent {
    /// The owner published new values
    Sync(PageProps),
    /// An arrow was pressed
    Step(Direction),
    /// The page field changed
    Edit(String),
    /// Enter was pressed in the page field
    Commit,
    /// The page field lost focus
    Blur,
    /// A deferred reconciliation check fired
    Reconcile,
}

/// Notification sent to the owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "page", rename_all = "snake_case")]
pub enum Notification {
    StepUp(i64),
    StepDown(i64),
    Commit(i64),
}

impl Notification {
    pub fn page(&self) -> i64 {
        match *self {
            Notification::StepUp(page)
            | Notification::StepDown(page)
            | Notification::Commit(page) => page,
        }
    }
}

/// Side effect requested by a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Notify(Notification),
    ScheduleReconcile,
}

/// Read free-form field text as a page number.
///
/// Accepts decimal and exponent notation, unsigned `0x`/`0o`/`0b` integers
/// and a signed `Infinity`. Other words (`inf`, `nan`, ...) are not numbers
/// and yield `None`. Blank text reads as zero, fractions are truncated and
/// out-of-range values saturate; nothing is clamped here.
pub fn parse_page_input(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(0);
    }

    if let Some(prefixed) = parse_prefixed_integer(trimmed) {
        return prefixed;
    }

    let unsigned = trimmed
        .strip_prefix(['+', '-'])
        .unwrap_or(trimmed);
    if unsigned.starts_with(|c: char| c.is_ascii_alphabetic()) && unsigned != "Infinity" {
        return None;
    }

    let value: f64 = trimmed.parse().ok()?;
    if value.is_nan() {
        return None;
    }

    Some(value.trunc() as i64)
}

/// `Some(..)` when `text` carries a radix prefix, holding the parsed value or
/// `None` if the digits are invalid for that radix
fn parse_prefixed_integer(text: &str) -> Option<Option<i64>> {
    let radix = match text.get(..2)? {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };

    let digits = &text[2..];
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Some(None);
    }

    Some(Some(i64::from_str_radix(digits, radix).unwrap_or(i64::MAX)))
}

/// Compute the next model for `event`
pub fn reduce(model: &SelectorModel, event: SelectorEvent) -> (SelectorModel, Option<Effect>) {
    let mut next = model.clone();
    let total_pages = model.props.total_pages;

    let effect = match event {
        SelectorEvent::Sync(props) => {
            if props != model.props {
                next.props = props;
                next.local = SelectorState::from_props(props);
            }
            None
        }
        SelectorEvent::Step(direction) => {
            let enabled = match direction {
                Direction::Up => model.local.can_go_up,
                Direction::Down => model.local.can_go_down,
            };
            if !enabled {
                trace!(?direction, "arrow disabled");
                return (next, None);
            }

            let page = model.local.selected_page.saturating_add(direction.delta());
            next.local = SelectorState::derive(page, total_pages);
            let notification = match direction {
                Direction::Up => Notification::StepUp(page),
                Direction::Down => Notification::StepDown(page),
            };
            Some(Effect::Notify(notification))
        }
        SelectorEvent::Edit(raw) => match parse_page_input(&raw) {
            Some(page) => {
                next.local.selected_page = page;
                next.local.draft = Some(raw);
                None
            }
            None => {
                trace!(input = %raw, "ignoring non-numeric page input");
                None
            }
        },
        SelectorEvent::Commit => {
            let page = clamp(model.local.selected_page, PageRange::up_to(total_pages));
            next.local = SelectorState::derive(page, total_pages);
            Some(Effect::Notify(Notification::Commit(page)))
        }
        SelectorEvent::Blur => Some(Effect::ScheduleReconcile),
        SelectorEvent::Reconcile => {
            if model.is_stale() {
                next.local = SelectorState::from_props(model.props);
            }
            None
        }
    };

    (next, effect)
}
