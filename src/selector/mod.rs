//! Page selector: range clamping plus optimistic local edits reconciled
//! against an owner-held page.
//!
//! [`reducer`] holds the pure transitions, [`PageSelector`] wraps them with
//! notification hooks and the deferred reconciliation queue.

pub mod clock;
pub mod controller;
pub mod range;
pub mod reducer;
pub mod state;

pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::{PageCallbacks, PageSelector, DEFAULT_RECONCILE_DELAY};
pub use range::{clamp, PageRange, FIRST_PAGE};
pub use reducer::{parse_page_input, reduce, Effect, Notification, SelectorEvent, SelectorModel};
pub use state::{Direction, PageProps, SelectorState};
