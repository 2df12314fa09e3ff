//! Stateful page selector: owns the model, runs effects, fires deferred checks.

use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use super::clock::{Clock, SystemClock};
use super::reducer::{reduce, Effect, Notification, SelectorEvent, SelectorModel};
use super::state::{Direction, PageProps, SelectorState};

/// Delay before a blurred field is checked against the owner's page
pub const DEFAULT_RECONCILE_DELAY: Duration = Duration::from_millis(150);

type PageHook = Box<dyn Fn(i64) + Send + Sync>;

/// Notification hooks. Each one defaults to a no-op.
pub struct PageCallbacks {
    on_step_up: PageHook,
    on_step_down: PageHook,
    on_commit: PageHook,
}

impl PageCallbacks {
    pub fn on_step_up<F>(mut self, hook: F) -> Self
    where
        F: Fn(i64) + Send + Sync + 'static,
    {
        self.on_step_up = Box::new(hook);
        self
    }

    pub fn on_step_down<F>(mut self, hook: F) -> Self
    where
        F: Fn(i64) + Send + Sync + 'static,
    {
        self.on_step_down = Box::new(hook);
        self
    }

    pub fn on_commit<F>(mut self, hook: F) -> Self
    where
        F: Fn(i64) + Send + Sync + 'static,
    {
        self.on_commit = Box::new(hook);
        self
    }

    /// Route every notification to one hook
    pub fn forward_all<F>(hook: F) -> Self
    where
        F: Fn(Notification) + Send + Sync + Clone + 'static,
    {
        let up = hook.clone();
        let down = hook.clone();
        Self::default()
            .on_step_up(move |page| up(Notification::StepUp(page)))
            .on_step_down(move |page| down(Notification::StepDown(page)))
            .on_commit(move |page| hook(Notification::Commit(page)))
    }

    fn dispatch(&self, notification: Notification) {
        match notification {
            Notification::StepUp(page) => (self.on_step_up)(page),
            Notification::StepDown(page) => (self.on_step_down)(page),
            Notification::Commit(page) => (self.on_commit)(page),
        }
    }
}

impl Default for PageCallbacks {
    fn default() -> Self {
        Self {
            on_step_up: Box::new(|_| {}),
            on_step_down: Box::new(|_| {}),
            on_commit: Box::new(|_| {}),
        }
    }
}

impl fmt::Debug for PageCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageCallbacks").finish_non_exhaustive()
    }
}

/// Page selector with optimistic local edits.
///
/// Local edits apply immediately and notify the owner. The owner answers by
/// calling [`PageSelector::sync`]; an answer always replaces local state.
/// After a blur, a check is queued for `reconcile_delay` later. If the
/// owner's page still differs from the local page when the check fires, the
/// local page is reverted. Checks are driven by [`PageSelector::tick`].
pub struct PageSelector<C: Clock = SystemClock> {
    model: SelectorModel,
    callbacks: PageCallbacks,
    clock: C,
    reconcile_delay: Duration,
    pending_checks: VecDeque<Instant>,
}

impl PageSelector<SystemClock> {
    pub fn new(props: PageProps) -> Self {
        Self::with_clock(props, SystemClock)
    }
}

impl<C: Clock> PageSelector<C> {
    pub fn with_clock(props: PageProps, clock: C) -> Self {
        debug!(?props, "creating page selector");
        Self {
            model: SelectorModel::new(props),
            callbacks: PageCallbacks::default(),
            clock,
            reconcile_delay: DEFAULT_RECONCILE_DELAY,
            pending_checks: VecDeque::new(),
        }
    }

    pub fn with_callbacks(mut self, callbacks: PageCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    pub fn with_reconcile_delay(mut self, delay: Duration) -> Self {
        self.reconcile_delay = delay;
        self
    }

    pub fn state(&self) -> &SelectorState {
        &self.model.local
    }

    pub fn props(&self) -> PageProps {
        self.model.props
    }

    pub fn model(&self) -> &SelectorModel {
        &self.model
    }

    pub fn selected_page(&self) -> i64 {
        self.model.local.selected_page
    }

    pub fn can_go_up(&self) -> bool {
        self.model.local.can_go_up
    }

    pub fn can_go_down(&self) -> bool {
        self.model.local.can_go_down
    }

    /// Number of reconciliation checks waiting to fire
    pub fn pending_checks(&self) -> usize {
        self.pending_checks.len()
    }

    /// Accept the owner's current values
    pub fn sync(&mut self, selected_page: i64, total_pages: i64) {
        self.dispatch(SelectorEvent::Sync(PageProps::new(selected_page, total_pages)));
    }

    pub fn step(&mut self, direction: Direction) {
        self.dispatch(SelectorEvent::Step(direction));
    }

    pub fn step_up(&mut self) {
        self.step(Direction::Up);
    }

    pub fn step_down(&mut self) {
        self.step(Direction::Down);
    }

    /// Field text changed
    pub fn edit(&mut self, raw: impl Into<String>) {
        self.dispatch(SelectorEvent::Edit(raw.into()));
    }

    /// Enter pressed in the field
    pub fn commit(&mut self) {
        self.dispatch(SelectorEvent::Commit);
    }

    /// Field lost focus: queue a reconciliation check
    pub fn flush_uncommitted(&mut self) {
        self.dispatch(SelectorEvent::Blur);
    }

    /// Fire every check whose deadline has passed. Returns how many fired.
    pub fn tick(&mut self) -> usize {
        let now = self.clock.now();
        let mut fired = 0;

        while self
            .pending_checks
            .front()
            .is_some_and(|deadline| *deadline <= now)
        {
            self.pending_checks.pop_front();
            fired += 1;
            self.dispatch(SelectorEvent::Reconcile);
        }

        fired
    }

    /// Apply an event, then run its effect against the stored state
    pub fn dispatch(&mut self, event: SelectorEvent) {
        let reconciling = matches!(event, SelectorEvent::Reconcile);
        let before = self.model.local.selected_page;

        let (next, effect) = reduce(&self.model, event);
        self.model = next;

        if reconciling && before != self.model.local.selected_page {
            info!(
                from = before,
                to = self.model.local.selected_page,
                "owner did not confirm page in time, reverting"
            );
        }

        match effect {
            Some(Effect::Notify(notification)) => {
                debug!(?notification, "notifying owner");
                self.callbacks.dispatch(notification);
            }
            Some(Effect::ScheduleReconcile) => {
                let now = self.clock.now();
                let deadline = now.checked_add(self.reconcile_delay).unwrap_or(now);
                self.pending_checks.push_back(deadline);
                debug!(pending = self.pending_checks.len(), "reconciliation check queued");
            }
            None => {}
        }
    }
}

impl<C: Clock> fmt::Debug for PageSelector<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageSelector")
            .field("model", &self.model)
            .field("reconcile_delay", &self.reconcile_delay)
            .field("pending_checks", &self.pending_checks.len())
            .finish()
    }
}
