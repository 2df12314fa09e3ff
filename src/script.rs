//! Replays a scripted sequence of interactions against a page selector.
//!
//! Steps are written as `up`, `down`, `type:<text>`, `enter`, `blur`,
//! `wait:<ms>`, `owner:<page>` and `pages:<total>`. Time only moves on `wait`.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::debug;

use crate::errors::{GotoPageError, GotoPageResult};
use crate::selector::{
    ManualClock, Notification, PageCallbacks, PageProps, PageRange, PageSelector, SelectorState,
};

/// One scripted interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptStep {
    Up,
    Down,
    Type(String),
    Enter,
    Blur,
    Wait(Duration),
    /// The owner moves to a page on its own
    Owner(i64),
    /// The owner changes the page count
    Pages(i64),
}

impl FromStr for ScriptStep {
    type Err = GotoPageError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (name, arg) = match raw.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (raw, None),
        };

        let number = |arg: Option<&str>| -> GotoPageResult<i64> {
            let arg = arg.ok_or_else(|| GotoPageError::invalid_step(raw, "missing argument"))?;
            arg.trim()
                .parse()
                .map_err(|_| GotoPageError::invalid_step(raw, format!("'{}' is not an integer", arg)))
        };

        let step = match (name.trim(), arg) {
            ("up", None) => ScriptStep::Up,
            ("down", None) => ScriptStep::Down,
            ("enter", None) => ScriptStep::Enter,
            ("blur", None) => ScriptStep::Blur,
            ("type", Some(text)) => ScriptStep::Type(text.to_string()),
            ("wait", arg) => {
                let ms = number(arg)?;
                let ms = u64::try_from(ms)
                    .map_err(|_| GotoPageError::invalid_step(raw, "wait must not be negative"))?;
                ScriptStep::Wait(Duration::from_millis(ms))
            }
            ("owner", arg) => ScriptStep::Owner(number(arg)?),
            ("pages", arg) => ScriptStep::Pages(number(arg)?),
            ("up" | "down" | "enter" | "blur", Some(_)) => {
                return Err(GotoPageError::invalid_step(raw, "takes no argument"))
            }
            ("type", None) => return Err(GotoPageError::invalid_step(raw, "missing argument")),
            _ => return Err(GotoPageError::invalid_step(raw, "unknown step")),
        };

        Ok(step)
    }
}

impl fmt::Display for ScriptStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptStep::Up => write!(f, "up"),
            ScriptStep::Down => write!(f, "down"),
            ScriptStep::Type(text) => write!(f, "type:{}", text),
            ScriptStep::Enter => write!(f, "enter"),
            ScriptStep::Blur => write!(f, "blur"),
            ScriptStep::Wait(delay) => write!(f, "wait:{}", delay.as_millis()),
            ScriptStep::Owner(page) => write!(f, "owner:{}", page),
            ScriptStep::Pages(total) => write!(f, "pages:{}", total),
        }
    }
}

/// Parse a list of raw steps, failing on the first malformed one
pub fn parse_steps<S: AsRef<str>>(raw: &[S]) -> GotoPageResult<Vec<ScriptStep>> {
    raw.iter().map(|step| step.as_ref().parse()).collect()
}

/// State after one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub step: String,
    pub elapsed_ms: u64,
    pub owner: PageProps,
    pub local: SelectorState,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notifications: Vec<Notification>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub reverted: bool,
}

/// Runs scripts against a selector on a manual clock.
///
/// With `acknowledge` set the owner accepts every notification at once,
/// otherwise it never answers and blurred edits are reverted.
pub struct ScriptRunner {
    selector: PageSelector<ManualClock>,
    clock: ManualClock,
    outbox: Arc<Mutex<Vec<Notification>>>,
    acknowledge: bool,
}

impl ScriptRunner {
    pub fn new(props: PageProps, reconcile_delay: Duration, acknowledge: bool) -> Self {
        let clock = ManualClock::new();
        let outbox = Arc::new(Mutex::new(Vec::new()));
        let sink = outbox.clone();
        let callbacks = PageCallbacks::forward_all(move |notification| {
            if let Ok(mut pending) = sink.lock() {
                pending.push(notification);
            }
        });

        let selector = PageSelector::with_clock(props, clock.clone())
            .with_reconcile_delay(reconcile_delay)
            .with_callbacks(callbacks);

        Self {
            selector,
            clock,
            outbox,
            acknowledge,
        }
    }

    pub fn selector(&self) -> &PageSelector<ManualClock> {
        &self.selector
    }

    /// Apply one step and report the resulting state
    pub fn apply(&mut self, step: &ScriptStep) -> StepReport {
        let mut reverted = false;
        let props = self.selector.props();

        match step {
            ScriptStep::Up => self.selector.step_up(),
            ScriptStep::Down => self.selector.step_down(),
            ScriptStep::Type(text) => self.selector.edit(text.clone()),
            ScriptStep::Enter => self.selector.commit(),
            ScriptStep::Blur => self.selector.flush_uncommitted(),
            ScriptStep::Wait(delay) => {
                self.clock.advance(*delay);
                let before = self.selector.state().clone();
                self.selector.tick();
                reverted = *self.selector.state() != before;
            }
            ScriptStep::Owner(page) => self.selector.sync(*page, props.total_pages),
            ScriptStep::Pages(total) => {
                let page = PageRange::up_to(*total).clamp(props.selected_page);
                self.selector.sync(page, *total);
            }
        }

        let notifications = self.drain_outbox();
        if self.acknowledge {
            let total = self.selector.props().total_pages;
            for notification in &notifications {
                self.selector.sync(notification.page(), total);
            }
        }

        let report = StepReport {
            step: step.to_string(),
            elapsed_ms: self.clock.elapsed().as_millis() as u64,
            owner: self.selector.props(),
            local: self.selector.state().clone(),
            notifications,
            reverted,
        };
        debug!(?report, "script step applied");
        report
    }

    /// Apply every step in order
    pub fn run(&mut self, steps: &[ScriptStep]) -> Vec<StepReport> {
        steps.iter().map(|step| self.apply(step)).collect()
    }

    fn drain_outbox(&self) -> Vec<Notification> {
        match self.outbox.lock() {
            Ok(mut pending) => pending.drain(..).collect(),
            Err(poisoned) => poisoned.into_inner().drain(..).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::DEFAULT_RECONCILE_DELAY;

    fn runner(acknowledge: bool) -> ScriptRunner {
        ScriptRunner::new(PageProps::new(1, 10), DEFAULT_RECONCILE_DELAY, acknowledge)
    }

    #[test]
    fn test_parse_steps() {
        let steps = parse_steps(&["up", "type:15", "enter", "wait:150", "owner:3", "pages:4", "blur"]).unwrap();
        assert_eq!(
            steps,
            vec![
                ScriptStep::Up,
                ScriptStep::Type("15".to_string()),
                ScriptStep::Enter,
                ScriptStep::Wait(Duration::from_millis(150)),
                ScriptStep::Owner(3),
                ScriptStep::Pages(4),
                ScriptStep::Blur,
            ]
        );
    }

    #[test]
    fn test_type_keeps_raw_text() {
        let step: ScriptStep = "type:abc".parse().unwrap();
        assert_eq!(step, ScriptStep::Type("abc".to_string()));
        let step: ScriptStep = "type:".parse().unwrap();
        assert_eq!(step, ScriptStep::Type(String::new()));
    }

    #[test]
    fn test_parse_rejects_malformed_steps() {
        for raw in ["jump", "wait", "wait:-1", "owner:x", "up:2", "type"] {
            let err = raw.parse::<ScriptStep>().unwrap_err();
            assert!(matches!(err, GotoPageError::InvalidStep { .. }), "{}", raw);
        }
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let step = ScriptStep::Wait(Duration::from_millis(20));
        assert_eq!(step.to_string().parse::<ScriptStep>().unwrap(), step);
    }

    #[test]
    fn test_unacknowledged_edit_is_reverted() {
        let mut runner = runner(false);
        let steps = parse_steps(&["type:3", "blur", "wait:150"]).unwrap();
        let reports = runner.run(&steps);

        assert_eq!(reports[0].local.selected_page, 3);
        assert!(!reports[1].reverted);
        assert!(reports[2].reverted);
        assert_eq!(reports[2].local.selected_page, 1);
        assert_eq!(reports[2].elapsed_ms, 150);
    }

    #[test]
    fn test_acknowledged_commit_sticks() {
        let mut runner = runner(true);
        let steps = parse_steps(&["type:15", "enter", "blur", "wait:150"]).unwrap();
        let reports = runner.run(&steps);

        assert_eq!(reports[1].notifications, vec![Notification::Commit(10)]);
        assert_eq!(reports[1].owner.selected_page, 10);
        assert!(!reports[3].reverted);
        assert_eq!(runner.selector().selected_page(), 10);
    }

    #[test]
    fn test_step_down_from_first_page() {
        let mut runner = runner(false);
        let reports = runner.run(&[ScriptStep::Up, ScriptStep::Down]);

        assert!(reports[0].notifications.is_empty());
        assert_eq!(reports[1].notifications, vec![Notification::StepDown(2)]);
        assert_eq!(reports[1].owner.selected_page, 1);
    }

    #[test]
    fn test_pages_step_clamps_owner_page() {
        let mut runner = runner(false);
        runner.apply(&ScriptStep::Owner(8));
        let report = runner.apply(&ScriptStep::Pages(5));
        assert_eq!(report.owner, PageProps::new(5, 5));
        assert!(!report.local.can_go_down);
    }

    #[test]
    fn test_report_serializes_to_json() {
        let mut runner = runner(false);
        let report = runner.apply(&ScriptStep::Down);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["step"], "down");
        assert_eq!(json["local"]["selected_page"], 2);
        assert_eq!(json["notifications"][0]["kind"], "step_down");
        assert!(json.get("reverted").is_none());
    }
}
