//! Transient status notifications.
//!
//! A notification moves through a fixed lifecycle:
//!
//! ```text
//! Hidden -> Showing -> Visible -> Hiding -> Removed
//! ```
//!
//! Time is passed in explicitly as a [`Duration`] since the session started,
//! so tests can drive the lifecycle without sleeping. Only one notification
//! is live at a time: a new one cancels the timers of the previous one.

use std::cell::Cell;
use std::fmt;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::config::NotificationConfig;

/// Tone of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// The action succeeded.
    Success,
    /// The action was rejected.
    Error,
}

impl fmt::Display for NoticeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Lifecycle phase of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    /// Nothing on screen.
    Hidden,
    /// Inserted, appear transition pending.
    Showing,
    /// Fully displayed.
    Visible,
    /// Hide transition running.
    Hiding,
    /// Gone from the display.
    Removed,
}

/// Durations of each lifecycle step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// Insertion to appear.
    pub appear_delay: Duration,
    /// Time spent visible.
    pub display: Duration,
    /// Hide transition length.
    pub hide_transition: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self::from(&NotificationConfig::default())
    }
}

impl From<&NotificationConfig> for Timings {
    fn from(config: &NotificationConfig) -> Self {
        Self {
            appear_delay: config.appear_delay(),
            display: config.display_duration(),
            hide_transition: config.hide_transition(),
        }
    }
}

impl Timings {
    fn phase_at(&self, elapsed: Duration) -> Phase {
        let visible_at = self.appear_delay;
        let hiding_at = visible_at + self.display;
        let removed_at = hiding_at + self.hide_transition;

        if elapsed < visible_at {
            Phase::Showing
        } else if elapsed < hiding_at {
            Phase::Visible
        } else if elapsed < removed_at {
            Phase::Hiding
        } else {
            Phase::Removed
        }
    }
}

/// A live notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Sequence number within the session.
    pub seq: u64,
    /// Text shown to the user.
    pub message: String,
    /// Tone.
    pub kind: NoticeKind,
    /// Current phase.
    pub phase: Phase,
    posted_at: Duration,
}

/// Owns the single on-screen notification slot.
#[derive(Debug, Default)]
pub struct Notifier {
    timings: Timings,
    current: Option<Notification>,
    next_seq: u64,
}

impl Notifier {
    /// Create a notifier with the given timings.
    #[must_use]
    pub fn new(timings: Timings) -> Self {
        Self {
            timings,
            current: None,
            next_seq: 0,
        }
    }

    /// Post a notification at time `now`, superseding any live one.
    ///
    /// The superseded notification, if there was one, is returned in
    /// [`Phase::Removed`]; its pending transitions never run.
    pub fn notify(
        &mut self,
        message: impl Into<String>,
        kind: NoticeKind,
        now: Duration,
    ) -> Option<Notification> {
        let superseded = self.dismiss();
        if let Some(old) = &superseded {
            debug!(seq = old.seq, "Notification superseded");
        }

        self.next_seq += 1;
        let notification = Notification {
            seq: self.next_seq,
            message: message.into(),
            kind,
            phase: Phase::Showing,
            posted_at: now,
        };
        debug!(seq = notification.seq, %kind, message = %notification.message, "Notification posted");
        self.current = Some(notification);
        superseded
    }

    /// Advance to time `now`. Returns the new phase when it changed.
    ///
    /// Reaching [`Phase::Removed`] clears the slot.
    pub fn tick(&mut self, now: Duration) -> Option<Phase> {
        let current = self.current.as_mut()?;
        let phase = self
            .timings
            .phase_at(now.saturating_sub(current.posted_at));
        if phase == current.phase {
            return None;
        }

        trace!(seq = current.seq, from = ?current.phase, to = ?phase, "Notification phase");
        current.phase = phase;
        if phase == Phase::Removed {
            self.current = None;
        }
        Some(phase)
    }

    /// Cancel the live notification immediately.
    pub fn dismiss(&mut self) -> Option<Notification> {
        self.current.take().map(|mut n| {
            n.phase = Phase::Removed;
            n
        })
    }

    /// The live notification, if any.
    #[must_use]
    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    /// Phase of the display slot; [`Phase::Hidden`] when empty.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.current.as_ref().map_or(Phase::Hidden, |n| n.phase)
    }

    /// The configured timings.
    #[must_use]
    pub fn timings(&self) -> Timings {
        self.timings
    }
}

/// Source of session time.
pub trait Clock: fmt::Debug {
    /// Time elapsed since the session started.
    fn now(&self) -> Duration;
}

/// Wall-clock session time.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    started: Instant,
}

impl SystemClock {
    /// Start counting from now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.started.elapsed()
    }
}

/// Clock advanced by hand.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    /// Start at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for std::rc::Rc<C> {
    fn now(&self) -> Duration {
        (**self).now()
    }
}
