use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime};

/// Sign-out endpoint the timer redirects to on expiry
pub const SIGNOUT_URL: &str = "/accounts/signout/";

/// Default inactivity window: 20 minutes
pub const DEFAULT_TIMEOUT_SECS: u64 = 20 * 60;

/// The fixed set of user-activity events that reset the deadline
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActivityEvent {
    MouseMove,
    KeyDown,
    Click,
    Scroll,
    TouchStart,
}

impl ActivityEvent {
    pub const ALL: [ActivityEvent; 5] = [
        ActivityEvent::MouseMove,
        ActivityEvent::KeyDown,
        ActivityEvent::Click,
        ActivityEvent::Scroll,
        ActivityEvent::TouchStart,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityEvent::MouseMove => "mousemove",
            ActivityEvent::KeyDown => "keydown",
            ActivityEvent::Click => "click",
            ActivityEvent::Scroll => "scroll",
            ActivityEvent::TouchStart => "touchstart",
        }
    }
}

/// Sliding sign-out deadline
///
/// A single deadline starts running when the page loads and is pushed
/// forward by every activity event. Once it passes with no intervening
/// activity, the page navigates to the sign-out URL.
#[derive(Debug, Clone)]
pub struct InactivityTimer {
    timeout: Duration,
    deadline: SystemTime,
}

impl InactivityTimer {
    /// Start the timer; the first deadline is `timeout` from now
    pub fn create(timeout: Duration) -> Self {
        InactivityTimer {
            timeout,
            deadline: SystemTime::now() + timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Reset the deadline in response to user activity
    pub fn record_activity(&mut self, event: ActivityEvent) {
        self.record_activity_at(event, SystemTime::now());
    }

    /// Reset the deadline as of a given instant
    pub fn record_activity_at(&mut self, event: ActivityEvent, now: SystemTime) {
        self.deadline = now + self.timeout;
        log::debug!("{} resets sign-out deadline", event.as_str());
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(SystemTime::now())
    }

    pub fn is_expired_at(&self, now: SystemTime) -> bool {
        now >= self.deadline
    }

    /// Time left before sign-out, zero once expired
    pub fn remaining(&self) -> Duration {
        self.remaining_at(SystemTime::now())
    }

    pub fn remaining_at(&self, now: SystemTime) -> Duration {
        self.deadline
            .duration_since(now)
            .unwrap_or(Duration::ZERO)
    }
}

/// Build the sign-out URL, optionally carrying the page the user should be
/// returned to after signing back in
///
/// # Examples
/// ```
/// use payform::inactivity::signout_url;
///
/// assert_eq!(signout_url(None), "/accounts/signout/");
/// assert_eq!(signout_url(Some("/payroll")), "/accounts/signout/?next=%2Fpayroll");
/// ```
pub fn signout_url(next: Option<&str>) -> String {
    match next {
        Some(path) if !path.is_empty() => {
            format!("{}?next={}", SIGNOUT_URL, urlencoding::encode(path))
        }
        _ => SIGNOUT_URL.to_string(),
    }
}
