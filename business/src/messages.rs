//! Success/error banners of the login form and their timers.

use chrono::{DateTime, Duration, Utc};
use log::info;
use rendezvous_states::{Command, Dep, State, Time, Updater};

use crate::Route;

pub const LOGIN_SUCCESS_MESSAGE: &str = "Login successful! Redirecting...";

/// Delay between a successful login and the redirect to the members area.
pub const REDIRECT_DELAY_MS: i64 = 1500;
/// How long an error banner stays visible.
pub const ERROR_DISPLAY_MS: i64 = 5000;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginMessages {
    pub success: Option<String>,
    pub error: Option<String>,
    pub error_expires_at: Option<DateTime<Utc>>,
    pub redirect_at: Option<DateTime<Utc>>,
}

impl LoginMessages {
    pub fn succeeded(now: DateTime<Utc>) -> Self {
        Self {
            success: Some(LOGIN_SUCCESS_MESSAGE.to_owned()),
            redirect_at: Some(now + Duration::milliseconds(REDIRECT_DELAY_MS)),
            ..Self::default()
        }
    }

    pub fn failed(message: String, now: DateTime<Utc>) -> Self {
        Self {
            error: Some(message),
            error_expires_at: Some(now + Duration::milliseconds(ERROR_DISPLAY_MS)),
            ..Self::default()
        }
    }

    /// Drops both banners. A scheduled redirect still happens.
    pub fn clear(&mut self) {
        self.success = None;
        self.error = None;
        self.error_expires_at = None;
    }

    pub fn cleared(&self) -> Self {
        let mut next = self.clone();
        next.clear();
        next
    }

    /// Earliest pending deadline, used to schedule a repaint.
    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        match (self.error_expires_at, self.redirect_at) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// State after the clock reached `now`, and whether the redirect is due.
    pub fn expire(&self, now: DateTime<Utc>) -> (Self, bool) {
        let mut next = self.clone();

        if next.error_expires_at.is_some_and(|at| now >= at) {
            next.error = None;
            next.error_expires_at = None;
        }

        let redirect = next.redirect_at.is_some_and(|at| now >= at);
        if redirect {
            next.success = None;
            next.redirect_at = None;
        }

        (next, redirect)
    }
}

impl State for LoginMessages {}

/// Fires the message timers against the [`Time`] state.
///
/// The UI dispatches it every frame after refreshing `Time`.
#[derive(Default, Debug)]
pub struct ExpireLoginMessagesCommand;

impl Command for ExpireLoginMessagesCommand {
    fn run(&self, deps: Dep<'_>, updater: Updater) {
        let now = *deps.get_state_ref::<Time>().as_ref();
        let messages = deps.get_state_ref::<LoginMessages>();

        let (next, redirect) = messages.expire(now);
        if &next == messages {
            return;
        }
        if redirect {
            info!("ExpireLoginMessagesCommand: redirecting to {}", Route::Members.path());
            updater.set_state(Route::Members);
        }
        updater.set_state(next);
    }
}

/// Drops both banners after a user edit of the form.
#[derive(Default, Debug)]
pub struct ClearMessagesCommand;

impl Command for ClearMessagesCommand {
    fn run(&self, deps: Dep<'_>, updater: Updater) {
        let messages = deps.get_state_ref::<LoginMessages>();
        if messages.success.is_some() || messages.error.is_some() {
            updater.set_state(messages.cleared());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_700_000_000, 0).expect("valid timestamp")
    }

    #[test]
    fn success_schedules_redirect() {
        let messages = LoginMessages::succeeded(t0());
        assert_eq!(messages.success.as_deref(), Some(LOGIN_SUCCESS_MESSAGE));
        assert_eq!(messages.redirect_at, Some(t0() + Duration::milliseconds(1500)));
        assert!(messages.error.is_none());
    }

    #[test]
    fn error_expires_after_five_seconds() {
        let messages = LoginMessages::failed("boom".to_owned(), t0());

        let (before, redirect) = messages.expire(t0() + Duration::milliseconds(4999));
        assert_eq!(before.error.as_deref(), Some("boom"));
        assert!(!redirect);

        let (after, redirect) = messages.expire(t0() + Duration::milliseconds(5000));
        assert!(after.error.is_none());
        assert!(after.error_expires_at.is_none());
        assert!(!redirect);
    }

    #[test]
    fn redirect_fires_once_due() {
        let messages = LoginMessages::succeeded(t0());

        let (_, redirect) = messages.expire(t0() + Duration::milliseconds(1499));
        assert!(!redirect);

        let (after, redirect) = messages.expire(t0() + Duration::milliseconds(1500));
        assert!(redirect);
        assert_eq!(after, LoginMessages::default());
    }

    #[test]
    fn clear_keeps_scheduled_redirect() {
        let mut messages = LoginMessages::succeeded(t0());
        messages.clear();
        assert!(messages.success.is_none());
        assert!(messages.redirect_at.is_some());
    }

    #[test]
    fn next_deadline_is_the_earliest() {
        let mut messages = LoginMessages::failed("x".to_owned(), t0());
        assert_eq!(messages.next_deadline(), Some(t0() + Duration::milliseconds(ERROR_DISPLAY_MS)));

        messages.redirect_at = Some(t0() + Duration::milliseconds(REDIRECT_DELAY_MS));
        assert_eq!(messages.next_deadline(), Some(t0() + Duration::milliseconds(REDIRECT_DELAY_MS)));

        assert_eq!(LoginMessages::default().next_deadline(), None);
    }
}
