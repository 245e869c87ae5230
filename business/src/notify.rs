//! Toast notifications raised by the business layer.
//!
//! Commands push [`Toast`]s through the [`Notifier`] state, usually from an
//! HTTP callback. The UI owns the matching [`ToastReceiver`] and drains it
//! every frame.

use flume::{Receiver, Sender};
use log::warn;
use rendezvous_states::State;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Error,
}

/// A transient, non-blocking notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub title: String,
    pub message: String,
}

pub type ToastReceiver = Receiver<Toast>;

#[derive(Debug, Clone)]
pub struct Notifier {
    send: Sender<Toast>,
}

impl Notifier {
    pub fn channel() -> (Self, ToastReceiver) {
        let (send, recv) = flume::unbounded();
        (Self { send }, recv)
    }

    pub fn info(&self, title: impl Into<String>, message: impl Into<String>) {
        self.push(ToastLevel::Info, title.into(), message.into());
    }

    pub fn error(&self, title: impl Into<String>, message: impl Into<String>) {
        self.push(ToastLevel::Error, title.into(), message.into());
    }

    fn push(&self, level: ToastLevel, title: String, message: String) {
        let toast = Toast {
            level,
            title,
            message,
        };
        if let Err(err) = self.send.send(toast) {
            warn!("Notifier: no toast receiver, dropping {:?}", err.into_inner());
        }
    }
}

impl State for Notifier {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toasts_arrive_in_order() {
        let (notifier, toasts) = Notifier::channel();
        notifier.info("Coming Soon", "later");
        notifier.error("Login Failed", "nope");

        let received: Vec<Toast> = toasts.try_iter().collect();
        assert_eq!(received.len(), 2);
        assert_eq!(received[0].level, ToastLevel::Info);
        assert_eq!(received[1].title, "Login Failed");
        assert_eq!(received[1].message, "nope");
    }

    #[test]
    fn dropped_receiver_does_not_panic() {
        let (notifier, toasts) = Notifier::channel();
        drop(toasts);
        notifier.info("Coming Soon", "ignored");
    }
}
