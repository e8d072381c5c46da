//! Welcome notification dispatch.
//!
//! # Invariants
//! - Dispatch is fire-and-forget: callers are never blocked on delivery.
//! - A notification is attempted at most once and never retried.
//! - Delivery failures are logged, never propagated.

use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::thread::JoinHandle;

#[derive(Debug)]
pub enum NotifyError {
    /// Transport rejected or could not deliver the message.
    Transport(String),
}

impl Display for NotifyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(message) => write!(f, "notification transport failed: {message}"),
        }
    }
}

impl Error for NotifyError {}

/// Sends the new-account welcome message.
pub trait WelcomeNotifier: Send + Sync {
    fn send_welcome(&self, email: &str, username: &str) -> Result<(), NotifyError>;
}

/// Notifier that only records the notification in the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl WelcomeNotifier for LogNotifier {
    fn send_welcome(&self, _email: &str, username: &str) -> Result<(), NotifyError> {
        info!("event=welcome_notify module=notify status=ok transport=log username={username}");
        Ok(())
    }
}

/// Runs `notifier` on a detached thread.
///
/// The returned handle may be dropped; joining it is only useful in tests.
pub fn dispatch_welcome(
    notifier: Arc<dyn WelcomeNotifier>,
    email: String,
    username: String,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        if let Err(err) = notifier.send_welcome(&email, &username) {
            error!(
                "event=welcome_notify module=notify status=error username={} error={}",
                username, err
            );
        }
    })
}

#[cfg(test)]
mod tests {
    use super::{dispatch_welcome, NotifyError, WelcomeNotifier};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Recording {
        sent: Mutex<Vec<(String, String)>>,
    }

    impl WelcomeNotifier for Recording {
        fn send_welcome(&self, email: &str, username: &str) -> Result<(), NotifyError> {
            self.sent
                .lock()
                .unwrap()
                .push((email.to_string(), username.to_string()));
            Ok(())
        }
    }

    struct Failing;

    impl WelcomeNotifier for Failing {
        fn send_welcome(&self, _email: &str, _username: &str) -> Result<(), NotifyError> {
            Err(NotifyError::Transport("smtp down".to_string()))
        }
    }

    #[test]
    fn dispatch_delivers_once() {
        let notifier = Arc::new(Recording::default());
        dispatch_welcome(
            notifier.clone(),
            "yuno@mail.com".to_string(),
            "yuno123".to_string(),
        )
        .join()
        .unwrap();

        let sent = notifier.sent.lock().unwrap();
        assert_eq!(
            sent.as_slice(),
            &[("yuno@mail.com".to_string(), "yuno123".to_string())]
        );
    }

    #[test]
    fn dispatch_swallows_delivery_failures() {
        let handle = dispatch_welcome(
            Arc::new(Failing),
            "asta@mail.com".to_string(),
            "asta".to_string(),
        );
        assert!(handle.join().is_ok());
    }
}
