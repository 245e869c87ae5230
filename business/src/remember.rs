//! The "remember me" record.
//!
//! Stored by the UI under [`REMEMBERED_USER_KEY`] as `{"username": "..."}`.
//! An empty stored string means nobody is remembered.

use log::{info, warn};
use rendezvous_states::{Command, Dep, State, Updater};
use serde::{Deserialize, Serialize};

use crate::LoginInput;

pub const REMEMBERED_USER_KEY: &str = "rememberedUser";

#[derive(Debug, Serialize, Deserialize)]
struct StoredUser {
    username: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RememberedUser {
    username: Option<String>,
}

impl RememberedUser {
    pub fn remember(username: &str) -> Self {
        Self {
            username: Some(username.to_owned()),
        }
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Parses the stored record. Missing, empty or malformed records
    /// remember nobody.
    pub fn from_storage(raw: Option<&str>) -> Self {
        let Some(raw) = raw.filter(|raw| !raw.is_empty()) else {
            return Self::default();
        };

        match serde_json::from_str::<StoredUser>(raw) {
            Ok(stored) if !stored.username.is_empty() => Self {
                username: Some(stored.username),
            },
            Ok(_) => Self::default(),
            Err(err) => {
                warn!("RememberedUser: ignoring malformed record: {err}");
                Self::default()
            }
        }
    }

    /// Record to store; empty when nobody is remembered.
    pub fn to_storage(&self) -> String {
        let Some(username) = &self.username else {
            return String::new();
        };
        let stored = StoredUser {
            username: username.clone(),
        };
        match serde_json::to_string(&stored) {
            Ok(raw) => raw,
            Err(err) => {
                warn!("RememberedUser: failed to serialize record: {err}");
                String::new()
            }
        }
    }
}

impl State for RememberedUser {}

/// Pre-fills the form from the remembered user, if any.
#[derive(Default, Debug)]
pub struct RestoreRememberedUserCommand;

impl Command for RestoreRememberedUserCommand {
    fn run(&self, deps: Dep<'_>, updater: Updater) {
        let remembered = deps.get_state_ref::<RememberedUser>();
        let Some(username) = remembered.username() else {
            return;
        };

        info!("RestoreRememberedUserCommand: restoring '{username}'");
        let mut input = deps.get_state_ref::<LoginInput>().clone();
        input.patch_remembered(username);
        updater.set_state(input);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_record_is_username_json() {
        let raw = RememberedUser::remember("lisa").to_storage();
        assert_eq!(raw, r#"{"username":"lisa"}"#);
        assert_eq!(
            RememberedUser::from_storage(Some(&raw)),
            RememberedUser::remember("lisa")
        );
    }

    #[test]
    fn nobody_remembered_is_stored_as_empty() {
        assert_eq!(RememberedUser::default().to_storage(), "");
        assert_eq!(RememberedUser::from_storage(Some("")), RememberedUser::default());
        assert_eq!(RememberedUser::from_storage(None), RememberedUser::default());
    }

    #[test]
    fn malformed_record_is_ignored() {
        for raw in ["not json", r#"{"name":"x"}"#, r#"{"username":""}"#] {
            assert_eq!(
                RememberedUser::from_storage(Some(raw)).username(),
                None,
                "raw: {raw}"
            );
        }
    }

    #[test]
    fn extra_fields_are_tolerated() {
        let remembered = RememberedUser::from_storage(Some(r#"{"username":"bob","at":1}"#));
        assert_eq!(remembered.username(), Some("bob"));
    }
}
