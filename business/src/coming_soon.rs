//! Placeholder actions that only announce themselves.

use log::info;
use rendezvous_states::{Command, Dep, Updater};

use crate::Notifier;

pub const COMING_SOON_TITLE: &str = "Coming Soon";
pub const FORGOT_PASSWORD_MESSAGE: &str = "Forgot password functionality will be available soon!";
pub const GOOGLE_LOGIN_MESSAGE: &str = "Google login will be available soon!";
pub const FACEBOOK_LOGIN_MESSAGE: &str = "Facebook login will be available soon!";

fn announce(deps: Dep<'_>, message: &str) {
    info!("Coming soon: {message}");
    deps.get_state_ref::<Notifier>()
        .info(COMING_SOON_TITLE, message);
}

#[derive(Default, Debug)]
pub struct ForgotPasswordCommand;

impl Command for ForgotPasswordCommand {
    fn run(&self, deps: Dep<'_>, _updater: Updater) {
        announce(deps, FORGOT_PASSWORD_MESSAGE);
    }
}

#[derive(Default, Debug)]
pub struct GoogleLoginCommand;

impl Command for GoogleLoginCommand {
    fn run(&self, deps: Dep<'_>, _updater: Updater) {
        announce(deps, GOOGLE_LOGIN_MESSAGE);
    }
}

#[derive(Default, Debug)]
pub struct FacebookLoginCommand;

impl Command for FacebookLoginCommand {
    fn run(&self, deps: Dep<'_>, _updater: Updater) {
        announce(deps, FACEBOOK_LOGIN_MESSAGE);
    }
}
