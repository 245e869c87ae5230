use rendezvous_business::{
    BusinessConfig, Notifier, RememberedUser, ToastReceiver, register_login_screen,
};
use rendezvous_states::StateCtx;

/// The main application state.
pub struct State {
    /// The state context for business logic.
    pub ctx: StateCtx,
    /// Toasts raised by business commands, drained by the toast overlay.
    pub toasts: ToastReceiver,
}

impl Default for State {
    fn default() -> Self {
        Self::new(BusinessConfig::from_env(), RememberedUser::default())
    }
}

impl State {
    pub fn new(config: BusinessConfig, remembered: RememberedUser) -> Self {
        let mut ctx = StateCtx::new();
        let (notifier, toasts) = Notifier::channel();
        register_login_screen(&mut ctx, config, remembered, notifier);

        Self { ctx, toasts }
    }

    pub fn test(base_url: String) -> Self {
        Self::new(BusinessConfig::new(base_url), RememberedUser::default())
    }
}
