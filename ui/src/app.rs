use chrono::Utc;
use log::info;
use rendezvous_business::{
    AuthCompute, BusinessConfig, ExpireLoginMessagesCommand, LoginMessages, REMEMBERED_USER_KEY,
    RememberedUser, Route,
};
use rendezvous_states::Time;

use crate::{pages, state::State, widgets::ToastOverlay};

/// How often to poll for an HTTP response while a login is in flight.
const LOADING_REPAINT: std::time::Duration = std::time::Duration::from_millis(100);

pub struct RendezvousApp {
    state: State,
    toasts: ToastOverlay,
    // last value written to storage
    persisted: RememberedUser,
}

impl RendezvousApp {
    pub fn new(state: State) -> Self {
        let persisted = state.ctx.state::<RememberedUser>().clone();
        Self {
            state,
            toasts: ToastOverlay::default(),
            persisted,
        }
    }

    /// Called once before the first frame. Restores the remembered user
    /// from eframe storage.
    pub fn restore(cc: &eframe::CreationContext<'_>, config: BusinessConfig) -> Self {
        let raw = cc
            .storage
            .and_then(|storage| storage.get_string(REMEMBERED_USER_KEY));
        let remembered = RememberedUser::from_storage(raw.as_deref());
        if let Some(username) = remembered.username() {
            info!("Restored remembered user '{username}'");
        }

        Self::new(State::new(config, remembered))
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    pub fn toasts(&self) -> &ToastOverlay {
        &self.toasts
    }

    fn persist_remembered(&mut self, storage: Option<&mut (dyn eframe::Storage + 'static)>) {
        let remembered = self.state.ctx.state::<RememberedUser>();
        if remembered == &self.persisted {
            return;
        }
        if let Some(storage) = storage {
            storage.set_string(REMEMBERED_USER_KEY, remembered.to_storage());
            storage.flush();
        }
        self.persisted = remembered.clone();
    }

    fn schedule_repaint(&self, ctx: &egui::Context) {
        if self
            .state
            .ctx
            .cached::<AuthCompute>()
            .is_some_and(AuthCompute::is_loading)
        {
            ctx.request_repaint_after(LOADING_REPAINT);
        }

        if let Some(deadline) = self.state.ctx.state::<LoginMessages>().next_deadline() {
            let delay = (deadline - Utc::now()).to_std().unwrap_or_default();
            ctx.request_repaint_after(delay);
        }
    }
}

impl eframe::App for RendezvousApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        self.state
            .ctx
            .update::<Time>(|time| *time.as_mut() = Utc::now());

        // Sync results of last frame's commands, then fire due timers
        self.state.ctx.sync_computes();
        self.state.ctx.dispatch::<ExpireLoginMessagesCommand>();
        self.state.ctx.sync_computes();

        let route = *self.state.ctx.state::<Route>();
        egui::CentralPanel::default().show(ctx, |ui| match route {
            Route::Login => pages::login_page(&mut self.state, ui),
            Route::Members => pages::members_page(&mut self.state, ui),
        });

        self.toasts.show(ctx, &self.state.toasts);

        // Run what the pages queued, then refresh derived values
        self.state.ctx.flush_commands();
        self.state.ctx.run_computed();

        self.persist_remembered(frame.storage_mut());
        self.schedule_repaint(ctx);
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let remembered = self.state.ctx.state::<RememberedUser>();
        storage.set_string(REMEMBERED_USER_KEY, remembered.to_storage());
        self.persisted = remembered.clone();
    }
}
