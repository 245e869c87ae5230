//! Toast overlay in the top-right corner.

use egui::{Align2, Area, Color32, Frame, Id, Margin, Order, RichText, Sense};
use rendezvous_business::{Toast, ToastLevel, ToastReceiver};

use crate::utils::colors::{COLOR_BLUE, COLOR_RED};

/// Seconds a toast stays on screen unless clicked away.
const TOAST_LIFETIME: f64 = 4.0;

#[derive(Debug)]
struct ActiveToast {
    toast: Toast,
    shown_at: f64,
}

#[derive(Debug, Default)]
pub struct ToastOverlay {
    active: Vec<ActiveToast>,
}

impl ToastOverlay {
    /// Drains `incoming`, drops expired toasts and paints the rest.
    pub fn show(&mut self, ctx: &egui::Context, incoming: &ToastReceiver) {
        let now = ctx.input(|i| i.time);
        self.active.extend(
            incoming
                .try_iter()
                .map(|toast| ActiveToast { toast, shown_at: now }),
        );
        self.active
            .retain(|active| now - active.shown_at < TOAST_LIFETIME);

        if self.active.is_empty() {
            return;
        }

        let mut dismissed = None;
        Area::new(Id::new("toasts"))
            .anchor(Align2::RIGHT_TOP, [-12.0, 12.0])
            .order(Order::Foreground)
            .show(ctx, |ui| {
                for (index, active) in self.active.iter().enumerate() {
                    let fill = match active.toast.level {
                        ToastLevel::Info => COLOR_BLUE,
                        ToastLevel::Error => COLOR_RED,
                    };
                    let response = Frame::NONE
                        .fill(fill)
                        .inner_margin(Margin::symmetric(12, 8))
                        .corner_radius(4.0)
                        .show(ui, |ui| {
                            ui.set_max_width(280.0);
                            ui.label(
                                RichText::new(&active.toast.title)
                                    .strong()
                                    .color(Color32::WHITE),
                            );
                            ui.label(RichText::new(&active.toast.message).color(Color32::WHITE));
                        })
                        .response
                        .interact(Sense::click());
                    if response.clicked() {
                        dismissed = Some(index);
                    }
                    ui.add_space(6.0);
                }
            });

        if let Some(index) = dismissed {
            self.active.remove(index);
        }

        // keep repainting so toasts expire on time
        ctx.request_repaint_after(std::time::Duration::from_millis(250));
    }

    pub fn toasts(&self) -> impl Iterator<Item = &Toast> {
        self.active.iter().map(|active| &active.toast)
    }
}
