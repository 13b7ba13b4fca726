use eframe::egui;

use crate::ui::chat_state::ChatState;

use super::{chat_area, input_bar};

/// Chat widget. Returns `true` when the user submitted the input.
pub fn render(ui: &mut egui::Ui, state: &mut ChatState) -> bool {
    match state.employee_id {
        Some(employee_id) => ui.heading(format!("Chat · employee #{employee_id}")),
        None => ui.heading("Chat"),
    };
    ui.separator();

    if state.employee_id.is_none() {
        ui.label(egui::RichText::new("Choose an employee to start chatting").weak());
        return false;
    }

    chat_area::render(ui, &state.messages, &mut state.scroll_to_latest);
    ui.separator();

    let can_send = state.can_send();
    input_bar::render(ui, &mut state.input_text, can_send, state.sending)
}

/// Blocking alert for failed sends.
pub fn render_alert(ctx: &egui::Context, state: &mut ChatState) {
    let Some(text) = state.alert.clone() else {
        return;
    };

    let response = egui::Modal::new(egui::Id::new("chat_alert")).show(ctx, |ui| {
        ui.set_width(280.0);
        ui.label(text);
        ui.add_space(8.0);
        ui.vertical_centered(|ui| ui.button("OK").clicked()).inner
    });

    if response.inner || response.should_close() {
        state.dismiss_alert();
    }
}
