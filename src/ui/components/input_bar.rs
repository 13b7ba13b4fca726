use eframe::egui;

/// Message input with a Send button. Returns `true` when the user asked to
/// send (button or Enter) and sending is currently allowed.
pub fn render(ui: &mut egui::Ui, input_text: &mut String, can_send: bool, sending: bool) -> bool {
    let mut send = false;
    ui.horizontal(|ui| {
        let response = ui.add(
            egui::TextEdit::singleline(input_text)
                .hint_text("Type a message...")
                .desired_width(ui.available_width() - 70.0),
        );

        let label = if sending { "Sending..." } else { "Send" };
        if ui.add_enabled(can_send, egui::Button::new(label)).clicked() {
            send = true;
        }

        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            send = true;
            response.request_focus();
        }
    });

    send && can_send
}
