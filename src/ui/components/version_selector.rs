use eframe::egui;

use crate::common::VersionChoice;
use crate::ui::document_state::DocumentViewerState;

/// Drop-down of versions. Returns the entry the user picked, if it changed.
pub fn render(ui: &mut egui::Ui, state: &DocumentViewerState) -> Option<VersionChoice> {
    let options = state.version_options();
    let selected_text = options
        .iter()
        .find(|(choice, _)| *choice == state.selection)
        .map(|(_, label)| label.clone())
        .unwrap_or_else(|| match state.selection {
            VersionChoice::Current => state.current_label(),
            VersionChoice::Historical(version_number) => format!("v{version_number}"),
        });

    let mut picked = state.selection;
    ui.horizontal(|ui| {
        ui.label("Version:");
        egui::ComboBox::from_id_salt("version_selector")
            .selected_text(selected_text)
            .show_ui(ui, |ui| {
                for (choice, label) in options {
                    ui.selectable_value(&mut picked, choice, label);
                }
            });
    });

    (picked != state.selection).then_some(picked)
}
