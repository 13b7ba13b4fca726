use eframe::egui::{self, RichText};

use crate::common::VersionChoice;
use crate::ui::document_state::{ContentState, DocumentViewerState};
use crate::ui::format::short_datetime;

use super::{html_view, version_selector};

/// Draws the viewer; returns a version picked in the selector.
pub fn render(ui: &mut egui::Ui, state: &mut DocumentViewerState) -> Option<VersionChoice> {
    let Some(document) = state.document.clone() else {
        ui.centered_and_justified(|ui| match state.content {
            ContentState::NotFound => {
                ui.label(RichText::new("Document not found").color(egui::Color32::LIGHT_RED));
            }
            _ => {
                ui.label(RichText::new("No document open").weak());
            }
        });
        return None;
    };

    let file_type = document.file_type;
    let mut picked = None;

    ui.horizontal(|ui| {
        ui.label(RichText::new(file_type.icon()).size(28.0));
        ui.vertical(|ui| {
            ui.heading(&document.file_name);
            ui.label(RichText::new(file_type.label()).weak());
        });
    });

    ui.horizontal(|ui| {
        picked = version_selector::render(ui, state);
        if let VersionChoice::Historical(version_number) = state.selection {
            egui::Frame::new()
                .fill(egui::Color32::from_rgb(255, 193, 7))
                .corner_radius(egui::CornerRadius::same(4))
                .inner_margin(egui::Margin::symmetric(6, 2))
                .show(ui, |ui| {
                    ui.label(
                        RichText::new(format!("Historical version v{version_number}"))
                            .color(egui::Color32::BLACK),
                    );
                });
        }
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.toggle_value(&mut state.show_source, "View source");
        });
    });

    ui.separator();

    match &state.content {
        ContentState::Loading => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading document...");
            });
        }
        ContentState::NotFound => {
            ui.label(RichText::new("Document not found").color(egui::Color32::LIGHT_RED));
        }
        ContentState::Loaded(content) => {
            let mut meta = vec![format!("Version {}", content.version_number)];
            if let Some(author) = &content.author {
                meta.push(format!("by {author}"));
            }
            if let Some(timestamp) = content.timestamp {
                meta.push(short_datetime(timestamp));
            }
            ui.label(RichText::new(meta.join(" · ")).weak());
            if let Some(summary) = &content.change_summary {
                ui.label(RichText::new(summary).italics());
            }
            ui.add_space(8.0);

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    html_view::render(ui, &content.html, file_type.theme(), state.show_source);
                });
        }
    }

    picked
}
