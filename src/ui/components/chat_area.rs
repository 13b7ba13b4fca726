use chrono::Utc;
use eframe::egui::{self, Align, Color32, Layout, RichText};

use crate::common::ChatMessage;
use crate::ui::format::{initials, relative_time};

const AVATAR_SIZE: f32 = 28.0;
/// Room left below the thread for the input bar.
const INPUT_BAR_HEIGHT: f32 = 40.0;

/// Scrollable message thread. Scrolls to the newest message when
/// `scroll_to_latest` is set and clears the flag.
pub fn render(ui: &mut egui::Ui, messages: &[ChatMessage], scroll_to_latest: &mut bool) {
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .max_height(thread_height(ui.available_height()))
        .show(ui, |ui| {
            if messages.is_empty() {
                ui.add_space(24.0);
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new("💬").size(32.0));
                    ui.label(RichText::new("No messages yet. Say hello!").weak());
                });
            }

            let now = Utc::now();
            for message in messages {
                render_message(ui, message, now);
                ui.add_space(6.0);
            }

            if std::mem::take(scroll_to_latest) {
                ui.scroll_to_cursor(Some(Align::BOTTOM));
            }
        });
}

fn thread_height(available: f32) -> f32 {
    (available - INPUT_BAR_HEIGHT).max(0.0)
}

fn render_message(ui: &mut egui::Ui, message: &ChatMessage, now: chrono::DateTime<Utc>) {
    let from_you = message.is_from_you();
    let layout = if from_you {
        Layout::right_to_left(Align::TOP)
    } else {
        Layout::left_to_right(Align::TOP)
    };

    ui.with_layout(layout, |ui| {
        if !from_you {
            avatar(ui, &message.sender_name);
        }

        let fill = if from_you {
            Color32::from_rgb(37, 99, 235)
        } else {
            ui.visuals().faint_bg_color
        };
        let text_color = if from_you {
            Color32::WHITE
        } else {
            ui.visuals().text_color()
        };

        egui::Frame::new()
            .fill(fill)
            .corner_radius(egui::CornerRadius::same(8))
            .inner_margin(egui::Margin::symmetric(8, 6))
            .show(ui, |ui| {
                ui.set_max_width(220.0);
                ui.vertical(|ui| {
                    if !from_you {
                        ui.label(RichText::new(&message.sender_name).small().strong());
                    }
                    ui.label(RichText::new(&message.message).color(text_color));
                    ui.label(
                        RichText::new(relative_time(message.timestamp, now))
                            .small()
                            .color(text_color.gamma_multiply(0.7)),
                    );
                });
            });
    });
}

fn avatar(ui: &mut egui::Ui, name: &str) {
    let (rect, _) = ui.allocate_exact_size(egui::vec2(AVATAR_SIZE, AVATAR_SIZE), egui::Sense::hover());
    let painter = ui.painter();
    painter.circle_filled(rect.center(), AVATAR_SIZE / 2.0, avatar_color(name));
    painter.text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        initials(name),
        egui::FontId::proportional(12.0),
        Color32::WHITE,
    );
}

fn avatar_color(name: &str) -> Color32 {
    const PALETTE: [Color32; 6] = [
        Color32::from_rgb(220, 38, 38),
        Color32::from_rgb(217, 119, 6),
        Color32::from_rgb(22, 163, 74),
        Color32::from_rgb(8, 145, 178),
        Color32::from_rgb(124, 58, 237),
        Color32::from_rgb(219, 39, 119),
    ];
    let hash = name
        .bytes()
        .fold(0usize, |acc, byte| acc.wrapping_mul(31).wrapping_add(byte as usize));
    PALETTE[hash % PALETTE.len()]
}
