use eframe::egui::{self, FontFamily, RichText};

use crate::common::{ContentFont, ContentTheme, TrustedHtml};
use crate::ui::html_layout::{self, Block};

pub const SERIF_FAMILY: &str = "serif";

pub fn font_family(font: ContentFont) -> FontFamily {
    match font {
        ContentFont::Serif => FontFamily::Name(SERIF_FAMILY.into()),
        ContentFont::Sans => FontFamily::Proportional,
        ContentFont::Monospace => FontFamily::Monospace,
    }
}

/// Renders backend markup inside the themed page frame. With `show_source`
/// the markup is displayed exactly as received.
pub fn render(ui: &mut egui::Ui, html: &TrustedHtml, theme: ContentTheme, show_source: bool) {
    let family = font_family(theme.font);

    egui::Frame::new()
        .fill(ui.visuals().extreme_bg_color)
        .inner_margin(egui::Margin::same(theme.padding.min(127.0) as i8))
        .show(ui, |ui| {
            ui.set_max_width(theme.max_width);

            if show_source {
                let mut source = html.as_str();
                ui.add(
                    egui::TextEdit::multiline(&mut source)
                        .code_editor()
                        .desired_width(f32::INFINITY),
                );
                return;
            }

            for block in html_layout::layout(html) {
                match block {
                    Block::Heading(level, text) => {
                        let size = match level {
                            1 => 26.0,
                            2 => 22.0,
                            3 => 19.0,
                            _ => 16.0,
                        };
                        ui.add_space(6.0);
                        ui.label(RichText::new(text).size(size).strong().family(family.clone()));
                    }
                    Block::Paragraph(text) => {
                        ui.label(RichText::new(text).family(family.clone()));
                        ui.add_space(4.0);
                    }
                    Block::ListItem(text) => {
                        ui.horizontal_wrapped(|ui| {
                            ui.label("•");
                            ui.label(RichText::new(text).family(family.clone()));
                        });
                    }
                    Block::TableRow(cells) => {
                        ui.horizontal(|ui| {
                            for cell in cells {
                                ui.add_sized(
                                    [120.0, 18.0],
                                    egui::Label::new(RichText::new(cell).family(family.clone()))
                                        .truncate(),
                                );
                                ui.separator();
                            }
                        });
                    }
                }
            }
        });
}
