use std::time::Duration;

use eframe::egui;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::common::{ApiCommand, ApiEvent};

use super::components::{chat_panel, document_viewer, html_view};
use super::state::{AppState, PendingDocument};

/// What to open when the window starts.
#[derive(Debug, Clone, Copy, Default)]
pub struct Startup {
    pub document: Option<PendingDocument>,
    pub employee_id: Option<i64>,
}

pub struct OfficeApp {
    state: AppState,
    runtime: Handle,
    poll_interval: Duration,
    command_sender: mpsc::Sender<ApiCommand>,
    event_receiver: mpsc::Receiver<ApiEvent>,
}

impl OfficeApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        runtime: Handle,
        poll_interval: Duration,
        command_sender: mpsc::Sender<ApiCommand>,
        event_receiver: mpsc::Receiver<ApiEvent>,
        startup: Startup,
    ) -> Self {
        install_fonts(&cc.egui_ctx);

        let mut app = Self {
            state: AppState::new(),
            runtime,
            poll_interval,
            command_sender,
            event_receiver,
        };

        if let Some(request) = startup.document {
            app.state.document_input = request.document_id.to_string();
            app.state.version_input = request
                .version
                .map(|version| version.to_string())
                .unwrap_or_default();
            app.request_document(request);
        }
        if let Some(employee_id) = startup.employee_id {
            app.state.employee_input = employee_id.to_string();
            app.open_chat(employee_id);
        }

        app
    }

    fn send_command(&self, command: ApiCommand) {
        if let Err(err) = self.command_sender.try_send(command) {
            log::warn!("Failed to send command to network: {err}");
        }
    }

    fn request_document(&mut self, request: PendingDocument) {
        for command in self.state.request_document(request) {
            self.send_command(command);
        }
    }

    fn open_chat(&mut self, employee_id: i64) {
        self.state.chat.mount(
            employee_id,
            &self.runtime,
            self.poll_interval,
            self.command_sender.clone(),
        );
    }

    fn handle_api_events(&mut self) {
        while let Ok(event) = self.event_receiver.try_recv() {
            match event {
                ApiEvent::ContentLoaded { .. } | ApiEvent::VersionsLoaded { .. } => {
                    for command in self.state.route_document_event(event) {
                        self.send_command(command);
                    }
                }
                other => {
                    if let Some(command) = self.state.chat.apply(other) {
                        self.send_command(command);
                    }
                }
            }
        }
    }

    fn render_identity_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Document #");
            ui.add(egui::TextEdit::singleline(&mut self.state.document_input).desired_width(60.0));
            ui.label("Version");
            ui.add(
                egui::TextEdit::singleline(&mut self.state.version_input)
                    .hint_text("current")
                    .desired_width(60.0),
            );
            if ui.button("Open").clicked() {
                match self.state.parse_document_request() {
                    Some(request) => self.request_document(request),
                    None => log::warn!(
                        "Ignoring document request `{}` / `{}`",
                        self.state.document_input,
                        self.state.version_input
                    ),
                }
            }

            ui.separator();

            ui.label("Employee #");
            ui.add(egui::TextEdit::singleline(&mut self.state.employee_input).desired_width(60.0));
            if ui.button("Open chat").clicked() {
                match self.state.parse_employee() {
                    Some(employee_id) => self.open_chat(employee_id),
                    None => log::warn!("Ignoring employee id `{}`", self.state.employee_input),
                }
            }
            if ui
                .add_enabled(self.state.chat.is_polling(), egui::Button::new("Close chat"))
                .clicked()
            {
                self.state.chat.unmount();
            }
        });
    }
}

impl eframe::App for OfficeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_api_events();

        egui::TopBottomPanel::top("identity_bar").show(ctx, |ui| {
            self.render_identity_bar(ui);
        });

        egui::SidePanel::right("chat_panel")
            .resizable(true)
            .default_width(340.0)
            .show(ctx, |ui| {
                if chat_panel::render(ui, &mut self.state.chat) {
                    if let Some(command) = self.state.chat.submit() {
                        self.send_command(command);
                    }
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.pending_document.is_some() && self.state.viewer.document.is_none() {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading document...");
                });
                return;
            }

            if let Some(choice) = document_viewer::render(ui, &mut self.state.viewer) {
                if let Some(command) = self.state.viewer.select(choice) {
                    self.send_command(command);
                }
            }
        });

        chat_panel::render_alert(ctx, &mut self.state.chat);

        ctx.request_repaint_after(Duration::from_millis(250));
    }
}

/// Registers the serif family used by Word documents. It reuses the
/// proportional fonts since no serif face is bundled.
fn install_fonts(ctx: &egui::Context) {
    let mut fonts = egui::FontDefinitions::default();
    let proportional = fonts
        .families
        .get(&egui::FontFamily::Proportional)
        .cloned()
        .unwrap_or_default();
    fonts.families.insert(
        egui::FontFamily::Name(html_view::SERIF_FAMILY.into()),
        proportional,
    );
    ctx.set_fonts(fonts);
}
