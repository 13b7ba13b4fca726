mod common;
mod config;
mod network;
mod ui;

use clap::Parser;
use dotenvy::dotenv;
use network::{ApiClient, HttpOfficeApi};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use ui::OfficeApp;
use ui::app::Startup;
use ui::state::PendingDocument;

#[derive(Parser)]
#[command(
    name = "virtual_office_client",
    version,
    about = "Virtual office document viewer and employee chat"
)]
struct Cli {
    /// Path to JSON config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH, value_name = "FILE")]
    config: String,
    /// Shared-drive document to open
    #[arg(long)]
    document_id: Option<i64>,
    /// Historical version of the document (defaults to current)
    #[arg(long)]
    version: Option<i64>,
    /// Employee whose chat to open
    #[arg(long)]
    employee_id: Option<i64>,
}

#[tokio::main]
async fn main() -> Result<(), eframe::Error> {
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let mut app_config = config::load_config(&cli.config);
    app_config.apply_env_overrides();

    let document_id = cli.document_id.or(app_config.document_id);
    let startup = Startup {
        document: document_id.map(|document_id| PendingDocument {
            document_id,
            version: cli.version.or(app_config.document_version),
        }),
        employee_id: cli.employee_id.or(app_config.employee_id),
    };

    let api = match HttpOfficeApi::new(app_config.routes(), app_config.request_timeout()) {
        Ok(api) => api,
        Err(err) => {
            log::error!("Failed to build HTTP client: {err}");
            return Ok(());
        }
    };

    // UI -> network
    let (cmd_tx, cmd_rx) = mpsc::channel(100);
    // network -> UI
    let (event_tx, event_rx) = mpsc::channel(100);

    tokio::spawn(ApiClient::new(api, event_tx, cmd_rx).run());

    let options = eframe::NativeOptions::default();
    let mut event_rx = Some(event_rx);
    let runtime = Handle::current();
    let poll_interval = app_config.poll_interval();

    log::info!(
        "Backend at {} (polling every {poll_interval:?})",
        app_config.api_origin
    );

    eframe::run_native(
        "Virtual Office",
        options,
        Box::new(move |cc| {
            let event_receiver = event_rx
                .take()
                .expect("OfficeApp should only be initialized once");

            Ok(Box::new(OfficeApp::new(
                cc,
                runtime.clone(),
                poll_interval,
                cmd_tx.clone(),
                event_receiver,
                startup,
            )))
        }),
    )
}
