use tracing::{info, warn};
use voting_tally::logging::init_logging;
use voting_tally::ui::TallyApp;
use voting_tally::{AppConfig, CounterEngine, DirectorySink, FileStore};

fn main() {
    let (config, config_error) = match AppConfig::default_path() {
        Some(path) => match AppConfig::load_from(&path) {
            Ok(config) => (config, None),
            Err(e) => (AppConfig::default(), Some(format!("{}: {}", path.display(), e))),
        },
        None => (AppConfig::default(), None),
    };

    init_logging(&config);
    if let Some(error) = config_error {
        warn!("Ignoring unreadable config file {}", error);
    }

    let store = FileStore::new(config.storage_path.clone());
    let sink = DirectorySink::new(config.export_dir.clone());
    info!("Snapshot file: {}", store.path().display());
    info!("Export directory: {}", sink.directory().display());

    let engine = CounterEngine::open(store);
    let pulse_duration = config.pulse_duration();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([460.0, 520.0])
            .with_title("Voting Tally"),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "Voting Tally",
        native_options,
        Box::new(move |_cc| Ok(Box::new(TallyApp::new(engine, sink, pulse_duration)))),
    ) {
        tracing::error!("Window closed with error: {}", e);
    }
}
