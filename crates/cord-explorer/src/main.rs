mod bootstrap;
mod report;

use anyhow::Result;
use explorer_core::settings::Settings;
use explorer_ui::App;

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    let log_file = bootstrap::log_file_path(settings.log_file.as_ref(), settings.is_dashboard());
    bootstrap::setup_logging(&settings.log_level, log_file.as_deref())?;

    tracing::info!("CORD-19 Explorer v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Mode: {}, Data: {}, Theme: {}",
        settings.mode,
        settings.data.display(),
        settings.theme
    );

    if settings.is_dashboard() {
        let mut app = App::new(&settings.theme, settings.data.clone());
        app.load(false);
        app.run()?;
    } else {
        let stdout = std::io::stdout();
        report::run(&settings, &mut stdout.lock())?;
    }

    Ok(())
}
