use anyhow::Context;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use course_explorer::config::AppConfig;
use course_explorer::onboarding::OnboardingFlag;
use course_explorer::store;
use course_explorer::ui::cli::{self, HELP, StdoutRenderer};
use course_explorer::ui::Controller;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("Invalid configuration")?;

    // Keep the guard alive so buffered file logs are flushed on exit.
    let _log_guard = init_tracing(&config);

    eprintln!("📚 Course Explorer v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Store: {} ({})", config.store_name, config.backend);
    eprintln!("   Data: {}", config.data_dir.display());
    eprintln!("   {HELP}\n");

    let store = store::open_store(&config)
        .await
        .with_context(|| format!("Failed to open {} store", config.backend))?;

    let flag = OnboardingFlag::new(store);
    tracing::info!(onboarding_completed = flag.current(), "Preferences loaded");

    let controller = Controller::new(flag);
    let mut renderer = StdoutRenderer;
    let last_screen = controller.run(cli::stdin_actions(), &mut renderer).await;

    tracing::debug!(screen = %last_screen, "Exiting");
    Ok(())
}

/// Logs go to stderr (views own stdout) and, when configured, to a
/// daily-rolling file.
fn init_tracing(config: &AppConfig) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "course-explorer.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .with(file_layer)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .init();
            None
        }
    }
}
