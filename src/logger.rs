use tracing_subscriber::{EnvFilter, FmtSubscriber};

const LOG_ENV: &str = "LOGPLAYER_LOG";
const FALLBACK_LOG_ENV: &str = "RUST_LOG";

pub fn init_logging(verbose: bool, no_color: bool) {
    let directive = filter_directive(
        std::env::var(LOG_ENV).ok(),
        std::env::var(FALLBACK_LOG_ENV).ok(),
        verbose,
    );
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|err| {
        eprintln!("Ignoring invalid log filter '{}': {}", directive, err);
        EnvFilter::new(default_level(verbose))
    });

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_ansi(!no_color)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set global default subscriber: {}", err);
    }
}

/// First non-blank of `LOGPLAYER_LOG`, then `RUST_LOG`, then the level
/// implied by `--verbose`.
fn filter_directive(app_env: Option<String>, fallback_env: Option<String>, verbose: bool) -> String {
    [app_env, fallback_env]
        .into_iter()
        .flatten()
        .find(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default_level(verbose).to_owned())
}

const fn default_level(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}
