use siren_app::app::{run, AppConfig};

fn main() {
    tracing_subscriber::fmt::init();
    let config = AppConfig::from_env().unwrap_or_default();
    if let Err(err) = run(config) {
        eprintln!("Failed to start Siren monitor: {err}");
    }
}
