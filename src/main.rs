use multiwall::app::App;
use multiwall::config::Config;
use multiwall::logging::init_logging;
use multiwall::pipeline::desktop::prefers_dark_scheme;
use multiwall::widgets::theme::set_theme;

fn main() {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    let _guard = init_logging(config.resolved_log_dir().as_deref());
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting multiwall");

    set_theme(config.theme.resolve(prefers_dark_scheme));

    let picker = ratatui_image::picker::Picker::from_query_stdio().unwrap_or_else(|e| {
        tracing::warn!("failed to query terminal ({}), using fallback", e);
        ratatui_image::picker::Picker::from_fontsize((8, 16))
    });

    let mut app = App::new(config, Some(picker));
    if let Err(e) = app.run() {
        tracing::error!("{:#}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
