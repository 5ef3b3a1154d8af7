use anyhow::{Context, Result};
use electricien_cms::core::config::Config;
use electricien_cms::core::state::AppState;
use electricien_cms::core::tracing_init::init_tracing;
use std::env;
use std::path::PathBuf;
use tracing::info;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    let config_path = if args.len() > 1 {
        PathBuf::from(&args[1])
    } else {
        PathBuf::from("config.toml")
    };

    // Load and validate configuration
    let config = Config::from_file(&config_path).context(format!(
        "Failed to load configuration from '{}'. \
        If this is your first run, copy config.example.toml to config.toml and adjust the values.",
        config_path.display()
    ))?;

    init_tracing(&config.logging);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build Tokio runtime")?;

    runtime.block_on(async_main(config, config_path))
}

async fn async_main(config: Config, config_path: PathBuf) -> Result<()> {
    info!(
        config_path = %config_path.display(),
        backend = ?config.storage.backend,
        namespace = %config.storage.namespace,
        log_level = %config.logging.level,
        log_format = %config.logging.format,
        "Electricien CMS starting"
    );

    let state = AppState::open(config).context("Failed to open application state")?;

    let stats = state.stats();
    info!(
        resources = stats.total_resources,
        visible_resources = stats.visible_resources,
        courses = stats.total_courses,
        visible_courses = stats.visible_courses,
        categories = stats.total_categories,
        users = stats.total_users,
        dangling_resources = state.dangling_resources().len(),
        authenticated = state.auth.is_authenticated(),
        "Electricien CMS startup complete"
    );

    println!(
        "{}",
        serde_json::to_string_pretty(&stats).context("Failed to render dashboard stats")?
    );

    Ok(())
}
