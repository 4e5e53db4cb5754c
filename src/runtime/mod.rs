use clap::Parser;

mod cli;
mod commands;
mod player;
mod settings;

pub async fn run() -> anyhow::Result<()> {
    let args = cli::Args::parse();
    let settings = settings::load_settings();

    let _log_guard = match crate::logging::init_logging(&settings.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("cadenza: failed to initialize logging: {e:#}");
            None
        }
    };
    tracing::debug!(command = ?args.command, "starting");

    commands::run(args, settings).await
}
