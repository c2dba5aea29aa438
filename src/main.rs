use anyhow::Result;
use bhhub::cli::Cli;
use bhhub::config::Config;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Log to stderr, or to `<data dir>/bhhub.log` while the TUI owns the terminal.
fn init_logging(cli: &Cli) {
    let filter = EnvFilter::try_from_env("BHHUB_LOG")
        .unwrap_or_else(|_| EnvFilter::new(cli.output_mode().log_filter()));

    if cli.is_interactive() {
        let file = Config::data_dir().ok().and_then(|dir| {
            std::fs::create_dir_all(&dir).ok()?;
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(dir.join("bhhub.log"))
                .ok()
        });
        if let Some(file) = file {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        return;
    }

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);
    cli.run()
}
