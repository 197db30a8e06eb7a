use anyhow::Result;
use clap::Parser;
use edutrack::cli::Cli;
use edutrack::settings::Settings;
use edutrack::shell::Shell;
use log::info;
use std::fs::File;
use std::io::{self, BufReader};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format_target(false)
        .init();

    let cli = Cli::parse();

    let settings = Settings::load(&cli.config)?;
    let store = edutrack::create_default_store(&settings, cli.dataset.as_deref())?;
    let mut shell = Shell::new(store, settings);

    match &cli.script {
        Some(path) => {
            info!("Running commands from {}", path.display());
            shell.run(BufReader::new(File::open(path)?), io::stdout())?;
        }
        None => shell.run(io::stdin().lock(), io::stdout())?,
    }

    Ok(())
}
