use std::process::ExitCode;

use clap::Parser;
use mission_engine::MissionEngine;

mod cli;
mod config;
mod logging;

use cli::Cli;
use config::AppConfig;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    logging::initialize(cli.log);

    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_env(|name| std::env::var(name).ok());
    let engine = MissionEngine::new(config.engine_config());

    let runtime = tokio::runtime::Runtime::new()?;
    let (success, output) = runtime.block_on(cli.command.run(&engine))?;
    println!("{output}");

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
