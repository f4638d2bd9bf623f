use anyhow::Result;
use env_logger::Env;

use tweakgen::config::Config;
use tweakgen::pipeline;

fn main() -> Result<()> {
    let config = Config::from_args_and_env()?;

    env_logger::Builder::from_env(Env::default().default_filter_or(&config.log_level)).init();

    pipeline::run(&config)?;

    Ok(())
}
