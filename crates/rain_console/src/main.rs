mod app;
mod cli;
mod commands;
mod effects;
mod logging;
mod persistence;
mod render;

use std::io;

use anyhow::Context;
use clap::Parser;
use rain_engine::EngineHandle;
use rain_logging::rain_info;

use crate::app::{Console, Flow};
use crate::cli::Cli;
use crate::effects::EffectRunner;
use crate::persistence::RecentStore;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::initialize(cli.log, cli.log_level, &cli.state_dir);

    let settings = cli.client_settings();
    rain_info!(
        "Starting rain console base_url={} state_dir={:?}",
        settings.base_url,
        cli.state_dir
    );
    let engine = EngineHandle::new(&settings)
        .with_context(|| format!("cannot use backend url {}", settings.base_url))?;

    let store = RecentStore::new(&cli.state_dir);
    let restored = store.load();
    let interactive = cli.exec.is_empty();
    if interactive {
        println!(
            "Rain console connected to {}. Type `help` for commands.",
            settings.base_url
        );
    }

    let stdout = io::stdout();
    let mut console = Console::new(
        EffectRunner::new(engine, Some(store)),
        stdout.lock(),
        cli.settle_timeout(),
    );
    console.restore_recent(restored);

    if interactive {
        return console.run(io::stdin().lock());
    }
    for line in &cli.exec {
        if console.execute_line(line)? == Flow::Quit {
            break;
        }
    }
    Ok(())
}
