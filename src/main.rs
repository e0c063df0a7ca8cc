use std::path::PathBuf;

use clap::{ArgAction, Parser};
use pointershim::script::Script;

#[derive(Parser, Debug)]
#[command(name = "pointershim")]
#[command(version, about = "Replay scripted mouse gestures through the pointer event shim")]
struct Cli {
    /// Gesture script to replay (TOML)
    script: PathBuf,

    /// Validate the script and exit without replaying
    #[arg(long, short = 'c', action = ArgAction::SetTrue)]
    check: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let script = Script::load(&cli.script)?;

    if cli.check {
        println!(
            "script ok: {} nodes, {} events",
            script.nodes.len(),
            script.events.len()
        );
        return Ok(());
    }

    log::info!("replaying {} events", script.events.len());
    for line in script.run()? {
        println!("{line}");
    }

    Ok(())
}
