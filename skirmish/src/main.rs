use std::path::PathBuf;

use ai::GreedyActor;
use anyhow::{Result, bail};
use arena::display_turn_outcome;
use clap::{Parser, Subcommand};
use color_print::cprintln;
use script::{DEFAULT_SCRIPT, ScriptActor};
use settings::Settings;
use skirmish_core::TurnActor;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod ai;
mod arena;
mod script;
mod settings;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play out the demo skirmish
    Skirmish {
        #[arg(short, long)]
        /// Dice seed, for replaying a fight
        seed: Option<u64>,
        #[arg(short, long)]
        /// Stop after this many rounds
        rounds: Option<u32>,
        #[arg(long)]
        /// Rhai script driving the heroes
        script: Option<PathBuf>,
        #[arg(long, default_value_t = false)]
        /// Print outcomes as JSON lines
        json: bool,
    },

    /// Print the default hero script
    DefaultScript,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skirmish=info,skirmish_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    match args.command {
        Commands::Skirmish {
            seed,
            rounds,
            script,
            json,
        } => {
            let settings = Settings::load()?;
            let seed = seed.or(settings.seed).unwrap_or_else(rand::random);
            let max_rounds = rounds.unwrap_or(settings.max_rounds);
            if max_rounds == 0 {
                bail!("At least one round must be played");
            }
            info!(seed, max_rounds, "starting skirmish");

            let hero_script = script
                .or(settings.script)
                .map(|path| ScriptActor::from_file(&path))
                .transpose()?;

            let heroes = || -> Box<dyn TurnActor> {
                match &hero_script {
                    Some(actor) => Box::new(actor.clone()),
                    None => Box::new(GreedyActor),
                }
            };
            let monsters = || -> Box<dyn TurnActor> { Box::new(GreedyActor) };

            let demo = arena::demo(seed, heroes, monsters)?;
            let encounter = arena::run(demo, max_rounds, |outcome| {
                if json {
                    println!("{}", serde_json::to_string(outcome)?);
                } else {
                    display_turn_outcome(outcome);
                }
                Ok(())
            })?;

            if !json {
                let survivors: Vec<&str> = encounter
                    .creatures()
                    .filter(|creature| creature.is_alive())
                    .map(|creature| creature.name.as_str())
                    .collect();
                cprintln!("<bold>Still standing:</> {}", survivors.join(", "));
            }
        }
        Commands::DefaultScript => {
            print!("{}", DEFAULT_SCRIPT.trim_start());
        }
    }

    Ok(())
}
