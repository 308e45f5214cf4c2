//! scenario-runner: drive a headless Brick'n'Balls session from a JSON script.
//!
//! Usage:
//!   scenario-runner run scenarios/single_shot.json
//!   scenario-runner run scenarios/single_shot.json --every-frame
//!   scenario-runner config

use std::path::{Path, PathBuf};
use std::process;

use glam::Vec3;
use hecs::Entity;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use bricknballs_core::commands::PlayerCommand;
use bricknballs_core::enums::ContactKind;
use bricknballs_core::state::GameStateSnapshot;
use bricknballs_sim::error::ConfigError;
use bricknballs_sim::world_setup::SessionEntities;
use bricknballs_sim::{ContactPair, SimConfig, SimulationEngine};

#[derive(Debug, Error)]
enum RunnerError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),
    #[error("frame {frame}: unknown entity name '{name}'")]
    UnknownEntity { frame: usize, name: String },
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A scripted session: a config plus the frames to feed the engine.
#[derive(Debug, Deserialize)]
struct Scenario {
    #[serde(default)]
    config: SimConfig,
    #[serde(default)]
    frames: Vec<Frame>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Frame {
    /// Commands queued before the tick.
    commands: Vec<PlayerCommand>,
    /// Teleport the session ball before detection, standing in for physics motion.
    ball_position: Option<Vec3>,
    /// Contacts reported for the frame's physics step.
    contacts: Vec<NamedContact>,
    /// Run the frame this many times (0 behaves like 1).
    repeat: usize,
}

/// Contact between two named session entities.
///
/// Names: `ball`, `launcher`, `out_of_bounds`, `wall:<i>`, `brick:<row>:<column>`.
#[derive(Debug, Deserialize)]
struct NamedContact {
    kind: ContactKind,
    a: String,
    b: String,
}

fn main() {
    init_logging();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "run" => match args.get(2) {
            Some(path) => {
                let every_frame = args[3..].iter().any(|a| a == "--every-frame");
                cmd_run(Path::new(path), every_frame)
            }
            None => {
                print_usage();
                process::exit(1);
            }
        },
        "config" => cmd_config(),
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    };

    if let Err(err) = result {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("bricknballs_sim=info,bricknballs_rules=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .init();
}

fn print_usage() {
    eprintln!(
        "scenario-runner: headless Brick'n'Balls session driver\n\
         \n\
         Commands:\n\
         \n\
         run <scenario.json>   Play the scripted frames, print the final snapshot\n\
         \n\
           --every-frame      Print every frame's snapshot instead\n\
         \n\
         config                Print the default session config as JSON\n\
         \n\
         Logging follows RUST_LOG (default: bricknballs_sim=info).\n"
    );
}

fn cmd_config() -> Result<(), RunnerError> {
    println!("{}", serde_json::to_string_pretty(&SimConfig::default())?);
    Ok(())
}

fn cmd_run(path: &Path, every_frame: bool) -> Result<(), RunnerError> {
    let scenario = load_scenario(path)?;
    info!(path = %path.display(), frames = scenario.frames.len(), "scenario loaded");

    let mut engine = SimulationEngine::new(scenario.config)?;
    let mut last = engine.snapshot();

    for (index, frame) in scenario.frames.iter().enumerate() {
        for _ in 0..frame.repeat.max(1) {
            last = play_frame(&mut engine, index, frame)?;
            if every_frame {
                println!("{}", serde_json::to_string(&last)?);
            }
        }
    }

    engine.shutdown();
    if !every_frame {
        println!("{}", serde_json::to_string_pretty(&last)?);
    }
    info!(
        score = last.score,
        shots_used = last.shots.used,
        bricks_remaining = last.bricks_remaining,
        phase = ?last.phase,
        "scenario finished"
    );
    Ok(())
}

fn load_scenario(path: &Path) -> Result<Scenario, RunnerError> {
    let text = std::fs::read_to_string(path).map_err(|source| RunnerError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| RunnerError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn play_frame(
    engine: &mut SimulationEngine,
    index: usize,
    frame: &Frame,
) -> Result<GameStateSnapshot, RunnerError> {
    engine.queue_commands(frame.commands.iter().cloned());

    if let Some(position) = frame.ball_position {
        let ball = engine.session().ball;
        if let Ok(mut transform) = engine
            .world_mut()
            .get::<&mut bricknballs_core::types::Transform>(ball)
        {
            transform.position = position;
        }
    }

    let contacts = frame
        .contacts
        .iter()
        .map(|contact| resolve_contact(engine.session(), index, contact))
        .collect::<Result<Vec<_>, _>>()?;
    debug!(frame = index, contacts = contacts.len(), "frame");

    Ok(engine.tick(&contacts))
}

fn resolve_contact(
    session: &SessionEntities,
    frame: usize,
    contact: &NamedContact,
) -> Result<ContactPair, RunnerError> {
    let a = resolve(session, frame, &contact.a)?;
    let b = resolve(session, frame, &contact.b)?;
    Ok(match contact.kind {
        ContactKind::Collision => ContactPair::collision(a, b),
        ContactKind::Trigger => ContactPair::trigger(a, b),
    })
}

fn resolve(session: &SessionEntities, frame: usize, name: &str) -> Result<Entity, RunnerError> {
    let unknown = || RunnerError::UnknownEntity {
        frame,
        name: name.to_string(),
    };

    let parts: Vec<&str> = name.split(':').collect();
    match parts.as_slice() {
        ["ball"] => Ok(session.ball),
        ["launcher"] => Ok(session.launcher),
        ["out_of_bounds"] => Ok(session.out_of_bounds),
        ["wall", i] => {
            let i: usize = i.parse().map_err(|_| unknown())?;
            session.walls.get(i).copied().ok_or_else(unknown)
        }
        ["brick", row, column] => {
            let row: u32 = row.parse().map_err(|_| unknown())?;
            let column: u32 = column.parse().map_err(|_| unknown())?;
            session.brick_at(row, column).ok_or_else(unknown)
        }
        _ => Err(unknown()),
    }
}
