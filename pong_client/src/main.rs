//! Terminal pong client.
//!
//! Usage:
//!   cargo run -p pong_client -- [--addr 127.0.0.1:40000] [--name ada]
//!       [--config pong.json] [--profile .pong_profile.json] [--seed 7] [--solo]
//!
//! Connects to the relay, logs in and plays a match driven by console
//! commands. With `--solo` it plays the computer locally instead.
//!
//! Console commands:
//!   up / down / stop    - Move the paddle
//!   space               - Start the match (or restart after game over)
//!   name <name>         - Change and remember the display name
//!   status              - Show match status
//!   quit                - Leave and exit

use std::env;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use pong_client::{
    console::{self, Command, KeyDriver},
    profile,
    solo::SoloSession,
    PongClient,
};
use pong_shared::{config::PongConfig, render::NullRenderer};
use tokio::{sync::mpsc, time};
use tracing::info;

const DEFAULT_PROFILE: &str = ".pong_profile.json";

struct Args {
    cfg: PongConfig,
    profile: PathBuf,
    solo: bool,
}

fn parse_args() -> anyhow::Result<Args> {
    let args: Vec<String> = env::args().collect();

    // The config file is the base layer; every other flag overrides it.
    let mut cfg = match args.iter().position(|a| a == "--config") {
        Some(i) if i + 1 < args.len() => PongConfig::load(Path::new(&args[i + 1]))?,
        _ => PongConfig::default(),
    };
    let mut profile = PathBuf::from(DEFAULT_PROFILE);
    let mut name = None;
    let mut solo = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--addr" if i + 1 < args.len() => {
                cfg.relay_addr = args[i + 1].clone();
                i += 2;
            }
            "--name" if i + 1 < args.len() => {
                name = Some(args[i + 1].clone());
                i += 2;
            }
            "--profile" if i + 1 < args.len() => {
                profile = PathBuf::from(&args[i + 1]);
                i += 2;
            }
            "--seed" if i + 1 < args.len() => {
                cfg.seed = Some(args[i + 1].parse().context("parse --seed")?);
                i += 2;
            }
            "--config" => i += 2,
            "--solo" => {
                solo = true;
                i += 1;
            }
            _ => i += 1,
        }
    }

    match name {
        Some(name) => cfg.player_name = name,
        None => {
            if let Some(remembered) = profile::load_name(&profile) {
                cfg.player_name = remembered;
            }
        }
    }

    Ok(Args { cfg, profile, solo })
}

fn spawn_console_reader() -> mpsc::Receiver<String> {
    let (console_tx, console_rx) = mpsc::channel::<String>(32);
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();
        loop {
            print!("] ");
            let _ = stdout.flush();
            let mut line = String::new();
            match stdin.lock().read_line(&mut line) {
                Ok(0) | Err(_) => break,
                Ok(_) => {}
            }
            let line = line.trim().to_string();
            if !line.is_empty() && console_tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    console_rx
}

async fn run_solo(cfg: PongConfig, mut console_rx: mpsc::Receiver<String>) -> anyhow::Result<()> {
    let mut frame = time::interval(cfg.frame_interval());
    frame.set_missed_tick_behavior(time::MissedTickBehavior::Skip);
    let mut game = SoloSession::new(cfg);
    let mut input = KeyDriver::default();
    let mut renderer = NullRenderer;

    println!("Solo match. Type 'space' to serve, 'quit' to exit.");
    loop {
        tokio::select! {
            _ = frame.tick() => {
                game.frame(Instant::now(), &input.keys);
                input.end_frame();
                game.draw_frame(&mut renderer);
            }
            line = console_rx.recv() => {
                let Some(line) = line else { break };
                match console::parse(&line) {
                    Some(Command::Quit) => break,
                    Some(Command::Status) => {
                        println!("State: {:?}", game.state());
                        println!("Score: {} - {}", game.scores.player, game.scores.opponent);
                    }
                    Some(cmd) => {
                        if !input.apply(&cmd) {
                            println!("Not available in solo mode: {line}");
                        }
                    }
                    None => {}
                }
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let Args { cfg, profile, solo } = parse_args()?;
    let console_rx = spawn_console_reader();

    if solo {
        info!(seed = ?cfg.seed, "Starting solo match");
        return run_solo(cfg, console_rx).await;
    }

    info!(relay = %cfg.relay_addr, name = %cfg.player_name, "Starting client");
    let mut client = PongClient::connect(cfg)
        .await
        .context("connect")?
        .with_profile(profile);
    client.login().await?;

    println!("Waiting for an opponent. Type 'status' for info, 'quit' to exit.");
    println!();

    client.run(console_rx, &mut NullRenderer).await?;
    println!("Disconnected from relay.");
    Ok(())
}
