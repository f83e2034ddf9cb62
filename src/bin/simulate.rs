use chrono::{SecondsFormat, Utc};
use clap::Parser;
use maze_chase_engine::{
    Direction, EngineConfig, EngineResult, GameEvent, GameSimulation, Snapshot,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[arg(long, default_value_t = 600)]
    ticks: u64,
    #[arg(long)]
    seed: Option<u64>,
    /// Comma separated `tick:action` pairs, e.g. `0:right,30:up,45:jump`.
    #[arg(long)]
    inputs: Option<String>,
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    run_id: Option<String>,
    #[arg(long)]
    summary_out: Option<PathBuf>,
    /// Pace ticks at the configured tick rate instead of running flat out.
    #[arg(long)]
    realtime: bool,
    /// Print a snapshot line every N ticks; 0 prints none.
    #[arg(long, default_value_t = 60)]
    snapshot_every: u64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum InputAction {
    Turn(Direction),
    Jump,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct ScriptedInput {
    tick: u64,
    action: InputAction,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
struct EventTally {
    #[serde(rename = "pelletsEaten")]
    pellets_eaten: usize,
    #[serde(rename = "powerUpsEaten")]
    power_ups_eaten: usize,
    catches: usize,
}

#[derive(Clone, Debug, Serialize)]
struct RunSummary {
    #[serde(rename = "runId")]
    run_id: String,
    seed: u64,
    #[serde(rename = "generatedAtIso")]
    generated_at_iso: String,
    #[serde(rename = "startedAtMs")]
    started_at_ms: u64,
    #[serde(rename = "finishedAtMs")]
    finished_at_ms: u64,
    ticks: u64,
    #[serde(rename = "simulatedMs")]
    simulated_ms: u64,
    score: u32,
    cleared: bool,
    #[serde(rename = "pelletsLeft")]
    pellets_left: usize,
    #[serde(rename = "powerUpsLeft")]
    power_ups_left: usize,
    #[serde(flatten)]
    tally: EventTally,
}

#[derive(Clone, Debug, Serialize)]
struct StructuredLogLine {
    #[serde(rename = "timestampMs")]
    timestamp_ms: u64,
    level: String,
    event: String,
    #[serde(rename = "runId")]
    run_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    tick: Option<u64>,
    details: Value,
}

/// Feeds scripted inputs into the simulation and keeps the run's bookkeeping.
struct Runner {
    sim: GameSimulation,
    script: Vec<ScriptedInput>,
    next_input: usize,
    snapshot_every: u64,
    tally: EventTally,
    run_id: String,
}

impl Runner {
    fn step(&mut self) -> EngineResult<Snapshot> {
        let tick = self.sim.tick_count();
        while let Some(input) = self.script.get(self.next_input) {
            if input.tick > tick {
                break;
            }
            match input.action {
                InputAction::Turn(direction) => self.sim.change_intended_direction(direction),
                InputAction::Jump => {
                    if !self.sim.request_jump() {
                        emit_log(
                            "warn",
                            "jump_ignored",
                            &self.run_id,
                            Some(tick),
                            json!({ "height": self.sim.player().position.height }),
                        );
                    }
                }
            }
            self.next_input += 1;
        }

        self.sim.tick()?;
        let snapshot = self.sim.snapshot(true);
        self.record(&snapshot);
        if self.snapshot_every > 0 && snapshot.tick % self.snapshot_every == 0 {
            match serde_json::to_string(&snapshot) {
                Ok(line) => println!("{line}"),
                Err(error) => emit_log(
                    "error",
                    "snapshot_serialize_failed",
                    &self.run_id,
                    Some(snapshot.tick),
                    json!({ "error": error.to_string() }),
                ),
            }
        }
        Ok(snapshot)
    }

    fn record(&mut self, snapshot: &Snapshot) {
        for event in &snapshot.events {
            match event {
                GameEvent::PelletEaten { .. } => self.tally.pellets_eaten += 1,
                GameEvent::PowerUpEaten { .. } => self.tally.power_ups_eaten += 1,
                GameEvent::PlayerCaught { ghost_id } => {
                    self.tally.catches += 1;
                    emit_log(
                        "info",
                        "player_caught",
                        &self.run_id,
                        Some(snapshot.tick),
                        json!({ "ghostId": ghost_id, "score": snapshot.score }),
                    );
                }
                GameEvent::BoardCleared => emit_log(
                    "info",
                    "board_cleared",
                    &self.run_id,
                    Some(snapshot.tick),
                    json!({ "score": snapshot.score }),
                ),
            }
        }
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let started_at_ms = now_ms();
    let seed = cli.seed.unwrap_or(started_at_ms);
    let run_id = cli
        .run_id
        .clone()
        .unwrap_or_else(|| default_run_id(seed, started_at_ms));

    let setup = load_config(cli.config.as_deref())
        .and_then(|config| GameSimulation::seeded(config, seed))
        .map_err(|error| error.to_string())
        .and_then(|sim| {
            let script = match cli.inputs.as_deref() {
                Some(text) => parse_inputs(text)?,
                None => Vec::new(),
            };
            Ok((sim, script))
        });
    let (mut sim, script) = match setup {
        Ok(setup) => setup,
        Err(error) => {
            emit_log(
                "error",
                "setup_failed",
                &run_id,
                None,
                json!({ "error": error }),
            );
            std::process::exit(2);
        }
    };

    emit_log(
        "info",
        "run_started",
        &run_id,
        None,
        json!({
            "seed": seed,
            "ticks": cli.ticks,
            "tickRate": sim.config().tick_rate,
            "inputs": script.len(),
            "realtime": cli.realtime,
        }),
    );

    sim.start();
    let mut runner = Runner {
        sim,
        script,
        next_input: 0,
        snapshot_every: cli.snapshot_every,
        tally: EventTally::default(),
        run_id: run_id.clone(),
    };
    let outcome = if cli.realtime {
        run_realtime(&mut runner, cli.ticks).await
    } else {
        run_flat_out(&mut runner, cli.ticks)
    };
    if let Err(error) = outcome {
        emit_log(
            "error",
            "engine_fault",
            &run_id,
            Some(runner.sim.tick_count()),
            json!({ "error": error.to_string(), "fatal": error.is_fatal() }),
        );
        std::process::exit(1);
    }

    let summary = build_run_summary(&mut runner, seed, started_at_ms, now_ms());
    let mut summary_out_written: Option<String> = None;
    if let Some(path) = cli.summary_out.as_ref() {
        if let Err(error) = write_summary(path, &summary) {
            emit_log(
                "error",
                "summary_write_failed",
                &run_id,
                None,
                json!({
                    "path": path.to_string_lossy(),
                    "error": error.to_string(),
                }),
            );
            std::process::exit(2);
        }
        summary_out_written = Some(path.to_string_lossy().to_string());
    }

    emit_log(
        "info",
        "run_finished",
        &run_id,
        Some(summary.ticks),
        json!({
            "score": summary.score,
            "cleared": summary.cleared,
            "catches": summary.tally.catches,
            "summaryOut": summary_out_written,
        }),
    );
}

fn run_flat_out(runner: &mut Runner, ticks: u64) -> EngineResult<()> {
    for _ in 0..ticks {
        runner.step()?;
        if runner.sim.is_cleared() {
            break;
        }
    }
    Ok(())
}

async fn run_realtime(runner: &mut Runner, ticks: u64) -> EngineResult<()> {
    let period = Duration::from_secs_f64(runner.sim.config().tick_seconds());
    let mut interval = tokio::time::interval(period);
    for _ in 0..ticks {
        interval.tick().await;
        runner.step()?;
        if runner.sim.is_cleared() {
            break;
        }
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> EngineResult<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load(path),
        None => Ok(EngineConfig::default()),
    }
}

/// Parses `tick:action` pairs. Actions are a direction name or `jump`.
/// The result is ordered by tick; pairs on the same tick keep their order.
fn parse_inputs(text: &str) -> Result<Vec<ScriptedInput>, String> {
    let mut inputs = Vec::new();
    for entry in text.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
        let Some((tick, action)) = entry.split_once(':') else {
            return Err(format!("input `{entry}` is not tick:action"));
        };
        let tick = tick
            .trim()
            .parse::<u64>()
            .map_err(|error| format!("input `{entry}` has a bad tick: {error}"))?;
        let action = match action.trim().to_ascii_lowercase().as_str() {
            "jump" => InputAction::Jump,
            other => InputAction::Turn(
                other
                    .parse::<Direction>()
                    .map_err(|error| format!("input `{entry}`: {error}"))?,
            ),
        };
        inputs.push(ScriptedInput { tick, action });
    }
    inputs.sort_by_key(|input| input.tick);
    Ok(inputs)
}

fn default_run_id(seed: u64, timestamp_ms: u64) -> String {
    format!("sim-{seed}-{timestamp_ms}")
}

fn build_run_summary(
    runner: &mut Runner,
    seed: u64,
    started_at_ms: u64,
    finished_at_ms: u64,
) -> RunSummary {
    let snapshot = runner.sim.snapshot(false);
    RunSummary {
        run_id: runner.run_id.clone(),
        seed,
        generated_at_iso: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        started_at_ms,
        finished_at_ms,
        ticks: snapshot.tick,
        simulated_ms: snapshot.now_ms,
        score: snapshot.score,
        cleared: runner.sim.is_cleared(),
        pellets_left: snapshot.pellets_left,
        power_ups_left: snapshot.power_ups_left,
        tally: runner.tally.clone(),
    }
}

fn emit_log(level: &str, event: &str, run_id: &str, tick: Option<u64>, details: Value) {
    let log_line = StructuredLogLine {
        timestamp_ms: now_ms(),
        level: level.to_string(),
        event: event.to_string(),
        run_id: run_id.to_string(),
        tick,
        details,
    };
    match serde_json::to_string(&log_line) {
        Ok(line) => eprintln!("{line}"),
        Err(error) => eprintln!("structured log failed to serialize: {error}"),
    }
}

fn now_ms() -> u64 {
    u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default()
}

fn write_summary(path: &Path, summary: &RunSummary) -> io::Result<()> {
    let summary_text = serde_json::to_string_pretty(summary).map_err(io::Error::other)?;
    std::fs::write(path, summary_text)
}
