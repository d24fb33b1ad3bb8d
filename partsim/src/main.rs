use partsim::{ScenarioConfig, Scenario};
use partsim::{run_headless, bench_step};

use clap::Parser;
use anyhow::{Context, Result};
use log::info;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    /// Scenario file under `scenarios/`
    #[arg(short, long, default_value = "drop_on_floor.yaml")]
    file_name: String,

    /// Override the number of frames
    #[arg(long)]
    frames: Option<u64>,

    /// Override the frame step in seconds
    #[arg(long)]
    dt: Option<f64>,

    /// Run the step benchmark instead of a scenario
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(args: &Args) -> Result<ScenarioConfig> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(&args.file_name);
    let file = File::open(&config_path).with_context(|| format!("opening {}", config_path.display()))?;
    let mut scenario_cfg = ScenarioConfig::from_reader(BufReader::new(file))?;

    if let Some(frames) = args.frames {
        scenario_cfg.engine.frames = frames;
    }
    if let Some(dt) = args.dt {
        scenario_cfg.engine.dt = dt;
    }

    Ok(scenario_cfg)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if args.bench {
        bench_step();
        return Ok(());
    }

    let scenario_cfg = load_scenario_from_yaml(&args)?;
    let mut scenario = Scenario::build_scenario(scenario_cfg)?;

    let summary = run_headless(&mut scenario);
    info!(
        "done: {} frames, t = {:.3}, {} colliding pairs, {} plane stops, y in [{:.3}, {:.3}]",
        summary.frames, summary.t, summary.colliding_pairs, summary.stopped, summary.min_y, summary.max_y
    );

    Ok(())
}
