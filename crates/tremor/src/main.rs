//! tremor-run: headless runner for the wave sandbox

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tremor::{render_report, Field, SimConfig, SimulationSession, TerrainSnapshot};

#[derive(Parser, Debug)]
#[command(name = "tremor-run")]
#[command(about = "Run the P/S wave sandbox without a display")]
#[command(version)]
struct Args {
    /// Snapshot JSON to load (mediumGrid + origins)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Grid rows
    #[arg(long, default_value = "100")]
    rows: usize,

    /// Grid columns
    #[arg(long, default_value = "100")]
    cols: usize,

    /// Origin as x,y,mag (repeatable)
    #[arg(long = "origin", value_parser = parse_origin)]
    origins: Vec<(usize, usize, f64)>,

    /// Seismograph as x,y (repeatable)
    #[arg(long = "probe", value_parser = parse_probe)]
    probes: Vec<(usize, usize)>,

    /// Simulated seconds to run
    #[arg(long, default_value = "2")]
    seconds: f64,

    /// Frame rate driving the fixed-step clock
    #[arg(long, default_value = "60")]
    fps: f64,

    /// Skip the reflective border on a fresh grid
    #[arg(long)]
    no_border: bool,

    /// Write the final frame as PPM
    #[arg(long)]
    frame: Option<PathBuf>,

    /// Write the terrain snapshot as JSON
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Write a text report (prints to stdout when omitted)
    #[arg(long)]
    report: Option<PathBuf>,
}

fn parse_origin(s: &str) -> Result<(usize, usize, f64)> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        anyhow::bail!("Expected x,y,mag but got: {}", s);
    }
    Ok((
        parts[0].parse().with_context(|| format!("Bad x in {}", s))?,
        parts[1].parse().with_context(|| format!("Bad y in {}", s))?,
        parts[2].parse().with_context(|| format!("Bad magnitude in {}", s))?,
    ))
}

fn parse_probe(s: &str) -> Result<(usize, usize)> {
    let (x, y) = s
        .split_once(',')
        .with_context(|| format!("Expected x,y but got: {}", s))?;
    Ok((
        x.trim().parse().with_context(|| format!("Bad x in {}", s))?,
        y.trim().parse().with_context(|| format!("Bad y in {}", s))?,
    ))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    if !(args.fps.is_finite() && args.fps > 0.0) {
        anyhow::bail!("--fps must be positive, got {}", args.fps);
    }

    // Load or build terrain
    let snapshot = match &args.input {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read snapshot: {:?}", path))?;
            Some(TerrainSnapshot::from_json(&json)
                .with_context(|| format!("Failed to parse snapshot: {:?}", path))?)
        }
        None => None,
    };

    let config = SimConfig::with_dimensions(args.rows, args.cols);
    let mut session = SimulationSession::new(config).context("Invalid configuration")?;

    match &snapshot {
        Some(snapshot) => {
            let report = session.apply_snapshot(snapshot)?;
            info!(
                "Loaded {} origins ({} dropped), {} cells defaulted",
                report.loaded_origins, report.dropped_origins, report.defaulted_cells
            );
        }
        None if !args.no_border => {
            let border = session
                .catalog()
                .reflective_id()
                .context("Catalog has no reflective medium")?;
            session.fill_border(border)?;
        }
        None => {}
    }

    for &(x, y, mag) in &args.origins {
        session
            .add_origin(x, y, mag)
            .with_context(|| format!("Cannot place origin at ({}, {})", x, y))?;
    }
    for &(x, y) in &args.probes {
        session
            .add_probe(x, y)
            .with_context(|| format!("Cannot place seismograph at ({}, {})", x, y))?;
    }

    // Run
    session.start().context("Cannot start simulation")?;
    let frame_dt = 1.0 / args.fps;
    let frames = (args.seconds * args.fps).round().max(0.0) as usize;
    for _ in 0..frames {
        session.advance(frame_dt)?;
    }
    info!(
        "Ran {} ticks over {} frames, peak P displacement {:.4}",
        session.ticks(),
        frames,
        session.fields().peak_abs(Field::PDisplacement)
    );

    // Outputs
    if let Some(path) = &args.frame {
        session
            .render_frame()
            .write_ppm(path)
            .with_context(|| format!("Failed to write frame: {:?}", path))?;
    }

    if let Some(path) = &args.snapshot {
        let json = session.snapshot().to_json()?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write snapshot: {:?}", path))?;
        info!("Wrote snapshot to {:?}", path);
    }

    let title = match &args.input {
        Some(path) => format!("Input: {}", path.display()),
        None => "Input: blank grid".to_string(),
    };
    let report = render_report(&session, &title).context("Report rendering failed")?;
    match &args.report {
        Some(path) => {
            fs::write(path, &report)
                .with_context(|| format!("Failed to write report: {:?}", path))?;
            info!("Wrote report to {:?}", path);
        }
        None => println!("{}", report),
    }

    Ok(())
}
