//! Raksha scenario runner
//!
//! Runs the scripted safety-override scenario headless: a velocity robot
//! chases randomized goals across an arena of disk obstacles under
//! partial observability, with the intervention controller supervising
//! every tick. Events stream to the log as JSON lines.
//!
//! Usage: `raksha [config.toml] [--ticks N]`

use std::path::Path;

use log::info;

use raksha::{
    Circle, LogSink, Obstacle, Obstaclescape, Point2, PointTracker, RakshaConfig, SafeSet,
    SafeSetPalette, SimulationContext, VelocityRobot2,
};

const DEFAULT_TICKS: usize = 2000;
const TICK_SECONDS: f64 = 0.05;

fn main() -> raksha::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    let config = if args.len() > 1 && !args[1].starts_with("--") {
        let config_path = Path::new(&args[1]);
        info!("loading configuration from {:?}", config_path);
        RakshaConfig::load(config_path)?
    } else {
        RakshaConfig::default()
    };

    let ticks = args
        .iter()
        .position(|a| a == "--ticks")
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(DEFAULT_TICKS);

    let scape = demo_scape(&config)?;
    let mut ctx = SimulationContext::new(
        &config,
        Box::new(VelocityRobot2),
        Box::new(PointTracker {
            gain: 1.0,
            max_control: config.robot.max_control,
        }),
        scape,
        vec![config.arena.min_x + 1.0, config.arena.min_y + 1.0],
        Point2::new(0.0, 0.0),
        LogSink,
    )?;

    info!("running {} ticks of {}s", ticks, TICK_SECONDS);
    let mut overrides = 0usize;
    for _ in 0..ticks {
        ctx.tick(TICK_SECONDS)?;
        if ctx.mode() == raksha::ControlMode::Override {
            overrides += 1;
        }
    }

    let pos = ctx.state();
    info!(
        "done: robot at ({:.2}, {:.2}), override active on {}/{} ticks",
        pos[0], pos[1], overrides, ticks
    );
    Ok(())
}

/// A ring of disk obstacles, each carrying a raw and a conservative
/// palette estimate.
fn demo_scape(config: &RakshaConfig) -> raksha::Result<Obstaclescape> {
    let span_x = config.arena.max_x - config.arena.min_x;
    let span_y = config.arena.max_y - config.arena.min_y;
    let mut obstacles = Vec::new();
    for k in 0..6 {
        let angle = k as f64 / 6.0 * std::f64::consts::TAU;
        let offset = vec![
            config.arena.min_x + span_x * (0.5 + 0.3 * angle.cos()),
            config.arena.min_y + span_y * (0.5 + 0.3 * angle.sin()),
        ];
        let palette = SafeSetPalette::new(vec![
            SafeSet::Circle(Circle::new(1.0)),
            SafeSet::Circle(Circle::new(1.4)),
        ])?;
        obstacles.push(Obstacle::new(
            offset,
            palette,
            SafeSet::Circle(Circle::new(0.6)),
        )?);
    }
    Ok(Obstaclescape::new(obstacles))
}
