use std::fs;

use anyhow::{Context, Result};
use rand::{SeedableRng, rngs::StdRng};
use sparselife::{Pos2, PositionEncoder, RunLengthEncoded, World, rle};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod options;
mod stats;

use stats::Recorder;

/// Seeds from the input file, else the fill mode, else the built-in glider gun
fn seed_world(args: &options::Args) -> Result<World> {
    let offset = args.offset()?;
    let mut world = World::new();

    if let Some(file_name) = args.input_file() {
        let text = fs::read_to_string(&file_name)
            .with_context(|| format!("failed to read {file_name}"))?;
        rle::load(&text, &mut world, offset)
            .with_context(|| format!("failed to load pattern {file_name}"))?;
        return Ok(world);
    }

    if let Some(fill) = args.fill_mode()? {
        let (grid_w, grid_h) = args.grid_size()?;
        let mut rng = match args.seed()? {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        for cell in fill.create_alive(grid_w, grid_h, &mut rng) {
            world.insert(offset + cell);
        }
        return Ok(world);
    }

    rle::load(rle::GOSPER_GLIDER_GUN, &mut world, offset)?;
    Ok(world)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let Some(args) = options::Args::from_env()? else {
        return Ok(());
    };

    let mut world = seed_world(&args)?;
    info!(alive = world.alive_count(), "seeded world");

    let parallel = args.multithreading();
    let mut stats = stats::SwitchRecorder::new(world.alive_count(), args.stats_file().is_some());
    for _ in 0..args.generations()? {
        // report metrics every 500ms
        if stats.has_report() {
            info!("{}", stats.report());
        }

        if parallel {
            world.step_parallel();
        } else {
            world.step();
        }
        stats.record(world.alive_count(), world.changed_count());

        if args.until_stable() && world.is_stable() {
            info!(generation = world.generation(), "world is stable");
            break;
        }
    }
    info!(
        generation = world.generation(),
        alive = world.alive_count(),
        "finished"
    );

    if args.print() {
        if let Some((tl, br)) = world.bounding_box() {
            print!("{}", world.window(tl, br + Pos2::one()));
        }
    }

    if let Some(file_name) = args.output_file() {
        let encoder = RunLengthEncoded::default().set_name("sparselife generated pattern");
        let encoded = encoder
            .encode(&world.sorted())
            .context("failed to encode the final population")?;
        fs::write(&file_name, encoded)
            .with_context(|| format!("failed to write {file_name}"))?;
    }
    if let Some(file_name) = args.stats_file() {
        stats
            .save(&file_name)
            .with_context(|| format!("failed to write stats to {file_name}"))?;
    }

    Ok(())
}
