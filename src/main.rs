use anyhow::Context;

use rgbd_dataset::save::TrajectorySave;
use rgbd_dataset::{Dataset, DatasetConfig};

const USAGE: &str = "usage: rgbd-dataset <config.json> [input_folder] [trajectory.json]";

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp_nanos()
        .init();

    let mut args = std::env::args().skip(1);
    let config_path = args.next().context(USAGE)?;
    let mut config = DatasetConfig::read_from_json(&config_path)
        .with_context(|| format!("reading config {}", config_path))?;
    if let Some(input_folder) = args.next() {
        config.data.input_folder = input_folder.into();
    }
    log::info!("path: {:?}", config.data.input_folder);

    let dataset = Dataset::new(&config).context("building dataset")?;
    if let Some(stats) = dataset.stats() {
        log::info!(
            "{} anchors, {} unmatched, {} skipped by frame rate, {} retained",
            stats.anchors,
            stats.dropped_unmatched(),
            stats.dropped_by_rate(),
            stats.retained
        );
    }

    for frame in dataset.iter() {
        let frame = frame?;
        let valid = frame.depth.iter().filter(|d| **d > 0.0).count();
        log::info!(
            "frame {}: {}x{}, {} valid depth pixels, t = [{:.3}, {:.3}, {:.3}]",
            frame.index,
            frame.height(),
            frame.width(),
            valid,
            frame.pose[(0, 3)],
            frame.pose[(1, 3)],
            frame.pose[(2, 3)]
        );
    }

    if let Some(output) = args.next() {
        TrajectorySave::from(&dataset)
            .write_to_json(&output)
            .with_context(|| format!("writing trajectory {}", output))?;
        log::info!("trajectory written to {}", output);
    }
    Ok(())
}
