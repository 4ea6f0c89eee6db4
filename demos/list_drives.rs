/// Lists every FATX drive found at the locations of the config
use xcontent::{config::Config, prelude::*};

use humansize::{format_size, BINARY};

fn main() -> xcontent::XContentResult<()> {
    env_logger::init();

    let cfg = match std::env::args().nth(1) {
        Some(path) => Config::load(path)?,
        None => Config::load_from_default_locations()?,
    };

    let drives = FatxDriveDetector::from_config(&cfg)?.enumerate();
    if drives.is_empty() {
        println!("No drives found.");
        return Ok(());
    }

    for drive in &drives {
        let header = drive.volume().header();
        println!(
            "{} at {:?}: volume {:08X}, {} per cluster, {} total",
            drive.kind(),
            drive.source(),
            header.volume_id,
            format_size(header.cluster_size(), BINARY),
            format_size(drive.storage().length()?, BINARY),
        );
    }

    Ok(())
}
