/// Builds a catalog out of an in-memory device, prints it and extracts every
/// save and shared item into a directory
use xcontent::{
    common::{ProfileId, TitleId},
    config::Config,
    content::memory::{MemoryContentDevice, NewPackage},
    prelude::*,
};

use std::{fs, path::PathBuf};

use humansize::{format_size, BINARY};

fn sample_device() -> XContentResult<MemoryContentDevice> {
    let mut dev = MemoryContentDevice::new("Sample Drive", DeviceKind::HardDrive);

    let profile = dev.add_profile(
        ProfileId(0xE000_0123_4567_89AB),
        NewPackage::new("Gamer", "E0000123456789AB", ContentType::Profile, vec![0; 0x400]),
    );
    let title = dev.add_title(profile, TitleId(0x4D5307E6), "Halo 3", Vec::new())?;
    dev.add_save(
        title,
        NewPackage::new("Campaign", "SAVE0001", ContentType::SavedGame, vec![0x5a; 0x10000]),
    )?;
    dev.add_shared(
        TitleId(0x4D5307E6),
        NewPackage::new("Mythic Map Pack", "MYTHIC01", ContentType::MarketplaceContent, vec![1; 0x8000]),
    );
    dev.add_shared(
        TitleId(0xFFFE07D1),
        NewPackage::new("Dashboard Theme", "THEME001", ContentType::Theme, vec![2; 0x2000]),
    );

    Ok(dev)
}

fn main() -> XContentResult<()> {
    env_logger::init();

    let out_dir = match std::env::args().nth(1) {
        Some(dir) => PathBuf::from(dir),
        None => Config::load_from_default_locations()?.export_dir()?,
    };

    let report = build_device(&sample_device()?, "Hard Drive", "memory", 0);
    let catalog = Catalog::new(vec![report.device]);

    for (path, node) in catalog.walk() {
        let indent = "  ".repeat(path.depth());
        match node.path_on_device() {
            Some(on_device) => println!("{indent}{} ({on_device})", node.display_name()),
            None => println!("{indent}{}", node.display_name()),
        }
    }

    let leaves: Vec<_> = catalog.leaves().map(|(_, node)| node).collect();

    println!("Extracting {} item(s) to {out_dir:?}", leaves.len());
    fs::create_dir_all(&out_dir)?;
    match Extractor::new().extract(&leaves, &mut IntoDirectory::new(&out_dir)) {
        Ok(summary) => {
            for (path, len) in &summary.written {
                println!("  {path:?} {}", format_size(*len, BINARY));
            }
            println!("Done, {}.", format_size(summary.total_bytes(), BINARY));
        }
        Err(e) => {
            println!("{e}");
            for failure in e.failures() {
                println!("  {failure}: {}", failure.cause);
            }
        }
    }

    Ok(())
}
