use std::{
    fs::{self, File},
    io::{Seek, SeekFrom, Write},
    path::{Path, PathBuf},
};

use xcontent::{
    common::{ProfileId, TitleId},
    content::memory::{MemoryContentDevice, NewPackage},
    drive::{FatxVolumeHeader, HARD_DRIVE_DATA_OFFSET},
    prelude::*,
};

fn hard_drive_image(dir: &Path, name: &str, magic: &[u8; 4]) -> std::io::Result<PathBuf> {
    let path = dir.join(name);
    let mut fp = File::create(&path)?;
    fp.set_len(HARD_DRIVE_DATA_OFFSET + 0x10000)?;
    fp.seek(SeekFrom::Start(HARD_DRIVE_DATA_OFFSET))?;

    fp.write_all(magic)?;
    fp.write_all(&0xCAFE_0001u32.to_be_bytes())?;
    fp.write_all(&0x20u32.to_be_bytes())?;
    fp.write_all(&1u32.to_be_bytes())?;

    Ok(path)
}

fn open_drive(drive: DriveHandle) -> XContentResult<MemoryContentDevice> {
    // the partition header stands in for a save that lives on the drive
    let header = drive
        .volume()
        .data()
        .clone()
        .split(0, FatxVolumeHeader::SIZE)?
        .read_to_vec()?;

    let mut dev = MemoryContentDevice::on_drive("", drive);
    let profile = dev.add_profile(
        ProfileId(0xE000_0000_0000_00AA),
        NewPackage::new("Player One", "E0000000000000AA", ContentType::Profile, vec![0; 64]),
    );
    let title = dev.add_title(profile, TitleId(0x4D5307E6), "Halo 3", vec![0x89, b'P', b'N', b'G'])?;
    dev.add_save(
        title,
        NewPackage::new("Header", "HEADER", ContentType::SavedGame, header),
    )?;
    dev.add_shared(
        TitleId(0x4D5307E6),
        NewPackage::new("Map Pack", "MAPPACK", ContentType::MarketplaceContent, vec![7; 0x3000]),
    );

    Ok(dev)
}

#[test]
fn scanned_images_can_be_extracted() -> XContentResult<()> {
    let images = tempfile::tempdir()?;
    let hdd = hard_drive_image(images.path(), "hdd.img", b"XTAF")?;
    let junk = hard_drive_image(images.path(), "junk.img", b"FATX")?;

    let detector = FatxDriveDetector::new([hdd.clone(), junk], Vec::new());
    let catalog = Catalog::new(scan_all_devices(&detector, open_drive));

    assert_eq!(catalog.devices().len(), 1);
    let device = &catalog.devices()[0];
    assert_eq!(device.name(), "Hard Drive");
    assert_eq!(device.source(), hdd);
    assert_eq!(device.volume_id(), 0xCAFE_0001);
    assert_eq!(device.shared_categories().len(), 8);

    let leaves: Vec<_> = catalog.leaves().map(|(_, node)| node).collect();
    let names: Vec<_> = leaves.iter().map(|n| n.display_name()).collect();
    assert_eq!(names, ["Header", "Map Pack"]);

    let out = tempfile::tempdir()?;
    let summary = Extractor::new()
        .extract(&leaves, &mut IntoDirectory::new(out.path()))
        .map_err(anyhow::Error::from)?;
    assert_eq!(summary.total_bytes(), 0x10 + 0x3000);

    let header = fs::read(out.path().join("HEADER"))?;
    assert_eq!(&header[..4], b"XTAF");
    assert_eq!(&header[4..8], &0xCAFE_0001u32.to_be_bytes());
    assert_eq!(fs::read(out.path().join("MAPPACK"))?, vec![7; 0x3000]);

    Ok(())
}

#[test]
fn profiles_open_in_the_profile_editor() -> XContentResult<()> {
    let images = tempfile::tempdir()?;
    let hdd = hard_drive_image(images.path(), "hdd.img", b"XTAF")?;

    let catalog = Catalog::new(scan_all_devices(&FatxDriveDetector::new([hdd], Vec::new()), open_drive));
    let profile = catalog
        .node(&NodePath::device(0).child(0))
        .ok_or_else(|| anyhow::anyhow!("no profile node"))?;

    assert_eq!(profile.display_name(), "Player One");
    assert!(!profile.is_leaf());
    assert!(matches!(
        profile.open_action(),
        Some(xcontent::catalog::OpenAction::ProfileEditor(_))
    ));

    // saves cant be taken out through their profile
    let res = Extractor::new().extract(&[profile], &mut SaveAs(images.path().join("p")));
    assert!(matches!(res, Err(ExtractError::NonExtractableSelection { .. })));

    Ok(())
}
