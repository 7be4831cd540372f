//! Tests d'intégration du chargeur de romsets

use anyhow::Result;
use sc55_romset::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Dump embrouillé de 32 octets et sa forme décodée
const WAVE_SCRAMBLED: [u8; 32] = [
    0x0b, 0x30, 0x55, 0x7a, 0x9f, 0xc4, 0xe9, 0x0e, 0x33, 0x58, 0x7d, 0xa2, 0xc7, 0xec, 0x11, 0x36,
    0x5b, 0x80, 0xa5, 0xca, 0xef, 0x14, 0x39, 0x5e, 0x83, 0xa8, 0xcd, 0xf2, 0x17, 0x3c, 0x61, 0x86,
];
const WAVE_DECODED: [u8; 32] = [
    0xc2, 0xd7, 0x0c, 0x31, 0x8e, 0xb3, 0x64, 0x79, 0xe6, 0xfb, 0x10, 0x05, 0x92, 0x87, 0x58, 0x4d,
    0x27, 0x7a, 0xec, 0xc1, 0x6f, 0x06, 0x98, 0x8d, 0x1b, 0x4e, 0xf0, 0xe5, 0x73, 0x2a, 0xbc, 0x91,
];

/// Contenu de test par emplacement, ROM2 en puissance de 2
fn mk2_fixture(location: RomLocation) -> Vec<u8> {
    match location {
        RomLocation::Rom1 => b"MK2 ROM1 v1.01".to_vec(),
        RomLocation::Rom2 => (0..1024u32).map(|i| (i % 251) as u8).collect(),
        RomLocation::SmRom => b"MK2 sub-MCU".to_vec(),
        RomLocation::WaveRom1 => WAVE_SCRAMBLED.to_vec(),
        RomLocation::WaveRom2 => WAVE_SCRAMBLED.iter().rev().copied().collect(),
        _ => Vec::new(),
    }
}

const MK2_LOCATIONS: [RomLocation; 5] = [
    RomLocation::Rom1,
    RomLocation::Rom2,
    RomLocation::SmRom,
    RomLocation::WaveRom1,
    RomLocation::WaveRom2,
];

/// Écrit les fichiers MK2 sous des noms arbitraires et renvoie le catalogue associé
fn setup_mk2_directory(dir: &Path) -> Result<FingerprintCatalog> {
    let mut entries = Vec::new();
    for (i, location) in MK2_LOCATIONS.into_iter().enumerate() {
        let content = mk2_fixture(location);
        fs::write(dir.join(format!("dump_{}.bin", i)), &content)?;
        entries.push(KnownHash {
            digest: sha256_digest(&content),
            romset: Romset::Mk2,
            location,
        });
    }
    Ok(FingerprintCatalog::new(entries))
}

#[test]
fn test_autodetect_complete_romset() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let catalog = setup_mk2_directory(temp_dir.path())?;
    let loader = RomsetLoader::with_catalog(&catalog);
    let mut all_info = AllRomsetInfo::new();

    let result = loader.load(&mut all_info, &RomsetRequest::new(temp_dir.path()))?;

    assert_eq!(result.romset, Romset::Mk2);
    for location in RomLocation::ALL {
        let expected = if MK2_LOCATIONS.contains(&location) {
            RomLoadStatus::Loaded
        } else {
            RomLoadStatus::Unused
        };
        assert_eq!(result.loaded[location.index()], expected, "{}", location);
    }

    let info = all_info.get(Romset::Mk2);
    assert_eq!(info.rom_data(RomLocation::Rom1), Some(mk2_fixture(RomLocation::Rom1).as_slice()));
    Ok(())
}

#[test]
fn test_waveroms_are_decoded_once() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let catalog = setup_mk2_directory(temp_dir.path())?;
    let loader = RomsetLoader::with_catalog(&catalog);

    // Chemin avec variante nommée : contenu chargé dès la détection
    let mut named = AllRomsetInfo::new();
    loader.load(&mut named, &RomsetRequest::new(temp_dir.path()).with_romset("mk2"))?;

    // Autodétection : contenu lu au chargement
    let mut detected = AllRomsetInfo::new();
    loader.load(&mut detected, &RomsetRequest::new(temp_dir.path()))?;

    for all_info in [&named, &detected] {
        let info = all_info.get(Romset::Mk2);
        assert_eq!(info.rom_data(RomLocation::WaveRom1), Some(&WAVE_DECODED[..]));
        assert_eq!(
            info.rom_data(RomLocation::WaveRom2),
            Some(unscramble(&mk2_fixture(RomLocation::WaveRom2)).as_slice())
        );
        // Les ROMs programme ne sont pas transformées
        assert_eq!(info.rom_data(RomLocation::SmRom), Some(&b"MK2 sub-MCU"[..]));
    }
    Ok(())
}

#[test]
fn test_large_decoy_is_ignored() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut catalog_entries: Vec<KnownHash> = Vec::new();
    let decoy = vec![0xA5u8; 5 * 1024 * 1024];
    fs::write(temp_dir.path().join("00_decoy.bin"), &decoy)?;
    catalog_entries.push(KnownHash {
        digest: sha256_digest(&decoy),
        romset: Romset::Mk2,
        location: RomLocation::WaveRom2,
    });

    let catalog = setup_mk2_directory(temp_dir.path())?;
    catalog_entries.extend_from_slice(catalog.entries());
    let catalog = FingerprintCatalog::new(catalog_entries);

    let loader = RomsetLoader::with_catalog(&catalog);
    let mut all_info = AllRomsetInfo::new();
    let result = loader.load(&mut all_info, &RomsetRequest::new(temp_dir.path()))?;

    assert_eq!(result.romset, Romset::Mk2);
    let wave2 = all_info
        .get(Romset::Mk2)
        .rom_path(RomLocation::WaveRom2)
        .map(Path::to_path_buf);
    assert_eq!(wave2, Some(temp_dir.path().join("dump_4.bin")));
    Ok(())
}

#[test]
fn test_decoy_alone_leaves_romset_incomplete() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let decoy = vec![0x3Cu8; 5 * 1024 * 1024];
    fs::write(temp_dir.path().join("big.bin"), &decoy)?;
    let catalog = FingerprintCatalog::new(vec![KnownHash {
        digest: sha256_digest(&decoy),
        romset: Romset::Rlp3237,
        location: RomLocation::WaveRom1,
    }]);

    let loader = RomsetLoader::with_catalog(&catalog);
    let mut all_info = AllRomsetInfo::new();
    let result = loader.load(&mut all_info, &RomsetRequest::new(temp_dir.path()).with_romset("rlp3237"));

    match result {
        Err(LoadRomsetError::IncompleteRomset { romset, completion }) => {
            assert_eq!(romset, Romset::Rlp3237);
            assert_eq!(completion[RomLocation::WaveRom1.index()], RomCompletionStatus::Missing);
        }
        other => panic!("résultat inattendu: {:?}", other),
    }
    Ok(())
}

#[test]
fn test_invalid_romset_name() {
    let mut all_info = AllRomsetInfo::new();
    let request = RomsetRequest::new("/nonexistent/sc55-romset/roms").with_romset("mk3");

    let result = load_romset(&mut all_info, &request);

    assert!(matches!(result, Err(LoadRomsetError::InvalidRomsetName)));
    for romset in Romset::ALL {
        for location in RomLocation::ALL {
            assert!(!all_info.get(romset).has_rom(location));
        }
    }
}

#[test]
fn test_legacy_loader_uses_filenames() -> Result<()> {
    let temp_dir = TempDir::new()?;
    for location in MK2_LOCATIONS {
        let name = legacy_rom_name(Romset::Mk2, location).ok_or_else(|| anyhow::anyhow!("nom manquant"))?;
        fs::write(temp_dir.path().join(name), mk2_fixture(location))?;
    }

    let mut all_info = AllRomsetInfo::new();
    let request = RomsetRequest::new(temp_dir.path())
        .with_romset("mk2")
        .with_legacy_loader(true);
    let result = load_romset(&mut all_info, &request)?;

    assert_eq!(result.romset, Romset::Mk2);
    assert_eq!(
        all_info.get(Romset::Mk2).rom_data(RomLocation::WaveRom1),
        Some(&WAVE_DECODED[..])
    );
    Ok(())
}

#[test]
fn test_legacy_loader_reports_missing_files() -> Result<()> {
    let temp_dir = TempDir::new()?;
    fs::write(temp_dir.path().join("jv880_rom1.bin"), b"jv880")?;

    let mut all_info = AllRomsetInfo::new();
    let request = RomsetRequest::new(temp_dir.path())
        .with_romset("jv880")
        .with_legacy_loader(true);
    let result = load_romset(&mut all_info, &request);

    match &result {
        Err(LoadRomsetError::RomLoadFailed { romset, loaded }) => {
            assert_eq!(*romset, Romset::Jv880);
            assert_eq!(loaded[RomLocation::Rom1.index()], RomLoadStatus::Loaded);
            assert_eq!(loaded[RomLocation::Rom2.index()], RomLoadStatus::Failed);
            assert_eq!(loaded[RomLocation::WaveRomExp.index()], RomLoadStatus::Failed);
        }
        other => panic!("résultat inattendu: {:?}", other),
    }

    let report = generate_load_report(&result, &all_info);
    assert!(report.contains("jv880_rom2.bin"));
    Ok(())
}

#[test]
fn test_config_file_to_memory_image() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let rom_dir = temp_dir.path().join("roms");
    fs::create_dir(&rom_dir)?;
    let catalog = setup_mk2_directory(&rom_dir)?;

    let config_path = temp_dir.path().join("sc55.toml");
    fs::write(
        &config_path,
        format!("rom_directory = {:?}\nromset = \"mk2\"\n", rom_dir.display().to_string()),
    )?;
    let config = RomsetConfig::load_from_file(&config_path)?;

    let loader = RomsetLoader::with_catalog(&catalog);
    let mut all_info = AllRomsetInfo::new();
    let result = loader.load(&mut all_info, &config.to_request())?;

    let mut image = RomImage::new();
    let loaded = image.load_roms(result.romset, &all_info)?;
    all_info.purge_rom_data();

    assert_eq!(loaded.iter().count(), 5);
    assert_eq!(image.rom2_mask(), 1023);
    assert_eq!(&image.buffer(RomLocation::WaveRom1)[..32], &WAVE_DECODED);
    assert!(all_info.get(Romset::Mk2).rom_data(RomLocation::WaveRom1).is_none());
    assert!(all_info.get(Romset::Mk2).has_rom(RomLocation::WaveRom1));
    Ok(())
}

#[test]
fn test_builtin_catalog_shared_chips() {
    let catalog = FingerprintCatalog::builtin();
    let wave_8m = digest_from_hex("5b753f6cef4cfc7fcafe1430fecbb94a739b874e55356246a46abe24097ee491");

    let matches = catalog.lookup(&wave_8m);

    assert!(matches.contains(&(Romset::Mk2, RomLocation::WaveRom2)));
    assert!(matches.contains(&(Romset::Scb55, RomLocation::WaveRom3)));
    assert!(catalog.lookup(&[0u8; 32]).is_empty());
}
