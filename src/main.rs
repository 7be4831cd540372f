use anyhow::{anyhow, Result};
use log::info;
use sc55_romset::*;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

fn print_usage() {
    println!("Usage: sc55-romset [options]");
    println!();
    println!("  --config FILE             Fichier de configuration TOML");
    println!("  --rom-dir DIR             Répertoire contenant les ROMs");
    println!("  --romset NAME             Variante à charger (sinon autodétection)");
    println!("  --legacy                  Détection par noms de fichiers historiques");
    println!("  --override-<rom> PATH     Impose le fichier d'un emplacement");
    println!();
    println!("Emplacements: rom1 rom2 smrom waverom1 waverom2 waverom3 waverom_card waverom_exp");
    println!("Romsets: {}", Romset::parsable_names().join(" "));
}

fn override_location(option: &str) -> Option<RomLocation> {
    let name = option.strip_prefix("--override-")?;
    RomLocation::ALL
        .into_iter()
        .find(|location| location.name().eq_ignore_ascii_case(name))
}

fn next_value(args: &[String], i: usize, option: &str) -> Result<String> {
    args.get(i + 1)
        .cloned()
        .ok_or_else(|| anyhow!("valeur manquante pour {}", option))
}

fn parse_args(args: &[String]) -> Result<Option<RomsetConfig>> {
    // --config est lu en premier pour que les autres options le surchargent
    let mut config = match args.iter().position(|arg| arg == "--config") {
        Some(i) => {
            let path = next_value(args, i, "--config")?;
            info!("Configuration chargée depuis {}", path);
            RomsetConfig::load_from_file(&path)?
        }
        None => RomsetConfig::default(),
    };

    let mut i = 1;
    while i < args.len() {
        let arg = args[i].as_str();
        match arg {
            "--help" | "-h" => return Ok(None),
            "--config" => i += 1,
            "--rom-dir" => {
                config.rom_directory = PathBuf::from(next_value(args, i, arg)?);
                i += 1;
            }
            "--romset" => {
                config.romset = Some(next_value(args, i, arg)?);
                i += 1;
            }
            "--legacy" => config.legacy_loader = true,
            _ => match override_location(arg) {
                Some(location) => {
                    config.overrides.set(location, next_value(args, i, arg)?);
                    i += 1;
                }
                None => return Err(anyhow!("option inconnue: {}", arg)),
            },
        }
        i += 1;
    }

    Ok(Some(config))
}

fn main() -> Result<ExitCode> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let Some(config) = parse_args(&args)? else {
        print_usage();
        return Ok(ExitCode::SUCCESS);
    };

    let request = config.to_request();
    let mut all_info = AllRomsetInfo::new();
    let result = load_romset(&mut all_info, &request);

    print!("{}", generate_load_report(&result, &all_info));

    let Ok(loaded) = result else {
        return Ok(ExitCode::FAILURE);
    };

    let mut image = RomImage::new();
    let locations = image.load_roms(loaded.romset, &all_info)?;
    all_info.purge_rom_data();

    info!(
        "{} ROM(s) copiée(s) en mémoire, masque ROM2 {:#x}",
        locations.iter().count(),
        image.rom2_mask()
    );

    Ok(ExitCode::SUCCESS)
}
