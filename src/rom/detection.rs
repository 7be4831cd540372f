//! Détection des romsets dans un répertoire
//!
//! Deux stratégies coexistent : par nom de fichier (noms historiques, aucun
//! fichier n'est ouvert) et par empreinte SHA-256 du contenu.

use log::{debug, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use super::database::{legacy_rom_name, FingerprintCatalog};
use super::loader::AllRomsetInfo;
use super::scramble::decode_rom;
use super::validation::{digest_to_hex, sha256_digest};
use super::{RomLocation, Romset, RomsetSet};

/// Taille maximale d'un fichier candidat
///
/// Les plus grosses puces connues font 2 MiB, on se laisse de la marge.
pub const MAX_ROM_FILE_SIZE: u64 = 4 * 1024 * 1024;

/// Erreurs de parcours du répertoire de ROMs
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("impossible de parcourir le répertoire de ROMs: {source}")]
    Walk {
        #[from]
        source: walkdir::Error,
    },

    #[error("impossible de lire les métadonnées de {}: {source}", .path.display())]
    Metadata { path: PathBuf, source: io::Error },
}

fn wants(desired: Option<RomsetSet>, romset: Romset) -> bool {
    desired.map_or(true, |set| set.has(romset))
}

/// Erreur sur une entrée du répertoire qui est un lien vers une cible absente
///
/// Une telle entrée n'est pas un fichier régulier : elle est ignorée comme
/// les répertoires, sans interrompre le parcours.
fn is_dangling_link(error: &walkdir::Error) -> bool {
    if error.depth() == 0 {
        return false;
    }

    let Some(path) = error.path() else {
        return false;
    };

    let is_link = fs::symlink_metadata(path).is_ok_and(|metadata| metadata.file_type().is_symlink());
    let target_missing = error
        .io_error()
        .is_some_and(|io_error| io_error.kind() == io::ErrorKind::NotFound);

    is_link && target_missing
}

/// Renseigne les chemins à partir des noms de fichiers historiques
///
/// Ne vérifie pas l'existence des fichiers : une absence se traduira par un
/// échec au chargement.
pub fn detect_romsets_by_filename(base: &Path, all_info: &mut AllRomsetInfo, desired: Option<RomsetSet>) {
    for romset in Romset::ALL {
        if !wants(desired, romset) {
            continue;
        }

        let info = all_info.get_mut(romset);
        for location in RomLocation::ALL {
            if let Some(name) = legacy_rom_name(romset, location) {
                info.rom_paths[location.index()] = Some(base.join(name));
            }
        }
    }
}

/// Identifie les fichiers de `base` par leur empreinte SHA-256
///
/// Le parcours n'est pas récursif et suit l'ordre renvoyé par le système de
/// fichiers. Pour chaque couple (variante, emplacement), le premier fichier
/// correspondant l'emporte.
///
/// Les variantes de `desired` reçoivent immédiatement leur contenu décodé,
/// ce qui évite de relire le fichier au chargement. Les autres, ou toutes si
/// `desired` vaut `None`, ne reçoivent que le chemin.
///
/// En cas d'erreur, les emplacements déjà renseignés sont conservés.
pub fn detect_romsets_by_hash(
    base: &Path,
    all_info: &mut AllRomsetInfo,
    catalog: &FingerprintCatalog,
    desired: Option<RomsetSet>,
) -> Result<(), DetectError> {
    let walker = WalkDir::new(base).min_depth(1).max_depth(1).follow_links(true);

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if is_dangling_link(&e) => {
                debug!("Lien symbolique cassé ignoré: {}", e);
                continue;
            }
            Err(e) => {
                warn!("Erreur de parcours dans {}: {}", base.display(), e);
                return Err(e.into());
            }
        };

        let path = entry.path();
        let metadata = entry.metadata().map_err(|e| DetectError::Metadata {
            path: path.to_path_buf(),
            source: e.into_io_error().unwrap_or_else(|| io::Error::other("boucle de liens symboliques")),
        })?;

        if !metadata.is_file() {
            continue;
        }

        if metadata.len() > MAX_ROM_FILE_SIZE {
            debug!("{} ignoré: {} octets", path.display(), metadata.len());
            continue;
        }

        let file_data = match fs::read(path) {
            Ok(data) => data,
            Err(e) => {
                warn!("Impossible de lire {}: {}", path.display(), e);
                continue;
            }
        };

        let digest = sha256_digest(&file_data);
        let matches = catalog.lookup(&digest);
        if matches.is_empty() {
            debug!("{}: empreinte inconnue {}", path.display(), digest_to_hex(&digest));
        }

        for &(romset, location) in matches {
            let info = all_info.get_mut(romset);
            if info.has_rom(location) {
                continue;
            }

            debug!("{} correspond à {} {}", path.display(), romset, location);
            info.rom_paths[location.index()] = Some(path.to_path_buf());

            if desired.is_some_and(|set| set.has(romset)) {
                info.rom_data[location.index()] = Some(decode_rom(location, file_data.clone()));
            }
        }
    }

    Ok(())
}
