//! Catalogue des ROMs par variante et résolution en mémoire

use log::{debug, warn};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use super::scramble::decode_rom;
use super::{RomLocation, Romset, ROMLOCATION_COUNT, ROMSET_COUNT};

/// Statut de chargement d'un emplacement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RomLoadStatus {
    /// ROM chargée en mémoire
    Loaded,

    /// Lecture impossible (erreur d'E/S probable)
    Failed,

    /// Emplacement non utilisé par la variante
    Unused,
}

impl fmt::Display for RomLoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RomLoadStatus::Loaded => "Chargée",
            RomLoadStatus::Failed => "Échec",
            RomLoadStatus::Unused => "Inutilisée",
        })
    }
}

/// Statuts de chargement indexés par `RomLocation`
pub type RomLoadStatusSet = [RomLoadStatus; ROMLOCATION_COUNT];

/// Chemins et contenus des ROMs d'une variante
///
/// Un emplacement est renseigné si son chemin ou son contenu est présent.
/// Le contenu, s'il existe, est toujours sous forme décodée.
#[derive(Debug, Clone, Default)]
pub struct RomsetInfo {
    /// Chemins sur disque, indexés par `RomLocation`
    pub rom_paths: [Option<PathBuf>; ROMLOCATION_COUNT],

    /// Contenus décodés, indexés par `RomLocation`
    pub rom_data: [Option<Vec<u8>>; ROMLOCATION_COUNT],
}

impl RomsetInfo {
    pub fn has_rom(&self, location: RomLocation) -> bool {
        self.rom_paths[location.index()].is_some() || self.rom_data[location.index()].is_some()
    }

    pub fn rom_path(&self, location: RomLocation) -> Option<&Path> {
        self.rom_paths[location.index()].as_deref()
    }

    pub fn rom_data(&self, location: RomLocation) -> Option<&[u8]> {
        self.rom_data[location.index()].as_deref()
    }

    /// Libère tous les contenus chargés de cette variante
    pub fn purge_rom_data(&mut self) {
        for data in &mut self.rom_data {
            *data = None;
        }
    }
}

/// Catalogue de toutes les variantes
#[derive(Debug, Clone, Default)]
pub struct AllRomsetInfo {
    /// Indexé par `Romset`
    pub romsets: [RomsetInfo; ROMSET_COUNT],
}

impl AllRomsetInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, romset: Romset) -> &RomsetInfo {
        &self.romsets[romset.index()]
    }

    pub fn get_mut(&mut self, romset: Romset) -> &mut RomsetInfo {
        &mut self.romsets[romset.index()]
    }

    /// Libère les contenus de toutes les variantes, les chemins sont conservés
    pub fn purge_rom_data(&mut self) {
        for info in &mut self.romsets {
            info.purge_rom_data();
        }
    }
}

/// Résout chaque emplacement de `romset` en contenu mémoire
///
/// Un emplacement avec seulement un chemin est lu depuis le disque, puis
/// désembrouillé s'il s'agit d'une ROM de formes d'onde. Un échec de lecture
/// n'interrompt pas le chargement des autres emplacements.
///
/// Renvoie `true` si toutes les lectures tentées ont réussi.
pub fn load_romset_data(romset: Romset, all_info: &mut AllRomsetInfo) -> (bool, RomLoadStatusSet) {
    let mut all_loaded = true;
    let mut loaded = [RomLoadStatus::Unused; ROMLOCATION_COUNT];

    let info = all_info.get_mut(romset);

    for location in RomLocation::ALL {
        let i = location.index();

        if info.rom_data[i].is_some() {
            loaded[i] = RomLoadStatus::Loaded;
            continue;
        }

        let Some(path) = &info.rom_paths[i] else {
            continue;
        };

        match fs::read(path) {
            Ok(file_data) => {
                debug!("{} {}: {} octets lus depuis {}", romset, location, file_data.len(), path.display());
                info.rom_data[i] = Some(decode_rom(location, file_data));
                loaded[i] = RomLoadStatus::Loaded;
            }
            Err(e) => {
                warn!("Impossible de charger {} {} ({}): {}", romset, location, path.display(), e);
                all_loaded = false;
                loaded[i] = RomLoadStatus::Failed;
            }
        }
    }

    (all_loaded, loaded)
}
