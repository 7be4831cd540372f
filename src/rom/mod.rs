//! Détection, vérification et chargement des romsets SC-55
//!
//! Un romset est l'ensemble des puces ROM d'une variante matérielle : deux ROMs
//! programme pour le MCU, une ROM pour le sous-MCU et jusqu'à cinq ROMs de
//! formes d'onde. Ce module transforme un répertoire de fichiers candidats en
//! images mémoire vérifiées et désembrouillées.

pub mod database;
pub mod detection;
pub mod loader;
pub mod scramble;
pub mod system;
pub mod validation;

pub use database::*;
pub use detection::*;
pub use loader::*;
pub use scramble::*;
pub use system::*;
pub use validation::*;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Nombre de variantes matérielles supportées
pub const ROMSET_COUNT: usize = 9;

/// Nombre d'emplacements ROM par variante
pub const ROMLOCATION_COUNT: usize = 8;

/// Variante matérielle (produit + firmware)
///
/// L'ordre de déclaration sert de priorité lors de l'autodétection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Romset {
    Mk2,
    St,
    Mk1,
    Cm300,
    Jv880,
    Scb55,
    Rlp3237,
    Sc155,
    Sc155Mk2,
}

const ROMSET_NAMES: [&str; ROMSET_COUNT] = [
    "SC-55mk2",
    "SC-55st",
    "SC-55mk1",
    "CM-300/SCC-1",
    "JV-880",
    "SCB-55",
    "RLP-3237",
    "SC-155",
    "SC-155mk2",
];

const ROMSET_PARSABLE_NAMES: [&str; ROMSET_COUNT] = [
    "mk2", "st", "mk1", "cm300", "jv880", "scb55", "rlp3237", "sc155", "sc155mk2",
];

impl Romset {
    /// Toutes les variantes, dans l'ordre de déclaration
    pub const ALL: [Romset; ROMSET_COUNT] = [
        Romset::Mk2,
        Romset::St,
        Romset::Mk1,
        Romset::Cm300,
        Romset::Jv880,
        Romset::Scb55,
        Romset::Rlp3237,
        Romset::Sc155,
        Romset::Sc155Mk2,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Nom d'affichage (ex: "SC-55mk2")
    pub fn name(self) -> &'static str {
        ROMSET_NAMES[self.index()]
    }

    /// Nom accepté par `FromStr` (ex: "mk2")
    pub fn parsable_name(self) -> &'static str {
        ROMSET_PARSABLE_NAMES[self.index()]
    }

    /// Liste des noms acceptés en entrée
    pub fn parsable_names() -> &'static [&'static str] {
        &ROMSET_PARSABLE_NAMES
    }

    /// Indique si `location` peut manquer sans rendre le romset incomplet
    pub fn is_optional_rom(self, location: RomLocation) -> bool {
        self == Romset::Jv880
            && matches!(location, RomLocation::WaveRomCard | RomLocation::WaveRomExp)
    }
}

impl fmt::Display for Romset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Nom de romset non reconnu
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("nom de romset invalide: {0}")]
pub struct ParseRomsetError(pub String);

impl FromStr for Romset {
    type Err = ParseRomsetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Romset::ALL
            .iter()
            .copied()
            .find(|romset| romset.parsable_name() == s)
            .ok_or_else(|| ParseRomsetError(s.to_string()))
    }
}

/// Rôle physique d'une puce ROM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RomLocation {
    // ROMs du MCU
    Rom1,
    Rom2,

    // ROM du sous-MCU
    SmRom,

    // ROMs PCM
    WaveRom1,
    WaveRom2,
    WaveRom3,
    WaveRomCard,
    WaveRomExp,
}

impl RomLocation {
    pub const ALL: [RomLocation; ROMLOCATION_COUNT] = [
        RomLocation::Rom1,
        RomLocation::Rom2,
        RomLocation::SmRom,
        RomLocation::WaveRom1,
        RomLocation::WaveRom2,
        RomLocation::WaveRom3,
        RomLocation::WaveRomCard,
        RomLocation::WaveRomExp,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Les ROMs de formes d'onde sont stockées embrouillées sur disque
    pub fn is_waverom(self) -> bool {
        matches!(
            self,
            RomLocation::WaveRom1
                | RomLocation::WaveRom2
                | RomLocation::WaveRom3
                | RomLocation::WaveRomCard
                | RomLocation::WaveRomExp
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            RomLocation::Rom1 => "ROM1",
            RomLocation::Rom2 => "ROM2",
            RomLocation::SmRom => "SMROM",
            RomLocation::WaveRom1 => "WAVEROM1",
            RomLocation::WaveRom2 => "WAVEROM2",
            RomLocation::WaveRom3 => "WAVEROM3",
            RomLocation::WaveRomCard => "WAVEROM_CARD",
            RomLocation::WaveRomExp => "WAVEROM_EXP",
        }
    }

    pub fn flag(self) -> RomLocationSet {
        RomLocationSet::from_bits_retain(1 << self.index())
    }
}

impl fmt::Display for RomLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

bitflags! {
    /// Ensemble de variantes, utilisé comme indice de détection
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct RomsetSet: u16 {
        const MK2 = 1 << 0;
        const ST = 1 << 1;
        const MK1 = 1 << 2;
        const CM300 = 1 << 3;
        const JV880 = 1 << 4;
        const SCB55 = 1 << 5;
        const RLP3237 = 1 << 6;
        const SC155 = 1 << 7;
        const SC155MK2 = 1 << 8;
    }
}

impl RomsetSet {
    pub fn has(self, romset: Romset) -> bool {
        self.contains(RomsetSet::from(romset))
    }
}

impl From<Romset> for RomsetSet {
    fn from(romset: Romset) -> Self {
        RomsetSet::from_bits_retain(1 << romset.index())
    }
}

bitflags! {
    /// Ensemble d'emplacements ROM
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct RomLocationSet: u8 {
        const ROM1 = 1 << 0;
        const ROM2 = 1 << 1;
        const SMROM = 1 << 2;
        const WAVEROM1 = 1 << 3;
        const WAVEROM2 = 1 << 4;
        const WAVEROM3 = 1 << 5;
        const WAVEROM_CARD = 1 << 6;
        const WAVEROM_EXP = 1 << 7;
    }
}

impl RomLocationSet {
    pub fn has(self, location: RomLocation) -> bool {
        self.contains(location.flag())
    }
}
