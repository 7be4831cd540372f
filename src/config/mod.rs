//! Configuration du chargeur de romsets

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::rom::{RomLocation, RomOverrides, RomsetRequest};

/// Configuration principale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RomsetConfig {
    pub rom_directory: PathBuf,

    /// Nom court de la variante ("mk2", "jv880"...), absent pour l'autodétection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub romset: Option<String>,

    pub legacy_loader: bool,
    pub overrides: OverrideConfig,
}

/// Chemins imposés, un par emplacement
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverrideConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rom1: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rom2: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smrom: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waverom1: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waverom2: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waverom3: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waverom_card: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waverom_exp: Option<PathBuf>,
}

impl Default for RomsetConfig {
    fn default() -> Self {
        Self {
            rom_directory: PathBuf::from("roms"),
            romset: None,
            legacy_loader: false,
            overrides: OverrideConfig::default(),
        }
    }
}

impl OverrideConfig {
    pub fn get(&self, location: RomLocation) -> Option<&PathBuf> {
        match location {
            RomLocation::Rom1 => self.rom1.as_ref(),
            RomLocation::Rom2 => self.rom2.as_ref(),
            RomLocation::SmRom => self.smrom.as_ref(),
            RomLocation::WaveRom1 => self.waverom1.as_ref(),
            RomLocation::WaveRom2 => self.waverom2.as_ref(),
            RomLocation::WaveRom3 => self.waverom3.as_ref(),
            RomLocation::WaveRomCard => self.waverom_card.as_ref(),
            RomLocation::WaveRomExp => self.waverom_exp.as_ref(),
        }
    }

    pub fn set(&mut self, location: RomLocation, path: impl Into<PathBuf>) {
        let slot = match location {
            RomLocation::Rom1 => &mut self.rom1,
            RomLocation::Rom2 => &mut self.rom2,
            RomLocation::SmRom => &mut self.smrom,
            RomLocation::WaveRom1 => &mut self.waverom1,
            RomLocation::WaveRom2 => &mut self.waverom2,
            RomLocation::WaveRom3 => &mut self.waverom3,
            RomLocation::WaveRomCard => &mut self.waverom_card,
            RomLocation::WaveRomExp => &mut self.waverom_exp,
        };
        *slot = Some(path.into());
    }

    pub fn to_overrides(&self) -> RomOverrides {
        let mut overrides = RomOverrides::new();
        for location in RomLocation::ALL {
            if let Some(path) = self.get(location).filter(|path| !path.as_os_str().is_empty()) {
                overrides.set(location, path.clone());
            }
        }
        overrides
    }
}

impl RomsetConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: RomsetConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load_from_file(path).unwrap_or_default()
    }

    /// Construit la requête de chargement correspondante
    ///
    /// Un nom de romset vide équivaut à l'autodétection.
    pub fn to_request(&self) -> RomsetRequest {
        RomsetRequest {
            rom_directory: self.rom_directory.clone(),
            romset_name: self.romset.clone().filter(|name| !name.is_empty()),
            legacy_loader: self.legacy_loader,
            overrides: self.overrides.to_overrides(),
        }
    }
}
