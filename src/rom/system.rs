//! Orchestration complète : détection, sélection, surcharges, chargement

use log::{debug, info, warn};
use std::path::PathBuf;
use thiserror::Error;

use super::database::FingerprintCatalog;
use super::detection::{detect_romsets_by_filename, detect_romsets_by_hash, DetectError};
use super::loader::{load_romset_data, AllRomsetInfo, RomLoadStatus, RomLoadStatusSet};
use super::validation::{
    evaluate_completion, pick_complete_romset, CompletionReport, RomCompletionStatus, RomCompletionStatusSet,
};
use super::{RomLocation, Romset, RomsetSet, ROMLOCATION_COUNT};

/// Chemins imposés par l'utilisateur, indexés par `RomLocation`
///
/// Un chemin absent ou vide laisse l'emplacement à la détection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RomOverrides {
    pub paths: [Option<PathBuf>; ROMLOCATION_COUNT],
}

impl RomOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, location: RomLocation, path: impl Into<PathBuf>) {
        self.paths[location.index()] = Some(path.into());
    }

    /// Chemin effectif pour un emplacement, les chemins vides sont ignorés
    pub fn get(&self, location: RomLocation) -> Option<&PathBuf> {
        self.paths[location.index()]
            .as_ref()
            .filter(|path| !path.as_os_str().is_empty())
    }

    pub fn is_empty(&self) -> bool {
        RomLocation::ALL.into_iter().all(|location| self.get(location).is_none())
    }
}

/// Paramètres d'un chargement
#[derive(Debug, Clone, Default)]
pub struct RomsetRequest {
    /// Répertoire contenant les ROMs
    pub rom_directory: PathBuf,

    /// Variante voulue (nom court, ex: "mk2"), `None` pour l'autodétection
    pub romset_name: Option<String>,

    /// Détection par noms de fichiers historiques plutôt que par empreinte
    pub legacy_loader: bool,

    pub overrides: RomOverrides,
}

impl RomsetRequest {
    pub fn new(rom_directory: impl Into<PathBuf>) -> Self {
        Self {
            rom_directory: rom_directory.into(),
            ..Self::default()
        }
    }

    pub fn with_romset(mut self, name: impl Into<String>) -> Self {
        self.romset_name = Some(name.into());
        self
    }

    pub fn with_legacy_loader(mut self, legacy_loader: bool) -> Self {
        self.legacy_loader = legacy_loader;
        self
    }

    pub fn with_override(mut self, location: RomLocation, path: impl Into<PathBuf>) -> Self {
        self.overrides.set(location, path);
        self
    }
}

/// Romset chargé avec succès
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRomsetResult {
    pub romset: Romset,
    pub loaded: RomLoadStatusSet,
    pub completion: RomCompletionStatusSet,
}

/// Erreurs de chargement d'un romset
#[derive(Debug, Error)]
pub enum LoadRomsetError {
    #[error("nom de romset invalide")]
    InvalidRomsetName,

    #[error("échec de la détection des romsets")]
    DetectionFailed {
        #[from]
        source: DetectError,
    },

    #[error("aucun romset complet")]
    NoCompleteRomsets,

    #[error("le romset {romset} est incomplet")]
    IncompleteRomset {
        romset: Romset,
        completion: RomCompletionStatusSet,
    },

    #[error("échec du chargement des ROMs {romset}")]
    RomLoadFailed { romset: Romset, loaded: RomLoadStatusSet },
}

/// Chargeur de romsets
///
/// Encapsule le catalogue d'empreintes utilisé par la détection et la
/// vérification de complétude.
#[derive(Debug, Clone, Copy)]
pub struct RomsetLoader<'a> {
    catalog: &'a FingerprintCatalog,
}

impl Default for RomsetLoader<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl RomsetLoader<'static> {
    /// Chargeur basé sur le catalogue des puces connues
    pub fn new() -> Self {
        Self {
            catalog: FingerprintCatalog::builtin(),
        }
    }
}

impl<'a> RomsetLoader<'a> {
    pub fn with_catalog(catalog: &'a FingerprintCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'a FingerprintCatalog {
        self.catalog
    }

    /// Détecte, sélectionne et charge un romset depuis `request.rom_directory`
    ///
    /// `all_info` reçoit les chemins et contenus trouvés. Il n'est pas remis à
    /// zéro en cas d'erreur : ce qui a été détecté ou chargé reste disponible.
    pub fn load(
        &self,
        all_info: &mut AllRomsetInfo,
        request: &RomsetRequest,
    ) -> Result<LoadRomsetResult, LoadRomsetError> {
        let base = request.rom_directory.as_path();
        let requested = request.romset_name.as_deref().filter(|name| !name.is_empty());

        let romset = match requested {
            Some(name) => {
                let romset: Romset = name.parse().map_err(|_| LoadRomsetError::InvalidRomsetName)?;
                let desired = Some(RomsetSet::from(romset));

                // Variante connue : la détection peut se limiter à elle
                if request.legacy_loader {
                    detect_romsets_by_filename(base, all_info, desired);
                } else {
                    detect_romsets_by_hash(base, all_info, self.catalog, desired)?;
                }

                romset
            }
            None => {
                if request.legacy_loader {
                    detect_romsets_by_filename(base, all_info, None);
                } else {
                    detect_romsets_by_hash(base, all_info, self.catalog, None)?;
                }

                pick_complete_romset(all_info, self.catalog).ok_or(LoadRomsetError::NoCompleteRomsets)?
            }
        };

        info!("Romset sélectionné: {}", romset);

        apply_overrides(all_info, &request.overrides);

        let report = evaluate_completion(all_info, self.catalog, romset);
        if !report.is_complete {
            let missing: Vec<&str> = report.missing().into_iter().map(RomLocation::name).collect();
            warn!("Romset {} incomplet, ROMs manquantes: {}", romset, missing.join(", "));
            return Err(LoadRomsetError::IncompleteRomset {
                romset,
                completion: report.status,
            });
        }
        let completion = report.status;

        let (all_loaded, loaded) = load_romset_data(romset, all_info);
        if !all_loaded {
            return Err(LoadRomsetError::RomLoadFailed { romset, loaded });
        }

        Ok(LoadRomsetResult {
            romset,
            loaded,
            completion,
        })
    }
}

/// Raccourci pour [`RomsetLoader::load`] avec le catalogue intégré
pub fn load_romset(all_info: &mut AllRomsetInfo, request: &RomsetRequest) -> Result<LoadRomsetResult, LoadRomsetError> {
    RomsetLoader::new().load(all_info, request)
}

/// Applique les surcharges à toutes les variantes
///
/// Le contenu éventuellement déjà chargé est invalidé, il sera relu depuis
/// le chemin imposé.
fn apply_overrides(all_info: &mut AllRomsetInfo, overrides: &RomOverrides) {
    for location in RomLocation::ALL {
        let Some(path) = overrides.get(location) else {
            continue;
        };

        info!("Surcharge {}: {}", location, path.display());

        for info in &mut all_info.romsets {
            info.rom_paths[location.index()] = Some(path.clone());
            info.rom_data[location.index()] = None;
        }
    }
}

/// Rapport texte d'un chargement, destiné à l'utilisateur
pub fn generate_load_report(
    result: &Result<LoadRomsetResult, LoadRomsetError>,
    all_info: &AllRomsetInfo,
) -> String {
    let mut report = String::new();

    let path_of = |romset: Romset, location: RomLocation| {
        all_info
            .get(romset)
            .rom_path(location)
            .map(|path| path.display().to_string())
            .unwrap_or_default()
    };

    match result {
        Ok(loaded) => {
            report.push_str(&format!("Romset utilisé: {}\n", loaded.romset));
            for location in RomLocation::ALL {
                if loaded.loaded[location.index()] == RomLoadStatus::Loaded {
                    report.push_str(&format!(
                        "  * {:<12} {}\n",
                        location.name(),
                        path_of(loaded.romset, location)
                    ));
                }
            }
        }
        Err(error @ LoadRomsetError::InvalidRomsetName) => {
            report.push_str(&format!("erreur: {}\n", error));
            report.push_str("Noms de romset acceptés:\n  ");
            report.push_str(&Romset::parsable_names().join(" "));
            report.push('\n');
        }
        Err(error @ LoadRomsetError::DetectionFailed { source }) => {
            report.push_str(&format!("erreur: {}: {}\n", error, source));
        }
        Err(error @ LoadRomsetError::NoCompleteRomsets) => {
            report.push_str(&format!("erreur: {}\n", error));
        }
        Err(LoadRomsetError::IncompleteRomset { romset, completion }) => {
            report.push_str(&format!("Le romset {} est incomplet:\n", romset));
            for location in RomLocation::ALL {
                let status = completion[location.index()];
                match status {
                    RomCompletionStatus::Unused => {}
                    RomCompletionStatus::Present => report.push_str(&format!(
                        "  * {:>9}: {:<12} {}\n",
                        status.to_string(),
                        location.name(),
                        path_of(*romset, location)
                    )),
                    RomCompletionStatus::Missing => report.push_str(&format!(
                        "  * {:>9}: {}\n",
                        status.to_string(),
                        location.name()
                    )),
                }
            }

            let completion_report = CompletionReport {
                romset: *romset,
                is_complete: false,
                status: *completion,
            };
            let missing: Vec<&str> = completion_report.missing().into_iter().map(RomLocation::name).collect();
            report.push_str(&format!("{} ROM(s) manquante(s): {}\n", missing.len(), missing.join(" ")));
        }
        Err(LoadRomsetError::RomLoadFailed { romset, loaded }) => {
            report.push_str(&format!("Échec du chargement de certaines ROMs {}:\n", romset));
            for location in RomLocation::ALL {
                let status = loaded[location.index()];
                if status != RomLoadStatus::Unused {
                    report.push_str(&format!(
                        "  * {}: {:<12} {}\n",
                        status,
                        location.name(),
                        path_of(*romset, location)
                    ));
                }
            }
        }
    }

    debug!("Rapport de chargement généré ({} lignes)", report.lines().count());
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rom::database::KnownHash;
    use crate::rom::validation::sha256_digest;
    use anyhow::Result;
    use std::fs;
    use tempfile::TempDir;

    const MK2_LOCATIONS: [RomLocation; 5] = [
        RomLocation::Rom1,
        RomLocation::Rom2,
        RomLocation::SmRom,
        RomLocation::WaveRom1,
        RomLocation::WaveRom2,
    ];

    fn write_mk2_files(dir: &std::path::Path) -> Result<FingerprintCatalog> {
        let mut entries = Vec::new();
        for location in MK2_LOCATIONS {
            let content = format!("contenu {}", location.name()).into_bytes();
            fs::write(dir.join(format!("{}.bin", location.name().to_lowercase())), &content)?;
            entries.push(KnownHash {
                digest: sha256_digest(&content),
                romset: Romset::Mk2,
                location,
            });
        }
        Ok(FingerprintCatalog::new(entries))
    }

    #[test]
    fn test_invalid_name_before_filesystem_access() {
        let mut all_info = AllRomsetInfo::new();
        let request = RomsetRequest::new("/nonexistent/sc55-romset").with_romset("SC-55");

        let result = load_romset(&mut all_info, &request);

        assert!(matches!(result, Err(LoadRomsetError::InvalidRomsetName)));
        let report = generate_load_report(&result, &all_info);
        assert!(report.contains("mk2 st mk1 cm300 jv880 scb55 rlp3237 sc155 sc155mk2"));
    }

    #[test]
    fn test_empty_name_means_autodetect() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let catalog = write_mk2_files(temp_dir.path())?;
        let loader = RomsetLoader::with_catalog(&catalog);
        let mut all_info = AllRomsetInfo::new();

        let request = RomsetRequest::new(temp_dir.path()).with_romset("");
        let result = loader.load(&mut all_info, &request)?;

        assert_eq!(result.romset, Romset::Mk2);
        Ok(())
    }

    #[test]
    fn test_detection_failure_propagates() {
        let mut all_info = AllRomsetInfo::new();
        let request = RomsetRequest::new("/nonexistent/sc55-romset");

        let result = load_romset(&mut all_info, &request);

        assert!(matches!(result, Err(LoadRomsetError::DetectionFailed { .. })));
    }

    #[test]
    fn test_no_complete_romsets() -> Result<()> {
        let temp_dir = TempDir::new()?;
        fs::write(temp_dir.path().join("random.bin"), b"rien de connu")?;
        let mut all_info = AllRomsetInfo::new();

        let result = load_romset(&mut all_info, &RomsetRequest::new(temp_dir.path()));

        assert!(matches!(result, Err(LoadRomsetError::NoCompleteRomsets)));
        Ok(())
    }

    #[test]
    fn test_requested_romset_incomplete() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let catalog = write_mk2_files(temp_dir.path())?;
        fs::remove_file(temp_dir.path().join("smrom.bin"))?;
        let loader = RomsetLoader::with_catalog(&catalog);
        let mut all_info = AllRomsetInfo::new();

        let request = RomsetRequest::new(temp_dir.path()).with_romset("mk2");
        let result = loader.load(&mut all_info, &request);

        match &result {
            Err(LoadRomsetError::IncompleteRomset { romset, completion }) => {
                assert_eq!(*romset, Romset::Mk2);
                assert_eq!(completion[RomLocation::SmRom.index()], RomCompletionStatus::Missing);
                assert_eq!(completion[RomLocation::Rom1.index()], RomCompletionStatus::Present);
            }
            other => panic!("résultat inattendu: {:?}", other),
        }

        let report = generate_load_report(&result, &all_info);
        assert!(report.contains("Manquante: SMROM"));
        assert!(report.contains("Présente: ROM1"));
        assert!(report.contains("1 ROM(s) manquante(s): SMROM"));
        Ok(())
    }

    #[test]
    fn test_override_clears_every_romset() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let catalog = write_mk2_files(temp_dir.path())?;
        let replacement = temp_dir.path().join("other").join("rom2.bin");
        fs::create_dir(temp_dir.path().join("other"))?;
        fs::write(&replacement, b"rom2 modifiee")?;

        let mut all_info = AllRomsetInfo::new();
        all_info.get_mut(Romset::Jv880).rom_data[RomLocation::Rom2.index()] = Some(vec![1, 2, 3]);

        let loader = RomsetLoader::with_catalog(&catalog);
        let request = RomsetRequest::new(temp_dir.path())
            .with_romset("mk2")
            .with_override(RomLocation::Rom2, &replacement);

        let result = loader.load(&mut all_info, &request)?;

        assert_eq!(result.loaded[RomLocation::Rom2.index()], RomLoadStatus::Loaded);
        for romset in Romset::ALL {
            assert_eq!(all_info.get(romset).rom_path(RomLocation::Rom2), Some(replacement.as_path()));
        }
        assert!(all_info.get(Romset::Jv880).rom_data(RomLocation::Rom2).is_none());
        assert_eq!(
            all_info.get(Romset::Mk2).rom_data(RomLocation::Rom2),
            Some(&b"rom2 modifiee"[..])
        );
        Ok(())
    }

    #[test]
    fn test_empty_override_is_ignored() {
        let mut overrides = RomOverrides::new();
        overrides.set(RomLocation::Rom1, "");
        assert!(overrides.get(RomLocation::Rom1).is_none());
        assert!(overrides.is_empty());

        let mut all_info = AllRomsetInfo::new();
        apply_overrides(&mut all_info, &overrides);
        assert!(!all_info.get(Romset::Mk2).has_rom(RomLocation::Rom1));
    }

    #[test]
    fn test_unreadable_override_fails_load() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let catalog = write_mk2_files(temp_dir.path())?;
        let loader = RomsetLoader::with_catalog(&catalog);
        let mut all_info = AllRomsetInfo::new();

        let request = RomsetRequest::new(temp_dir.path())
            .with_romset("mk2")
            .with_override(RomLocation::WaveRom2, temp_dir.path().join("absent.bin"));
        let result = loader.load(&mut all_info, &request);

        match &result {
            Err(LoadRomsetError::RomLoadFailed { romset, loaded }) => {
                assert_eq!(*romset, Romset::Mk2);
                assert_eq!(loaded[RomLocation::WaveRom2.index()], RomLoadStatus::Failed);
                assert_eq!(loaded[RomLocation::WaveRom1.index()], RomLoadStatus::Loaded);
            }
            other => panic!("résultat inattendu: {:?}", other),
        }

        let report = generate_load_report(&result, &all_info);
        assert!(report.contains("Échec: WAVEROM2"));
        Ok(())
    }

    #[test]
    fn test_success_report_lists_loaded_roms() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let catalog = write_mk2_files(temp_dir.path())?;
        let loader = RomsetLoader::with_catalog(&catalog);
        let mut all_info = AllRomsetInfo::new();

        let result = loader.load(&mut all_info, &RomsetRequest::new(temp_dir.path()));
        let report = generate_load_report(&result, &all_info);

        assert!(report.starts_with("Romset utilisé: SC-55mk2"));
        assert_eq!(report.lines().filter(|line| line.starts_with("  * ")).count(), 5);
        Ok(())
    }
}
