//! Vérification des empreintes et de la complétude des romsets

use sha2::{Digest, Sha256};
use std::fmt;

use super::database::{FingerprintCatalog, Sha256Digest};
use super::loader::AllRomsetInfo;
use super::{RomLocation, Romset, ROMLOCATION_COUNT};

/// Statut de complétude d'un emplacement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RomCompletionStatus {
    /// ROM présente
    Present,

    /// ROM obligatoire absente
    Missing,

    /// Emplacement non utilisé par la variante
    Unused,
}

impl fmt::Display for RomCompletionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RomCompletionStatus::Present => "Présente",
            RomCompletionStatus::Missing => "Manquante",
            RomCompletionStatus::Unused => "Inutilisée",
        })
    }
}

/// Statuts de complétude indexés par `RomLocation`
pub type RomCompletionStatusSet = [RomCompletionStatus; ROMLOCATION_COUNT];

/// Calcule l'empreinte SHA-256 d'un buffer
pub fn sha256_digest(data: &[u8]) -> Sha256Digest {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Empreinte au format hexadécimal minuscule
pub fn digest_to_hex(digest: &Sha256Digest) -> String {
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Indique si `all_info` contient toutes les ROMs obligatoires de `romset`
///
/// Chaque emplacement cité par une entrée du catalogue pour cette variante est
/// `Present` s'il est renseigné, `Missing` s'il ne l'est pas et n'est pas
/// optionnel. Les autres emplacements restent `Unused`.
pub fn is_complete_romset(
    all_info: &AllRomsetInfo,
    catalog: &FingerprintCatalog,
    romset: Romset,
) -> (bool, RomCompletionStatusSet) {
    let mut is_complete = true;
    let mut status = [RomCompletionStatus::Unused; ROMLOCATION_COUNT];

    let info = all_info.get(romset);

    for known in catalog.entries_for(romset) {
        let location = known.location;

        if info.has_rom(location) {
            status[location.index()] = RomCompletionStatus::Present;
        } else if !romset.is_optional_rom(location) {
            is_complete = false;
            status[location.index()] = RomCompletionStatus::Missing;
        }
    }

    (is_complete, status)
}

/// Résultat détaillé de l'évaluation de complétude
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionReport {
    pub romset: Romset,
    pub is_complete: bool,
    pub status: RomCompletionStatusSet,
}

impl CompletionReport {
    /// Emplacements obligatoires manquants
    pub fn missing(&self) -> Vec<RomLocation> {
        RomLocation::ALL
            .into_iter()
            .filter(|location| self.status[location.index()] == RomCompletionStatus::Missing)
            .collect()
    }
}

/// Même évaluation que [`is_complete_romset`], sous forme de structure
pub fn evaluate_completion(
    all_info: &AllRomsetInfo,
    catalog: &FingerprintCatalog,
    romset: Romset,
) -> CompletionReport {
    let (is_complete, status) = is_complete_romset(all_info, catalog, romset);
    CompletionReport {
        romset,
        is_complete,
        status,
    }
}

/// Première variante complète dans l'ordre de déclaration
pub fn pick_complete_romset(all_info: &AllRomsetInfo, catalog: &FingerprintCatalog) -> Option<Romset> {
    Romset::ALL
        .into_iter()
        .find(|romset| is_complete_romset(all_info, catalog, *romset).0)
}
