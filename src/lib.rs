//! SC-55 Romset - Détection et chargement des ROMs de la famille Roland SC-55
//!
//! Cette bibliothèque identifie les dumps de ROM présents dans un répertoire
//! (par nom de fichier ou par empreinte SHA-256), choisit une variante
//! matérielle complète, désembrouille les ROMs de formes d'onde et fournit des
//! buffers prêts à être copiés dans la mémoire d'un émulateur.

pub mod config;
pub mod memory;
pub mod rom;

pub use config::*;
pub use memory::*;
pub use rom::*;

/// Version de la bibliothèque
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
