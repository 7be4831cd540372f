//! Mémoire ROM de l'émulateur, destination des romsets chargés

pub mod interface;
pub mod rom;

pub use interface::{RomDestination, RomImageError};
pub use rom::{RomImage, ROM_CAPACITIES};
