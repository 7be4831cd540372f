//! Interface entre le chargeur de romsets et la mémoire de l'émulateur

use thiserror::Error;

use crate::rom::{AllRomsetInfo, RomLocation, RomLocationSet, Romset};

/// Refus d'une ROM par la destination
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RomImageError {
    #[error("ROM {location} trop grande: {size} octets pour une capacité de {capacity}")]
    TooLarge {
        location: RomLocation,
        size: usize,
        capacity: usize,
    },

    #[error("ROM {location} doit avoir une taille puissance de 2 ({size} octets)")]
    NotPowerOfTwo { location: RomLocation, size: usize },
}

/// Trait implémenté par la mémoire qui reçoit les ROMs décodées
///
/// Chaque emplacement correspond à un buffer de capacité fixe.
pub trait RomDestination {
    /// Buffer de destination pour un emplacement
    fn map_buffer(&mut self, location: RomLocation) -> &mut [u8];

    /// Masque d'adressage de ROM2 (taille - 1)
    fn set_rom2_mask(&mut self, mask: usize);

    /// Copie une ROM dans son buffer
    ///
    /// Une source plus grande que le buffer est refusée. ROM2 doit en plus
    /// avoir une taille puissance de 2, ce qui fixe son masque d'adressage.
    fn load_rom(&mut self, location: RomLocation, source: &[u8]) -> Result<(), RomImageError> {
        let capacity = self.map_buffer(location).len();
        if source.len() > capacity {
            return Err(RomImageError::TooLarge {
                location,
                size: source.len(),
                capacity,
            });
        }

        if location == RomLocation::Rom2 {
            if !source.len().is_power_of_two() {
                return Err(RomImageError::NotPowerOfTwo {
                    location,
                    size: source.len(),
                });
            }
            self.set_rom2_mask(source.len() - 1);
        }

        self.map_buffer(location)[..source.len()].copy_from_slice(source);
        Ok(())
    }

    /// Copie toutes les ROMs chargées d'une variante
    ///
    /// Les emplacements sans contenu sont ignorés. S'arrête au premier refus.
    fn load_roms(&mut self, romset: Romset, all_info: &AllRomsetInfo) -> Result<RomLocationSet, RomImageError> {
        let mut loaded = RomLocationSet::empty();
        let info = all_info.get(romset);

        for location in RomLocation::ALL {
            let Some(data) = info.rom_data(location).filter(|data| !data.is_empty()) else {
                continue;
            };

            self.load_rom(location, data)?;
            loaded |= location.flag();
        }

        Ok(loaded)
    }
}
