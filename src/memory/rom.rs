//! Image mémoire des ROMs d'une unité SC-55

use super::interface::RomDestination;
use crate::rom::{RomLocation, ROMLOCATION_COUNT};

/// Capacité du buffer de chaque emplacement, indexée par `RomLocation`
pub const ROM_CAPACITIES: [usize; ROMLOCATION_COUNT] = [
    0x8000,   // ROM1
    0x80000,  // ROM2
    0x1000,   // SMROM
    0x200000, // WAVEROM1
    0x200000, // WAVEROM2
    0x100000, // WAVEROM3
    0x200000, // WAVEROM_CARD
    0x800000, // WAVEROM_EXP
];

/// Buffers ROM du MCU, du sous-MCU et de la puce PCM
#[derive(Debug, Clone)]
pub struct RomImage {
    buffers: [Vec<u8>; ROMLOCATION_COUNT],
    rom2_mask: usize,
}

impl RomImage {
    /// Crée une image vide, tous les buffers à zéro
    pub fn new() -> Self {
        Self {
            buffers: ROM_CAPACITIES.map(|capacity| vec![0u8; capacity]),
            rom2_mask: 0,
        }
    }

    pub fn capacity(location: RomLocation) -> usize {
        ROM_CAPACITIES[location.index()]
    }

    pub fn buffer(&self, location: RomLocation) -> &[u8] {
        &self.buffers[location.index()]
    }

    pub fn rom2_mask(&self) -> usize {
        self.rom2_mask
    }

    /// Lecture dans ROM2 avec repliement sur la taille réelle de la puce
    pub fn read_rom2(&self, address: usize) -> u8 {
        self.buffers[RomLocation::Rom2.index()][address & self.rom2_mask]
    }

    /// Remet tous les buffers à zéro
    pub fn clear(&mut self) {
        for buffer in &mut self.buffers {
            buffer.fill(0);
        }
        self.rom2_mask = 0;
    }
}

impl Default for RomImage {
    fn default() -> Self {
        Self::new()
    }
}

impl RomDestination for RomImage {
    fn map_buffer(&mut self, location: RomLocation) -> &mut [u8] {
        &mut self.buffers[location.index()]
    }

    fn set_rom2_mask(&mut self, mask: usize) {
        self.rom2_mask = mask;
    }
}
