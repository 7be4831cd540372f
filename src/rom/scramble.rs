//! Désembrouillage des ROMs de formes d'onde
//!
//! Sur le matériel, les bus d'adresse et de données de la puce PCM sont câblés
//! dans le désordre. Un dump brut de ROM de formes d'onde est donc embrouillé :
//! l'octet logique `i` se trouve à une adresse dont les 20 bits de poids faible
//! sont permutés, et ses 8 bits de données sont eux aussi permutés.

use super::RomLocation;

/// Taille d'un bloc d'adressage : les bits au-delà du bit 20 ne sont pas permutés
pub const SCRAMBLE_BLOCK_SIZE: usize = 1 << 20;

/// Le bit `j` de la position logique devient le bit `ADDRESS_BITS[j]` de la position source
pub const ADDRESS_BITS: [u32; 20] = [
    2, 0, 3, 4, 1, 9, 13, 10, 18, 17, 6, 15, 11, 16, 8, 5, 12, 7, 14, 19,
];

/// Le bit `j` de l'octet décodé vaut le bit `DATA_BITS[j]` de l'octet source
pub const DATA_BITS: [u32; 8] = [2, 0, 4, 5, 7, 6, 3, 1];

const fn address_table(first_bit: usize) -> [u32; 1024] {
    let mut table = [0u32; 1024];
    let mut value = 0;
    while value < 1024 {
        let mut address = 0u32;
        let mut j = 0;
        while j < 10 {
            if value & (1 << j) != 0 {
                address |= 1 << ADDRESS_BITS[first_bit + j];
            }
            j += 1;
        }
        table[value] = address;
        value += 1;
    }
    table
}

const fn data_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut value = 0;
    while value < 256 {
        let mut data = 0u8;
        let mut j = 0;
        while j < 8 {
            if value & (1 << DATA_BITS[j]) != 0 {
                data |= 1 << j;
            }
            j += 1;
        }
        table[value] = data;
        value += 1;
    }
    table
}

// Bits 0..10 et 10..20 de la position logique
static ADDRESS_LOW: [u32; 1024] = address_table(0);
static ADDRESS_HIGH: [u32; 1024] = address_table(10);
static DATA: [u8; 256] = data_table();

/// Position source de l'octet logique `i`
#[inline]
pub fn source_address(i: usize) -> usize {
    let block = i & !(SCRAMBLE_BLOCK_SIZE - 1);
    let low = ADDRESS_LOW[i & 0x3FF] | ADDRESS_HIGH[(i >> 10) & 0x3FF];
    block | low as usize
}

/// Permutation des bits d'un octet
#[inline]
pub fn unscramble_byte(value: u8) -> u8 {
    DATA[value as usize]
}

/// Désembrouille un dump de ROM de formes d'onde
///
/// La sortie a la même longueur que l'entrée. Si la longueur n'est pas un
/// multiple de [`SCRAMBLE_BLOCK_SIZE`], les positions source qui tombent au-delà
/// de la fin sont lues comme `0x00`.
///
/// La transformation n'est pas idempotente : elle ne doit être appliquée qu'une
/// seule fois à un dump.
pub fn unscramble(scrambled: &[u8]) -> Vec<u8> {
    let mut decoded = vec![0u8; scrambled.len()];
    unscramble_into(scrambled, &mut decoded);
    decoded
}

/// Variante de [`unscramble`] qui écrit dans un buffer existant
///
/// Décode `out.len()` octets logiques, avec la même règle de lecture à zéro
/// au-delà de la fin de `scrambled`.
pub fn unscramble_into(scrambled: &[u8], out: &mut [u8]) {
    for (i, byte) in out.iter_mut().enumerate() {
        let source = scrambled.get(source_address(i)).copied().unwrap_or(0);
        *byte = unscramble_byte(source);
    }
}

/// Convertit le contenu d'un fichier en contenu mémoire pour un emplacement
///
/// Les ROMs de formes d'onde sont désembrouillées, les autres sont reprises telles quelles.
pub fn decode_rom(location: RomLocation, file_data: Vec<u8>) -> Vec<u8> {
    if location.is_waverom() {
        unscramble(&file_data)
    } else {
        file_data
    }
}
