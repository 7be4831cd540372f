//! Base de données des empreintes ROM connues
//!
//! Deux tables statiques : les empreintes SHA-256 de chaque puce connue
//! (plusieurs révisions de firmware par variante) et les noms de fichiers
//! historiques utilisés par le chargeur legacy.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::OnceLock;

use super::{RomLocation, Romset, ROMLOCATION_COUNT, ROMSET_COUNT};

/// Empreinte SHA-256 brute
pub type Sha256Digest = [u8; 32];

/// Empreinte réservée : puce connue mais contenu jamais vérifié
pub const PLACEHOLDER_DIGEST: Sha256Digest = [0; 32];

/// Associe une empreinte à un emplacement d'une variante
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownHash {
    pub digest: Sha256Digest,
    pub romset: Romset,
    pub location: RomLocation,
}

impl KnownHash {
    pub fn is_placeholder(&self) -> bool {
        self.digest == PLACEHOLDER_DIGEST
    }
}

const fn hex_value(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => 10 + (c - b'a'),
        b'A'..=b'F' => 10 + (c - b'A'),
        _ => panic!("caractère hexadécimal invalide"),
    }
}

/// Convertit 64 caractères hexadécimaux en empreinte (évaluable à la compilation)
pub const fn digest_from_hex(s: &str) -> Sha256Digest {
    let bytes = s.as_bytes();
    assert!(bytes.len() == 64, "une empreinte SHA-256 fait 64 caractères");

    let mut digest = [0u8; 32];
    let mut i = 0;
    while i < 32 {
        digest[i] = (hex_value(bytes[2 * i]) << 4) | hex_value(bytes[2 * i + 1]);
        i += 1;
    }
    digest
}

const fn known(hex: &str, romset: Romset, location: RomLocation) -> KnownHash {
    KnownHash {
        digest: digest_from_hex(hex),
        romset,
        location,
    }
}

const fn placeholder(romset: Romset, location: RomLocation) -> KnownHash {
    KnownHash {
        digest: PLACEHOLDER_DIGEST,
        romset,
        location,
    }
}

/// Empreintes de toutes les puces connues
#[rustfmt::skip]
pub static ROM_HASHES: &[KnownHash] = &[
    // SC-55mk2/SC-155mk2 (v1.01)

    // R15199858 (H8/532 mcu)
    known("8a1eb33c7599b746c0c50283e4349a1bb1773b5c0ec0e9661219bf6c067d2042", Romset::Mk2, RomLocation::Rom1),
    // R00233567 (H8/532 extra code)
    known("a4c9fd821059054c7e7681d61f49ce6f42ed2fe407a7ec1ba0dfdc9722582ce0", Romset::Mk2, RomLocation::Rom2),
    // R15199880 (M37450M2 mcu)
    known("b0b5f865a403f7308b4be8d0ed3ba2ed1c22db881b8a8326769dea222f6431d8", Romset::Mk2, RomLocation::SmRom),
    // R15209359 (WAVE 16M)
    known("c6429e21b9b3a02fbd68ef0b2053668433bee0bccd537a71841bc70b8874243b", Romset::Mk2, RomLocation::WaveRom1),
    // R15279813 (WAVE 8M)
    known("5b753f6cef4cfc7fcafe1430fecbb94a739b874e55356246a46abe24097ee491", Romset::Mk2, RomLocation::WaveRom2),

    // R15199858 (H8/532 mcu)
    known("8a1eb33c7599b746c0c50283e4349a1bb1773b5c0ec0e9661219bf6c067d2042", Romset::Sc155Mk2, RomLocation::Rom1),
    // R00233567 (H8/532 extra code)
    known("a4c9fd821059054c7e7681d61f49ce6f42ed2fe407a7ec1ba0dfdc9722582ce0", Romset::Sc155Mk2, RomLocation::Rom2),
    // R15199880 (M37450M2 mcu)
    known("b0b5f865a403f7308b4be8d0ed3ba2ed1c22db881b8a8326769dea222f6431d8", Romset::Sc155Mk2, RomLocation::SmRom),
    // R15209359 (WAVE 16M)
    known("c6429e21b9b3a02fbd68ef0b2053668433bee0bccd537a71841bc70b8874243b", Romset::Sc155Mk2, RomLocation::WaveRom1),
    // R15279813 (WAVE 8M)
    known("5b753f6cef4cfc7fcafe1430fecbb94a739b874e55356246a46abe24097ee491", Romset::Sc155Mk2, RomLocation::WaveRom2),

    // SC-55st (v1.01)

    // R15199858 (H8/532 mcu)
    known("8a1eb33c7599b746c0c50283e4349a1bb1773b5c0ec0e9661219bf6c067d2042", Romset::St, RomLocation::Rom1),
    // R00561413 (H8/532 extra code)
    placeholder(Romset::St, RomLocation::Rom2),
    // R15199880 (M37450M2 mcu)
    known("b0b5f865a403f7308b4be8d0ed3ba2ed1c22db881b8a8326769dea222f6431d8", Romset::St, RomLocation::SmRom),
    // R15209359 (WAVE 16M)
    known("c6429e21b9b3a02fbd68ef0b2053668433bee0bccd537a71841bc70b8874243b", Romset::St, RomLocation::WaveRom1),
    // R15279813 (WAVE 8M)
    known("5b753f6cef4cfc7fcafe1430fecbb94a739b874e55356246a46abe24097ee491", Romset::St, RomLocation::WaveRom2),

    // SC-55 (v1.00)

    // R15199748 (H8/532 mcu)
    known("b4ecf44bc0520322b0d114d397951d3bf92ca6fa51d0d27b2407df58a6be2efe", Romset::Mk1, RomLocation::Rom1),
    // R1544925800 (H8/532 extra code)
    known("014e2e21ea30de7a1e4f1cdea14dd9a719960535e257a9e40e98dbb1a5870226", Romset::Mk1, RomLocation::Rom2),
    // R15209276 (WAVE A)
    known("5655509a531804f97ea2d7ef05b8fec20ebf46216b389a84c44169257a4d2007", Romset::Mk1, RomLocation::WaveRom1),
    // R15209277 (WAVE B)
    known("c655b159792d999b90df9e4fa782cf56411ba1eaa0bb3ac2bdaf09e1391006b1", Romset::Mk1, RomLocation::WaveRom2),
    // R15209281 (WAVE C)
    known("334b2d16be3c2362210fdbec1c866ad58badeb0f84fd9bf5d0ac599baf077cc2", Romset::Mk1, RomLocation::WaveRom3),

    // SC-55 (v1.10)

    // R15199736 (H8/532 mcu)
    placeholder(Romset::Mk1, RomLocation::Rom1),
    // R15209275 (H8/532 extra code)
    placeholder(Romset::Mk1, RomLocation::Rom2),
    // R15209276 (WAVE A)
    known("5655509a531804f97ea2d7ef05b8fec20ebf46216b389a84c44169257a4d2007", Romset::Mk1, RomLocation::WaveRom1),
    // R15209277 (WAVE B)
    known("c655b159792d999b90df9e4fa782cf56411ba1eaa0bb3ac2bdaf09e1391006b1", Romset::Mk1, RomLocation::WaveRom2),
    // R15209281 (WAVE C)
    known("334b2d16be3c2362210fdbec1c866ad58badeb0f84fd9bf5d0ac599baf077cc2", Romset::Mk1, RomLocation::WaveRom3),

    // SC-55 (v1.20)

    // R15199778 (H8/532 mcu)
    known("7e1bacd1d7c62ed66e465ba05597dcd60dfc13fc23de0287fdbce6cf906c6544", Romset::Mk1, RomLocation::Rom1),
    // R1544925800 (H8/532 extra code)?
    known("22ce6ca59e6332143b335525e81fab501ea6fccce4b7e2f3bfc2cc8bf6612ff6", Romset::Mk1, RomLocation::Rom2),
    // R15209276 (WAVE A)
    known("5655509a531804f97ea2d7ef05b8fec20ebf46216b389a84c44169257a4d2007", Romset::Mk1, RomLocation::WaveRom1),
    // R15209277 (WAVE B)
    known("c655b159792d999b90df9e4fa782cf56411ba1eaa0bb3ac2bdaf09e1391006b1", Romset::Mk1, RomLocation::WaveRom2),
    // R15209281 (WAVE C)
    known("334b2d16be3c2362210fdbec1c866ad58badeb0f84fd9bf5d0ac599baf077cc2", Romset::Mk1, RomLocation::WaveRom3),

    // SC-55 (v1.21)

    // R15199778 (H8/532 mcu)
    known("7e1bacd1d7c62ed66e465ba05597dcd60dfc13fc23de0287fdbce6cf906c6544", Romset::Mk1, RomLocation::Rom1),
    // R15209363 (H8/532 extra code)
    known("effc6132d68f7e300aaef915ccdd08aba93606c22d23e580daf9ea6617913af1", Romset::Mk1, RomLocation::Rom2),
    // R15209276 (WAVE A)
    known("5655509a531804f97ea2d7ef05b8fec20ebf46216b389a84c44169257a4d2007", Romset::Mk1, RomLocation::WaveRom1),
    // R15209277 (WAVE B)
    known("c655b159792d999b90df9e4fa782cf56411ba1eaa0bb3ac2bdaf09e1391006b1", Romset::Mk1, RomLocation::WaveRom2),
    // R15209281 (WAVE C)
    known("334b2d16be3c2362210fdbec1c866ad58badeb0f84fd9bf5d0ac599baf077cc2", Romset::Mk1, RomLocation::WaveRom3),

    // SC-55 (v2.00)

    // R15199799 (H8/532 mcu)
    known("24a65c97cdbaa847d6f59193523ce63c73394b4b693a6517ee79441f2fb8a3ee", Romset::Mk1, RomLocation::Rom1),
    // R15209387 (H8/532 extra code)
    known("f5dac35d450ab986570a209dff3816eec75cee669e161f54b51224b467dd0bcc", Romset::Mk1, RomLocation::Rom2),
    // R15209276 (WAVE A)
    known("5655509a531804f97ea2d7ef05b8fec20ebf46216b389a84c44169257a4d2007", Romset::Mk1, RomLocation::WaveRom1),
    // R15209277 (WAVE B)
    known("c655b159792d999b90df9e4fa782cf56411ba1eaa0bb3ac2bdaf09e1391006b1", Romset::Mk1, RomLocation::WaveRom2),
    // R15209281 (WAVE C)
    known("334b2d16be3c2362210fdbec1c866ad58badeb0f84fd9bf5d0ac599baf077cc2", Romset::Mk1, RomLocation::WaveRom3),

    // CM-300/SCC-1 (v1.10)

    // R15199774 (H8/532 mcu)
    placeholder(Romset::Cm300, RomLocation::Rom1),
    // R15279809 (H8/532 extra code)
    known("0283d32e6993a0265710c4206463deb937b0c3a4819b69f471a0eca5865719f9", Romset::Cm300, RomLocation::Rom2),
    // R15279806 (WAVE A)
    known("40c093cbfb4441a5c884e623f882a80b96b2527f9fd431e074398d206c0f073d", Romset::Cm300, RomLocation::WaveRom1),
    // R15279807 (WAVE B)
    known("9bbbcac747bd6f7a2693f4ef10633db8ab626f17d3d9c47c83c3839d4dd2f613", Romset::Cm300, RomLocation::WaveRom2),
    // R15279808 (WAVE C)
    known("5b753f6cef4cfc7fcafe1430fecbb94a739b874e55356246a46abe24097ee491", Romset::Cm300, RomLocation::WaveRom3),

    // CM-300/SCC-1 (v1.20)

    // R15199774 (H8/532 mcu)
    placeholder(Romset::Cm300, RomLocation::Rom1),
    // R15279812 (H8/532 extra code)
    known("fef1acb1969525d66238be5e7811108919b07a4df5fbab656ad084966373483f", Romset::Cm300, RomLocation::Rom2),
    // R15279806 (WAVE A)
    known("40c093cbfb4441a5c884e623f882a80b96b2527f9fd431e074398d206c0f073d", Romset::Cm300, RomLocation::WaveRom1),
    // R15279807 (WAVE B)
    known("9bbbcac747bd6f7a2693f4ef10633db8ab626f17d3d9c47c83c3839d4dd2f613", Romset::Cm300, RomLocation::WaveRom2),
    // R15279808 (WAVE C)
    known("5b753f6cef4cfc7fcafe1430fecbb94a739b874e55356246a46abe24097ee491", Romset::Cm300, RomLocation::WaveRom3),

    // SCC-1A

    // R00128523 (H8/532 mcu)
    known("9ec66abb5231b6c6f46f48b33d5412703041037d69a6803626ac402f25552af2", Romset::Cm300, RomLocation::Rom1),
    // R00128567 (H8/532 extra code)
    known("f89442734fdebacae87c7707c01b2d7fdbf5940abae738987aee912d34b5882e", Romset::Cm300, RomLocation::Rom2),
    // R15279806 (WAVE A)
    known("40c093cbfb4441a5c884e623f882a80b96b2527f9fd431e074398d206c0f073d", Romset::Cm300, RomLocation::WaveRom1),
    // R15279807 (WAVE B)
    known("9bbbcac747bd6f7a2693f4ef10633db8ab626f17d3d9c47c83c3839d4dd2f613", Romset::Cm300, RomLocation::WaveRom2),
    // R15279808 (WAVE C)
    known("5b753f6cef4cfc7fcafe1430fecbb94a739b874e55356246a46abe24097ee491", Romset::Cm300, RomLocation::WaveRom3),

    // JV-880 (v1.0.0)

    // R15199810 (H8/532 mcu)
    known("aabfcf883b29060198566440205f2fae1ce689043ea0fc7074842aaa4fd4823e", Romset::Jv880, RomLocation::Rom1),
    // R15209386 (H8/532 extra code)
    known("ed437f1bc75cc558f174707bcfeb45d5e03483efd9bfd0a382ca57c0edb2a40c", Romset::Jv880, RomLocation::Rom2),
    // R15209312 (WAVE A)
    known("aa3101a76d57992246efeda282a2cb0c0f8fdb441c2eed2aa0b0fad4d81f3ad4", Romset::Jv880, RomLocation::WaveRom1),
    // R15209313 (WAVE B)
    known("a7b50bb47734ee9117fa16df1f257990a9a1a0b5ed420337ae4310eb80df75c8", Romset::Jv880, RomLocation::WaveRom2),
    // Carte PCM (SR-JV80)
    placeholder(Romset::Jv880, RomLocation::WaveRomCard),
    // Carte d'extension
    placeholder(Romset::Jv880, RomLocation::WaveRomExp),

    // SCB-55/RLP-3194

    // R15199827 (H8/532 mcu)
    placeholder(Romset::Scb55, RomLocation::Rom1),
    // R15279828 (H8/532 extra code)
    placeholder(Romset::Scb55, RomLocation::Rom2),
    // R15209359 (WAVE 16M)
    known("c6429e21b9b3a02fbd68ef0b2053668433bee0bccd537a71841bc70b8874243b", Romset::Scb55, RomLocation::WaveRom1),
    // R15279813 (WAVE 8M)
    // Le fichier legacy s'appelle "scb55_waverom2.bin" mais la puce est montée en WAVEROM3
    known("5b753f6cef4cfc7fcafe1430fecbb94a739b874e55356246a46abe24097ee491", Romset::Scb55, RomLocation::WaveRom3),

    // RLP-3237

    // R15199827 (H8/532 mcu)
    placeholder(Romset::Rlp3237, RomLocation::Rom1),
    // R15209486 (H8/532 extra code)
    placeholder(Romset::Rlp3237, RomLocation::Rom2),
    // R15279824 (WAVE 16M)
    placeholder(Romset::Rlp3237, RomLocation::WaveRom1),

    // SC-155 (rev 1)

    // R15199799 (H8/532 mcu)
    known("24a65c97cdbaa847d6f59193523ce63c73394b4b693a6517ee79441f2fb8a3ee", Romset::Sc155, RomLocation::Rom1),
    // R15209361 (H8/532 extra code)
    known("ceb7b9d3d9d264efe5dc3ba992b94f3be35eb6d0451abc574b6f6b5dc3db237b", Romset::Sc155, RomLocation::Rom2),
    // R15209276 (WAVE A)
    known("5655509a531804f97ea2d7ef05b8fec20ebf46216b389a84c44169257a4d2007", Romset::Sc155, RomLocation::WaveRom1),
    // R15209277 (WAVE B)
    known("c655b159792d999b90df9e4fa782cf56411ba1eaa0bb3ac2bdaf09e1391006b1", Romset::Sc155, RomLocation::WaveRom2),
    // R15209281 (WAVE C)
    known("334b2d16be3c2362210fdbec1c866ad58badeb0f84fd9bf5d0ac599baf077cc2", Romset::Sc155, RomLocation::WaveRom3),

    // SC-155 (rev 2)

    // R15199799 (H8/532 mcu)
    known("24a65c97cdbaa847d6f59193523ce63c73394b4b693a6517ee79441f2fb8a3ee", Romset::Sc155, RomLocation::Rom1),
    // R15209400 (H8/532 extra code)
    placeholder(Romset::Sc155, RomLocation::Rom2),
    // R15209276 (WAVE A)
    known("5655509a531804f97ea2d7ef05b8fec20ebf46216b389a84c44169257a4d2007", Romset::Sc155, RomLocation::WaveRom1),
    // R15209277 (WAVE B)
    known("c655b159792d999b90df9e4fa782cf56411ba1eaa0bb3ac2bdaf09e1391006b1", Romset::Sc155, RomLocation::WaveRom2),
    // R15209281 (WAVE C)
    known("334b2d16be3c2362210fdbec1c866ad58badeb0f84fd9bf5d0ac599baf077cc2", Romset::Sc155, RomLocation::WaveRom3),

    // ROM2 modifiées (patch CTF sc55mk2-ctf-patcher)

    // Tone: Strict SC-55 | Drum: SC-55 v1.21 or earlier
    known("64f8c9daf1021cf86ea4ddf03a29b81b5ea0c18e74f462833023436388bb9dc4", Romset::Mk2, RomLocation::Rom2),
    // Tone: Strict SC-55 | Drum: SC-55 v2.00
    known("14d14778caf46ffa9e3d608aa8e9c1a60c32bd4a536c26af3b2e1d81784c60f9", Romset::Mk2, RomLocation::Rom2),
    // Tone: SC-55 | Drum: SC-55 v1.21 or earlier
    known("10b3f09485a74bb014f1a940d5c67f380c7979b62891d540d788154c83f17430", Romset::Mk2, RomLocation::Rom2),
    // Tone: SC-55 | Drum: SC-55 v2.00
    known("a2c720be1ab9115930d27f821a413c0366b7bf0c4ddfe0dadc5086136a1a4345", Romset::Mk2, RomLocation::Rom2),
    // Tone: SC-55mkII | Drum: SC-55 v1.21 or earlier
    known("16cec615da10089beffe6de5129ba8ba33fa1bf017a5e6b78ad1d6d15cf4708e", Romset::Mk2, RomLocation::Rom2),
    // Tone: SC-55mkII | Drum: SC-55 v2.00
    known("c22bf7d34a3406530924d750b007bbdb470f3216c65086edb6e53023383ee907", Romset::Mk2, RomLocation::Rom2),
];

/// Noms de fichiers historiques, indexés par variante puis par emplacement
///
/// Une chaîne vide signifie que la variante n'a pas de fichier pour cet emplacement.
#[rustfmt::skip]
pub const LEGACY_ROM_NAMES: [[&str; ROMLOCATION_COUNT]; ROMSET_COUNT] = [
    // SC-55mk2
    ["rom1.bin", "rom2.bin", "rom_sm.bin", "waverom1.bin", "waverom2.bin", "", "", ""],
    // SC-55st
    ["rom1.bin", "rom2_st.bin", "rom_sm.bin", "waverom1.bin", "waverom2.bin", "", "", ""],
    // SC-55mk1
    ["sc55_rom1.bin", "sc55_rom2.bin", "", "sc55_waverom1.bin", "sc55_waverom2.bin", "sc55_waverom3.bin", "", ""],
    // CM-300/SCC-1
    ["cm300_rom1.bin", "cm300_rom2.bin", "", "cm300_waverom1.bin", "cm300_waverom2.bin", "cm300_waverom3.bin", "", ""],
    // JV-880
    ["jv880_rom1.bin", "jv880_rom2.bin", "", "jv880_waverom1.bin", "jv880_waverom2.bin", "", "jv880_waverom_pcmcard.bin", "jv880_waverom_expansion.bin"],
    // SCB-55 : "scb55_waverom2.bin" va bien dans WAVEROM3
    ["scb55_rom1.bin", "scb55_rom2.bin", "", "scb55_waverom1.bin", "", "scb55_waverom2.bin", "", ""],
    // RLP-3237
    ["rlp3237_rom1.bin", "rlp3237_rom2.bin", "", "rlp3237_waverom1.bin", "", "", "", ""],
    // SC-155
    ["sc155_rom1.bin", "sc155_rom2.bin", "", "sc155_waverom1.bin", "sc155_waverom2.bin", "sc155_waverom3.bin", "", ""],
    // SC-155mk2
    ["rom1.bin", "rom2.bin", "rom_sm.bin", "waverom1.bin", "waverom2.bin", "", "", ""],
];

/// Nom de fichier legacy pour un emplacement, s'il existe
pub fn legacy_rom_name(romset: Romset, location: RomLocation) -> Option<&'static str> {
    let name = LEGACY_ROM_NAMES[romset.index()][location.index()];
    (!name.is_empty()).then_some(name)
}

/// Catalogue d'empreintes indexé par contenu
///
/// Une même empreinte peut désigner plusieurs couples (variante, emplacement) :
/// certaines puces sont partagées entre produits. La recherche renvoie donc une
/// liste, dans l'ordre de la table.
#[derive(Debug, Clone)]
pub struct FingerprintCatalog {
    entries: Cow<'static, [KnownHash]>,
    index: HashMap<Sha256Digest, Vec<(Romset, RomLocation)>>,
}

impl FingerprintCatalog {
    /// Crée un catalogue à partir d'une table arbitraire
    pub fn new(entries: Vec<KnownHash>) -> Self {
        Self::from_entries(Cow::Owned(entries))
    }

    /// Catalogue des puces connues, construit une seule fois par processus
    pub fn builtin() -> &'static FingerprintCatalog {
        static BUILTIN: OnceLock<FingerprintCatalog> = OnceLock::new();
        BUILTIN.get_or_init(|| Self::from_entries(Cow::Borrowed(ROM_HASHES)))
    }

    fn from_entries(entries: Cow<'static, [KnownHash]>) -> Self {
        let mut index: HashMap<Sha256Digest, Vec<(Romset, RomLocation)>> = HashMap::new();

        for entry in entries.iter().filter(|entry| !entry.is_placeholder()) {
            let matches = index.entry(entry.digest).or_default();
            if !matches.contains(&(entry.romset, entry.location)) {
                matches.push((entry.romset, entry.location));
            }
        }

        Self { entries, index }
    }

    /// Toutes les entrées, placeholders compris
    pub fn entries(&self) -> &[KnownHash] {
        &self.entries
    }

    /// Entrées appartenant à une variante
    pub fn entries_for(&self, romset: Romset) -> impl Iterator<Item = &KnownHash> + '_ {
        self.entries.iter().filter(move |entry| entry.romset == romset)
    }

    /// Couples (variante, emplacement) correspondant à une empreinte
    ///
    /// Les placeholders ne correspondent jamais à un contenu réel.
    pub fn lookup(&self, digest: &Sha256Digest) -> &[(Romset, RomLocation)] {
        self.index.get(digest).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Default for FingerprintCatalog {
    fn default() -> Self {
        Self::builtin().clone()
    }
}
