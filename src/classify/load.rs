use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use super::AreaType;
use crate::keywords::Keywords;

/// Survey "muatan dominan" categories, codes 1 through 20.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DominantLoad {
    PermukimanBiasa = 1,
    PermukimanPadat = 2,
    PermukimanKumuh = 3,
    PermukimanElite = 4,
    PermukimanTransmigrasi = 5,
    PermukimanPesisir = 6,
    PermukimanPegunungan = 7,
    PusatPerbelanjaan = 8,
    KawasanIndustri = 9,
    HotelRekreasi = 10,
    KawasanPendidikan = 11,
    Perkantoran = 12,
    Transportasi = 13,
    KawasanPertanian = 14,
    KawasanPeternakan = 15,
    KawasanPerikanan = 16,
    KawasanPertambangan = 17,
    KawasanKehutanan = 18,
    KawasanPariwisata = 19,
    KawasanKhusus = 20,
}

const ALL: [DominantLoad; 20] = [
    DominantLoad::PermukimanBiasa,
    DominantLoad::PermukimanPadat,
    DominantLoad::PermukimanKumuh,
    DominantLoad::PermukimanElite,
    DominantLoad::PermukimanTransmigrasi,
    DominantLoad::PermukimanPesisir,
    DominantLoad::PermukimanPegunungan,
    DominantLoad::PusatPerbelanjaan,
    DominantLoad::KawasanIndustri,
    DominantLoad::HotelRekreasi,
    DominantLoad::KawasanPendidikan,
    DominantLoad::Perkantoran,
    DominantLoad::Transportasi,
    DominantLoad::KawasanPertanian,
    DominantLoad::KawasanPeternakan,
    DominantLoad::KawasanPerikanan,
    DominantLoad::KawasanPertambangan,
    DominantLoad::KawasanKehutanan,
    DominantLoad::KawasanPariwisata,
    DominantLoad::KawasanKhusus,
];

impl DominantLoad {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        ALL.iter().copied().find(|l| l.code() == code)
    }

    pub fn description(self) -> &'static str {
        match self {
            DominantLoad::PermukimanBiasa => "Permukiman Biasa",
            DominantLoad::PermukimanPadat => "Permukiman Padat",
            DominantLoad::PermukimanKumuh => "Permukiman Kumuh",
            DominantLoad::PermukimanElite => "Permukiman Elite",
            DominantLoad::PermukimanTransmigrasi => "Permukiman Transmigrasi",
            DominantLoad::PermukimanPesisir => "Permukiman Pesisir",
            DominantLoad::PermukimanPegunungan => "Permukiman Pegunungan",
            DominantLoad::PusatPerbelanjaan => "Pusat Perbelanjaan",
            DominantLoad::KawasanIndustri => "Kawasan Industri",
            DominantLoad::HotelRekreasi => "Hotel/Tempat Rekreasi",
            DominantLoad::KawasanPendidikan => "Kawasan Pendidikan",
            DominantLoad::Perkantoran => "Perkantoran",
            DominantLoad::Transportasi => "Pelabuhan/Bandara/Terminal",
            DominantLoad::KawasanPertanian => "Kawasan Pertanian",
            DominantLoad::KawasanPeternakan => "Kawasan Peternakan",
            DominantLoad::KawasanPerikanan => "Kawasan Perikanan",
            DominantLoad::KawasanPertambangan => "Kawasan Pertambangan",
            DominantLoad::KawasanKehutanan => "Kawasan Kehutanan",
            DominantLoad::KawasanPariwisata => "Kawasan Pariwisata",
            DominantLoad::KawasanKhusus => "Kawasan Khusus Lainnya",
        }
    }

    /// Whether the density classification of the same name tells a
    /// compatible story. Residential loads pair with the residential area
    /// types, shopping with commercial, industry with industrial. Loads
    /// with no density counterpart (hotel, education, farming...) never
    /// agree.
    pub fn agrees_with(self, area: AreaType) -> bool {
        use DominantLoad::*;
        match self {
            PermukimanBiasa | PermukimanTransmigrasi | PermukimanPesisir
            | PermukimanPegunungan => area == AreaType::Standard,
            PermukimanPadat | PermukimanKumuh => area == AreaType::HighDensity,
            PermukimanElite => area == AreaType::LowDensity,
            PusatPerbelanjaan => area == AreaType::Commercial,
            KawasanIndustri => area == AreaType::Industrial,
            _ => false,
        }
    }
}

/// Description for a raw code; codes outside 1..=20 get a placeholder.
pub fn describe_code(code: u8) -> String {
    match DominantLoad::from_code(code) {
        Some(load) => load.description().to_string(),
        None => format!("Kode {} (Tidak Diketahui)", code),
    }
}

static RULES: LazyLock<Vec<(Keywords, DominantLoad)>> = LazyLock::new(|| {
    let table: &[(&[&'static str], DominantLoad)] = &[
        (
            &["kawasan industri", "industrial zone", "industri", "factory", "pabrik"],
            DominantLoad::KawasanIndustri,
        ),
        (&["kantor", "office", "perkantoran"], DominantLoad::Perkantoran),
        (
            &["mall", "pasar", "toko", "shop", "market", "plaza", "center"],
            DominantLoad::PusatPerbelanjaan,
        ),
        (&["hotel", "resort", "wisata", "tourism"], DominantLoad::HotelRekreasi),
        (
            &["bandara", "terminal", "stasiun", "pelabuhan", "airport"],
            DominantLoad::Transportasi,
        ),
        (
            &["sekolah", "universitas", "kampus", "pendidikan", "education"],
            DominantLoad::KawasanPendidikan,
        ),
        (
            &["pertanian", "sawah", "ladang", "kebun", "agriculture"],
            DominantLoad::KawasanPertanian,
        ),
        (&["peternakan", "ternak", "livestock"], DominantLoad::KawasanPeternakan),
        (&["perikanan", "tambak", "fishery"], DominantLoad::KawasanPerikanan),
        (&["pertambangan", "tambang", "mining"], DominantLoad::KawasanPertambangan),
        (&["kehutanan", "hutan", "forestry"], DominantLoad::KawasanKehutanan),
        (&["pariwisata", "wisata", "tourism"], DominantLoad::KawasanPariwisata),
    ];
    table
        .iter()
        .map(|(words, load)| (Keywords::new(words).unwrap(), *load))
        .collect()
});

pub fn classify(name: &str) -> DominantLoad {
    RULES
        .iter()
        .find(|(kw, _)| kw.matches(name))
        .map(|(_, load)| *load)
        .unwrap_or(DominantLoad::PermukimanBiasa)
}
