use std::sync::LazyLock;

use crate::keywords::{strip_punctuation, Keywords};
use crate::parser::lines::Line;
use crate::record::BuildingTally;

static VACANT: LazyLock<Keywords> = LazyLock::new(|| {
    Keywords::new(&[
        "kosong", "empty", "vacant", "tidak terisi", "belum dihuni", "bangunan kosong",
        "rumah kosong", "gedung kosong", "ruko kosong", "tidak ada penghuni",
        "belum ada penghuni", "masih kosong",
    ])
    .unwrap()
});

static NON_RESIDENTIAL: LazyLock<Keywords> = LazyLock::new(|| {
    Keywords::new(&[
        "masjid", "musholla", "surau", "gereja", "kapel", "pura", "vihara", "klenteng",
        "kantor", "office", "gedung perkantoran", "balai desa", "kantor desa", "sekolah", "sd",
        "smp", "sma", "universitas", "kampus", "madrasah", "rumah sakit", "klinik",
        "puskesmas", "apotek", "rumah ibadah", "tempat ibadah", "worship", "temple", "church",
        "mosque",
    ])
    .unwrap()
});

static BUSINESS_USE: LazyLock<Keywords> = LazyLock::new(|| {
    Keywords::new(&[
        "toko", "warung", "restoran", "rumah makan", "cafe", "kafe", "bank", "atm", "spbu",
        "gas station", "salon", "spa", "hotel", "penginapan", "guesthouse", "resort", "inn",
        "bengkel", "workshop", "garasi", "showroom", "dealer", "apotek", "pharmacy", "klinik",
        "dental", "gigi", "supermarket", "minimarket", "market", "mall", "plaza", "pasar",
        "traditional market", "pasar tradisional",
    ])
    .unwrap()
});

static BOARDING: LazyLock<Keywords> = LazyLock::new(|| {
    Keywords::new(&[
        "kos", "kost", "kostan", "kos-kosan", "kost-kostan", "boarding house", "kontrakan",
        "sewa kamar", "kamar sewa", "rumah kos", "gedung kos", "asrama", "dormitory",
        "kamar kost", "kost putra", "kost putri", "kost campur",
    ])
    .unwrap()
});

/// Four independent counters over every line; one line can count in
/// several of them, but at most once in each.
pub fn tally(lines: &[Line]) -> BuildingTally {
    let mut t = BuildingTally::default();

    for line in lines {
        let name = strip_punctuation(&line.text);
        if name.chars().count() <= 2 {
            continue;
        }
        if VACANT.matches(&line.folded) {
            t.vacant += 1;
            t.vacant_names.push(name.clone());
        }
        if NON_RESIDENTIAL.matches(&line.folded) {
            t.non_residential += 1;
            t.non_residential_names.push(name.clone());
        }
        if BUSINESS_USE.matches(&line.folded) {
            t.business += 1;
            t.business_names.push(name.clone());
        }
        if BOARDING.matches(&line.folded) {
            t.boarding += 1;
            t.boarding_names.push(name);
        }
    }

    t
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lines::normalize;

    #[test]
    fn one_of_each() {
        let t = tally(&normalize(
            "Rumah Kosong Jl. Merdeka\nMasjid Al-Ikhlas\nToko Sederhana\nKost Putra Sejahtera",
        ));
        assert_eq!(t.vacant, 1);
        assert_eq!(t.non_residential, 1);
        assert_eq!(t.business, 1);
        assert_eq!(t.boarding, 1);
        assert_eq!(t.non_residential_names, vec!["Masjid Al-Ikhlas"]);
    }

    #[test]
    fn counters_not_exclusive() {
        // klinik and apotek are both non-residential and business use
        let t = tally(&normalize("Klinik dan Apotek Sehat"));
        assert_eq!(t.non_residential, 1);
        assert_eq!(t.business, 1);
        assert_eq!(t.vacant + t.boarding, 0);
    }

    #[test]
    fn counts_each_line() {
        let t = tally(&normalize("Toko A\nToko A\nRuko kosong"));
        assert_eq!(t.business, 2);
        assert_eq!(t.vacant, 1);
    }
}
