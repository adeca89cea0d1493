//! Area-name classifiers. The two tables are independent: an area can read
//! as residential to one and commercial or industrial to the other.

pub mod area;
pub mod load;

pub use area::{AreaType, Ratios};
pub use load::DominantLoad;

/// Both classifications of one area name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AreaProfile {
    pub area: AreaType,
    pub load: DominantLoad,
}

impl AreaProfile {
    pub fn of(name: &str) -> Self {
        Self {
            area: area::classify(name),
            load: load::classify(name),
        }
    }

    pub fn agree(&self) -> bool {
        self.load.agrees_with(self.area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn industrial_estate_is_consistent() {
        let p = AreaProfile::of("KAWASAN INDUSTRI DENPASAR");
        assert_eq!(p.area, AreaType::Industrial);
        assert_eq!(p.load, DominantLoad::KawasanIndustri);
        assert!(p.agree());
    }

    #[test]
    fn hotel_area_diverges() {
        // residential by density, hotel by load
        let p = AreaProfile::of("HOTEL GRAND BALI");
        assert_eq!(p.area, AreaType::Standard);
        assert_eq!(p.load, DominantLoad::HotelRekreasi);
        assert!(!p.agree());
    }

    #[test]
    fn housing_near_industry_diverges() {
        let p = AreaProfile::of("PERUMAHAN KAWASAN INDUSTRI");
        assert_eq!(p.area, AreaType::HighDensity);
        assert_eq!(p.load, DominantLoad::KawasanIndustri);
        assert!(!p.agree());
    }

    #[test]
    fn plain_neighbourhood_agrees() {
        let p = AreaProfile::of("BANJAR TENGAH");
        assert_eq!(p.area, AreaType::Standard);
        assert_eq!(p.load, DominantLoad::PermukimanBiasa);
        assert!(p.agree());
    }
}
