pub mod buildings;
pub mod businesses;
pub mod coordinates;
pub mod environments;
pub mod landmarks;
pub mod streets;

use std::collections::HashSet;

use super::lines::Line;
use super::sections::Section;
use crate::record::{BuildingTally, BusinessEntity, CoordinatePair, Environment};

/// Everything the per-line passes recognized on one map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entities {
    pub businesses: Vec<BusinessEntity>,
    pub streets: Vec<String>,
    pub environments: Vec<Environment>,
    pub landmarks: Vec<String>,
    pub coordinates: Vec<CoordinatePair>,
    pub buildings: BuildingTally,
}

/// Independent passes over the same lines. `admin_lines` are skipped by
/// the entity passes but still counted by the building tally.
pub fn extract_all(lines: &[Line], sections: &[Section], admin_lines: &HashSet<usize>) -> Entities {
    let envs = environments::resolve(lines);
    Entities {
        businesses: businesses::extract(sections, admin_lines, &envs),
        streets: streets::extract(lines, admin_lines),
        environments: envs.environments,
        landmarks: landmarks::extract(lines, admin_lines),
        coordinates: coordinates::extract(lines),
        buildings: buildings::tally(lines),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gazetteer::Gazetteer;
    use crate::parser::{admin, lines::normalize, sections::cluster_sections};
    use crate::record::BusinessCategory;

    fn parse(fixture: &str) -> Entities {
        let text = std::fs::read_to_string(format!("tests/fixtures/{}.txt", fixture)).unwrap();
        let lines = normalize(&text);
        let admin = admin::extract(&lines, &Gazetteer::default());
        let sections = cluster_sections(&lines);
        extract_all(&lines, &sections, &admin.lines)
    }

    #[test]
    fn dauh_puri_entities() {
        let e = parse("dauh_puri");
        let envs: Vec<(&str, &str)> = e
            .environments
            .iter()
            .map(|x| (x.name.as_str(), x.code.as_str()))
            .collect();
        assert_eq!(envs, vec![("KAMPUNG BARU", "03"), ("TAMAN SARI", "04")]);
        assert!(e.streets.contains(&"Jl. Merdeka".to_string()));
        assert!(e.streets.contains(&"Jl. Hasanuddin".to_string()));
        assert_eq!(e.coordinates.len(), 1);
        assert!(e.landmarks.iter().any(|l| l.contains("Tugu")));

        let pasar = e.businesses.iter().find(|b| b.name == "Pasar Badung").unwrap();
        assert_eq!(pasar.category, BusinessCategory::Pasar);
        assert_eq!(pasar.environment.as_deref(), Some("TAMAN SARI"));
        assert_eq!(pasar.environment_code.as_deref(), Some("04"));

        let names: Vec<&str> = e.businesses.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Warung Makan Bu Ani",
                "Toko Sederhana",
                "Masjid Al-Ikhlas",
                "LINGKUNGAN TAMAN SARI 04",
                "Pasar Badung",
                "Plaza Renon",
                "SD Negeri 3 Dauh Puri",
            ]
        );
    }

    #[test]
    fn dauh_puri_buildings() {
        let e = parse("dauh_puri");
        assert_eq!(e.buildings.vacant, 1);
        assert_eq!(e.buildings.boarding, 1);
        assert!(e.buildings.non_residential >= 2);
    }

    #[test]
    fn classification_is_idempotent() {
        assert_eq!(parse("dauh_puri"), parse("dauh_puri"));
        assert_eq!(parse("peternakan"), parse("peternakan"));
    }

    #[test]
    fn one_line_many_passes() {
        let lines = normalize("Warung Bu Ani Jl. Merdeka dekat Tugu Kota");
        let sections = cluster_sections(&lines);
        let e = extract_all(&lines, &sections, &HashSet::new());
        assert_eq!(e.businesses.len(), 1);
        assert_eq!(e.streets, vec!["Jl. Merdeka dekat Tugu Kota"]);
        assert_eq!(e.landmarks.len(), 1);
        assert_eq!(e.buildings.business, 1);
    }
}
