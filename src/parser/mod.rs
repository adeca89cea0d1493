pub mod admin;
pub mod context;
pub mod extract;
pub mod lines;
pub mod sections;

use tracing::debug;

use crate::gazetteer::Gazetteer;
use crate::record::{AdministrativeRecord, MapContext};
use extract::Entities;

#[derive(Debug, Clone)]
pub struct ParsedMap {
    pub admin: AdministrativeRecord,
    pub entities: Entities,
    pub context: MapContext,
}

/// Pure multi-pass parse: text → lines → admin fields → environment
/// sections → entities → map context.
pub fn parse_map(text: &str, gazetteer: &Gazetteer, target: Option<&str>) -> ParsedMap {
    let lines = lines::normalize(text);
    let admin = admin::extract(&lines, gazetteer);
    let sections = sections::cluster_sections(&lines);
    let entities = extract::extract_all(&lines, &sections, &admin.lines);
    let context = context::describe(&lines, target);

    debug!(
        lines = lines.len(),
        businesses = entities.businesses.len(),
        streets = entities.streets.len(),
        environments = entities.environments.len(),
        "parsed map"
    );

    ParsedMap {
        admin: admin.record,
        entities,
        context,
    }
}
