use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::record::AdministrativeRecord;

static MAP_ID_FORMAT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{16}$").unwrap());

/// Placeholder some upstream forms write into unread fields.
const NOT_FOUND: &str = "Tidak ditemukan";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationKind {
    IncompleteMapData,
    InvalidMapId,
}

impl fmt::Display for ValidationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationKind::IncompleteMapData => f.write_str("IncompleteMapData"),
            ValidationKind::InvalidMapId => f.write_str("InvalidMapId"),
        }
    }
}

/// A reportable problem with the administrative header. Never fatal: the
/// rest of the record is still produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ValidationError {
    pub kind: ValidationKind,
    pub fields: Vec<String>,
    pub message: String,
}

pub fn is_valid_map_id(id: &str) -> bool {
    MAP_ID_FORMAT.is_match(id)
}

fn is_missing(value: &str) -> bool {
    let v = value.trim();
    v.is_empty() || v == NOT_FOUND
}

pub fn validate(record: &AdministrativeRecord) -> Result<(), ValidationError> {
    let required = [
        ("map_id", &record.map_id),
        ("province", &record.province),
        ("regency", &record.regency),
        ("district", &record.district),
        ("village", &record.village),
    ];

    let missing: Vec<String> = required
        .iter()
        .filter(|(_, v)| is_missing(v))
        .map(|(name, _)| name.to_string())
        .collect();

    if !missing.is_empty() {
        let message = format!(
            "Data map tidak lengkap. Field yang tidak ditemukan: {}",
            missing.join(", ")
        );
        return Err(ValidationError {
            kind: ValidationKind::IncompleteMapData,
            fields: missing,
            message,
        });
    }

    if !is_valid_map_id(&record.map_id) {
        return Err(ValidationError {
            kind: ValidationKind::InvalidMapId,
            fields: vec!["map_id".to_string()],
            message: format!(
                "Map ID tidak valid. Format harus 16 digit angka. Ditemukan: {}",
                record.map_id
            ),
        });
    }

    Ok(())
}
