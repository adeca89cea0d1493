pub mod classify;
pub mod config;
pub mod db;
pub mod dedup;
pub mod economic;
pub mod enrich;
pub mod gazetteer;
pub mod keywords;
pub mod ocr;
pub mod parser;
pub mod pipeline;
pub mod record;
pub mod segments;
pub mod validate;

pub use pipeline::{ExtractError, Extraction, Extractor};
pub use record::MapRecord;
