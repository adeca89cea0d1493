use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::parser::lines::Line;
use crate::record::Environment;

static CODED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bLINGKUNGAN\s+([A-Z][A-Z\s]*?)\s*\[(\d+)\]").unwrap());
static BARE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bLINGKUNGAN\s+([A-Z][A-Z\s]*)").unwrap());

/// A `LINGKUNGAN ...` header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub code: Option<String>,
}

pub fn parse_header(text: &str) -> Option<Header> {
    if let Some(caps) = CODED_RE.captures(text) {
        return Some(Header {
            name: caps[1].trim().to_string(),
            code: Some(caps[2].to_string()),
        });
    }
    let caps = BARE_RE.captures(text)?;
    let name = caps[1].trim().to_string();
    if name.is_empty() {
        return None;
    }
    Some(Header { name, code: None })
}

/// Environments in first-seen order, plus the environment each header
/// line resolved to (by index), repeats included.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolved {
    pub environments: Vec<Environment>,
    pub by_header: HashMap<usize, usize>,
}

impl Resolved {
    /// The environment whose section starts at `header`.
    pub fn for_header(&self, header: Option<usize>) -> Option<&Environment> {
        let idx = *self.by_header.get(&header?)?;
        self.environments.get(idx)
    }
}

/// Coded headers dedup on (name, code). Uncoded headers get the next
/// sequence number as a two-digit code; a bare repeat of a known name
/// resolves to the first environment with that name.
pub fn resolve(lines: &[Line]) -> Resolved {
    let mut resolved = Resolved::default();
    let mut by_key: HashMap<(String, String), usize> = HashMap::new();
    let mut by_name: HashMap<String, usize> = HashMap::new();

    for line in lines {
        let Some(Header { name, code }) = parse_header(&line.text) else {
            continue;
        };

        let (code, synthesized) = match code {
            Some(code) => (code, false),
            None => match by_name.get(&name) {
                Some(&idx) => {
                    resolved.by_header.insert(line.no, idx);
                    continue;
                }
                None => (format!("{:02}", resolved.environments.len() + 1), true),
            },
        };

        let key = (name.clone(), code.clone());
        let idx = match by_key.get(&key) {
            Some(&idx) => idx,
            None => {
                let idx = resolved.environments.len();
                debug!(line = line.no, environment = %name, code = %code, "environment");
                resolved.environments.push(Environment {
                    name: name.clone(),
                    code,
                    synthesized,
                });
                by_key.insert(key, idx);
                by_name.entry(name).or_insert(idx);
                idx
            }
        };
        resolved.by_header.insert(line.no, idx);
    }

    resolved
}
