use super::extract::environments::parse_header;
use super::lines::Line;

/// A run of lines under one `LINGKUNGAN` header. Lines before the first
/// header form a section with no environment.
#[derive(Debug, Clone)]
pub struct Section<'a> {
    pub environment: Option<String>,
    /// Line number of the header itself.
    pub header: Option<usize>,
    pub lines: Vec<&'a Line>,
}

/// Cluster lines into environment sections by header transitions.
pub fn cluster_sections(lines: &[Line]) -> Vec<Section<'_>> {
    let mut sections: Vec<Section> = Vec::new();
    let mut current_lines: Vec<&Line> = Vec::new();
    let mut current_env: Option<String> = None;
    let mut current_header: Option<usize> = None;

    for line in lines {
        if let Some(header) = parse_header(&line.text) {
            if !current_lines.is_empty() {
                sections.push(Section {
                    environment: current_env.take(),
                    header: current_header.take(),
                    lines: std::mem::take(&mut current_lines),
                });
            }
            current_env = Some(header.name);
            current_header = Some(line.no);
        }
        current_lines.push(line);
    }

    if !current_lines.is_empty() {
        sections.push(Section {
            environment: current_env,
            header: current_header,
            lines: current_lines,
        });
    }

    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lines::normalize;

    #[test]
    fn splits_on_headers() {
        let lines = normalize(
            "PROVINSI : [51] BALI\nLINGKUNGAN TAMAN [01]\nToko A\nLINGKUNGAN SARI [02]\nWarung B\nWarung C",
        );
        let sections = cluster_sections(&lines);
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].environment, None);
        assert_eq!(sections[1].environment.as_deref(), Some("TAMAN"));
        assert_eq!(sections[1].lines.len(), 2);
        assert_eq!(sections[1].header, Some(2));
        assert_eq!(sections[2].environment.as_deref(), Some("SARI"));
        assert_eq!(sections[2].lines.last().map(|l| l.text.as_str()), Some("Warung C"));
    }

    #[test]
    fn no_headers_single_section() {
        let lines = normalize("Toko A\nWarung B");
        let sections = cluster_sections(&lines);
        assert_eq!(sections.len(), 1);
        assert!(sections[0].environment.is_none());
    }
}
