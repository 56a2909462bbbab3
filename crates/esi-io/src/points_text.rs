//! Minimal reader for the `.spi` / `.sxyz` solution-point text formats:
//! whitespace- or comma-separated `x y z [name]` per line. Writers are
//! out of scope; these formats are produced by other tools in the
//! toolkit, only consumed here.

use std::fs;
use std::path::Path;

use esi_common::{EsiError, Result};

/// One parsed line: coordinates plus an optional client-supplied name.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedPoint {
    pub coords: [f64; 3],
    pub name: Option<String>,
}

fn split_fields(line: &str) -> Vec<&str> {
    line.split([' ', '\t', ','])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parses the text content of a `.spi`/`.sxyz` file. Blank lines and
/// lines starting with `#` are skipped.
pub fn parse_points_text(content: &str) -> Result<Vec<NamedPoint>> {
    let mut points = Vec::new();
    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields = split_fields(line);
        if fields.len() < 3 {
            return Err(EsiError::InputInvalid(format!(
                "line {}: expected at least 3 coordinate fields, got {}",
                line_no + 1,
                fields.len()
            )));
        }
        let mut coords = [0.0; 3];
        for d in 0..3 {
            coords[d] = fields[d].parse::<f64>().map_err(|_| {
                EsiError::InputInvalid(format!(
                    "line {}: could not parse coordinate {:?}",
                    line_no + 1,
                    fields[d]
                ))
            })?;
        }
        let name = fields.get(3).map(|s| s.to_string());
        points.push(NamedPoint { coords, name });
    }
    Ok(points)
}

pub fn read_points_file(path: impl AsRef<Path>) -> Result<Vec<NamedPoint>> {
    let content = fs::read_to_string(path)?;
    parse_points_text(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_whitespace_separated_points_with_names() {
        let text = "# comment\n1.0 2.0 3.0 Fz\n-1.5\t0.0\t2.25\n";
        let points = parse_points_text(text).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].coords, [1.0, 2.0, 3.0]);
        assert_eq!(points[0].name.as_deref(), Some("Fz"));
        assert_eq!(points[1].name, None);
    }

    #[test]
    fn parses_comma_separated_points() {
        let text = "1.0,2.0,3.0,sp1\n";
        let points = parse_points_text(text).unwrap();
        assert_eq!(points[0].coords, [1.0, 2.0, 3.0]);
        assert_eq!(points[0].name.as_deref(), Some("sp1"));
    }

    #[test]
    fn rejects_line_with_too_few_fields() {
        let text = "1.0 2.0\n";
        assert!(parse_points_text(text).is_err());
    }
}
