//! Parsing of vertex lists and persisted range files.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use glam::DVec3;
use thiserror::Error;

use htm_index::vector::latlon_to_vector;
use htm_index::{CellId, Convex, HtmError, RangeSet};

use crate::output::RangeExport;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("cannot access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid number {0:?}")]
    Number(String),

    #[error("vertex {token:?} must have {expected} comma-separated components")]
    Vertex { token: String, expected: usize },

    #[error("vertex {0:?} has no direction")]
    ZeroVertex(String),

    #[error("{} has no vertices on its first line", .0.display())]
    NoVertices(PathBuf),

    #[error("line {line}: malformed range {record:?}")]
    Range { line: usize, record: String },

    #[error("malformed JSON ranges: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Htm(#[from] HtmError),
}

impl InputError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// How a vertex token is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VertexFormat {
    /// `x,y,z`; need not be normalized.
    #[default]
    Cartesian,
    /// `lat,lon` in degrees.
    LatLon,
}

impl VertexFormat {
    fn components(self) -> usize {
        match self {
            VertexFormat::Cartesian => 3,
            VertexFormat::LatLon => 2,
        }
    }
}

fn parse_number(s: &str) -> Result<f64, InputError> {
    let s = s.trim();
    s.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| InputError::Number(s.to_string()))
}

/// Parse one vertex token into a unit vector.
pub fn parse_vertex(token: &str, format: VertexFormat) -> Result<DVec3, InputError> {
    let parts: Vec<&str> = token.trim().split(',').collect();
    if parts.len() != format.components() {
        return Err(InputError::Vertex {
            token: token.to_string(),
            expected: format.components(),
        });
    }

    let values = parts
        .iter()
        .map(|p| parse_number(p))
        .collect::<Result<Vec<f64>, _>>()?;

    let v = match format {
        VertexFormat::Cartesian => DVec3::new(values[0], values[1], values[2]),
        VertexFormat::LatLon => latlon_to_vector(values[0], values[1]),
    };
    v.try_normalize()
        .ok_or_else(|| InputError::ZeroVertex(token.trim().to_string()))
}

pub fn parse_vertices<S: AsRef<str>>(
    tokens: &[S],
    format: VertexFormat,
) -> Result<Vec<DVec3>, InputError> {
    tokens
        .iter()
        .map(|t| parse_vertex(t.as_ref(), format))
        .collect()
}

/// Convex bounded by the great circles through consecutive vertices.
pub fn parse_convex<S: AsRef<str>>(tokens: &[S], format: VertexFormat) -> Result<Convex, InputError> {
    let vertices = parse_vertices(tokens, format)?;
    Ok(Convex::from_vertices(&vertices)?)
}

/// Whitespace-separated vertex tokens from the first line of `path`.
pub fn read_vertex_file(path: &Path) -> Result<Vec<String>, InputError> {
    let file = File::open(path).map_err(|e| InputError::io(path, e))?;
    let mut line = String::new();
    BufReader::new(file)
        .read_line(&mut line)
        .map_err(|e| InputError::io(path, e))?;

    let tokens: Vec<String> = line.split_whitespace().map(str::to_string).collect();
    if tokens.is_empty() {
        return Err(InputError::NoVertices(path.to_path_buf()));
    }
    Ok(tokens)
}

/// Parse `<low>,<high>` records separated by newlines and/or `;`.
///
/// Bounds may be names (`N01`) or decimal ids. Blank records are skipped;
/// a record whose low bound lies after its high bound is malformed.
pub fn parse_ranges(text: &str) -> Result<RangeSet, InputError> {
    let mut pairs = Vec::new();

    for (index, line) in text.lines().enumerate() {
        for record in line.split(';').map(str::trim).filter(|r| !r.is_empty()) {
            let malformed = || InputError::Range {
                line: index + 1,
                record: record.to_string(),
            };
            let (low, high) = record.split_once(',').ok_or_else(malformed)?;
            if high.contains(',') {
                return Err(malformed());
            }
            let low: CellId = low.parse()?;
            let high: CellId = high.parse()?;
            let level = low.level().max(high.level());
            if low.extend(level).0 > high.extend(level).1 {
                return Err(malformed());
            }
            pairs.push((low, high));
        }
    }

    Ok(RangeSet::from_pairs(pairs))
}

/// Parse the JSON form written by [`crate::output::write_ranges`].
pub fn parse_ranges_json(text: &str) -> Result<RangeSet, InputError> {
    let export: RangeExport = serde_json::from_str(text)?;
    let pairs = export
        .ranges
        .into_iter()
        .map(|[low, high]| -> Result<(CellId, CellId), HtmError> {
            Ok((CellId::from_id(low)?, CellId::from_id(high)?))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let set = RangeSet::from_pairs(pairs);
    if !set.is_empty() && set.level() != export.level {
        log::warn!(
            "range file declares level {} but its ids are at level {}",
            export.level,
            set.level()
        );
    }
    Ok(set)
}

/// Load a range file in either text or JSON form, gzip-compressed when the
/// name ends in `.gz`.
pub fn read_ranges(path: &Path) -> Result<RangeSet, InputError> {
    let file = File::open(path).map_err(|e| InputError::io(path, e))?;
    let mut reader: Box<dyn Read> = if is_gzip(path) {
        Box::new(GzDecoder::new(BufReader::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|e| InputError::io(path, e))?;

    if text.trim_start().starts_with('{') {
        parse_ranges_json(&text)
    } else {
        parse_ranges(&text)
    }
}

pub(crate) fn is_gzip(path: &Path) -> bool {
    path.extension().map(|ext| ext == "gz").unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_rejects_non_finite() {
        assert!(parse_number(" 1.5 ").is_ok());
        assert!(matches!(parse_number("nan"), Err(InputError::Number(_))));
        assert!(matches!(parse_number("abc"), Err(InputError::Number(_))));
    }

    #[test]
    fn test_gzip_detection() {
        assert!(is_gzip(Path::new("ranges.txt.gz")));
        assert!(!is_gzip(Path::new("ranges.txt")));
        assert!(!is_gzip(Path::new("gz")));
    }
}
