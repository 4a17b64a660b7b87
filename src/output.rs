//! Range output as text or JSON, optionally gzipped.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};

use htm_index::{CellId, RangeSet};

use crate::input::is_gzip;

/// How range bounds are printed in text output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdStyle {
    /// Cell names such as `N012`.
    #[default]
    Name,
    /// Decimal numeric ids.
    Numeric,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextOptions {
    pub style: IdStyle,
    /// All ranges on one line, separated by `;`.
    pub compact: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text(TextOptions),
    Json,
}

/// Serialized form of a [`RangeSet`]; bounds are numeric ids.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct RangeExport {
    pub level: u32,
    pub ranges: Vec<[u64; 2]>,
}

impl From<&RangeSet> for RangeExport {
    fn from(set: &RangeSet) -> Self {
        Self {
            level: set.level(),
            ranges: set.iter().map(|(low, high)| [low.id(), high.id()]).collect(),
        }
    }
}

fn format_bound(id: CellId, style: IdStyle) -> String {
    match style {
        IdStyle::Name => id.name(),
        IdStyle::Numeric => id.id().to_string(),
    }
}

/// `<low>,<high>` records, newline-terminated.
pub fn format_text(set: &RangeSet, options: TextOptions) -> String {
    if set.is_empty() {
        return String::new();
    }

    let records: Vec<String> = set
        .iter()
        .map(|&(low, high)| {
            format!(
                "{},{}",
                format_bound(low, options.style),
                format_bound(high, options.style)
            )
        })
        .collect();

    let separator = if options.compact { ";" } else { "\n" };
    let mut text = records.join(separator);
    text.push('\n');
    text
}

pub fn write_ranges<W: Write>(writer: &mut W, set: &RangeSet, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Text(options) => writer.write_all(format_text(set, options).as_bytes()),
        OutputFormat::Json => {
            serde_json::to_writer(&mut *writer, &RangeExport::from(set))?;
            writeln!(writer)
        }
    }
}

/// Write `set` to `path`, gzip-compressed when the name ends in `.gz`.
pub fn save(path: &Path, set: &RangeSet, format: OutputFormat) -> io::Result<()> {
    let file = File::create(path)?;

    if is_gzip(path) {
        let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
        write_ranges(&mut encoder, set, format)?;
        encoder.finish()?.flush()
    } else {
        let mut writer = BufWriter::new(file);
        write_ranges(&mut writer, set, format)?;
        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set_prints_nothing() {
        let set = RangeSet::new(3);
        assert_eq!(format_text(&set, TextOptions::default()), "");
    }

    #[test]
    fn test_json_shape() {
        let n3 = CellId::from_name("N3").unwrap();
        let set = RangeSet::from_ids([n3], 1);
        let mut buf = Vec::new();
        write_ranges(&mut buf, &set, OutputFormat::Json).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "{\"level\":1,\"ranges\":[[60,63]]}\n");
    }
}
