//! Plain-text matrix export and import.
//!
//! One grid row per line, top row first, values separated by single spaces or
//! commas. The reader accepts either separator.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SectionError;
use crate::grid::{Lithology, LithologyGrid};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Delimiter {
    #[default]
    Whitespace,
    Comma,
}

impl Delimiter {
    fn separator(self) -> &'static str {
        match self {
            Delimiter::Whitespace => " ",
            Delimiter::Comma => ",",
        }
    }
}

impl FromStr for Delimiter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "whitespace" | "space" | "ws" => Ok(Delimiter::Whitespace),
            "comma" | "csv" => Ok(Delimiter::Comma),
            other => Err(format!("unknown delimiter '{other}' (expected whitespace or comma)")),
        }
    }
}

/// Write `grid` as a delimited matrix.
pub fn write_matrix<W: Write>(
    grid: &LithologyGrid,
    mut writer: W,
    delimiter: Delimiter,
) -> Result<(), SectionError> {
    let sep = delimiter.separator();
    let mut line = String::with_capacity(grid.nx() * 2);
    for row in grid.rows() {
        line.clear();
        for (i, v) in row.iter().enumerate() {
            if i > 0 {
                line.push_str(sep);
            }
            line.push(char::from(b'0' + v));
        }
        line.push('\n');
        writer.write_all(line.as_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a matrix written by [`write_matrix`] (either delimiter). Blank lines
/// are ignored; every row must have the same width and hold only 0 or 1.
pub fn read_matrix<R: BufRead>(reader: R) -> Result<LithologyGrid, SectionError> {
    let mut data = Vec::new();
    let mut nx: Option<usize> = None;
    let mut ny = 0usize;

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = i + 1;
        if line.trim().is_empty() {
            continue;
        }
        let mut width = 0usize;
        for token in line.split(|c: char| c == ',' || c.is_whitespace()).filter(|t| !t.is_empty()) {
            let value: u8 = token
                .parse()
                .map_err(|_| SectionError::parse(line_no, format!("'{token}' is not a label")))?;
            let lith = Lithology::try_from(value)
                .map_err(|v| SectionError::parse(line_no, format!("label {v} is not 0 or 1")))?;
            data.push(lith.code());
            width += 1;
        }
        match nx {
            None => nx = Some(width),
            Some(expected) if expected != width => {
                return Err(SectionError::parse(
                    line_no,
                    format!("row has {width} values, expected {expected}"),
                ));
            }
            Some(_) => {}
        }
        ny += 1;
    }

    let nx = nx.ok_or_else(|| SectionError::parse(0, "matrix is empty"))?;
    LithologyGrid::from_vec(nx, ny, data)
        .ok_or_else(|| SectionError::parse(0, "inconsistent matrix"))
}

pub fn save_matrix(
    grid: &LithologyGrid,
    path: &Path,
    delimiter: Delimiter,
) -> Result<(), SectionError> {
    let file = File::create(path)?;
    write_matrix(grid, BufWriter::new(file), delimiter)
}

pub fn load_matrix(path: &Path) -> Result<LithologyGrid, SectionError> {
    let file = File::open(path)?;
    read_matrix(BufReader::new(file))
}
