//! Layout descriptors and the key grid built from them
//!
//! A descriptor file maps a physical layout identifier (e.g. `"German"`) to a
//! list of rows. Each row is a list of cells:
//!
//! ```json
//! { "German": [
//!     [ { "label": "Esc", "matrix": [0, 1] }, {}, { "label": "F1", "width": 60, "matrix": [0, 3] } ],
//!     ...
//! ] }
//! ```
//!
//! A cell without a label is a fixed-size spacer. Rows may also be given as an
//! object of named rows, which are taken in key order.

use std::collections::BTreeMap;
use std::fmt;

use genie_transport::MatrixDimensions;
use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;

use crate::error::LayoutError;

/// Key width when a cell does not give one
pub const DEFAULT_KEY_WIDTH: u32 = 60;
/// Height of every key
pub const KEY_HEIGHT: u32 = 63;
/// Spacer width
pub const SPACER_WIDTH: u32 = 66;
/// Spacer height
pub const SPACER_HEIGHT: u32 = 69;

/// A coordinate in the device matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(from = "[usize; 2]")]
pub struct MatrixPos {
    pub row: usize,
    pub col: usize,
}

impl MatrixPos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<[usize; 2]> for MatrixPos {
    fn from([row, col]: [usize; 2]) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for MatrixPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row, self.col)
    }
}

fn default_width() -> u32 {
    DEFAULT_KEY_WIDTH
}

/// One cell as written in a descriptor file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KeyCell {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default)]
    pub matrix: Option<MatrixPos>,
    #[serde(default)]
    pub disabled: bool,
}

/// The rows of one layout variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRows {
    pub rows: Vec<Vec<KeyCell>>,
}

struct KeyRowsVisitor;

impl<'de> Visitor<'de> for KeyRowsVisitor {
    type Value = KeyRows;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a list of rows or an object of named rows")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<KeyRows, A::Error> {
        let mut rows = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(row) = seq.next_element()? {
            rows.push(row);
        }
        Ok(KeyRows { rows })
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<KeyRows, A::Error> {
        let mut named = BTreeMap::<String, Vec<KeyCell>>::new();
        while let Some((name, row)) = map.next_entry()? {
            if named.insert(name, row).is_some() {
                return Err(de::Error::custom("duplicate row name"));
            }
        }
        Ok(KeyRows {
            rows: named.into_values().collect(),
        })
    }
}

// Rows are parsed by hand so a bad cell reports its own error and position
impl<'de> Deserialize<'de> for KeyRows {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(KeyRowsVisitor)
    }
}

/// A parsed descriptor file: physical layout identifier -> rows
#[derive(Debug, Clone)]
pub struct LayoutDescriptor {
    name: String,
    variants: BTreeMap<String, KeyRows>,
}

impl LayoutDescriptor {
    /// Parse a descriptor document
    pub fn from_json(name: &str, json: &str) -> Result<Self, LayoutError> {
        let variants = serde_json::from_str(json).map_err(|source| LayoutError::Parse {
            name: name.to_string(),
            source,
        })?;
        Ok(Self {
            name: name.to_string(),
            variants,
        })
    }

    /// File name this descriptor was loaded as (without `.json`)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rows for a physical layout identifier
    pub fn variant(&self, id: &str) -> Option<&KeyRows> {
        self.variants.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.variants.contains_key(id)
    }

    /// All variant identifiers, sorted
    pub fn variant_names(&self) -> impl Iterator<Item = &str> {
        self.variants.keys().map(String::as_str)
    }
}

/// An interactive key in a built layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCap {
    pub label: String,
    pub width: u32,
    pub matrix: Option<MatrixPos>,
    pub enabled: bool,
}

/// One slot in a built layout row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutCell {
    Key(KeyCap),
    Spacer,
}

impl LayoutCell {
    /// Horizontal size in layout units
    pub fn width(&self) -> u32 {
        match self {
            LayoutCell::Key(key) => key.width,
            LayoutCell::Spacer => SPACER_WIDTH,
        }
    }

    /// Vertical size in layout units
    pub fn height(&self) -> u32 {
        match self {
            LayoutCell::Key(_) => KEY_HEIGHT,
            LayoutCell::Spacer => SPACER_HEIGHT,
        }
    }
}

/// The key grid shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Layout {
    rows: Vec<Vec<LayoutCell>>,
}

impl Layout {
    /// Build from descriptor rows
    pub fn from_rows(rows: &KeyRows) -> Self {
        let rows = rows
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| match &cell.label {
                        Some(label) => LayoutCell::Key(KeyCap {
                            label: label.clone(),
                            width: cell.width,
                            matrix: cell.matrix,
                            enabled: !cell.disabled,
                        }),
                        None => LayoutCell::Spacer,
                    })
                    .collect()
            })
            .collect();
        Self { rows }
    }

    /// One key per matrix coordinate, labelled `row:col`
    pub fn generic(dims: MatrixDimensions) -> Self {
        let rows = (0..dims.rows)
            .map(|row| {
                (0..dims.cols)
                    .map(|col| {
                        let pos = MatrixPos::new(row, col);
                        LayoutCell::Key(KeyCap {
                            label: pos.to_string(),
                            width: DEFAULT_KEY_WIDTH,
                            matrix: Some(pos),
                            enabled: true,
                        })
                    })
                    .collect()
            })
            .collect();
        Self { rows }
    }

    /// A single row strip of `cols` keys labelled by column index
    pub fn strip(cols: usize) -> Self {
        let row = (0..cols)
            .map(|col| {
                LayoutCell::Key(KeyCap {
                    label: col.to_string(),
                    width: DEFAULT_KEY_WIDTH,
                    matrix: Some(MatrixPos::new(0, col)),
                    enabled: true,
                })
            })
            .collect();
        Self { rows: vec![row] }
    }

    pub fn rows(&self) -> &[Vec<LayoutCell>] {
        &self.rows
    }

    /// All keys in row-major order
    pub fn keys(&self) -> impl Iterator<Item = &KeyCap> {
        self.rows.iter().flatten().filter_map(|cell| match cell {
            LayoutCell::Key(key) => Some(key),
            LayoutCell::Spacer => None,
        })
    }

    /// Widest row in layout units
    pub fn width(&self) -> u32 {
        self.rows
            .iter()
            .map(|row| row.iter().map(LayoutCell::width).sum())
            .max()
            .unwrap_or(0)
    }

    /// Total height in layout units; each row is as tall as its tallest cell
    pub fn height(&self) -> u32 {
        self.rows
            .iter()
            .map(|row| row.iter().map(LayoutCell::height).max().unwrap_or(0))
            .sum()
    }
}
