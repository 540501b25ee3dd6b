//! Error types that can be emitted from this library

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent wrapper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent wrapper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// Transparent wrapper for [`std::str::Utf8Error`]
    #[error(transparent)]
    Utf8Error(#[from] std::str::Utf8Error),

    /// The file does not start with a known table signature
    #[error("unknown table signature {0:?}")]
    UnknownFormat([u8; 4]),

    /// The file is shorter than its header claims
    #[error("truncated {block}: needed {needed} bytes but only {available} available")]
    Truncated {
        block: &'static str,
        needed: usize,
        available: usize,
    },

    /// The layout is recognised but cannot be decoded
    #[error("unsupported table layout: {0}")]
    UnsupportedLayout(String),

    /// Column index past the last column of the table
    #[error("column {column} out of range (table has {columns} columns)")]
    ColumnOutOfRange { column: usize, columns: usize },

    /// Repeat index past the end of an array column
    #[error("index {index} out of range for column {column} with {count} elements")]
    RepeatOutOfRange {
        column: usize,
        index: usize,
        count: usize,
    },

    /// Column data extends past the end of the record
    #[error("column {column} extends past the record size of {record_size} bytes")]
    RecordTooShort { column: usize, record_size: usize },

    /// String offset outside of the string block
    #[error("string offset {offset} out of bounds (string block size: {size})")]
    StringOutOfBounds { offset: i64, size: usize },

    /// String read from a column that does not hold string offsets
    #[error("column {0} does not hold strings")]
    NotAString(usize),

    /// Pallet slot outside of the pallet block for a column
    #[error("pallet slot {index} out of range for column {column}")]
    PalletOutOfRange { column: usize, index: usize },

    /// Bit packed field wider than a 64 bit value
    #[error("field {field} is {bits} bits wide, at most 64 can be packed")]
    FieldTooWide { field: usize, bits: usize },

    /// Named access to a field the definition does not declare
    #[error("unknown field {0}")]
    UnknownField(String),

    /// Named access to a table opened without a definition
    #[error("table has no field definition")]
    NoDefinition,
}

impl Error {
    /// Whether the file was recognised but uses a layout this crate cannot decode
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Error::UnsupportedLayout(_))
    }
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
