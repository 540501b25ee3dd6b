//! Types for writing small client database tables
//!
//! The writer produces complete, valid files in every supported generation. It favours
//! simplicity over size: there is one WDC3 section and no sparse layout.

use binrw::BinWrite;
use bon::Builder;
use byteorder::{ByteOrder, LittleEndian};
use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::path::Path;
use tracing::instrument;

use crate::error::{Error, Result};
use crate::types::{
    CopyEntry, FieldStorageInfo, FieldStructure, Format, Relationship, RelationshipEntry,
    SectionHeader, StorageType, Wdb2Header, Wdb2Index, WdbcHeader, Wdc1Header, Wdc3Header,
};

/// A cell value handed to [`TableWriter::row`]
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    UInt(u32),
    Int(i32),
    Float(f32),
    Str(String),
    Array(Vec<u32>),
}

impl Value {
    fn len(&self) -> usize {
        match self {
            Value::Array(values) => values.len().max(1),
            _ => 1,
        }
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::UInt(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<Vec<u32>> for Value {
    fn from(value: Vec<u32>) -> Self {
        Value::Array(value)
    }
}

/// Storage used for a column of a WDC1 or WDC3 table
///
/// Ignored by the WDBC and WDB2 writers, whose columns are always plain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Packing {
    #[default]
    Plain,
    Bitpacked { bits: u16 },
    BitpackedSigned { bits: u16 },
    Common { default: u32 },
    Pallet { bits: u16 },
}

/// Where a WDC1 or WDC3 table keeps its row ids
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdStorage {
    /// Separate id list, exposed as column 0
    #[default]
    List,
    /// Inline field at the given index, the values fill the other fields in order
    Inline(usize),
}

/// Options for how the table should be written
#[derive(Debug, Clone, Copy, Builder)]
pub struct TableWriterOptions {
    /// Generation of the produced file
    pub format: Format,

    /// Id storage of WDC1 and WDC3 tables; flat tables always start with the id
    #[builder(default)]
    pub ids: IdStorage,

    /// Append a relationship block, exposed as the last column (WDC1, WDC3)
    #[builder(default)]
    pub relationship: bool,

    /// Build number written to WDB2 headers
    #[builder(default = 15595)]
    pub client_build: u32,
}

struct StringBlock {
    data: Vec<u8>,
    offsets: HashMap<String, u32>,
}

impl StringBlock {
    fn new() -> StringBlock {
        StringBlock {
            data: vec![0],
            offsets: HashMap::new(),
        }
    }

    fn intern(&mut self, value: &str) -> u32 {
        if value.is_empty() {
            return 0;
        }
        if let Some(offset) = self.offsets.get(value) {
            return *offset;
        }
        let offset = self.data.len() as u32;
        self.data.extend_from_slice(value.as_bytes());
        self.data.push(0);
        self.offsets.insert(value.to_string(), offset);
        offset
    }
}

/// Physical field of a packed record
#[derive(Debug, Clone, Default)]
struct Field {
    packing: Packing,
    count: usize,
    byte_offset: usize,
    bit_offset: usize,
    bits: usize,
    common: Vec<(u32, u32)>,
    pallet: Vec<Vec<u32>>,
}

fn write_bits(record: &mut [u8], bit_offset: usize, bits: usize, value: u32) {
    for bit in 0..bits.min(32) {
        if (value >> bit) & 1 == 1 {
            let position = bit_offset + bit;
            record[position / 8] |= 1 << (position % 8);
        }
    }
}

fn pallet_bits(entries: usize) -> usize {
    (usize::BITS - entries.saturating_sub(1).leading_zeros()).max(1) as usize
}

struct WriterRow {
    id: u32,
    relation: u32,
    values: Vec<Value>,
}

/// Client database table generator
///
/// Unless [`IdStorage::Inline`] moves it, column 0 of the written table is the row id and
/// the values given to [`TableWriter::row`] become columns 1 and up.
///
/// ```
/// # fn doit() -> wde_dbc::error::Result<()>
/// # {
/// use wde_dbc::types::Format;
/// use wde_dbc::write::{TableWriter, TableWriterOptions, Value};
///
/// let mut writer = TableWriter::new(TableWriterOptions::builder().format(Format::Wdbc).build());
/// writer.row(1, [Value::from("Word of Recall (OLD)")]);
///
/// let table = wde_dbc::DbcTable::new(&writer.finish()?)?;
/// assert_eq!(table.row(0).map(|r| r.key()), Some(1));
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
pub struct TableWriter {
    options: TableWriterOptions,
    packing: HashMap<usize, Packing>,
    rows: Vec<WriterRow>,
    copies: Vec<CopyEntry>,
}

impl TableWriter {
    pub fn new(options: TableWriterOptions) -> TableWriter {
        TableWriter {
            options,
            packing: HashMap::new(),
            rows: Vec::new(),
            copies: Vec::new(),
        }
    }

    /// Choose the storage of a value column, numbered like the columns of the read table
    pub fn pack(&mut self, column: usize, packing: Packing) -> &mut Self {
        self.packing.insert(column, packing);
        self
    }

    pub fn row<I, V>(&mut self, id: u32, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.related_row(id, 0, values)
    }

    /// Add a row whose relationship column holds `relation`
    pub fn related_row<I, V>(&mut self, id: u32, relation: u32, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.rows.push(WriterRow {
            id,
            relation,
            values: values.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Add a copy table entry sharing the record of `source_id`
    pub fn copy(&mut self, new_id: u32, source_id: u32) -> &mut Self {
        self.copies.push(CopyEntry { new_id, source_id });
        self
    }

    /// Number of elements of each value column
    fn widths(&self) -> Vec<usize> {
        let mut widths = Vec::new();
        for row in &self.rows {
            if widths.len() < row.values.len() {
                widths.resize(row.values.len(), 1);
            }
            for (i, value) in row.values.iter().enumerate() {
                widths[i] = widths[i].max(value.len());
            }
        }
        widths
    }

    /// Encode a value as its 32 bit words, interning strings
    fn words(value: Option<&Value>, width: usize, strings: &mut StringBlock) -> Vec<u32> {
        let mut words = match value {
            None => vec![],
            Some(Value::UInt(v)) => vec![*v],
            Some(Value::Int(v)) => vec![*v as u32],
            Some(Value::Float(v)) => vec![v.to_bits()],
            Some(Value::Str(v)) => vec![strings.intern(v)],
            Some(Value::Array(v)) => v.clone(),
        };
        words.resize(width, 0);
        words
    }

    /// Produce the complete file
    #[instrument(skip(self), fields(format = %self.options.format, rows = self.rows.len()), err)]
    pub fn finish(&self) -> Result<Vec<u8>> {
        match self.options.format {
            Format::Wdbc | Format::Wdb2 => self.finish_flat(),
            Format::Wdc1 | Format::Wdc3 => self.finish_packed(),
        }
    }

    /// Write the file to `path`
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let data = self.finish()?;
        let mut file = std::fs::File::create(path)?;
        file.write_all(&data)?;
        Ok(())
    }

    fn finish_flat(&self) -> Result<Vec<u8>> {
        let widths = self.widths();
        let field_count = 1 + widths.iter().sum::<usize>();
        let record_size = field_count * 4;

        let mut strings = StringBlock::new();
        let mut records = Vec::with_capacity(self.rows.len() * record_size);
        for row in &self.rows {
            records.extend_from_slice(&row.id.to_le_bytes());
            for (i, width) in widths.iter().enumerate() {
                for word in TableWriter::words(row.values.get(i), *width, &mut strings) {
                    records.extend_from_slice(&word.to_le_bytes());
                }
            }
        }

        let mut output = Cursor::new(Vec::new());
        match self.options.format {
            Format::Wdbc => WdbcHeader {
                record_count: self.rows.len() as u32,
                field_count: field_count as u32,
                record_size: record_size as u32,
                string_block_size: strings.data.len() as u32,
            }
            .write(&mut output)?,
            _ => Wdb2Header {
                record_count: self.rows.len() as u32,
                field_count: field_count as u32,
                record_size: record_size as u32,
                string_block_size: strings.data.len() as u32,
                table_hash: 0,
                build: self.options.client_build,
                timestamp: 0,
                index: (self.options.client_build > 12880).then(Wdb2Index::default),
            }
            .write(&mut output)?,
        }

        let mut output = output.into_inner();
        output.extend_from_slice(&records);
        output.extend_from_slice(&strings.data);
        Ok(output)
    }

    /// Physical fields in order: `None` holds the inline id, `Some(i)` the value column `i`
    fn slots(&self, values: usize) -> Vec<Option<usize>> {
        match self.options.ids {
            IdStorage::List => (0..values).map(Some).collect(),
            IdStorage::Inline(index) => {
                let mut slots: Vec<_> = (0..values.max(index)).map(Some).collect();
                slots.insert(index, None);
                slots
            }
        }
    }

    /// Column number of the read table for a physical field
    fn column(&self, field: usize) -> usize {
        match self.options.ids {
            IdStorage::List => field + 1,
            IdStorage::Inline(_) => field,
        }
    }

    fn finish_packed(&self) -> Result<Vec<u8>> {
        let widths = self.widths();
        let slots = self.slots(widths.len());

        let mut fields: Vec<Field> = Vec::with_capacity(slots.len());
        for (f, slot) in slots.iter().enumerate() {
            let Some(i) = *slot else {
                fields.push(Field {
                    count: 1,
                    ..Default::default()
                });
                continue;
            };
            let packing = self.packing.get(&self.column(f)).copied().unwrap_or_default();
            if packing != Packing::Plain
                && self
                    .rows
                    .iter()
                    .any(|r| matches!(r.values.get(i), Some(Value::Str(_))))
            {
                return Err(Error::UnsupportedLayout(format!(
                    "string column {} must be stored plain",
                    self.column(f)
                )));
            }
            fields.push(Field {
                packing,
                count: widths.get(i).copied().unwrap_or(1),
                ..Default::default()
            });
        }

        let mut strings = StringBlock::new();
        let mut cells: Vec<Vec<Vec<u32>>> = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            let row_cells = slots
                .iter()
                .zip(&fields)
                .map(|(slot, field)| match slot {
                    None => vec![row.id],
                    Some(i) => TableWriter::words(row.values.get(*i), field.count, &mut strings),
                })
                .collect();
            cells.push(row_cells);
        }

        // collect common values and pallets before laying out the record
        for (f, field) in fields.iter_mut().enumerate() {
            match field.packing {
                Packing::Common { default } => {
                    for (row, row_cells) in self.rows.iter().zip(&cells) {
                        if row_cells[f][0] != default {
                            field.common.push((row.id, row_cells[f][0]));
                        }
                    }
                }
                Packing::Pallet { .. } => {
                    for row_cells in &cells {
                        if !field.pallet.contains(&row_cells[f]) {
                            field.pallet.push(row_cells[f].clone());
                        }
                    }
                }
                _ => {}
            }
        }

        let mut byte_end = 0usize;
        for field in fields.iter_mut().filter(|f| f.packing == Packing::Plain) {
            field.byte_offset = byte_end;
            field.bit_offset = byte_end * 8;
            field.bits = field.count * 32;
            byte_end += field.count * 4;
        }
        let mut bit_end = byte_end * 8;
        for field in fields.iter_mut() {
            let bits = match field.packing {
                Packing::Plain | Packing::Common { .. } => continue,
                Packing::Bitpacked { bits } | Packing::BitpackedSigned { bits } => bits as usize,
                Packing::Pallet { bits } => (bits as usize).max(pallet_bits(field.pallet.len())),
            };
            field.bit_offset = bit_end;
            field.byte_offset = bit_end / 8;
            field.bits = bits;
            bit_end += bits;
        }
        let record_size = (bit_end + 7) / 8;
        let records_len = record_size * self.rows.len();

        let relative = self.options.format == Format::Wdc3;
        let mut records = vec![0u8; records_len];
        for (r, (row, row_cells)) in self.rows.iter().zip(&cells).enumerate() {
            let record = &mut records[r * record_size..(r + 1) * record_size];
            for (f, field) in fields.iter().enumerate() {
                let words = &row_cells[f];
                match field.packing {
                    Packing::Plain => {
                        let is_string = slots[f]
                            .and_then(|i| row.values.get(i))
                            .is_some_and(|v| matches!(v, Value::Str(_)));
                        for (e, word) in words.iter().enumerate() {
                            let position = field.byte_offset + e * 4;
                            let word = if is_string && relative {
                                (*word as usize + records_len - (r * record_size + position))
                                    as u32
                            } else {
                                *word
                            };
                            LittleEndian::write_u32(&mut record[position..position + 4], word);
                        }
                    }
                    Packing::Bitpacked { .. } | Packing::BitpackedSigned { .. } => {
                        write_bits(record, field.bit_offset, field.bits, words[0]);
                    }
                    Packing::Pallet { .. } => {
                        let slot = field
                            .pallet
                            .iter()
                            .position(|p| p == words)
                            .unwrap_or_default();
                        write_bits(record, field.bit_offset, field.bits, slot as u32);
                    }
                    Packing::Common { .. } => {}
                }
            }
        }

        let mut structure = Vec::new();
        let mut storage = Vec::new();
        let mut pallet = Vec::new();
        let mut common = Vec::new();
        for field in &fields {
            let (storage_type, val1, val3, additional) = match field.packing {
                Packing::Plain => (StorageType::None, 0, 0, 0),
                Packing::Bitpacked { .. } => (StorageType::Bitpacked, 0, 0, 0),
                Packing::BitpackedSigned { .. } => (StorageType::BitpackedSigned, 0, 0, 0),
                Packing::Common { default } => {
                    for (id, value) in &field.common {
                        common.extend_from_slice(&id.to_le_bytes());
                        common.extend_from_slice(&value.to_le_bytes());
                    }
                    (StorageType::CommonData, default, 0, field.common.len() * 8)
                }
                Packing::Pallet { .. } => {
                    for entry in &field.pallet {
                        for word in entry {
                            pallet.extend_from_slice(&word.to_le_bytes());
                        }
                    }
                    let (kind, val3) = if field.count > 1 {
                        (StorageType::BitpackedIndexedArray, field.count as u32)
                    } else {
                        (StorageType::BitpackedIndexed, 0)
                    };
                    (kind, 0, val3, field.pallet.len() * field.count * 4)
                }
            };
            structure.push(FieldStructure {
                size: if field.packing == Packing::Plain { 0 } else { 32 - field.bits.min(32) as i16 },
                position: field.byte_offset as u16,
            });
            storage.push(FieldStorageInfo {
                field_offset_bits: field.bit_offset as u16,
                field_size_bits: field.bits as u16,
                additional_data_size: additional as u32,
                storage_type,
                val1,
                val2: 0,
                val3,
            });
        }

        let (ids, id_index): (Vec<u32>, u16) = match self.options.ids {
            IdStorage::List => (self.rows.iter().map(|r| r.id).collect(), 0),
            IdStorage::Inline(index) => (Vec::new(), index as u16),
        };
        let relationship = self.options.relationship.then(|| Relationship {
            entry_count: self.rows.len() as u32,
            min_id: self.rows.iter().map(|r| r.relation).min().unwrap_or_default(),
            max_id: self.rows.iter().map(|r| r.relation).max().unwrap_or_default(),
            entries: self
                .rows
                .iter()
                .enumerate()
                .map(|(i, r)| RelationshipEntry {
                    foreign_id: r.relation,
                    record_index: i as u32,
                })
                .collect(),
        });
        let relationship_size = relationship
            .as_ref()
            .map(|r| 12 + r.entries.len() * 8)
            .unwrap_or_default();

        let min_id = self.rows.iter().map(|r| r.id).min().unwrap_or_default();
        let max_id = self.rows.iter().map(|r| r.id).max().unwrap_or_default();

        let mut output = Cursor::new(Vec::new());
        if self.options.format == Format::Wdc1 {
            Wdc1Header {
                record_count: self.rows.len() as u32,
                field_count: fields.len() as u32,
                record_size: record_size as u32,
                string_table_size: strings.data.len() as u32,
                min_id,
                max_id,
                copy_table_size: self.copies.len() as u32 * 8,
                id_index,
                total_field_count: fields.len() as u32,
                bitpacked_data_offset: byte_end as u32,
                id_list_size: ids.len() as u32 * 4,
                field_storage_info_size: (storage.len() * FieldStorageInfo::SIZE) as u32,
                common_data_size: common.len() as u32,
                pallet_data_size: pallet.len() as u32,
                relationship_data_size: relationship_size as u32,
                ..Default::default()
            }
            .write(&mut output)?;
            structure.write_le(&mut output)?;
            output.write_all(&records)?;
            output.write_all(&strings.data)?;
            ids.write_le(&mut output)?;
            self.copies.write_le(&mut output)?;
            storage.write_le(&mut output)?;
            output.write_all(&pallet)?;
            output.write_all(&common)?;
            if let Some(relationship) = &relationship {
                relationship.write(&mut output)?;
            }
        } else {
            let file_offset = Wdc3Header::SIZE
                + SectionHeader::SIZE
                + structure.len() * 4
                + storage.len() * FieldStorageInfo::SIZE
                + pallet.len()
                + common.len();
            Wdc3Header {
                record_count: self.rows.len() as u32,
                field_count: fields.len() as u32,
                record_size: record_size as u32,
                string_table_size: strings.data.len() as u32,
                min_id,
                max_id,
                id_index,
                total_field_count: fields.len() as u32,
                bitpacked_data_offset: byte_end as u32,
                field_storage_info_size: (storage.len() * FieldStorageInfo::SIZE) as u32,
                common_data_size: common.len() as u32,
                pallet_data_size: pallet.len() as u32,
                section_count: 1,
                ..Default::default()
            }
            .write(&mut output)?;
            SectionHeader {
                file_offset: file_offset as u32,
                record_count: self.rows.len() as u32,
                string_table_size: strings.data.len() as u32,
                id_list_size: ids.len() as u32 * 4,
                relationship_data_size: relationship_size as u32,
                copy_table_count: self.copies.len() as u32,
                ..Default::default()
            }
            .write(&mut output)?;
            structure.write_le(&mut output)?;
            storage.write_le(&mut output)?;
            output.write_all(&pallet)?;
            output.write_all(&common)?;
            output.write_all(&records)?;
            output.write_all(&strings.data)?;
            ids.write_le(&mut output)?;
            self.copies.write_le(&mut output)?;
            if let Some(relationship) = &relationship {
                relationship.write(&mut output)?;
            }
        }

        Ok(output.into_inner())
    }
}
