//! Types for reading client database tables
//!

use binrw::meta::ReadEndian;
use binrw::BinRead;
use byteorder::{ByteOrder, LittleEndian};
use std::collections::HashMap;
use std::fmt;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, instrument, trace};

use crate::definition::Definition;
use crate::error::{Error, Result};
use crate::types::{
    CopyEntry, FieldStorageInfo, FieldStructure, Format, Relationship, SectionHeader,
    StorageType, Wdb2Header, WdbcHeader, Wdc1Header, Wdc3Header, FLAG_SPARSE,
};

/// Physical layout of a single logical column
#[derive(Debug, Clone)]
enum Column {
    /// Byte aligned little-endian value, possibly repeated `count` times
    Fixed {
        offset: usize,
        width: usize,
        count: usize,
    },
    /// Value packed at an arbitrary bit offset
    Bits {
        offset: usize,
        width: usize,
        signed: bool,
    },
    /// Value absent from the record unless it differs from the default
    Common {
        default: u32,
        values: HashMap<u32, u32>,
    },
    /// Bit packed index into a pallet of `count` wide entries
    Pallet {
        offset: usize,
        width: usize,
        values: Vec<u32>,
        count: usize,
    },
    /// Row id taken from the id list
    Id,
    /// Foreign id taken from the relationship block
    Relation,
}

impl Column {
    fn count(&self) -> usize {
        match self {
            Column::Fixed { count, .. } | Column::Pallet { count, .. } => *count,
            _ => 1,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct RowMeta {
    record: usize,
    id: u32,
    relation: u32,
}

/// How string columns locate their text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StringMode {
    /// Value is an offset from the start of the string block
    Absolute,
    /// Value is relative to the position of the field itself
    Relative,
}

/// A fully decoded client database table
///
/// The whole file is read into memory, rows are then exposed through [`Row`] accessors
/// which never panic on malformed data.
///
/// ```no_run
/// fn list_spells(path: &std::path::Path) -> wde_dbc::error::Result<()> {
///     let table = wde_dbc::DbcTable::open(path)?;
///
///     for row in table.rows() {
///         println!("{}: {}", row.key(), row.get_string(136)?);
///     }
///
///     Ok(())
/// }
/// ```
pub struct DbcTable {
    format: Format,
    columns: Vec<Column>,
    record_size: usize,
    records: Vec<u8>,
    strings: Vec<u8>,
    string_mode: StringMode,
    rows: Vec<RowMeta>,
    definition: Option<Definition>,
}

impl fmt::Debug for DbcTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbcTable")
            .field("format", &self.format)
            .field("columns", &self.columns.len())
            .field("record_size", &self.record_size)
            .field("rows", &self.rows.len())
            .finish()
    }
}

fn block<'a>(data: &'a [u8], start: usize, len: usize, name: &'static str) -> Result<&'a [u8]> {
    start
        .checked_add(len)
        .and_then(|end| data.get(start..end))
        .ok_or(Error::Truncated {
            block: name,
            needed: start.saturating_add(len),
            available: data.len(),
        })
}

/// Sequential reader over the consecutive blocks of a file
struct Blocks<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Blocks<'a> {
    fn new(data: &'a [u8], pos: usize) -> Blocks<'a> {
        Blocks { data, pos }
    }

    fn take(&mut self, len: usize, name: &'static str) -> Result<&'a [u8]> {
        let bytes = block(self.data, self.pos, len, name)?;
        self.pos += len;
        Ok(bytes)
    }
}

fn read_u32s(bytes: &[u8]) -> Vec<u32> {
    bytes.chunks_exact(4).map(LittleEndian::read_u32).collect()
}

fn read_entries<T>(bytes: &[u8], size: usize) -> Result<Vec<T>>
where
    T: ReadEndian + for<'a> BinRead<Args<'a> = ()>,
{
    let mut cursor = Cursor::new(bytes);
    (0..bytes.len() / size)
        .map(|_| T::read(&mut cursor).map_err(Error::from))
        .collect()
}

fn read_bits(record: &[u8], bit_offset: usize, bits: usize) -> Option<u64> {
    let start = bit_offset / 8;
    let end = (bit_offset + bits + 7) / 8;
    let bytes = record.get(start..end)?;

    let mut value = 0u64;
    for (i, b) in bytes.iter().take(8).enumerate() {
        value |= (*b as u64) << (8 * i);
    }
    value >>= bit_offset % 8;

    Some(if bits >= 64 {
        value
    } else {
        value & ((1u64 << bits) - 1)
    })
}

fn sign_extend(value: u64, bits: usize) -> u64 {
    if bits == 0 || bits >= 64 {
        return value;
    }
    let shift = 64 - bits;
    (((value << shift) as i64) >> shift) as u64
}

/// Build the logical columns of a WDC1 or WDC3 table from its field descriptions
fn packed_columns(
    fields: &[FieldStructure],
    storage: &[FieldStorageInfo],
    field_count: usize,
    record_size: usize,
    pallet: &[u8],
    common: &[u8],
) -> Result<Vec<Column>> {
    let mut columns = Vec::with_capacity(field_count);

    if storage.is_empty() {
        for i in 0..field_count {
            let field = fields.get(i).copied().unwrap_or_default();
            let width = match field.width() {
                0 => 4,
                w => w,
            };
            let end = fields
                .get(i + 1)
                .map(|f| f.position as usize)
                .unwrap_or(record_size);
            let count = (end.saturating_sub(field.position as usize) / width).max(1);
            columns.push(Column::Fixed {
                offset: field.position as usize,
                width,
                count,
            });
        }
        return Ok(columns);
    }

    let mut pallet_pos = 0usize;
    let mut common_pos = 0usize;
    for i in 0..field_count {
        let info = storage.get(i).copied().unwrap_or_default();
        let offset = info.field_offset_bits as usize;
        let bits = info.field_size_bits as usize;
        if bits > 64
            && matches!(
                info.storage_type,
                StorageType::Bitpacked
                    | StorageType::BitpackedSigned
                    | StorageType::BitpackedIndexed
                    | StorageType::BitpackedIndexedArray
            )
        {
            return Err(Error::FieldTooWide { field: i, bits });
        }

        let column = match info.storage_type {
            StorageType::None => {
                let width = match fields.get(i).map(FieldStructure::width) {
                    Some(0) | None => 4,
                    Some(w) => w,
                };
                Column::Fixed {
                    offset: offset / 8,
                    width,
                    count: (bits / 8 / width).max(1),
                }
            }
            StorageType::Bitpacked | StorageType::BitpackedSigned => Column::Bits {
                offset,
                width: bits,
                signed: info.storage_type == StorageType::BitpackedSigned,
            },
            StorageType::CommonData => {
                let size = info.additional_data_size as usize;
                let bytes = block(common, common_pos, size, "common data")?;
                common_pos += size;
                let values = bytes
                    .chunks_exact(8)
                    .map(|pair| {
                        (
                            LittleEndian::read_u32(&pair[0..4]),
                            LittleEndian::read_u32(&pair[4..8]),
                        )
                    })
                    .collect();
                Column::Common {
                    default: info.val1,
                    values,
                }
            }
            StorageType::BitpackedIndexed | StorageType::BitpackedIndexedArray => {
                let size = info.additional_data_size as usize;
                let bytes = block(pallet, pallet_pos, size, "pallet data")?;
                pallet_pos += size;
                let count = if info.storage_type == StorageType::BitpackedIndexedArray {
                    (info.val3 as usize).max(1)
                } else {
                    1
                };
                Column::Pallet {
                    offset,
                    width: bits,
                    values: read_u32s(bytes),
                    count,
                }
            }
        };
        columns.push(column);
    }

    Ok(columns)
}

impl DbcTable {
    /// Read and decode the table stored at `path`
    #[instrument(skip_all, fields(path = %path.as_ref().display()), err)]
    pub fn open(path: impl AsRef<Path>) -> Result<DbcTable> {
        let data = std::fs::read(path.as_ref())?;
        DbcTable::new(&data)
    }

    /// Read a table and attach a field definition for named access
    pub fn open_with_definition(path: impl AsRef<Path>, definition: Definition) -> Result<DbcTable> {
        Ok(DbcTable::open(path)?.with_definition(definition))
    }

    /// Decode a table from its raw bytes, detecting the generation from the signature
    pub fn new(data: &[u8]) -> Result<DbcTable> {
        let magic: [u8; 4] = block(data, 0, 4, "signature")?
            .try_into()
            .map_err(|_| Error::UnknownFormat([0; 4]))?;

        let table = match Format::from_magic(magic) {
            Some(Format::Wdbc) => DbcTable::read_wdbc(data)?,
            Some(Format::Wdb2) => DbcTable::read_wdb2(data)?,
            Some(Format::Wdc1) => DbcTable::read_wdc1(data)?,
            Some(Format::Wdc3) => DbcTable::read_wdc3(data)?,
            None => return Err(Error::UnknownFormat(magic)),
        };

        debug!(
            "decoded {} table: {} rows, {} columns",
            table.format,
            table.rows.len(),
            table.columns.len()
        );
        Ok(table)
    }

    /// Attach the column names used by the `field_*` accessors
    pub fn with_definition(mut self, definition: Definition) -> DbcTable {
        self.definition = Some(definition);
        self
    }

    fn flat(
        format: Format,
        data: &[u8],
        start: usize,
        record_count: usize,
        field_count: usize,
        record_size: usize,
        string_size: usize,
    ) -> Result<DbcTable> {
        let records_len = record_count * record_size;
        let records = block(data, start, records_len, "records")?.to_vec();
        let strings = block(data, start + records_len, string_size, "string block")?.to_vec();

        let columns = (0..field_count)
            .map(|c| Column::Fixed {
                offset: c * 4,
                width: 4,
                count: 1,
            })
            .collect();

        let rows = (0..record_count)
            .map(|record| RowMeta {
                record,
                id: records
                    .get(record * record_size..record * record_size + 4)
                    .filter(|_| record_size >= 4)
                    .map(LittleEndian::read_u32)
                    .unwrap_or_default(),
                relation: 0,
            })
            .collect();

        Ok(DbcTable {
            format,
            columns,
            record_size,
            records,
            strings,
            string_mode: StringMode::Absolute,
            rows,
            definition: None,
        })
    }

    fn read_wdbc(data: &[u8]) -> Result<DbcTable> {
        let header = WdbcHeader::read(&mut Cursor::new(data))?;
        trace!("{header:?}");

        DbcTable::flat(
            Format::Wdbc,
            data,
            WdbcHeader::SIZE,
            header.record_count as usize,
            header.field_count as usize,
            header.record_size as usize,
            header.string_block_size as usize,
        )
    }

    fn read_wdb2(data: &[u8]) -> Result<DbcTable> {
        let header = Wdb2Header::read(&mut Cursor::new(data))?;
        trace!("{header:?}");

        DbcTable::flat(
            Format::Wdb2,
            data,
            header.data_start(),
            header.record_count as usize,
            header.field_count as usize,
            header.record_size as usize,
            header.string_block_size as usize,
        )
    }

    fn read_wdc1(data: &[u8]) -> Result<DbcTable> {
        let header = Wdc1Header::read(&mut Cursor::new(data))?;
        trace!("{header:?}");

        if header.flags & FLAG_SPARSE != 0 {
            return Err(Error::UnsupportedLayout(
                "WDC1 table with offset map records".to_string(),
            ));
        }

        let record_size = header.record_size as usize;
        let record_count = header.record_count as usize;

        let mut blocks = Blocks::new(data, Wdc1Header::SIZE);

        let fields: Vec<FieldStructure> =
            read_entries(blocks.take(header.total_field_count as usize * 4, "field structure")?, 4)?;
        let records = blocks.take(record_count * record_size, "records")?.to_vec();
        let strings = blocks.take(header.string_table_size as usize, "string table")?.to_vec();
        let ids = read_u32s(blocks.take(header.id_list_size as usize, "id list")?);
        let copies: Vec<CopyEntry> =
            read_entries(blocks.take(header.copy_table_size as usize, "copy table")?, 8)?;
        let storage: Vec<FieldStorageInfo> = read_entries(
            blocks.take(header.field_storage_info_size as usize, "field storage info")?,
            FieldStorageInfo::SIZE,
        )?;
        let pallet = blocks.take(header.pallet_data_size as usize, "pallet data")?;
        let common = blocks.take(header.common_data_size as usize, "common data")?;
        let relationship = match header.relationship_data_size as usize {
            0 => None,
            size => Some(Relationship::read(&mut Cursor::new(blocks.take(size, "relationship data")?))?),
        };

        let physical = packed_columns(
            &fields,
            &storage,
            header.field_count as usize,
            record_size,
            pallet,
            common,
        )?;

        let mut table = DbcTable::packed(
            Format::Wdc1,
            physical,
            record_size,
            records,
            strings,
            StringMode::Absolute,
            !ids.is_empty(),
            relationship.is_some(),
        );

        let relations = relationship
            .map(|r| {
                r.entries
                    .iter()
                    .map(|e| (e.record_index as usize, e.foreign_id))
                    .collect::<HashMap<_, _>>()
            })
            .unwrap_or_default();

        table.push_rows(0, record_count, &ids, header.id_index as usize, &relations)?;
        table.apply_copies(&copies);

        Ok(table)
    }

    fn read_wdc3(data: &[u8]) -> Result<DbcTable> {
        let header = Wdc3Header::read(&mut Cursor::new(data))?;
        trace!("{header:?}");

        if header.flags & FLAG_SPARSE != 0 {
            return Err(Error::UnsupportedLayout(
                "WDC3 table with offset map records".to_string(),
            ));
        }

        let record_size = header.record_size as usize;

        let mut blocks = Blocks::new(data, Wdc3Header::SIZE);

        let sections: Vec<SectionHeader> = read_entries(
            blocks.take(
                header.section_count as usize * SectionHeader::SIZE,
                "section headers",
            )?,
            SectionHeader::SIZE,
        )?;
        let fields: Vec<FieldStructure> =
            read_entries(blocks.take(header.total_field_count as usize * 4, "field structure")?, 4)?;
        let storage: Vec<FieldStorageInfo> = read_entries(
            blocks.take(header.field_storage_info_size as usize, "field storage info")?,
            FieldStorageInfo::SIZE,
        )?;
        let pallet = blocks.take(header.pallet_data_size as usize, "pallet data")?;
        let common = blocks.take(header.common_data_size as usize, "common data")?;

        let physical = packed_columns(
            &fields,
            &storage,
            header.field_count as usize,
            record_size,
            pallet,
            common,
        )?;

        let mut table = DbcTable::packed(
            Format::Wdc3,
            physical,
            record_size,
            Vec::new(),
            Vec::new(),
            StringMode::Relative,
            sections.iter().any(|s| s.id_list_size > 0),
            sections.iter().any(|s| s.relationship_data_size > 0),
        );

        let mut copies = Vec::new();
        for (index, section) in sections.iter().enumerate() {
            let record_count = section.record_count as usize;
            let mut blocks = Blocks::new(data, section.file_offset as usize);

            let records = blocks.take(record_count * record_size, "records")?;
            let strings = blocks.take(section.string_table_size as usize, "string table")?;
            let ids = read_u32s(blocks.take(section.id_list_size as usize, "id list")?);
            let section_copies: Vec<CopyEntry> =
                read_entries(blocks.take(section.copy_table_count as usize * 8, "copy table")?, 8)?;
            blocks.take(section.offset_map_id_count as usize * 6, "offset map")?;
            let relationship = match section.relationship_data_size as usize {
                0 => None,
                size => Some(Relationship::read(&mut Cursor::new(blocks.take(
                    size,
                    "relationship data",
                )?))?),
            };

            let first_record = table.records.len() / record_size.max(1);
            table.records.extend_from_slice(records);
            table.strings.extend_from_slice(strings);

            if section.tact_key_hash != 0 {
                debug!(
                    "skipping encrypted section {index} ({} records)",
                    section.record_count
                );
                continue;
            }

            let relations = relationship
                .map(|r| {
                    r.entries
                        .iter()
                        .map(|e| (first_record + e.record_index as usize, e.foreign_id))
                        .collect::<HashMap<_, _>>()
                })
                .unwrap_or_default();

            table.push_rows(
                first_record,
                record_count,
                &ids,
                header.id_index as usize,
                &relations,
            )?;
            copies.extend(section_copies);
        }
        table.apply_copies(&copies);

        Ok(table)
    }

    #[allow(clippy::too_many_arguments)]
    fn packed(
        format: Format,
        physical: Vec<Column>,
        record_size: usize,
        records: Vec<u8>,
        strings: Vec<u8>,
        string_mode: StringMode,
        id_list: bool,
        relationship: bool,
    ) -> DbcTable {
        let mut columns = Vec::with_capacity(physical.len() + 2);
        if id_list {
            columns.push(Column::Id);
        }
        columns.extend(physical);
        if relationship {
            columns.push(Column::Relation);
        }

        DbcTable {
            format,
            columns,
            record_size,
            records,
            strings,
            string_mode,
            rows: Vec::new(),
            definition: None,
        }
    }

    fn push_rows(
        &mut self,
        first_record: usize,
        record_count: usize,
        ids: &[u32],
        id_index: usize,
        relations: &HashMap<usize, u32>,
    ) -> Result<()> {
        if !ids.is_empty() && ids.len() < record_count {
            return Err(Error::Truncated {
                block: "id list",
                needed: record_count * 4,
                available: ids.len() * 4,
            });
        }

        for i in 0..record_count {
            let record = first_record + i;
            let mut meta = RowMeta {
                record,
                id: 0,
                relation: relations.get(&record).copied().unwrap_or_default(),
            };
            meta.id = match ids.get(i) {
                Some(id) => *id,
                None => self.raw(&meta, id_index, 0)? as u32,
            };
            self.rows.push(meta);
        }

        Ok(())
    }

    fn apply_copies(&mut self, copies: &[CopyEntry]) {
        if copies.is_empty() {
            return;
        }

        let by_id: HashMap<u32, RowMeta> = self.rows.iter().map(|r| (r.id, *r)).collect();
        for copy in copies {
            match by_id.get(&copy.source_id) {
                Some(source) => self.rows.push(RowMeta {
                    id: copy.new_id,
                    ..*source
                }),
                None => debug!(
                    "copy table references missing row {} (new id {})",
                    copy.source_id, copy.new_id
                ),
            }
        }
    }

    fn record(&self, meta: &RowMeta) -> &[u8] {
        let start = meta.record * self.record_size;
        self.records
            .get(start..start + self.record_size)
            .unwrap_or_default()
    }

    fn column(&self, column: usize) -> Result<&Column> {
        self.columns.get(column).ok_or(Error::ColumnOutOfRange {
            column,
            columns: self.columns.len(),
        })
    }

    /// Raw value of a column element, sign extended for signed bit packed storage
    fn raw(&self, meta: &RowMeta, column: usize, index: usize) -> Result<u64> {
        let storage = self.column(column)?;
        let count = storage.count();
        if index >= count {
            return Err(Error::RepeatOutOfRange {
                column,
                index,
                count,
            });
        }

        let record = self.record(meta);
        let too_short = Error::RecordTooShort {
            column,
            record_size: self.record_size,
        };

        match storage {
            Column::Fixed { offset, width, .. } => {
                let (offset, width) = (*offset, *width);
                let start = offset + index * width;
                let bytes = record.get(start..start + width).ok_or(too_short)?;
                Ok(match width {
                    1 => bytes[0] as u64,
                    2 => LittleEndian::read_u16(bytes) as u64,
                    8 => LittleEndian::read_u64(bytes),
                    _ => LittleEndian::read_uint(bytes, width.min(8)),
                })
            }
            Column::Bits {
                offset,
                width,
                signed,
            } => {
                let value = read_bits(record, *offset, *width).ok_or(too_short)?;
                Ok(if *signed {
                    sign_extend(value, *width)
                } else {
                    value
                })
            }
            Column::Common { default, values } => {
                Ok(values.get(&meta.id).copied().unwrap_or(*default) as u64)
            }
            Column::Pallet {
                offset,
                width,
                values,
                count,
            } => {
                let slot = read_bits(record, *offset, *width).ok_or(too_short)?;
                let out_of_range = Error::PalletOutOfRange {
                    column,
                    index: usize::try_from(slot).unwrap_or(usize::MAX),
                };
                usize::try_from(slot)
                    .ok()
                    .and_then(|slot| slot.checked_mul(*count))
                    .and_then(|position| position.checked_add(index))
                    .and_then(|position| values.get(position))
                    .map(|v| *v as u64)
                    .ok_or(out_of_range)
            }
            Column::Id => Ok(meta.id as u64),
            Column::Relation => Ok(meta.relation as u64),
        }
    }

    fn string(&self, meta: &RowMeta, column: usize, index: usize) -> Result<&str> {
        let (offset, width) = match self.column(column)? {
            Column::Fixed { offset, width, .. } => (*offset, *width),
            _ => return Err(Error::NotAString(column)),
        };
        let value = self.raw(meta, column, index)? as u32 as i64;

        let position = match self.string_mode {
            StringMode::Absolute => value,
            StringMode::Relative => {
                let field = meta.record * self.record_size + offset + index * width;
                field as i64 + value - self.records.len() as i64
            }
        };

        if position == 0 && self.strings.is_empty() {
            return Ok("");
        }

        let tail = usize::try_from(position)
            .ok()
            .and_then(|p| self.strings.get(p..))
            .filter(|t| !t.is_empty())
            .ok_or(Error::StringOutOfBounds {
                offset: position,
                size: self.strings.len(),
            })?;
        let end = tail.iter().position(|b| *b == 0).unwrap_or(tail.len());

        Ok(std::str::from_utf8(&tail[..end])?)
    }

    /// The generation this table was read from
    pub fn format(&self) -> Format {
        self.format
    }

    /// Number of logical columns, including synthesized id and relationship columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of elements stored in a column
    pub fn column_len(&self, column: usize) -> Result<usize> {
        Ok(self.column(column)?.count())
    }

    pub fn definition(&self) -> Option<&Definition> {
        self.definition.as_ref()
    }

    /// Number of rows, including rows added by the copy table
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over all rows in file order, copied rows last
    pub fn rows(&self) -> impl ExactSizeIterator<Item = Row<'_>> + '_ {
        self.rows.iter().map(move |meta| Row { table: self, meta })
    }

    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        self.rows.get(index).map(|meta| Row { table: self, meta })
    }
}

/// A single row of a [`DbcTable`]
///
/// Every accessor returns an error for columns, repeat indices or string offsets that are
/// out of range for the table instead of panicking.
#[derive(Clone, Copy)]
pub struct Row<'a> {
    table: &'a DbcTable,
    meta: &'a RowMeta,
}

impl fmt::Debug for Row<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Row")
            .field("key", &self.meta.id)
            .field("record", &self.meta.record)
            .finish()
    }
}

impl<'a> Row<'a> {
    /// The row id
    pub fn key(&self) -> u32 {
        self.meta.id
    }

    pub fn get_uint(&self, column: usize) -> Result<u32> {
        self.get_uint_at(column, 0)
    }

    pub fn get_uint_at(&self, column: usize, index: usize) -> Result<u32> {
        Ok(self.table.raw(self.meta, column, index)? as u32)
    }

    pub fn get_int(&self, column: usize) -> Result<i32> {
        self.get_int_at(column, 0)
    }

    pub fn get_int_at(&self, column: usize, index: usize) -> Result<i32> {
        Ok(self.table.raw(self.meta, column, index)? as u32 as i32)
    }

    pub fn get_ushort(&self, column: usize) -> Result<u16> {
        self.get_ushort_at(column, 0)
    }

    pub fn get_ushort_at(&self, column: usize, index: usize) -> Result<u16> {
        Ok(self.table.raw(self.meta, column, index)? as u16)
    }

    pub fn get_float(&self, column: usize) -> Result<f32> {
        self.get_float_at(column, 0)
    }

    pub fn get_float_at(&self, column: usize, index: usize) -> Result<f32> {
        Ok(f32::from_bits(self.table.raw(self.meta, column, index)? as u32))
    }

    pub fn get_string(&self, column: usize) -> Result<&'a str> {
        self.get_string_at(column, 0)
    }

    pub fn get_string_at(&self, column: usize, index: usize) -> Result<&'a str> {
        self.table.string(self.meta, column, index)
    }

    /// Column index of a named field
    pub fn column_of(&self, name: &str) -> Result<usize> {
        self.table
            .definition
            .as_ref()
            .ok_or(Error::NoDefinition)?
            .column(name)
            .ok_or_else(|| Error::UnknownField(name.to_string()))
    }

    pub fn field_uint(&self, name: &str) -> Result<u32> {
        self.get_uint(self.column_of(name)?)
    }

    pub fn field_int(&self, name: &str) -> Result<i32> {
        self.get_int(self.column_of(name)?)
    }

    pub fn field_ushort(&self, name: &str) -> Result<u16> {
        self.get_ushort(self.column_of(name)?)
    }

    pub fn field_float(&self, name: &str) -> Result<f32> {
        self.get_float(self.column_of(name)?)
    }

    pub fn field_string(&self, name: &str) -> Result<&'a str> {
        self.get_string(self.column_of(name)?)
    }

    pub fn field_uint_at(&self, name: &str, index: usize) -> Result<u32> {
        self.get_uint_at(self.column_of(name)?, index)
    }

    pub fn field_int_at(&self, name: &str, index: usize) -> Result<i32> {
        self.get_int_at(self.column_of(name)?, index)
    }
}
