//! Base types for the on-disk structure of client database tables.

use binrw::{BinRead, BinWrite};
use std::fmt;

/// Table generation, recognised from the four byte signature
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Format {
    /// `WDBC`, used up to Wrath and for most Cataclysm/Mists tables
    Wdbc,
    /// `WDB2`, the DB2 files of Cataclysm and Mists
    Wdb2,
    /// `WDC1`, Legion
    Wdc1,
    /// `WDC3`, Shadowlands
    Wdc3,
}

impl Format {
    /// Detect the generation from the first bytes of a file
    pub fn from_magic(magic: [u8; 4]) -> Option<Format> {
        match &magic {
            b"WDBC" => Some(Format::Wdbc),
            b"WDB2" => Some(Format::Wdb2),
            b"WDC1" => Some(Format::Wdc1),
            b"WDC3" => Some(Format::Wdc3),
            _ => None,
        }
    }

    pub const fn magic(&self) -> &'static [u8; 4] {
        match self {
            Format::Wdbc => b"WDBC",
            Format::Wdb2 => b"WDB2",
            Format::Wdc1 => b"WDC1",
            Format::Wdc3 => b"WDC3",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // magic is always ascii
        f.write_str(std::str::from_utf8(self.magic()).unwrap_or("????"))
    }
}

/// WDBC file header
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(magic = b"WDBC", little)]
pub struct WdbcHeader {
    pub record_count: u32,
    pub field_count: u32,
    pub record_size: u32,
    pub string_block_size: u32,
}

impl WdbcHeader {
    pub const SIZE: usize = 20;
}

/// Trailer of the WDB2 header, present from build 12880 onward
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(little)]
pub struct Wdb2Index {
    pub min_id: u32,
    pub max_id: u32,
    pub locale: u32,
    pub copy_table_size: u32,
}

/// WDB2 file header
///
/// Identical to [`WdbcHeader`] up to the string block size. Newer builds carry an index
/// range, and when `max_id` is non-zero an index block of `(max_id - min_id + 1) * 6`
/// bytes sits between the header and the records.
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(magic = b"WDB2", little)]
pub struct Wdb2Header {
    pub record_count: u32,
    pub field_count: u32,
    pub record_size: u32,
    pub string_block_size: u32,
    pub table_hash: u32,
    pub build: u32,
    pub timestamp: u32,
    #[br(if(build > 12880))]
    pub index: Option<Wdb2Index>,
}

impl Wdb2Header {
    /// Size of the header plus the index block that follows it
    pub fn data_start(&self) -> usize {
        match self.index {
            None => 32,
            Some(index) if index.max_id == 0 => 48,
            Some(index) => {
                48 + (index.max_id.saturating_sub(index.min_id) as usize + 1) * 6
            }
        }
    }
}

/// WDC1 file header
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(magic = b"WDC1", little)]
pub struct Wdc1Header {
    pub record_count: u32,
    pub field_count: u32,
    pub record_size: u32,
    pub string_table_size: u32,
    pub table_hash: u32,
    pub layout_hash: u32,
    pub min_id: u32,
    pub max_id: u32,
    pub locale: u32,
    pub copy_table_size: u32,
    pub flags: u16,
    pub id_index: u16,
    pub total_field_count: u32,
    pub bitpacked_data_offset: u32,
    pub lookup_column_count: u32,
    pub offset_map_offset: u32,
    pub id_list_size: u32,
    pub field_storage_info_size: u32,
    pub common_data_size: u32,
    pub pallet_data_size: u32,
    pub relationship_data_size: u32,
}

impl Wdc1Header {
    pub const SIZE: usize = 84;
}

/// WDC3 file header
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(magic = b"WDC3", little)]
pub struct Wdc3Header {
    pub record_count: u32,
    pub field_count: u32,
    pub record_size: u32,
    pub string_table_size: u32,
    pub table_hash: u32,
    pub layout_hash: u32,
    pub min_id: u32,
    pub max_id: u32,
    pub locale: u32,
    pub flags: u16,
    pub id_index: u16,
    pub total_field_count: u32,
    pub bitpacked_data_offset: u32,
    pub lookup_column_count: u32,
    pub field_storage_info_size: u32,
    pub common_data_size: u32,
    pub pallet_data_size: u32,
    pub section_count: u32,
}

impl Wdc3Header {
    pub const SIZE: usize = 72;
}

/// Flag marking tables stored with an offset map instead of fixed size records
pub const FLAG_SPARSE: u16 = 0x1;

/// WDC3 section header
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(little)]
pub struct SectionHeader {
    /// Non-zero when the section is encrypted with a TACT key
    pub tact_key_hash: u64,
    pub file_offset: u32,
    pub record_count: u32,
    pub string_table_size: u32,
    pub offset_records_end: u32,
    pub id_list_size: u32,
    pub relationship_data_size: u32,
    pub offset_map_id_count: u32,
    pub copy_table_count: u32,
}

impl SectionHeader {
    pub const SIZE: usize = 40;
}

/// Legacy field description: bit size encoded as `32 - bits` and byte position
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(little)]
pub struct FieldStructure {
    pub size: i16,
    pub position: u16,
}

impl FieldStructure {
    /// Element width in bytes
    pub fn width(&self) -> usize {
        ((32 - self.size as i32).max(0) / 8) as usize
    }
}

/// How a column is stored inside the record
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum StorageType {
    #[default]
    None,
    Bitpacked,
    CommonData,
    BitpackedIndexed,
    BitpackedIndexedArray,
    BitpackedSigned,
}

impl TryFrom<u32> for StorageType {
    type Error = u32;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(StorageType::None),
            1 => Ok(StorageType::Bitpacked),
            2 => Ok(StorageType::CommonData),
            3 => Ok(StorageType::BitpackedIndexed),
            4 => Ok(StorageType::BitpackedIndexedArray),
            5 => Ok(StorageType::BitpackedSigned),
            other => Err(other),
        }
    }
}

impl From<StorageType> for u32 {
    fn from(value: StorageType) -> Self {
        match value {
            StorageType::None => 0,
            StorageType::Bitpacked => 1,
            StorageType::CommonData => 2,
            StorageType::BitpackedIndexed => 3,
            StorageType::BitpackedIndexedArray => 4,
            StorageType::BitpackedSigned => 5,
        }
    }
}

/// Per column storage description of WDC1 and WDC3 tables
///
/// The meaning of `val1..val3` depends on the storage type:
/// common data keeps its default value in `val1`, indexed arrays their element count in `val3`.
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(little)]
pub struct FieldStorageInfo {
    pub field_offset_bits: u16,
    pub field_size_bits: u16,
    pub additional_data_size: u32,
    #[br(try_map = |v: u32| StorageType::try_from(v).map_err(|v| format!("unknown storage type {v}")))]
    #[bw(map = |v: &StorageType| u32::from(*v))]
    pub storage_type: StorageType,
    pub val1: u32,
    pub val2: u32,
    pub val3: u32,
}

impl FieldStorageInfo {
    pub const SIZE: usize = 24;
}

/// Entry of the copy table: a new row id sharing the record of an existing one
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(little)]
pub struct CopyEntry {
    pub new_id: u32,
    pub source_id: u32,
}

/// Entry of the relationship block
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
#[brw(little)]
pub struct RelationshipEntry {
    pub foreign_id: u32,
    pub record_index: u32,
}

/// Header of the relationship block
#[derive(BinRead, BinWrite, Debug, Default, Clone, PartialEq)]
#[brw(little)]
pub struct Relationship {
    pub entry_count: u32,
    pub min_id: u32,
    pub max_id: u32,
    #[br(count = entry_count)]
    pub entries: Vec<RelationshipEntry>,
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use binrw::BinRead;
    use binrw::BinWrite;
    use pretty_assertions::assert_eq;

    use crate::error::Result;
    use crate::types::*;

    #[test]
    fn read_wdbc_header() -> Result<()> {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            b'W', b'D', b'B', b'C',
            0x02, 0x00, 0x00, 0x00,
            0x03, 0x00, 0x00, 0x00,
            0x0C, 0x00, 0x00, 0x00,
            0x11, 0x00, 0x00, 0x00,
        ]);

        let expected = WdbcHeader {
            record_count: 2,
            field_count: 3,
            record_size: 12,
            string_block_size: 17,
        };

        assert_eq!(WdbcHeader::read(&mut input)?, expected);
        assert_eq!(input.position() as usize, WdbcHeader::SIZE);

        Ok(())
    }

    #[test]
    fn read_old_wdb2_header_has_no_index() -> Result<()> {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            b'W', b'D', b'B', b'2',
            0x01, 0x00, 0x00, 0x00,
            0x02, 0x00, 0x00, 0x00,
            0x08, 0x00, 0x00, 0x00,
            0x01, 0x00, 0x00, 0x00,
            0xAA, 0xBB, 0xCC, 0xDD,
            0x40, 0x32, 0x00, 0x00, // 12864
            0x00, 0x00, 0x00, 0x00,
        ]);

        let header = Wdb2Header::read(&mut input)?;
        assert_eq!(header.build, 12864);
        assert_eq!(header.index, None);
        assert_eq!(header.data_start(), 32);

        Ok(())
    }

    #[test]
    fn read_wdb2_header_with_index() -> Result<()> {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            b'W', b'D', b'B', b'2',
            0x01, 0x00, 0x00, 0x00,
            0x02, 0x00, 0x00, 0x00,
            0x08, 0x00, 0x00, 0x00,
            0x01, 0x00, 0x00, 0x00,
            0xAA, 0xBB, 0xCC, 0xDD,
            0xE3, 0x3C, 0x00, 0x00, // 15587
            0x00, 0x00, 0x00, 0x00,
            0x05, 0x00, 0x00, 0x00, // min id
            0x09, 0x00, 0x00, 0x00, // max id
            0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
        ]);

        let header = Wdb2Header::read(&mut input)?;
        assert_eq!(
            header.index,
            Some(Wdb2Index {
                min_id: 5,
                max_id: 9,
                ..Default::default()
            })
        );
        assert_eq!(header.data_start(), 48 + 5 * 6);

        Ok(())
    }

    #[test]
    fn wdc1_header_size() -> Result<()> {
        let mut output = Cursor::new(Vec::new());
        Wdc1Header::default().write(&mut output)?;
        assert_eq!(output.into_inner().len(), Wdc1Header::SIZE);

        Ok(())
    }

    #[test]
    fn wdc3_header_size() -> Result<()> {
        let mut output = Cursor::new(Vec::new());
        Wdc3Header::default().write(&mut output)?;
        assert_eq!(output.into_inner().len(), Wdc3Header::SIZE);

        let mut output = Cursor::new(Vec::new());
        SectionHeader::default().write(&mut output)?;
        assert_eq!(output.into_inner().len(), SectionHeader::SIZE);

        Ok(())
    }

    #[test]
    fn read_field_storage_info() -> Result<()> {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            0x20, 0x00,             // offset bits
            0x0A, 0x00,             // size bits
            0x10, 0x00, 0x00, 0x00, // additional data size
            0x03, 0x00, 0x00, 0x00, // pallet
            0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
        ]);

        let info = FieldStorageInfo::read(&mut input)?;
        assert_eq!(info.field_offset_bits, 32);
        assert_eq!(info.field_size_bits, 10);
        assert_eq!(info.additional_data_size, 16);
        assert_eq!(info.storage_type, StorageType::BitpackedIndexed);

        Ok(())
    }

    #[test]
    fn reject_unknown_storage_type() {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            0x00, 0x00,
            0x20, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x09, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
        ]);

        assert!(FieldStorageInfo::read(&mut input).is_err());
    }

    #[test]
    fn field_structure_width() {
        assert_eq!(FieldStructure { size: 0, position: 0 }.width(), 4);
        assert_eq!(FieldStructure { size: 16, position: 0 }.width(), 2);
        assert_eq!(FieldStructure { size: 24, position: 0 }.width(), 1);
        assert_eq!(FieldStructure { size: -32, position: 0 }.width(), 8);
    }
}
