//! This library handles reading from and creating the **DBC** and **DB2** client database tables
//! used by *World of Warcraft*.
//!
//! # Client Database Format Documentation
//!
//! Client database tables are flat arrays of fixed size records followed by a block of
//! null-terminated UTF-8 strings. Four generations are supported, recognised from the
//! first four bytes of the file. All multi-byte integers are little-endian.
//!
//! ## WDBC
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Magic number           | 4 bytes: "WDBC"                                            |
//! | 0x0004         | Record Count           | 4 bytes: Number of records                                 |
//! | 0x0008         | Field Count            | 4 bytes: Number of 4 byte columns per record               |
//! | 0x000C         | Record Size            | 4 bytes: Size of a record in bytes                         |
//! | 0x0010         | String Block Size      | 4 bytes: Size of the string block in bytes                 |
//!
//! The records follow the header, and the string block follows the records. Every column is
//! 4 bytes wide. String columns hold an offset from the start of the string block. Column 0
//! is the row id.
//!
//! ## WDB2
//!
//! The WDBC header followed by:
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0014         | Table Hash             | 4 bytes                                                    |
//! | 0x0018         | Build                  | 4 bytes: Client build the file was produced for            |
//! | 0x001C         | Timestamp              | 4 bytes                                                    |
//! | 0x0020         | Min Id                 | 4 bytes: Only present when build > 12880                   |
//! | 0x0024         | Max Id                 | 4 bytes: Only present when build > 12880                   |
//! | 0x0028         | Locale                 | 4 bytes: Only present when build > 12880                   |
//! | 0x002C         | Copy Table Size        | 4 bytes: Only present when build > 12880                   |
//!
//! When the max id is non-zero an index block of `(max_id - min_id + 1) * 6` bytes sits
//! between the header and the records. Records and strings are read like WDBC.
//!
//! ## WDC1
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Magic number           | 4 bytes: "WDC1"                                            |
//! | 0x0004         | Record Count           | 4 bytes                                                    |
//! | 0x0008         | Field Count            | 4 bytes                                                    |
//! | 0x000C         | Record Size            | 4 bytes                                                    |
//! | 0x0010         | String Table Size      | 4 bytes                                                    |
//! | 0x0014         | Table Hash             | 4 bytes                                                    |
//! | 0x0018         | Layout Hash            | 4 bytes                                                    |
//! | 0x001C         | Min Id                 | 4 bytes                                                    |
//! | 0x0020         | Max Id                 | 4 bytes                                                    |
//! | 0x0024         | Locale                 | 4 bytes                                                    |
//! | 0x0028         | Copy Table Size        | 4 bytes: Size in bytes, 8 bytes per entry                  |
//! | 0x002C         | Flags                  | 2 bytes: 0x1 marks sparse (offset map) tables              |
//! | 0x002E         | Id Index               | 2 bytes: Field holding the id when there is no id list     |
//! | 0x0030         | Total Field Count      | 4 bytes                                                    |
//! | 0x0034         | Bitpacked Data Offset  | 4 bytes                                                    |
//! | 0x0038         | Lookup Column Count    | 4 bytes                                                    |
//! | 0x003C         | Offset Map Offset      | 4 bytes                                                    |
//! | 0x0040         | Id List Size           | 4 bytes                                                    |
//! | 0x0044         | Field Storage Size     | 4 bytes: 24 bytes per field                                |
//! | 0x0048         | Common Data Size       | 4 bytes                                                    |
//! | 0x004C         | Pallet Data Size       | 4 bytes                                                    |
//! | 0x0050         | Relationship Size      | 4 bytes                                                    |
//!
//! After the header come, in order: the field structure (4 bytes per field), the records,
//! the string table, the id list, the copy table, the field storage info, the pallet data,
//! the common data and the relationship block.
//!
//! ### Field Storage
//!
//! | Type | Name                    | Value                                                         |
//! |------|-------------------------|---------------------------------------------------------------|
//! | 0    | None                    | Byte aligned, `size_bits / 32` elements                       |
//! | 1    | Bitpacked               | Unsigned value at `offset_bits`                               |
//! | 2    | Common Data             | `(id, value)` pairs, default in `val1`                        |
//! | 3    | Bitpacked Indexed       | Bitpacked index into the pallet                               |
//! | 4    | Bitpacked Indexed Array | Bitpacked index into the pallet, `val3` elements per entry    |
//! | 5    | Bitpacked Signed        | Sign extended value at `offset_bits`                          |
//!
//! When an id list is present it becomes column 0 and the stored fields shift by one. A
//! relationship block becomes an extra last column. Copy table entries add rows that share
//! the record of an existing row.
//!
//! ## WDC3
//!
//! The header is laid out like WDC1 without the copy table size, offset map offset, id list
//! size and relationship size, and ends with a section count (72 bytes in total). It is
//! followed by one 40 byte header per section, then the field structure, field storage
//! info, pallet data and common data shared by all sections.
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | TACT Key Hash          | 8 bytes: Non-zero for encrypted sections                   |
//! | 0x0008         | File Offset            | 4 bytes: Start of the section data                         |
//! | 0x000C         | Record Count           | 4 bytes                                                    |
//! | 0x0010         | String Table Size      | 4 bytes                                                    |
//! | 0x0014         | Offset Records End     | 4 bytes                                                    |
//! | 0x0018         | Id List Size           | 4 bytes                                                    |
//! | 0x001C         | Relationship Size      | 4 bytes                                                    |
//! | 0x0020         | Offset Map Id Count    | 4 bytes                                                    |
//! | 0x0024         | Copy Table Count       | 4 bytes: Number of 8 byte entries                          |
//!
//! Each section holds its records, string table, id list, copy table, offset map and
//! relationship block. String columns are relative to the position of the field itself,
//! counted over the records of all sections followed by the strings of all sections.
//! Encrypted sections are skipped.
//!
//! ## Additional Information
//!
//! - **File Extensions**: `.dbc`, `.db2`
//! - **Endianness**: Little-endian for all multi-byte integers
//! - **Named access**: tables can carry a [`Definition`] mapping field names to columns
//!

pub mod definition;
pub mod error;
pub mod read;
pub mod types;
pub mod write;

pub use definition::Definition;
pub use read::{DbcTable, Row};
pub use types::Format;
pub use write::TableWriter;
