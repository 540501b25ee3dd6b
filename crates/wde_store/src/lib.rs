//! Versioned loading and cross-referencing of *World of Warcraft* client database tables.
//!
//! # Overview
//!
//! A load reads the table files of one client generation into id to name lookups, links
//! areas to their maps and parents, composes descriptions from numeric fields and
//! publishes the result as one immutable [`Snapshot`].
//!
//! | Version       | Build | Spell service | Files                       |
//! |---------------|-------|---------------|-----------------------------|
//! | `Wrath`       | 12340 | wrath         | WDBC, localized columns     |
//! | `Cataclysm`   | 15595 | cataclysm     | WDBC, WDB2                  |
//! | `Mists`       | 18414 | cataclysm     | WDBC, WDB2                  |
//! | `Legion`      | 26972 | legion        | WDC1                        |
//! | `Shadowlands` | 41079 | none          | WDC3, read by field name    |
//!
//! Which tables a generation ships and where their columns live is plain data in
//! [`profile`]; [`load`] interprets it, [`index`] resolves references between tables and
//! [`store`] publishes the result.
//!
//! # Failure Handling
//!
//! - A missing table file is skipped and its lookups stay empty.
//! - A table that cannot be decoded aborts the load with [`error::Error::Format`]; the
//!   published snapshot is kept.
//! - Published data whose spell `1` does not carry the name expected for the locale is
//!   flagged suspect and reported as [`error::Error::Integrity`].
//! - A missing data directory, or disabled loading, publishes empty lookups.

pub mod entity;
pub mod error;
pub mod format;
pub mod index;
pub mod load;
pub mod lookup;
pub mod parameter;
pub mod profile;
pub mod settings;
pub mod snapshot;
pub mod spell;
pub mod store;

pub use lookup::LookupTable;
pub use settings::{ClientVersion, DbcSettings, Locale};
pub use snapshot::{IdStore, Snapshot, Store, Tables};
pub use store::{DbcStore, DbcStoreOptions, StoreEvent};
