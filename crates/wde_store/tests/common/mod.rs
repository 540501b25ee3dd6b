//! Synthetic table directories generated from the version profiles

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::Path;
use tempfile::TempDir;
use wde_dbc::types::Format;
use wde_dbc::write::{IdStorage, TableWriter, TableWriterOptions, Value};
use wde_store::profile::{profile, Action, Col, Directive, ValueKind};
use wde_store::settings::{ClientVersion, DbcSettings, Locale};
use wde_store::Store;

pub const RECALL: &str = "Word of Recall (OLD)";

pub fn settings(version: ClientVersion, path: &Path) -> DbcSettings {
    DbcSettings::builder()
        .path(path)
        .version(version)
        .locale(Locale::EnUs)
        .build()
}

/// File generation a profile's table is written in
pub fn format_of(version: ClientVersion, file: &str) -> Format {
    match version {
        ClientVersion::Legion => Format::Wdc1,
        ClientVersion::Shadowlands => Format::Wdc3,
        _ if file.to_lowercase().ends_with(".db2") => Format::Wdb2,
        _ => Format::Wdbc,
    }
}

pub fn writer(version: ClientVersion, file: &str, ids: IdStorage) -> TableWriter {
    TableWriter::new(
        TableWriterOptions::builder()
            .format(format_of(version, file))
            .ids(ids)
            .client_build(version.build())
            .build(),
    )
}

/// `count` zero cells with the given overrides, for the columns after the id
pub fn cells(count: usize, overrides: &[(usize, Value)]) -> Vec<Value> {
    let mut values = vec![Value::UInt(0); count];
    for (column, value) in overrides {
        values[column - 1] = value.clone();
    }
    values
}

/// Values of a table keeping its id inline at `id_column`, `columns` wide in total
pub fn inline_cells(columns: usize, id_column: usize, overrides: &[(usize, Value)]) -> Vec<Value> {
    let mut values = vec![Value::UInt(0); columns - 1];
    for (column, value) in overrides {
        let index = if *column > id_column { column - 1 } else { *column };
        values[index] = value.clone();
    }
    values
}

struct FileSpec {
    id_column: usize,
    fields: &'static [&'static str],
    /// read column to kind and element count
    columns: BTreeMap<usize, (ValueKind, usize)>,
    spell_name: Option<usize>,
}

fn column_of(col: Col, fields: &[&str]) -> Option<(usize, usize)> {
    match col {
        Col::Key => None,
        Col::At(c) | Col::Loc(c) => Some((c, 1)),
        Col::Rep(c, i) => Some((c, i + 1)),
        Col::Field(name) => fields.iter().position(|f| *f == name).map(|c| (c, 1)),
    }
}

fn id_column(directive: &Directive) -> usize {
    match column_of(directive.action.id(), directive.fields) {
        Some((c, _)) => c,
        None => directive
            .fields
            .iter()
            .position(|f| *f == "ID")
            .unwrap_or(0),
    }
}

/// Write one row with id 1 for every table of the version's profile
///
/// Every column a directive reads gets a value of the kind it is read as; the spell name
/// column holds `spell_name`.
pub fn profile_fixture(version: ClientVersion, spell_name: &str) -> TempDir {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut files: BTreeMap<&'static str, FileSpec> = BTreeMap::new();

    for directive in profile(version).directives() {
        let spec = files.entry(directive.file).or_insert_with(|| FileSpec {
            id_column: id_column(directive),
            fields: directive.fields,
            columns: BTreeMap::new(),
            spell_name: None,
        });
        for (col, kind) in directive.action.columns() {
            let (column, width) = column_of(col, directive.fields).expect("known column");
            let entry = spec.columns.entry(column).or_insert((kind, width));
            entry.1 = entry.1.max(width);
        }
        if let Action::Names {
            store: Store::Spell,
            name,
            ..
        } = directive.action
        {
            spec.spell_name = column_of(name, directive.fields).map(|(c, _)| c);
        }
    }

    for (file, spec) in files {
        let count = spec
            .columns
            .keys()
            .copied()
            .chain([spec.id_column, spec.fields.len().saturating_sub(1)])
            .max()
            .unwrap_or(0)
            .max(1)
            + 1;

        let values: Vec<Value> = (0..count)
            .filter(|c| *c != spec.id_column)
            .map(|c| match spec.columns.get(&c) {
                Some((ValueKind::Str, _)) if spec.spell_name == Some(c) => {
                    Value::from(spell_name)
                }
                Some((ValueKind::Str, _)) => Value::from(format!("{file} {c}")),
                Some((ValueKind::Float, _)) => Value::Float(1.0),
                Some((ValueKind::Int, width)) if *width > 1 => Value::Array(vec![0; *width]),
                _ => Value::UInt(0),
            })
            .collect();

        let ids = match spec.id_column {
            0 => IdStorage::List,
            c => {
                assert!(
                    matches!(format_of(version, file), Format::Wdc1 | Format::Wdc3),
                    "{file}: flat tables keep their id in column 0"
                );
                IdStorage::Inline(c)
            }
        };
        writer(version, file, ids)
            .row(1, values)
            .write_to(dir.path().join(file))
            .expect("write fixture table");
    }

    dir
}
