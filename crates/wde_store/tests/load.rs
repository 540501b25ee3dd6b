mod common;

use pretty_assertions::assert_eq;
use std::path::Path;
use strum::IntoEnumIterator;
use tracing_test::traced_test;
use wde_dbc::write::{IdStorage, Value};
use wde_store::error::Error;
use wde_store::load::{load_tables, Progress};
use wde_store::profile::{profile, Target};
use wde_store::settings::{ClientVersion, DbcSettings, Locale};
use wde_store::spell::SpellServices;
use wde_store::{IdStore, Store, Tables};

use common::{cells, profile_fixture, settings, writer, RECALL};

fn load(settings: &DbcSettings) -> Result<(Tables, Vec<Progress>), Error> {
    let mut progress = Vec::new();
    let tables = load_tables(settings, &SpellServices::default(), |p| progress.push(p))?;
    Ok((tables, progress))
}

fn is_filled(tables: &Tables, target: Target) -> bool {
    match target {
        Target::Names(store) => !tables.names(store).is_empty(),
        Target::Ids(store) => !tables.ids(store).is_empty(),
        Target::TaxiPaths => !tables.taxi_paths().is_empty(),
        Target::ScenarioSteps => !tables.scenario_steps().is_empty(),
        Target::Areas => !tables.areas().is_empty(),
        Target::Maps => !tables.maps().is_empty(),
        Target::Factions => !tables.factions().is_empty(),
        Target::FactionTemplates => !tables.faction_templates().is_empty(),
    }
}

#[test]
#[traced_test]
fn profiles_fill_exactly_their_targets() -> Result<(), Error> {
    for version in ClientVersion::iter() {
        let dir = profile_fixture(version, RECALL);
        let (tables, progress) = load(&settings(version, dir.path()))?;

        let targets = profile(version).targets();
        for target in &targets {
            // every fixture emote is a one shot
            if *target == Target::Names(Store::EmoteState) {
                continue;
            }
            assert!(is_filled(&tables, *target), "{version}: {target:?} is empty");
        }
        for store in tables.filled() {
            assert!(
                targets.contains(&Target::Names(store)),
                "{version}: {store} filled without a directive"
            );
        }
        for store in IdStore::iter() {
            assert_eq!(
                tables.ids(store).is_empty(),
                !targets.contains(&Target::Ids(store)),
                "{version}: {store}"
            );
        }

        assert_eq!(
            tables.names(Store::Spell).get(1).map(String::as_str),
            Some(RECALL),
            "{version}"
        );
        assert_eq!(progress.len(), profile(version).table_count(), "{version}");
    }
    Ok(())
}

#[test]
fn progress_counts_every_table() -> Result<(), Error> {
    let dir = profile_fixture(ClientVersion::Wrath, RECALL);
    let (_, progress) = load(&settings(ClientVersion::Wrath, dir.path()))?;

    assert_eq!(
        progress.first(),
        Some(&Progress {
            step: 0,
            total: 43,
            label: "Loading AreaTrigger.dbc".to_string(),
        })
    );
    assert_eq!(progress.last().map(|p| p.step), Some(42));
    assert!(progress.iter().all(|p| p.total == 43));
    Ok(())
}

#[test]
#[traced_test]
fn missing_files_are_skipped() -> Result<(), Error> {
    let dir = tempfile::tempdir()?;
    writer(ClientVersion::Wrath, "Movie.dbc", IdStorage::List)
        .row(2, cells(1, &[(1, Value::from("Interface\\Cinematics\\Logo.avi"))]))
        .write_to(dir.path().join("Movie.dbc"))
        .expect("write table");

    let (tables, progress) = load(&settings(ClientVersion::Wrath, dir.path()))?;

    assert_eq!(progress.len(), 43);
    assert_eq!(tables.filled(), vec![Store::Movie]);
    assert!(tables.areas().is_empty());
    assert!(logs_contain("Spell.dbc not found, skipped"));
    Ok(())
}

#[test]
fn file_names_match_case_insensitively() -> Result<(), Error> {
    let dir = tempfile::tempdir()?;
    writer(ClientVersion::Wrath, "ChrClasses.dbc", IdStorage::List)
        .row(5, cells(4, &[(4, Value::from("Priest"))]))
        .write_to(dir.path().join("ChrClasses.dbc"))
        .expect("write table");

    let (tables, _) = load(&settings(ClientVersion::Wrath, dir.path()))?;
    assert_eq!(
        tables.names(Store::Class).get(5).map(String::as_str),
        Some("Priest")
    );
    Ok(())
}

#[test]
fn undecodable_tables_abort_the_load() -> Result<(), Error> {
    let dir = tempfile::tempdir()?;
    std::fs::write(dir.path().join("Spell.dbc"), b"XDBC not a table")?;

    match load(&settings(ClientVersion::Wrath, dir.path())) {
        Err(Error::Format { file, version, .. }) => {
            assert_eq!(file, "Spell.dbc");
            assert_eq!(version, ClientVersion::Wrath);
        }
        other => panic!("unexpected {other:?}"),
    }

    // too few columns for the localized spell name
    writer(ClientVersion::Wrath, "Spell.dbc", IdStorage::List)
        .row(1, cells(3, &[]))
        .write_to(dir.path().join("Spell.dbc"))
        .expect("write table");
    assert!(matches!(
        load(&settings(ClientVersion::Wrath, dir.path())),
        Err(Error::Format { .. })
    ));
    Ok(())
}

fn write_world(dir: &Path) -> Result<(), Error> {
    writer(ClientVersion::Wrath, "Map.dbc", IdStorage::List)
        .row(
            571,
            cells(
                5,
                &[
                    (1, Value::from("Northrend")),
                    (2, Value::from(0u32)),
                    (5, Value::from("Northrend")),
                ],
            ),
        )
        .row(
            33,
            cells(
                5,
                &[
                    (1, Value::from("Shadowfang")),
                    (2, Value::from(1u32)),
                    (5, Value::from("Shadowfang Keep")),
                ],
            ),
        )
        .write_to(dir.join("Map.dbc"))
        .expect("write table");

    let area = |map: u32, parent: u32, name: &str| {
        cells(
            11,
            &[
                (1, Value::from(map)),
                (2, Value::from(parent)),
                (11, Value::from(name)),
            ],
        )
    };
    writer(ClientVersion::Wrath, "AreaTable.dbc", IdStorage::List)
        .row(65, area(571, 0, "Dragonblight"))
        .row(4161, area(571, 65, "Wyrmrest Temple"))
        .row(99, area(9999, 12345, "Nowhere"))
        .write_to(dir.join("AreaTable.dbc"))
        .expect("write table");
    Ok(())
}

#[test]
fn areas_link_to_maps_and_parents() -> Result<(), Error> {
    let dir = tempfile::tempdir()?;
    write_world(dir.path())?;

    let (tables, _) = load(&settings(ClientVersion::Wrath, dir.path()))?;

    let temple = tables.area(4161).expect("temple");
    assert_eq!(tables.area_map(temple).map(|m| m.id), Some(571));
    assert_eq!(
        tables.parent_area(temple).map(|a| a.name.as_str()),
        Some("Dragonblight")
    );

    let dragonblight = tables.area(65).expect("dragonblight");
    assert!(tables.parent_area(dragonblight).is_none());

    let nowhere = tables.area(99).expect("nowhere");
    assert!(tables.area_map(nowhere).is_none());
    assert!(tables.parent_area(nowhere).is_none());

    assert_eq!(
        tables.names(Store::Area).get(99).map(String::as_str),
        Some("Nowhere")
    );
    assert_eq!(
        tables.names(Store::Map).get(33).map(String::as_str),
        Some("Shadowfang Keep")
    );
    assert_eq!(
        tables.names(Store::MapDirectory).get(33).map(String::as_str),
        Some("Shadowfang")
    );
    Ok(())
}

#[test]
fn unresolved_joins_fall_back_to_generic_names() -> Result<(), Error> {
    let dir = tempfile::tempdir()?;
    writer(ClientVersion::Wrath, "ItemDisplayInfo.dbc", IdStorage::List)
        .row(8, cells(5, &[(5, Value::from("inv_sword_04"))]))
        .write_to(dir.path().join("ItemDisplayInfo.dbc"))
        .expect("write table");
    writer(ClientVersion::Wrath, "Item.dbc", IdStorage::List)
        .row(25, cells(5, &[(5, Value::from(7u32))]))
        .row(26, cells(5, &[(5, Value::from(8u32))]))
        .write_to(dir.path().join("Item.dbc"))
        .expect("write table");
    writer(ClientVersion::Wrath, "Holidays.dbc", IdStorage::List)
        .row(141, cells(49, &[(49, Value::from(3u32))]))
        .write_to(dir.path().join("Holidays.dbc"))
        .expect("write table");

    let (tables, _) = load(&settings(ClientVersion::Wrath, dir.path()))?;

    let items = tables.names(Store::ItemDbc);
    assert_eq!(items.get(25).map(String::as_str), Some("Item 25"));
    assert_eq!(items.get(26).map(String::as_str), Some("inv_sword_04"));
    assert_eq!(
        tables.names(Store::Holidays).get(141).map(String::as_str),
        Some("Holiday 141")
    );
    Ok(())
}

#[test]
fn localized_columns_follow_the_locale() -> Result<(), Error> {
    let dir = tempfile::tempdir()?;
    writer(ClientVersion::Wrath, "Spell.dbc", IdStorage::List)
        .row(
            1,
            cells(
                138,
                &[
                    (136, Value::from(RECALL)),
                    (138, Value::from("Mot de rappel (OLD)")),
                ],
            ),
        )
        .write_to(dir.path().join("Spell.dbc"))
        .expect("write table");

    let english = settings(ClientVersion::Wrath, dir.path());
    let french = DbcSettings::builder()
        .path(dir.path())
        .version(ClientVersion::Wrath)
        .locale(Locale::FrFr)
        .build();

    let (tables, _) = load(&english)?;
    assert_eq!(tables.names(Store::Spell).get(1).map(String::as_str), Some(RECALL));
    let (tables, _) = load(&french)?;
    assert_eq!(
        tables.names(Store::Spell).get(1).map(String::as_str),
        Some("Mot de rappel (OLD)")
    );
    Ok(())
}

#[test]
fn later_duplicates_win() -> Result<(), Error> {
    let dir = tempfile::tempdir()?;
    writer(ClientVersion::Wrath, "Movie.dbc", IdStorage::List)
        .row(2, cells(1, &[(1, Value::from("first"))]))
        .row(2, cells(1, &[(1, Value::from("second"))]))
        .write_to(dir.path().join("Movie.dbc"))
        .expect("write table");

    let (tables, _) = load(&settings(ClientVersion::Wrath, dir.path()))?;
    assert_eq!(
        tables.names(Store::Movie).get(2).map(String::as_str),
        Some("second")
    );
    Ok(())
}

#[test]
fn loading_twice_gives_equal_tables() -> Result<(), Error> {
    let dir = tempfile::tempdir()?;
    write_world(dir.path())?;
    let settings = settings(ClientVersion::Wrath, dir.path());

    let (first, _) = load(&settings)?;
    let (second, _) = load(&settings)?;
    assert_eq!(first, second);
    Ok(())
}
