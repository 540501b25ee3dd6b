mod common;

use indexmap::IndexMap;
use pretty_assertions::assert_eq;
use crossbeam_channel::Receiver;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_test::traced_test;
use wde_dbc::write::{IdStorage, Value};
use wde_store::error::Error;
use wde_store::parameter::MemoryRegistry;
use wde_store::settings::ClientVersion;
use wde_store::spell::{SpellService, SpellServiceKind, SpellServices};
use wde_store::store::{DbcStore, DbcStoreOptions, LoadState, Notifier, StoreEvent};
use wde_store::Store;

use common::{cells, inline_cells, profile_fixture, settings, writer, RECALL};

#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<String>>>);

impl Notifier for Recorder {
    fn invalid_data(&self, error: &Error) {
        self.0.lock().expect("recorder").push(error.to_string());
    }
}

struct Harness {
    store: DbcStore,
    registry: Arc<Mutex<MemoryRegistry>>,
    notified: Recorder,
}

impl Harness {
    fn new() -> Harness {
        let registry = Arc::new(Mutex::new(MemoryRegistry::default()));
        let notified = Recorder::default();
        let store = DbcStore::new(
            DbcStoreOptions::builder()
                .registry(Box::new(registry.clone()))
                .notifier(Box::new(notified.clone()))
                .build(),
        );
        Harness {
            store,
            registry,
            notified,
        }
    }

    fn registered(&self) -> usize {
        self.registry.lock().expect("registry").len()
    }

    fn notifications(&self) -> Vec<String> {
        self.notified.0.lock().expect("recorder").clone()
    }
}

#[test]
#[traced_test]
fn published_snapshots_are_never_modified() -> Result<(), Error> {
    let harness = Harness::new();
    let full = profile_fixture(ClientVersion::Wrath, RECALL);
    let first = harness
        .store
        .load_blocking(&settings(ClientVersion::Wrath, full.path()), |_| {})?;
    assert!(!first.areas().is_empty());

    let sparse = tempfile::tempdir()?;
    writer(ClientVersion::Wrath, "Spell.dbc", IdStorage::List)
        .row(1, cells(136, &[(136, Value::from(RECALL))]))
        .write_to(sparse.path().join("Spell.dbc"))
        .expect("write table");
    let second = harness
        .store
        .load_blocking(&settings(ClientVersion::Wrath, sparse.path()), |_| {})?;

    assert!(Arc::ptr_eq(&harness.store.snapshot(), &second));
    assert!(second.areas().is_empty());
    assert!(!first.areas().is_empty());
    assert_eq!(second.filled(), vec![Store::Spell]);
    assert_eq!(harness.registered(), 63);
    Ok(())
}

#[test]
#[traced_test]
fn failed_sanity_check_flags_the_snapshot() -> Result<(), Error> {
    let harness = Harness::new();
    let dir = profile_fixture(ClientVersion::Cataclysm, "Mot de rappel (OLD)");
    let events = harness.store.subscribe();

    match harness
        .store
        .load_blocking(&settings(ClientVersion::Cataclysm, dir.path()), |_| {})
    {
        Err(Error::Integrity {
            version, found, ..
        }) => {
            assert_eq!(version, ClientVersion::Cataclysm);
            assert_eq!(found.as_deref(), Some("Mot de rappel (OLD)"));
        }
        other => panic!("unexpected {other:?}"),
    }

    assert!(harness.store.is_suspect());
    assert_eq!(harness.store.snapshot().version(), ClientVersion::Cataclysm);
    assert_eq!(harness.registered(), 0);
    assert!(events.try_recv().is_err());
    assert_eq!(harness.notifications(), vec!["Invalid DBC path".to_string()]);
    assert!(logs_contain("failed the sanity check"));
    Ok(())
}

#[test]
#[traced_test]
fn undecodable_tables_keep_the_previous_snapshot() -> Result<(), Error> {
    let harness = Harness::new();
    let good = profile_fixture(ClientVersion::Wrath, RECALL);
    let published = harness
        .store
        .load_blocking(&settings(ClientVersion::Wrath, good.path()), |_| {})?;

    let bad = tempfile::tempdir()?;
    std::fs::write(bad.path().join("Map.dbc"), b"WDBC")?;
    let result = harness
        .store
        .load_blocking(&settings(ClientVersion::Wrath, bad.path()), |_| {});

    assert!(matches!(result, Err(Error::Format { .. })));
    assert!(Arc::ptr_eq(&harness.store.snapshot(), &published));
    assert!(!harness.store.is_suspect());
    assert_eq!(harness.notifications().len(), 1);
    assert!(logs_contain("keeping the previous tables"));
    Ok(())
}

#[test]
fn one_load_at_a_time() -> Result<(), Error> {
    let harness = Harness::new();
    let dir = profile_fixture(ClientVersion::Wrath, RECALL);
    let settings = settings(ClientVersion::Wrath, dir.path());

    let LoadState::Started(handle) = harness.store.load(&settings)? else {
        panic!("expected a worker load");
    };
    assert!(matches!(
        harness.store.load(&settings),
        Err(Error::LoadInProgress)
    ));

    let mut labels = Vec::new();
    let snapshot = harness
        .store
        .finish(handle, |p| labels.push(p.label.clone()))?;
    assert_eq!(labels.len(), 43);
    assert_eq!(snapshot.names(Store::Spell).get(1).map(String::as_str), Some(RECALL));

    assert!(harness.store.load_blocking(&settings, |_| {}).is_ok());
    Ok(())
}

/// Spell service whose load blocks until its gate opens
#[derive(Debug)]
struct GatedSpells {
    gate: Receiver<()>,
    loaded: Arc<AtomicUsize>,
}

impl SpellService for GatedSpells {
    fn load(&self, _path: &Path) -> Result<(), Error> {
        self.gate.recv().ok();
        self.loaded.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn exists(&self, _spell_id: u32) -> bool {
        false
    }

    fn spell_count(&self) -> usize {
        0
    }

    fn name(&self, _spell_id: u32) -> Option<String> {
        None
    }
}

#[test]
#[traced_test]
fn dropped_loads_hold_the_store_until_their_worker_exits() -> Result<(), Error> {
    let (open, gate) = crossbeam_channel::unbounded();
    let loaded = Arc::new(AtomicUsize::new(0));
    let services = SpellServices::default().with(
        SpellServiceKind::Wrath,
        Arc::new(GatedSpells {
            gate,
            loaded: loaded.clone(),
        }),
    );
    let store = DbcStore::new(
        DbcStoreOptions::builder()
            .services(services)
            .registry(Box::new(MemoryRegistry::default()))
            .build(),
    );
    let dir = profile_fixture(ClientVersion::Wrath, RECALL);
    let settings = settings(ClientVersion::Wrath, dir.path());

    let LoadState::Started(handle) = store.load(&settings)? else {
        panic!("expected a worker load");
    };
    let (dropping, dropped) = crossbeam_channel::bounded(0);
    let dropper = std::thread::spawn(move || {
        dropping.send(()).ok();
        drop(handle);
    });
    dropped.recv().ok();
    std::thread::sleep(Duration::from_millis(50));

    assert!(matches!(store.load(&settings), Err(Error::LoadInProgress)));
    assert_eq!(loaded.load(Ordering::SeqCst), 0);

    drop(open);
    dropper.join().expect("dropper");
    assert_eq!(loaded.load(Ordering::SeqCst), 1);

    let snapshot = store.load_blocking(&settings, |_| {})?;
    assert_eq!(loaded.load(Ordering::SeqCst), 2);
    assert_eq!(snapshot.names(Store::Spell).get(1).map(String::as_str), Some(RECALL));
    assert!(logs_contain("waiting for the abandoned load to exit"));
    Ok(())
}

#[test]
fn subscribers_see_each_publish() -> Result<(), Error> {
    let harness = Harness::new();
    let events = harness.store.subscribe();
    let dir = profile_fixture(ClientVersion::Mists, RECALL);

    let snapshot = harness
        .store
        .load_blocking(&settings(ClientVersion::Mists, dir.path()), |_| {})?;

    assert!(matches!(events.try_recv(), Ok(StoreEvent::SpellsChanged)));
    match events.try_recv() {
        Ok(StoreEvent::Loaded(loaded)) => assert!(Arc::ptr_eq(&loaded, &snapshot)),
        other => panic!("unexpected {other:?}"),
    }

    drop(events);
    assert!(harness
        .store
        .load_blocking(&settings(ClientVersion::Mists, dir.path()), |_| {})
        .is_ok());
    Ok(())
}

fn write_legion(dir: &Path) {
    let write = |file: &str, ids: IdStorage, rows: Vec<(u32, Vec<Value>)>| {
        let mut table = writer(ClientVersion::Legion, file, ids);
        for (id, values) in rows {
            table.row(id, values);
        }
        table.write_to(dir.join(file)).expect("write table");
    };
    let list = IdStorage::List;

    write("spell.db2", list, vec![(1, cells(1, &[(1, Value::from(RECALL))]))]);

    let area = |name: &str| {
        cells(
            6,
            &[
                (2, Value::from(name)),
                (3, Value::from(vec![0u32, 0])),
                (5, Value::from(571u32)),
            ],
        )
    };
    write(
        "AreaTable.db2",
        list,
        vec![(65, area("Dragonblight")), (4161, area("Wyrmrest Temple"))],
    );
    let member = |area: u32, group: u32| {
        cells(2, &[(1, Value::from(area)), (2, Value::from(group))])
    };
    write(
        "AreaGroupMember.db2",
        list,
        vec![(1, member(65, 7)), (2, member(4161, 7)), (3, member(999, 8))],
    );

    write(
        "CurrencyTypes.db2",
        list,
        vec![(1220, cells(1, &[(1, Value::from("Order Resources"))]))],
    );
    write(
        "ItemSparse.db2",
        list,
        vec![(124124, cells(2, &[(2, Value::from("Blood of Sargeras"))]))],
    );
    let slots = |first: u32| Value::from(vec![first, 0, 0, 0, 0]);
    write(
        "ItemExtendedCost.db2",
        list,
        vec![
            (
                3,
                vec![
                    slots(124124),
                    slots(250),
                    slots(2),
                    Value::from(1800u32),
                    slots(1220),
                ],
            ),
            (
                4,
                vec![slots(0), slots(10), slots(0), Value::from(0u32), slots(999)],
            ),
        ],
    );

    write(
        "chrClasses.db2",
        IdStorage::Inline(19),
        vec![(5, inline_cells(20, 19, &[(1, Value::from("Priest"))]))],
    );
    let spec = |name: &str, class: u32| {
        cells(5, &[(1, Value::from(name)), (5, Value::from(class))])
    };
    write(
        "ChrSpecialization.db2",
        list,
        vec![(257, spec("Holy", 5)), (900, spec("Unbound", 42))],
    );

    let building = |alliance: &str, horde: &str| {
        cells(2, &[(1, Value::from(alliance)), (2, Value::from(horde))])
    };
    write(
        "GarrBuilding.db2",
        list,
        vec![
            (26, building("Barracks", "War Mill")),
            (65, building("Stables", "Stables")),
        ],
    );

    let step = |name: &str, scenario: u32, index: u32| {
        cells(
            6,
            &[
                (1, Value::from(name)),
                (3, Value::from(scenario)),
                (6, Value::from(index)),
            ],
        )
    };
    write(
        "ScenarioStep.db2",
        list,
        vec![(10, step("Enter", 5, 0)), (11, step("Fight", 5, 1))],
    );
}

#[test]
fn legion_tables_compose_descriptions() -> Result<(), Error> {
    let harness = Harness::new();
    let dir = tempfile::tempdir()?;
    write_legion(dir.path());

    let snapshot = harness
        .store
        .load_blocking(&settings(ClientVersion::Legion, dir.path()), |_| {})?;
    let name = |store: Store, id: i64| snapshot.names(store).get(id).cloned();

    assert_eq!(
        name(Store::AreaGroup, 7).as_deref(),
        Some("Dragonblight, Wyrmrest Temple")
    );
    assert_eq!(name(Store::AreaGroup, 8).as_deref(), Some("Area 999"));

    assert_eq!(
        name(Store::ExtendedCost, 3).as_deref(),
        Some("250 x Order Resources, 2 x Blood of Sargeras, min arena rating 1800")
    );
    assert_eq!(name(Store::ExtendedCost, 4).as_deref(), Some("10 x Currency 999"));

    assert_eq!(name(Store::CharSpecialization, 257).as_deref(), Some("Priest - Holy"));
    assert_eq!(name(Store::CharSpecialization, 900).as_deref(), Some("Unbound"));

    assert_eq!(
        name(Store::GarrisonBuilding, 26).as_deref(),
        Some("Barracks / War Mill")
    );
    assert_eq!(name(Store::GarrisonBuilding, 65).as_deref(), Some("Stables"));

    assert_eq!(name(Store::ScenarioStep, 11).as_deref(), Some("Fight"));
    assert_eq!(
        snapshot.scenario_steps().get(5),
        Some(&IndexMap::from([(0, 10), (1, 11)]))
    );
    Ok(())
}
