//! Publishing loaded tables to readers
//!
//! [`DbcStore`] owns the published [`Snapshot`] behind an [`ArcSwap`]. A load reads the
//! tables on a worker thread and streams [`Progress`] back over a channel; the thread
//! that calls [`DbcStore::finish`] swaps the result in, checks it, registers the
//! parameters and notifies subscribers.
//!
//! ```no_run
//! use wde_store::parameter::MemoryRegistry;
//! use wde_store::settings::DbcSettings;
//! use wde_store::store::{DbcStore, DbcStoreOptions};
//!
//! let store = DbcStore::new(
//!     DbcStoreOptions::builder()
//!         .registry(Box::new(MemoryRegistry::default()))
//!         .build(),
//! );
//! let settings = DbcSettings::builder().path("/srv/wow/dbc").build();
//! let snapshot = store.load_blocking(&settings, |p| println!("{}", p.label))?;
//! println!("{} spells", snapshot.spell_service().spell_count());
//! # Ok::<(), wde_store::error::Error>(())
//! ```

use arc_swap::ArcSwap;
use bon::Builder;
use crossbeam_channel::{Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use crate::error::{Error, Result};
use crate::load::{load_tables, Progress};
use crate::parameter::{registrations, ParameterRegistry};
use crate::profile::profile;
use crate::settings::{DbcSettings, Locale};
use crate::snapshot::{Snapshot, Store, Tables};
use crate::spell::SpellServices;

/// Spell checked after every publish
pub const SANITY_SPELL_ID: u32 = 1;

/// Broadcast to subscribers after a publish
#[derive(Debug, Clone)]
pub enum StoreEvent {
    /// The spell service of the published snapshot may have changed
    SpellsChanged,
    Loaded(Arc<Snapshot>),
}

/// Shows blocking load failures to the user
pub trait Notifier: Send + Sync {
    fn invalid_data(&self, error: &Error);
}

/// Notifier writing failures to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn invalid_data(&self, error: &Error) {
        error!("{error}");
    }
}

/// Options for [`DbcStore::new`]
#[derive(Builder)]
pub struct DbcStoreOptions {
    #[builder(default)]
    pub services: SpellServices,

    pub registry: Box<dyn ParameterRegistry>,

    /// Defaults to [`LogNotifier`]
    pub notifier: Option<Box<dyn Notifier>>,
}

enum WorkerMessage {
    Progress(Progress),
    Finished(Result<Tables>),
}

/// Clears the in-flight flag when the load it guards is dropped
struct InFlight(Arc<AtomicBool>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// A load running on its worker thread, completed by [`DbcStore::finish`]
///
/// Dropping an unfinished handle discards its tables but waits for the worker to exit,
/// so the store stays busy until then.
pub struct LoadHandle {
    settings: DbcSettings,
    receiver: Receiver<WorkerMessage>,
    thread: Option<JoinHandle<()>>,
    _in_flight: InFlight,
}

impl Drop for LoadHandle {
    fn drop(&mut self) {
        if let Some(thread) = self.thread.take() {
            debug!("waiting for the abandoned load to exit");
            if thread.join().is_err() {
                warn!("abandoned load panicked");
            }
        }
    }
}

pub enum LoadState {
    Started(LoadHandle),
    /// Nothing to read: empty tables were published right away
    Degenerate(Arc<Snapshot>),
}

pub struct DbcStore {
    current: ArcSwap<Snapshot>,
    in_flight: Arc<AtomicBool>,
    suspect: AtomicBool,
    services: SpellServices,
    registry: Mutex<Box<dyn ParameterRegistry>>,
    notifier: Box<dyn Notifier>,
    subscribers: Mutex<Vec<Sender<StoreEvent>>>,
}

impl DbcStore {
    pub fn new(options: DbcStoreOptions) -> DbcStore {
        DbcStore {
            current: ArcSwap::from_pointee(Snapshot::default()),
            in_flight: Arc::new(AtomicBool::new(false)),
            suspect: AtomicBool::new(false),
            services: options.services,
            registry: Mutex::new(options.registry),
            notifier: options.notifier.unwrap_or_else(|| Box::new(LogNotifier)),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// The published snapshot, never partially updated
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    /// Whether the published snapshot failed its sanity check
    pub fn is_suspect(&self) -> bool {
        self.suspect.load(Ordering::Acquire)
    }

    pub fn subscribe(&self) -> Receiver<StoreEvent> {
        let (sender, receiver) = crossbeam_channel::unbounded();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sender);
        receiver
    }

    /// Start loading the tables described by `settings`
    ///
    /// When the path is missing or loading is disabled, empty tables are published
    /// immediately instead. Fails with [`Error::LoadInProgress`] while another load has
    /// not been finished, or was dropped and its worker is still running.
    #[instrument(skip_all, fields(version = %settings.version, path = %settings.path.display()), err)]
    pub fn load(&self, settings: &DbcSettings) -> Result<LoadState> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(Error::LoadInProgress);
        }
        let in_flight = InFlight(self.in_flight.clone());

        if !settings.is_configured() {
            info!("no tables to read, publishing empty lookups");
            return Ok(LoadState::Degenerate(self.publish_empty(settings)));
        }

        let (sender, receiver) = crossbeam_channel::unbounded();
        let services = self.services.clone();
        let worker_settings = settings.clone();
        let thread = std::thread::Builder::new()
            .name("dbc-load".to_string())
            .spawn(move || {
                let result = load_tables(&worker_settings, &services, |progress| {
                    sender.send(WorkerMessage::Progress(progress)).ok();
                });
                sender.send(WorkerMessage::Finished(result)).ok();
            })?;

        Ok(LoadState::Started(LoadHandle {
            settings: settings.clone(),
            receiver,
            thread: Some(thread),
            _in_flight: in_flight,
        }))
    }

    /// Wait for a load, forwarding its progress, then publish the result
    ///
    /// A failed load leaves the published snapshot untouched. A load whose data fails the
    /// sanity check is published and flagged [suspect](DbcStore::is_suspect), and the
    /// check failure is returned.
    #[instrument(skip_all, fields(version = %handle.settings.version), err)]
    pub fn finish(
        &self,
        mut handle: LoadHandle,
        mut on_progress: impl FnMut(&Progress),
    ) -> Result<Arc<Snapshot>> {
        let mut outcome = loop {
            match handle.receiver.recv() {
                Ok(WorkerMessage::Progress(progress)) => on_progress(&progress),
                Ok(WorkerMessage::Finished(result)) => break result,
                Err(_) => break Err(Error::Worker),
            }
        };
        if let Some(thread) = handle.thread.take() {
            if thread.join().is_err() {
                outcome = Err(Error::Worker);
            }
        }

        match outcome {
            Ok(tables) => self.publish(&handle.settings, tables),
            Err(e) => {
                error!("load aborted, keeping the previous tables: {e}");
                if matches!(e, Error::Format { .. }) {
                    self.notifier.invalid_data(&e);
                }
                Err(e)
            }
        }
    }

    /// [`load`](DbcStore::load) and [`finish`](DbcStore::finish) on the calling thread
    pub fn load_blocking(
        &self,
        settings: &DbcSettings,
        on_progress: impl FnMut(&Progress),
    ) -> Result<Arc<Snapshot>> {
        match self.load(settings)? {
            LoadState::Started(handle) => self.finish(handle, on_progress),
            LoadState::Degenerate(snapshot) => Ok(snapshot),
        }
    }

    fn publish(&self, settings: &DbcSettings, tables: Tables) -> Result<Arc<Snapshot>> {
        let service = match profile(settings.version).spell_service {
            Some(kind) => self.services.get(kind),
            None => self.current.load().spell_service().clone(),
        };
        let snapshot = Arc::new(Snapshot::new(
            tables,
            settings.version,
            settings.locale,
            service,
        ));
        self.current.store(snapshot.clone());

        if let Err(e) = sanity_check(&snapshot, settings) {
            self.suspect.store(true, Ordering::Release);
            error!("published tables failed the sanity check: {e}");
            self.notifier.invalid_data(&e);
            return Err(e);
        }
        self.suspect.store(false, Ordering::Release);

        self.register(&snapshot);
        self.broadcast(StoreEvent::SpellsChanged);
        self.broadcast(StoreEvent::Loaded(snapshot.clone()));
        info!(stores = snapshot.filled().len(), "tables published");
        Ok(snapshot)
    }

    fn publish_empty(&self, settings: &DbcSettings) -> Arc<Snapshot> {
        let snapshot = Arc::new(Snapshot::new(
            Tables::default(),
            settings.version,
            settings.locale,
            self.current.load().spell_service().clone(),
        ));
        self.current.store(snapshot.clone());
        self.suspect.store(false, Ordering::Release);
        self.register(&snapshot);
        self.broadcast(StoreEvent::SpellsChanged);
        self.broadcast(StoreEvent::Loaded(snapshot.clone()));
        snapshot
    }

    fn register(&self, snapshot: &Arc<Snapshot>) {
        let mut registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        for registration in registrations(snapshot) {
            registry.register(
                registration.key,
                registration.parameter,
                registration.quick_access,
            );
        }
    }

    fn broadcast(&self, event: StoreEvent) {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
    }
}

/// Compare a well known spell name against the one expected for the locale
///
/// Only the English and French names are known; other locales always pass.
pub fn sanity_check(snapshot: &Snapshot, settings: &DbcSettings) -> Result<()> {
    let expected = match settings.locale {
        Locale::EnUs => "Word of Recall (OLD)",
        Locale::FrFr => "Mot de rappel (OLD)",
        _ => return Ok(()),
    };

    let found = snapshot.names(Store::Spell).get(SANITY_SPELL_ID);
    if found.map(String::as_str) == Some(expected) {
        return Ok(());
    }
    Err(Error::Integrity {
        version: settings.version,
        path: settings.path.clone(),
        expected,
        found: found.cloned(),
    })
}
