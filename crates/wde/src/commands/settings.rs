use clap::Args;
use miette::{Context, Result};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};
use wde_store::parameter::MemoryRegistry;
use wde_store::{ClientVersion, DbcSettings, DbcStore, DbcStoreOptions, Locale, Snapshot};

/// Where the table files live and which client wrote them
#[derive(Args)]
pub struct SettingsArgs {
    /// A JSON settings file, the other options override its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory holding the .dbc and .db2 files
    #[arg(short, long, value_name = "DIR", env = "WDE_DBC_PATH")]
    path: Option<PathBuf>,

    /// Client version: a name, a build number or a full version string
    #[arg(short = 'c', long = "client", value_name = "VERSION", env = "WDE_DBC_VERSION")]
    version: Option<ClientVersion>,

    /// Client locale, such as enUS or frFR
    #[arg(short, long, env = "WDE_DBC_LOCALE")]
    locale: Option<Locale>,

    /// Publish empty lookups without reading any file
    #[arg(long, default_value_t = false, env = "WDE_DBC_SKIP")]
    skip_loading: bool,
}

impl SettingsArgs {
    pub fn settings(&self) -> Result<DbcSettings> {
        let mut settings = match &self.config {
            Some(config) => DbcSettings::from_json_file(config)
                .context(format!("reading settings from {}", config.display()))?,
            None => DbcSettings::default(),
        };

        if let Some(path) = &self.path {
            settings.path = path.clone();
        }
        if let Some(version) = self.version {
            settings.version = version;
        }
        if let Some(locale) = self.locale {
            settings.locale = locale;
        }
        settings.skip_loading |= self.skip_loading;

        debug!(?settings, "resolved settings");
        Ok(settings)
    }

    /// Run one blocking load into a fresh store
    pub fn load(&self) -> Result<Loaded> {
        let settings = self.settings()?;
        let registry = Arc::new(Mutex::new(MemoryRegistry::default()));
        let store = DbcStore::new(
            DbcStoreOptions::builder()
                .registry(Box::new(registry.clone()))
                .build(),
        );

        info!(
            "loading {} tables from {}",
            settings.version,
            settings.path.display()
        );
        let snapshot = store.load_blocking(&settings, |progress| {
            debug!(
                step = progress.step + 1,
                total = progress.total,
                "{}",
                progress.label
            );
        })?;

        Ok(Loaded {
            settings,
            snapshot,
            registry,
        })
    }
}

pub struct Loaded {
    pub settings: DbcSettings,
    pub snapshot: Arc<Snapshot>,
    pub registry: Arc<Mutex<MemoryRegistry>>,
}
