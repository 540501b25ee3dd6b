//! Spell metadata services
//!
//! Detailed spell data is owned by a version specific service that loads its own tables
//! before the rest of a profile. The store only selects, loads and publishes it.

use derive_more::derive::Display;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::Result;

/// The service implementations a profile can ask for
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Display)]
pub enum SpellServiceKind {
    Wrath,
    Cataclysm,
    Legion,
}

pub trait SpellService: Send + Sync + fmt::Debug {
    /// Load the service tables from the configured directory
    fn load(&self, path: &Path) -> Result<()>;

    fn exists(&self, spell_id: u32) -> bool;

    fn spell_count(&self) -> usize;

    fn name(&self, spell_id: u32) -> Option<String>;
}

/// Service published before the first load, knows no spells
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSpellService;

impl SpellService for NullSpellService {
    fn load(&self, _path: &Path) -> Result<()> {
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

/// One service per [`SpellServiceKind`], all [`NullSpellService`] unless replaced
#[derive(Debug, Clone)]
pub struct SpellServices {
    wrath: Arc<dyn SpellService>,
    cataclysm: Arc<dyn SpellService>,
    legion: Arc<dyn SpellService>,
}

impl Default for SpellServices {
    fn default() -> Self {
        SpellServices {
            wrath: Arc::new(NullSpellService),
            cataclysm: Arc::new(NullSpellService),
            legion: Arc::new(NullSpellService),
        }
    }
}

impl SpellServices {
    pub fn with(mut self, kind: SpellServiceKind, service: Arc<dyn SpellService>) -> Self {
        match kind {
            SpellServiceKind::Wrath => self.wrath = service,
            SpellServiceKind::Cataclysm => self.cataclysm = service,
            SpellServiceKind::Legion => self.legion = service,
        }
        self
    }

    pub fn get(&self, kind: SpellServiceKind) -> Arc<dyn SpellService> {
        match kind {
            SpellServiceKind::Wrath => self.wrath.clone(),
            SpellServiceKind::Cataclysm => self.cataclysm.clone(),
            SpellServiceKind::Legion => self.legion.clone(),
        }
    }
}
