//! The published result of a load

use derive_more::derive::Deref;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::Arc;
use strum::{Display, EnumCount, EnumIter, EnumString, IntoEnumIterator};

use crate::entity::{AreaEntry, Faction, FactionTemplate, MapEntry};
use crate::lookup::LookupTable;
use crate::settings::{ClientVersion, Locale};
use crate::spell::{NullSpellService, SpellService};

/// Id to name lookups filled by a load
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumCount, EnumIter, EnumString,
)]
pub enum Store {
    AreaTrigger,
    Faction,
    Spell,
    Skill,
    Language,
    Phase,
    Area,
    Map,
    MapDirectory,
    Sound,
    Movie,
    Class,
    Race,
    Emote,
    EmoteOneShot,
    EmoteState,
    TextEmote,
    Achievement,
    Item,
    SpellFocusObject,
    QuestInfo,
    CharTitle,
    CreatureModelData,
    GameObjectDisplayInfo,
    QuestSort,
    CurrencyType,
    ExtendedCost,
    TaxiNode,
    SpellItemEnchantment,
    AreaGroup,
    ItemDisplayInfo,
    MailTemplate,
    LfgDungeon,
    ItemSet,
    DungeonEncounter,
    HolidayNames,
    Holidays,
    WorldSafeLocs,
    Battleground,
    AchievementCriteria,
    /// Item to display name, from `Item.dbc` rather than the item-sparse table
    ItemDbc,
    Scene,
    Scenario,
    ScenarioStep,
    BattlePetAbility,
    CharSpecialization,
    GarrisonClassSpec,
    GarrisonBuilding,
    GarrisonTalent,
    Difficulty,
    LockType,
    Vignette,
    AdventureJournal,
    SpellCastTime,
    SpellDuration,
    SpellRange,
    SpellRadius,
    /// File data id to file name, only used to name movies
    FileData,
}

/// Id to id lookups filled by a load
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumCount, EnumIter, EnumString,
)]
pub enum IdStore {
    /// Template id to faction id
    FactionTemplate,
    /// Display id to model id
    CreatureDisplayInfo,
    /// Species id to creature id
    BattlePetSpecies,
}

/// Every table of a load, filled while loading and frozen on publish
#[derive(Debug, Clone, PartialEq)]
pub struct Tables {
    names: Vec<LookupTable<String>>,
    ids: Vec<LookupTable<i64>>,
    pub(crate) taxi_paths: LookupTable<(i64, i64)>,
    pub(crate) scenario_steps: LookupTable<IndexMap<i64, i64>>,
    pub(crate) areas: Vec<AreaEntry>,
    pub(crate) maps: Vec<MapEntry>,
    pub(crate) factions: Vec<Faction>,
    pub(crate) faction_templates: Vec<FactionTemplate>,
    pub(crate) area_by_id: HashMap<u32, usize>,
    pub(crate) map_by_id: HashMap<u32, usize>,
    faction_by_id: HashMap<u16, usize>,
    faction_template_by_id: HashMap<u32, usize>,
}

impl Default for Tables {
    fn default() -> Self {
        Tables {
            names: Store::iter().map(|_| LookupTable::default()).collect(),
            ids: IdStore::iter().map(|_| LookupTable::default()).collect(),
            taxi_paths: LookupTable::default(),
            scenario_steps: LookupTable::default(),
            areas: Vec::new(),
            maps: Vec::new(),
            factions: Vec::new(),
            faction_templates: Vec::new(),
            area_by_id: HashMap::new(),
            map_by_id: HashMap::new(),
            faction_by_id: HashMap::new(),
            faction_template_by_id: HashMap::new(),
        }
    }
}

impl Tables {
    pub fn names(&self, store: Store) -> &LookupTable<String> {
        &self.names[store as usize]
    }

    pub(crate) fn names_mut(&mut self, store: Store) -> &mut LookupTable<String> {
        &mut self.names[store as usize]
    }

    pub fn ids(&self, store: IdStore) -> &LookupTable<i64> {
        &self.ids[store as usize]
    }

    pub(crate) fn ids_mut(&mut self, store: IdStore) -> &mut LookupTable<i64> {
        &mut self.ids[store as usize]
    }

    /// Taxi path id to `(from node, to node)`
    pub fn taxi_paths(&self) -> &LookupTable<(i64, i64)> {
        &self.taxi_paths
    }

    /// Scenario id to its steps, step index to step id in table order
    pub fn scenario_steps(&self) -> &LookupTable<IndexMap<i64, i64>> {
        &self.scenario_steps
    }

    pub fn areas(&self) -> &[AreaEntry] {
        &self.areas
    }

    pub fn maps(&self) -> &[MapEntry] {
        &self.maps
    }

    pub fn factions(&self) -> &[Faction] {
        &self.factions
    }

    pub fn faction_templates(&self) -> &[FactionTemplate] {
        &self.faction_templates
    }

    pub fn area(&self, id: u32) -> Option<&AreaEntry> {
        self.area_by_id.get(&id).and_then(|i| self.areas.get(*i))
    }

    pub fn map(&self, id: u32) -> Option<&MapEntry> {
        self.map_by_id.get(&id).and_then(|i| self.maps.get(*i))
    }

    pub fn faction(&self, id: u16) -> Option<&Faction> {
        self.faction_by_id.get(&id).and_then(|i| self.factions.get(*i))
    }

    pub fn faction_template(&self, id: u32) -> Option<&FactionTemplate> {
        self.faction_template_by_id
            .get(&id)
            .and_then(|i| self.faction_templates.get(*i))
    }

    /// The map an area was linked to
    pub fn area_map(&self, area: &AreaEntry) -> Option<&MapEntry> {
        area.map.and_then(|i| self.maps.get(i))
    }

    /// The parent an area was linked to
    pub fn parent_area(&self, area: &AreaEntry) -> Option<&AreaEntry> {
        area.parent_area.and_then(|i| self.areas.get(i))
    }

    /// Stores holding at least one entry
    pub fn filled(&self) -> Vec<Store> {
        Store::iter().filter(|s| !self.names(*s).is_empty()).collect()
    }

    /// Rebuild the id indices of the entity lists, a later duplicate wins
    pub(crate) fn index(&mut self) {
        self.area_by_id = self.areas.iter().enumerate().map(|(i, a)| (a.id, i)).collect();
        self.map_by_id = self.maps.iter().enumerate().map(|(i, m)| (m.id, i)).collect();
        self.faction_by_id = self
            .factions
            .iter()
            .enumerate()
            .map(|(i, f)| (f.faction_id, i))
            .collect();
        self.faction_template_by_id = self
            .faction_templates
            .iter()
            .enumerate()
            .map(|(i, t)| (t.template_id, i))
            .collect();
    }
}

/// An immutable, fully linked set of tables
///
/// Snapshots are replaced as a whole by each load; readers keep the `Arc` they obtained
/// and never observe a partial update.
#[derive(Debug, Clone, Deref)]
pub struct Snapshot {
    #[deref]
    tables: Tables,
    version: ClientVersion,
    locale: Locale,
    spell_service: Arc<dyn SpellService>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Snapshot::new(
            Tables::default(),
            ClientVersion::default(),
            Locale::default(),
            Arc::new(NullSpellService),
        )
    }
}

impl Snapshot {
    pub fn new(
        tables: Tables,
        version: ClientVersion,
        locale: Locale,
        spell_service: Arc<dyn SpellService>,
    ) -> Snapshot {
        Snapshot {
            tables,
            version,
            locale,
            spell_service,
        }
    }

    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    pub fn version(&self) -> ClientVersion {
        self.version
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn spell_service(&self) -> &Arc<dyn SpellService> {
        &self.spell_service
    }

    /// Name of the faction a template belongs to
    pub fn faction_template_name(&self, template_id: i64) -> Option<&str> {
        let faction = self.ids(IdStore::FactionTemplate).get(template_id)?;
        self.names(Store::Faction).get(*faction).map(String::as_str)
    }
}
