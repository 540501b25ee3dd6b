//! Lookups handed to the host's parameter registry on publish
//!
//! Each [`Registration`] pairs a fixed key (`"AchievementParameter"`, ...) with a
//! [`Parameter`] built from one published [`Snapshot`]. Parameters are values; the store
//! builds a new set for every publish.

use derive_more::derive::Display;
use indexmap::IndexMap;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::entity::AreaEntry;
use crate::index::taxi_path_name;
use crate::lookup::LookupTable;
use crate::settings::ClientVersion;
use crate::snapshot::{IdStore, Snapshot, Store};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub name: String,
    pub description: Option<String>,
}

impl SelectOption {
    pub fn new(name: impl Into<String>) -> SelectOption {
        SelectOption {
            name: name.into(),
            description: None,
        }
    }

    pub fn described(name: impl Into<String>, description: impl Into<String>) -> SelectOption {
        SelectOption {
            name: name.into(),
            description: Some(description.into()),
        }
    }
}

pub type Items = BTreeMap<i64, SelectOption>;

/// How prominently the host offers a parameter
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Display)]
pub enum QuickAccess {
    #[default]
    None,
    Limited,
    Full,
}

/// Link to the table browser of wow.tools for one client build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WowToolsLink {
    pub table: &'static str,
    pub build: String,
}

impl WowToolsLink {
    pub fn new(table: &'static str, version: ClientVersion) -> WowToolsLink {
        WowToolsLink {
            table,
            build: version.tools_build(),
        }
    }

    pub fn url(&self, value: i64) -> String {
        format!(
            "https://wow.tools/dbc/?dbc={}&build={}#page=1&colFilter[0]=exact%3A{value}",
            self.table, self.build
        )
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AreaField {
    Id,
    Name,
    ParentName,
    MapName,
    /// Rows of the counter table keyed by the area, filled in by the host
    Count,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PickerColumn {
    pub field: AreaField,
    pub header: &'static str,
    pub width: u32,
}

/// A row picker over the linked areas of a snapshot
#[derive(Debug, Clone)]
pub struct AreaPicker {
    snapshot: Arc<Snapshot>,
    counter: Option<&'static str>,
}

impl AreaPicker {
    pub fn new(snapshot: Arc<Snapshot>, counter: Option<&'static str>) -> AreaPicker {
        AreaPicker { snapshot, counter }
    }

    pub fn title(&self) -> &'static str {
        "Pick zone or area"
    }

    /// Database table whose rows per area the host shows next to each entry
    pub fn counter(&self) -> Option<&'static str> {
        self.counter
    }

    pub fn columns(&self) -> Vec<PickerColumn> {
        let mut columns = vec![
            PickerColumn {
                field: AreaField::Id,
                header: "Entry",
                width: 60,
            },
            PickerColumn {
                field: AreaField::Name,
                header: "Name",
                width: 160,
            },
            PickerColumn {
                field: AreaField::ParentName,
                header: "Parent",
                width: 160,
            },
            PickerColumn {
                field: AreaField::MapName,
                header: "Map",
                width: 120,
            },
        ];
        if self.counter.is_some() {
            columns.push(PickerColumn {
                field: AreaField::Count,
                header: "Count",
                width: 50,
            });
        }
        columns
    }

    /// Areas whose name contains `filter` ignoring case, or whose id contains it
    pub fn rows(&self, filter: &str) -> Vec<&AreaEntry> {
        let needle = filter.to_lowercase();
        self.snapshot
            .areas()
            .iter()
            .filter(|area| {
                needle.is_empty()
                    || area.name.to_lowercase().contains(&needle)
                    || area.id.to_string().contains(filter)
            })
            .collect()
    }

    /// Text of one cell, `None` for [`AreaField::Count`] and for unlinked references
    pub fn cell(&self, area: &AreaEntry, field: AreaField) -> Option<String> {
        match field {
            AreaField::Id => Some(area.id.to_string()),
            AreaField::Name => Some(area.name.clone()),
            AreaField::ParentName => self.snapshot.parent_area(area).map(|a| a.name.clone()),
            AreaField::MapName => self.snapshot.area_map(area).map(|m| m.name.clone()),
            AreaField::Count => None,
        }
    }

    /// Count cell for a zone, asking `rows` for the counter table's row count
    pub fn count(&self, zone_id: u32, rows: impl FnOnce(&str, u32) -> u64) -> Option<String> {
        let table = self.counter?;
        if zone_id == 0 {
            return Some("0".to_string());
        }
        Some(rows(table, zone_id).to_string())
    }
}

#[derive(Debug, Clone)]
pub enum Parameter {
    Table(Items),
    /// Each item is one bit of a mask
    Flags(Items),
    /// Faction template ids named through their faction at query time
    FactionTemplate(Arc<Snapshot>),
    WowTools {
        items: Option<Items>,
        link: WowToolsLink,
    },
    AreaPicker(AreaPicker),
    /// Species id to creature id, named by the host's creature parameter
    BattlePetSpecies(LookupTable<i64>),
}

impl Parameter {
    fn faction_template_items(snapshot: &Snapshot) -> Items {
        snapshot
            .ids(IdStore::FactionTemplate)
            .keys()
            .map(|template| {
                let name = snapshot
                    .faction_template_name(*template)
                    .unwrap_or("unknown name");
                (*template, SelectOption::new(name))
            })
            .collect()
    }

    /// Every known value with its option
    pub fn items(&self) -> Cow<'_, Items> {
        match self {
            Parameter::Table(items) | Parameter::Flags(items) => Cow::Borrowed(items),
            Parameter::WowTools {
                items: Some(items), ..
            } => Cow::Borrowed(items),
            Parameter::WowTools { items: None, .. } => Cow::Owned(Items::new()),
            Parameter::FactionTemplate(snapshot) => {
                Cow::Owned(Parameter::faction_template_items(snapshot))
            }
            Parameter::AreaPicker(picker) => Cow::Owned(
                picker
                    .snapshot
                    .areas()
                    .iter()
                    .map(|a| (i64::from(a.id), SelectOption::new(a.name.clone())))
                    .collect(),
            ),
            Parameter::BattlePetSpecies(species) => Cow::Owned(
                species
                    .iter()
                    .map(|(id, creature)| (*id, SelectOption::new(creature.to_string())))
                    .collect(),
            ),
        }
    }

    /// Display text of a value
    ///
    /// Flags render the names of the set bits joined with ` | `.
    pub fn resolve(&self, value: i64) -> Option<String> {
        match self {
            Parameter::Flags(items) => {
                let names: Vec<_> = items
                    .iter()
                    .filter(|(bit, _)| **bit != 0 && value & **bit == **bit)
                    .map(|(_, option)| option.name.as_str())
                    .collect();
                (!names.is_empty()).then(|| names.join(" | "))
            }
            Parameter::FactionTemplate(snapshot) => {
                snapshot.ids(IdStore::FactionTemplate).get(value)?;
                Some(
                    snapshot
                        .faction_template_name(value)
                        .unwrap_or("unknown name")
                        .to_string(),
                )
            }
            _ => self.items().get(&value).map(|o| o.name.clone()),
        }
    }

    pub fn external_url(&self, value: i64) -> Option<String> {
        match self {
            Parameter::WowTools { link, .. } => Some(link.url(value)),
            _ => None,
        }
    }

    pub fn is_flags(&self) -> bool {
        matches!(self, Parameter::Flags(_))
    }
}

/// The host side named lookup registry
pub trait ParameterRegistry: Send {
    fn register(&mut self, key: &str, parameter: Parameter, quick_access: QuickAccess);
}

/// Registry keeping the latest parameter per key in first registration order
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    parameters: IndexMap<String, (Parameter, QuickAccess)>,
}

impl MemoryRegistry {
    pub fn get(&self, key: &str) -> Option<&Parameter> {
        self.parameters.get(key).map(|(p, _)| p)
    }

    pub fn quick_access(&self, key: &str) -> Option<QuickAccess> {
        self.parameters.get(key).map(|(_, q)| *q)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.parameters.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

impl ParameterRegistry for MemoryRegistry {
    fn register(&mut self, key: &str, parameter: Parameter, quick_access: QuickAccess) {
        self.parameters
            .insert(key.to_string(), (parameter, quick_access));
    }
}

/// A registry shared with the host, which keeps its own handle to read it
impl<R: ParameterRegistry> ParameterRegistry for Arc<Mutex<R>> {
    fn register(&mut self, key: &str, parameter: Parameter, quick_access: QuickAccess) {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .register(key, parameter, quick_access);
    }
}

#[derive(Debug, Clone)]
pub struct Registration {
    pub key: &'static str,
    pub parameter: Parameter,
    pub quick_access: QuickAccess,
}

/// Plain tables registered under a fixed key, in registration order
const TABLES: &[(&str, Store, QuickAccess)] = &[
    ("SpellCastTimeParameter", Store::SpellCastTime, QuickAccess::None),
    ("SpellDurationParameter", Store::SpellDuration, QuickAccess::None),
    ("SpellRangeParameter", Store::SpellRange, QuickAccess::None),
    ("SpellRadiusParameter", Store::SpellRadius, QuickAccess::None),
    ("AchievementParameter", Store::Achievement, QuickAccess::Full),
    ("MovieParameter", Store::Movie, QuickAccess::Limited),
    ("RawFactionParameter", Store::Faction, QuickAccess::Limited),
];

const MORE_TABLES: &[(&str, Store, QuickAccess)] = &[
    ("DbcSpellParameter", Store::Spell, QuickAccess::None),
    ("CurrencyTypeParameter", Store::CurrencyType, QuickAccess::None),
    ("ItemDbcParameter", Store::Item, QuickAccess::None),
    ("EmoteParameter", Store::Emote, QuickAccess::Full),
    ("EmoteOneShotParameter", Store::EmoteOneShot, QuickAccess::None),
    ("EmoteStateParameter", Store::EmoteState, QuickAccess::None),
    ("TextEmoteParameter", Store::TextEmote, QuickAccess::Limited),
    ("ClassParameter", Store::Class, QuickAccess::Limited),
];

const LATER_TABLES: &[(&str, Store, QuickAccess)] = &[
    ("RaceParameter", Store::Race, QuickAccess::None),
    ("SkillParameter", Store::Skill, QuickAccess::Limited),
    ("SoundParameter", Store::Sound, QuickAccess::Limited),
    ("MapParameter", Store::Map, QuickAccess::Limited),
    ("DbcPhaseParameter", Store::Phase, QuickAccess::Limited),
    ("SpellFocusObjectParameter", Store::SpellFocusObject, QuickAccess::Limited),
    ("QuestInfoParameter", Store::QuestInfo, QuickAccess::None),
    ("CharTitleParameter", Store::CharTitle, QuickAccess::None),
    ("ExtendedCostParameter", Store::ExtendedCost, QuickAccess::None),
];

const TAIL_TABLES: &[(&str, Store, QuickAccess)] = &[
    ("TaxiNodeParameter", Store::TaxiNode, QuickAccess::None),
    ("SpellItemEnchantmentParameter", Store::SpellItemEnchantment, QuickAccess::None),
    ("AreaGroupParameter", Store::AreaGroup, QuickAccess::None),
    ("ItemDisplayInfoParameter", Store::ItemDisplayInfo, QuickAccess::None),
    ("MailTemplateParameter", Store::MailTemplate, QuickAccess::None),
    ("LFGDungeonParameter", Store::LfgDungeon, QuickAccess::None),
    ("ItemSetParameter", Store::ItemSet, QuickAccess::None),
    ("DungeonEncounterParameter", Store::DungeonEncounter, QuickAccess::None),
    ("HolidaysParameter", Store::Holidays, QuickAccess::None),
    ("WorldSafeLocParameter", Store::WorldSafeLocs, QuickAccess::None),
    ("BattlegroundParameter", Store::Battleground, QuickAccess::None),
    ("AchievementCriteriaParameter", Store::AchievementCriteria, QuickAccess::None),
    ("ItemVisualParameter", Store::ItemDbc, QuickAccess::None),
    ("SceneScriptParameter", Store::Scene, QuickAccess::None),
    ("ScenarioParameter", Store::Scenario, QuickAccess::None),
    ("ScenarioStepParameter", Store::ScenarioStep, QuickAccess::None),
    ("BattlePetAbilityParameter", Store::BattlePetAbility, QuickAccess::None),
    ("CharSpecializationParameter", Store::CharSpecialization, QuickAccess::None),
    ("GarrisonClassSpecParameter", Store::GarrisonClassSpec, QuickAccess::None),
    ("GarrisonBuildingParameter", Store::GarrisonBuilding, QuickAccess::None),
    ("GarrisonTalentParameter", Store::GarrisonTalent, QuickAccess::None),
    ("DifficultyParameter", Store::Difficulty, QuickAccess::None),
    ("LockTypeParameter", Store::LockType, QuickAccess::None),
    ("AdventureJournalParameter", Store::AdventureJournal, QuickAccess::None),
];

fn table_items(names: &LookupTable<String>) -> Items {
    names
        .iter()
        .map(|(id, name)| (*id, SelectOption::new(name.clone())))
        .collect()
}

/// Text after the last path separator
fn file_name(path: &str, separators: &[char]) -> String {
    match path.rfind(separators) {
        Some(i) => path[i + 1..].to_string(),
        None => path.to_string(),
    }
}

/// Every parameter of a snapshot, in the order they are registered
pub fn registrations(snapshot: &Arc<Snapshot>) -> Vec<Registration> {
    let mut out = Vec::with_capacity(64);
    let plain = |out: &mut Vec<Registration>, tables: &[(&'static str, Store, QuickAccess)]| {
        for &(key, store, quick_access) in tables {
            out.push(Registration {
                key,
                parameter: Parameter::Table(table_items(snapshot.names(store))),
                quick_access,
            });
        }
    };
    let push = |out: &mut Vec<Registration>,
                key: &'static str,
                parameter: Parameter,
                quick_access: QuickAccess| {
        out.push(Registration {
            key,
            parameter,
            quick_access,
        })
    };

    plain(&mut out, TABLES);
    push(
        &mut out,
        "FactionParameter",
        Parameter::FactionTemplate(snapshot.clone()),
        QuickAccess::Limited,
    );
    plain(&mut out, MORE_TABLES);

    let class_mask = snapshot
        .names(Store::Class)
        .iter()
        .filter(|(id, _)| (1..=63).contains(*id))
        .map(|(id, name)| (1i64 << (id - 1), SelectOption::new(name.clone())))
        .collect();
    push(
        &mut out,
        "ClassMaskParameter",
        Parameter::Flags(class_mask),
        QuickAccess::None,
    );

    plain(&mut out, LATER_TABLES);

    let models = snapshot.names(Store::CreatureModelData);
    let creature_models = snapshot
        .ids(IdStore::CreatureDisplayInfo)
        .iter()
        .map(|(display, model)| {
            let option = match models.get(*model) {
                Some(path) => SelectOption::described(file_name(path, &['\\', '/']), path.clone()),
                None => SelectOption::new("unknown model"),
            };
            (*display, option)
        })
        .collect();
    push(
        &mut out,
        "CreatureModelDataParameter",
        Parameter::Table(creature_models),
        QuickAccess::None,
    );

    let game_objects = snapshot
        .names(Store::GameObjectDisplayInfo)
        .iter()
        .map(|(id, path)| {
            (
                *id,
                SelectOption::described(file_name(path, &['\\']), path.clone()),
            )
        })
        .collect();
    push(
        &mut out,
        "GameObjectDisplayInfoParameter",
        Parameter::Table(game_objects),
        QuickAccess::None,
    );

    let mut languages = table_items(snapshot.names(Store::Language));
    languages.insert(0, SelectOption::new("Universal"));
    push(
        &mut out,
        "LanguageParameter",
        Parameter::Table(languages),
        QuickAccess::Limited,
    );

    push(
        &mut out,
        "AreaTriggerParameter",
        Parameter::Table(table_items(snapshot.names(Store::AreaTrigger))),
        QuickAccess::None,
    );

    let mut zones = table_items(snapshot.names(Store::Area));
    for (id, name) in snapshot.names(Store::QuestSort) {
        zones.insert(-id, SelectOption::new(name.clone()));
    }
    push(
        &mut out,
        "ZoneOrQuestSortParameter",
        Parameter::Table(zones),
        QuickAccess::None,
    );

    let nodes = snapshot.names(Store::TaxiNode);
    let paths = snapshot
        .taxi_paths()
        .iter()
        .map(|(id, (from, to))| (*id, SelectOption::new(taxi_path_name(nodes, *from, *to))))
        .collect();
    push(
        &mut out,
        "TaxiPathParameter",
        Parameter::Table(paths),
        QuickAccess::None,
    );

    plain(&mut out, TAIL_TABLES);

    let version = snapshot.version();
    push(
        &mut out,
        "VignetteParameter",
        Parameter::WowTools {
            items: Some(table_items(snapshot.names(Store::Vignette))),
            link: WowToolsLink::new("vignette", version),
        },
        QuickAccess::None,
    );
    push(
        &mut out,
        "VehicleParameter",
        Parameter::WowTools {
            items: None,
            link: WowToolsLink::new("vehicle", version),
        },
        QuickAccess::None,
    );
    push(
        &mut out,
        "LockParameter",
        Parameter::WowTools {
            items: None,
            link: WowToolsLink::new("lock", version),
        },
        QuickAccess::None,
    );

    for (key, counter) in [
        ("ZoneAreaParameter", None),
        ("ZoneArea(spell_area)Parameter", Some("spell_area")),
        ("ZoneArea(phase_definitions)Parameter", Some("phase_definitions")),
    ] {
        push(
            &mut out,
            key,
            Parameter::AreaPicker(AreaPicker::new(snapshot.clone(), counter)),
            QuickAccess::Limited,
        );
    }

    push(
        &mut out,
        "BattlePetSpeciesParameter",
        Parameter::BattlePetSpecies(snapshot.ids(IdStore::BattlePetSpecies).clone()),
        QuickAccess::None,
    );

    out
}
