//! Version profiles: which tables a client generation ships and how to read them
//!
//! A profile is plain data, an ordered list of [`Step`]s interpreted by the loader. Order
//! matters wherever a composition reads a lookup filled earlier (area groups read area
//! names, holidays read holiday names, items read display names and so on).
//!
//! Adding a client generation means adding a profile; existing profiles never refer to
//! each other.

use crate::settings::ClientVersion;
use crate::snapshot::{IdStore, Store};
use crate::spell::SpellServiceKind;

/// Where a value lives in a row
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Col {
    /// The row id
    Key,
    /// A column by index
    At(usize),
    /// A localized string column, shifted by the locale offset
    Loc(usize),
    /// One element of an array column
    Rep(usize, usize),
    /// A named field, for tables read through a definition
    Field(&'static str),
}

/// How a value is read
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Int,
    Float,
    Str,
}

/// Multi field row handlers
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Compose {
    Faction {
        id: Col,
        name: Col,
    },
    FactionTemplate {
        id: Col,
        faction: Col,
        flags: Col,
        groups: [Col; 3],
    },
    Map {
        id: Col,
        name: Col,
        directory: Col,
        instance_type: Col,
    },
    Area {
        id: Col,
        map: Col,
        parent: Col,
        flags1: Col,
        flags2: Option<Col>,
        name: Col,
    },
    /// Every emote, plus the one-shot (`proc == 0`) and state (`proc == 2`) lookups
    Emotes {
        id: Col,
        name: Col,
        proc: Col,
    },
    /// Holiday name through the holiday names lookup, `Holiday {id}` otherwise
    Holidays {
        id: Col,
        name_id: Col,
    },
    /// Item name through the item display lookup, `Item {id}` otherwise
    ItemDisplay {
        id: Col,
        display: Col,
    },
    /// Up to `count` area ids starting at column `first`, ended by the first zero
    AreaGroup {
        id: Col,
        first: usize,
        count: usize,
    },
    /// One `(area, group)` pair per row, named once the whole table is read
    AreaGroupMembers {
        area: Col,
        group: Col,
    },
    MailTemplate {
        id: Col,
        subject: Option<Col>,
        body: Col,
    },
    ExtendedCost {
        id: Col,
        honor: Col,
        arena: Col,
        item: Col,
    },
    /// Five currency and item slots held in array columns
    CurrencyCost {
        id: Col,
        item: usize,
        count: usize,
        item_count: usize,
        arena: Col,
        currency: usize,
    },
    TaxiPath {
        id: Col,
        from: Col,
        to: Col,
    },
    CastTime {
        id: Col,
        base: Col,
        per_level: Col,
        min: Col,
    },
    Duration {
        id: Col,
        base: Col,
        per_level: Col,
        max: Col,
    },
    Radius {
        id: Col,
        base: Col,
        per_level: Col,
        max: Col,
    },
    /// Movie file name through the file data lookup
    Movie {
        id: Col,
        file: Col,
    },
    GarrisonBuilding {
        id: Col,
        alliance: Col,
        horde: Col,
    },
    ScenarioStep {
        id: Col,
        name: Col,
        scenario: Col,
        step: Col,
    },
    CharSpecialization {
        id: Col,
        name: Col,
        class: Col,
    },
}

/// What a directive does with each row
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Action {
    Names { store: Store, id: Col, name: Col },
    Label { store: Store, id: Col, label: &'static str },
    Ids { store: IdStore, id: Col, value: Col },
    Compose(Compose),
}

/// Tables and entity lists an action writes to
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    Names(Store),
    Ids(IdStore),
    TaxiPaths,
    ScenarioSteps,
    Areas,
    Maps,
    Factions,
    FactionTemplates,
}

/// One table file and what to do with its rows
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Directive {
    pub file: &'static str,
    /// Field names of the table, in column order, for [`Col::Field`] access
    pub fields: &'static [&'static str],
    pub action: Action,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Step {
    Load(Directive),
    /// Link areas to maps and parents, and derive the area and map name lookups
    LinkAreas,
}

#[derive(Debug)]
pub struct Profile {
    pub version: ClientVersion,
    /// Loaded before any table
    pub spell_service: Option<SpellServiceKind>,
    pub steps: &'static [Step],
}

impl Profile {
    pub fn directives(&self) -> impl Iterator<Item = &Directive> + '_ {
        self.steps.iter().filter_map(|step| match step {
            Step::Load(directive) => Some(directive),
            Step::LinkAreas => None,
        })
    }

    /// Number of progress steps reported by a load
    pub fn table_count(&self) -> usize {
        self.directives().count()
    }

    /// Everything a load of this profile can fill
    pub fn targets(&self) -> Vec<Target> {
        let mut targets: Vec<Target> = Vec::new();
        for step in self.steps {
            let produced = match step {
                Step::Load(directive) => directive.action.targets(),
                Step::LinkAreas => vec![
                    Target::Names(Store::Area),
                    Target::Names(Store::Map),
                    Target::Names(Store::MapDirectory),
                ],
            };
            for target in produced {
                if !targets.contains(&target) {
                    targets.push(target);
                }
            }
        }
        targets
    }
}

impl Action {
    /// Column holding the key the action files a row under, the row id for all but group members
    pub fn id(&self) -> Col {
        match self {
            Action::Names { id, .. } | Action::Label { id, .. } | Action::Ids { id, .. } => *id,
            Action::Compose(compose) => match compose {
                Compose::Faction { id, .. }
                | Compose::FactionTemplate { id, .. }
                | Compose::Map { id, .. }
                | Compose::Area { id, .. }
                | Compose::Emotes { id, .. }
                | Compose::Holidays { id, .. }
                | Compose::ItemDisplay { id, .. }
                | Compose::AreaGroup { id, .. }
                | Compose::MailTemplate { id, .. }
                | Compose::ExtendedCost { id, .. }
                | Compose::CurrencyCost { id, .. }
                | Compose::TaxiPath { id, .. }
                | Compose::CastTime { id, .. }
                | Compose::Duration { id, .. }
                | Compose::Radius { id, .. }
                | Compose::Movie { id, .. }
                | Compose::GarrisonBuilding { id, .. }
                | Compose::ScenarioStep { id, .. }
                | Compose::CharSpecialization { id, .. } => *id,
                Compose::AreaGroupMembers { group, .. } => *group,
            },
        }
    }

    /// Every value the action reads besides the id
    pub fn columns(&self) -> Vec<(Col, ValueKind)> {
        use ValueKind::{Float, Int, Str};

        match *self {
            Action::Names { name, .. } => vec![(name, Str)],
            Action::Label { .. } => vec![],
            Action::Ids { value, .. } => vec![(value, Int)],
            Action::Compose(compose) => match compose {
                Compose::Faction { name, .. } => vec![(name, Str)],
                Compose::FactionTemplate {
                    faction,
                    flags,
                    groups,
                    ..
                } => vec![
                    (faction, Int),
                    (flags, Int),
                    (groups[0], Int),
                    (groups[1], Int),
                    (groups[2], Int),
                ],
                Compose::Map {
                    name,
                    directory,
                    instance_type,
                    ..
                } => vec![(name, Str), (directory, Str), (instance_type, Int)],
                Compose::Area {
                    map,
                    parent,
                    flags1,
                    flags2,
                    name,
                    ..
                } => {
                    let mut columns = vec![(map, Int), (parent, Int), (flags1, Int), (name, Str)];
                    columns.extend(flags2.map(|c| (c, Int)));
                    columns
                }
                Compose::Emotes { name, proc, .. } => vec![(name, Str), (proc, Int)],
                Compose::Holidays { name_id, .. } => vec![(name_id, Int)],
                Compose::ItemDisplay { display, .. } => vec![(display, Int)],
                Compose::AreaGroup { first, count, .. } => {
                    (first..first + count).map(|c| (Col::At(c), Int)).collect()
                }
                Compose::AreaGroupMembers { area, .. } => vec![(area, Int)],
                Compose::MailTemplate { subject, body, .. } => {
                    let mut columns: Vec<_> = subject.map(|c| (c, Str)).into_iter().collect();
                    columns.push((body, Str));
                    columns
                }
                Compose::ExtendedCost {
                    honor, arena, item, ..
                } => vec![(honor, Int), (arena, Int), (item, Int)],
                Compose::CurrencyCost {
                    item,
                    count,
                    item_count,
                    arena,
                    currency,
                    ..
                } => {
                    let mut columns = Vec::with_capacity(21);
                    for slot in 0..5 {
                        columns.push((Col::Rep(item, slot), Int));
                        columns.push((Col::Rep(count, slot), Int));
                        columns.push((Col::Rep(item_count, slot), Int));
                        columns.push((Col::Rep(currency, slot), Int));
                    }
                    columns.push((arena, Int));
                    columns
                }
                Compose::TaxiPath { from, to, .. } => vec![(from, Int), (to, Int)],
                Compose::CastTime {
                    base,
                    per_level,
                    min,
                    ..
                } => vec![(base, Int), (per_level, Int), (min, Int)],
                Compose::Duration {
                    base,
                    per_level,
                    max,
                    ..
                } => vec![(base, Int), (per_level, Int), (max, Int)],
                Compose::Radius {
                    base,
                    per_level,
                    max,
                    ..
                } => vec![(base, Float), (per_level, Float), (max, Float)],
                Compose::Movie { file, .. } => vec![(file, Int)],
                Compose::GarrisonBuilding {
                    alliance, horde, ..
                } => vec![(alliance, Str), (horde, Str)],
                Compose::ScenarioStep {
                    name,
                    scenario,
                    step,
                    ..
                } => vec![(name, Str), (scenario, Int), (step, Int)],
                Compose::CharSpecialization { name, class, .. } => {
                    vec![(name, Str), (class, Int)]
                }
            },
        }
    }

    /// Tables and lists the action writes to
    pub fn targets(&self) -> Vec<Target> {
        use Target::{Names, TaxiPaths};

        match *self {
            Action::Names { store, .. } | Action::Label { store, .. } => vec![Names(store)],
            Action::Ids { store, .. } => vec![Target::Ids(store)],
            Action::Compose(compose) => match compose {
                Compose::Faction { .. } => vec![Target::Factions, Names(Store::Faction)],
                Compose::FactionTemplate { .. } => vec![
                    Target::FactionTemplates,
                    Target::Ids(IdStore::FactionTemplate),
                ],
                Compose::Map { .. } => vec![Target::Maps],
                Compose::Area { .. } => vec![Target::Areas],
                Compose::Emotes { .. } => vec![
                    Names(Store::Emote),
                    Names(Store::EmoteOneShot),
                    Names(Store::EmoteState),
                ],
                Compose::Holidays { .. } => vec![Names(Store::Holidays)],
                Compose::ItemDisplay { .. } => vec![Names(Store::ItemDbc)],
                Compose::AreaGroup { .. } | Compose::AreaGroupMembers { .. } => {
                    vec![Names(Store::AreaGroup)]
                }
                Compose::MailTemplate { .. } => vec![Names(Store::MailTemplate)],
                Compose::ExtendedCost { .. } | Compose::CurrencyCost { .. } => {
                    vec![Names(Store::ExtendedCost)]
                }
                Compose::TaxiPath { .. } => vec![TaxiPaths],
                Compose::CastTime { .. } => vec![Names(Store::SpellCastTime)],
                Compose::Duration { .. } => vec![Names(Store::SpellDuration)],
                Compose::Radius { .. } => vec![Names(Store::SpellRadius)],
                Compose::Movie { .. } => vec![Names(Store::Movie)],
                Compose::GarrisonBuilding { .. } => vec![Names(Store::GarrisonBuilding)],
                Compose::ScenarioStep { .. } => {
                    vec![Names(Store::ScenarioStep), Target::ScenarioSteps]
                }
                Compose::CharSpecialization { .. } => vec![Names(Store::CharSpecialization)],
            },
        }
    }
}

use Col::{At, Field, Key, Loc, Rep};

const fn load(file: &'static str, action: Action) -> Step {
    Step::Load(Directive {
        file,
        fields: &[],
        action,
    })
}

const fn names(file: &'static str, store: Store, id: usize, name: Col) -> Step {
    load(
        file,
        Action::Names {
            store,
            id: At(id),
            name,
        },
    )
}

const fn ids(file: &'static str, store: IdStore, id: usize, value: usize) -> Step {
    load(
        file,
        Action::Ids {
            store,
            id: At(id),
            value: At(value),
        },
    )
}

const fn compose(file: &'static str, compose: Compose) -> Step {
    load(file, Action::Compose(compose))
}

const fn area_trigger(file: &'static str, id: Col) -> Step {
    load(
        file,
        Action::Label {
            store: Store::AreaTrigger,
            id,
            label: "Area trigger",
        },
    )
}

const fn named(file: &'static str, fields: &'static [&'static str], action: Action) -> Step {
    Step::Load(Directive {
        file,
        fields,
        action,
    })
}

const fn named_names(
    file: &'static str,
    fields: &'static [&'static str],
    store: Store,
    field: &'static str,
) -> Step {
    named(
        file,
        fields,
        Action::Names {
            store,
            id: Key,
            name: Field(field),
        },
    )
}

const FACTION_TEMPLATE: Compose = Compose::FactionTemplate {
    id: At(0),
    faction: At(1),
    flags: At(2),
    groups: [At(3), At(4), At(5)],
};

const EMOTES: Compose = Compose::Emotes {
    id: At(0),
    name: At(1),
    proc: At(4),
};

const EXTENDED_COST: Compose = Compose::ExtendedCost {
    id: At(0),
    honor: At(1),
    arena: At(2),
    item: At(4),
};

const TAXI_PATH: Compose = Compose::TaxiPath {
    id: At(0),
    from: At(1),
    to: At(2),
};

const AREA_GROUP: Compose = Compose::AreaGroup {
    id: At(0),
    first: 1,
    count: 6,
};

const HOLIDAYS: Compose = Compose::Holidays {
    id: At(0),
    name_id: At(49),
};

const ITEM: Compose = Compose::ItemDisplay {
    id: At(0),
    display: At(5),
};

const CAST_TIME: Compose = Compose::CastTime {
    id: At(0),
    base: At(1),
    per_level: At(2),
    min: At(3),
};

const DURATION: Compose = Compose::Duration {
    id: At(0),
    base: At(1),
    per_level: At(2),
    max: At(3),
};

static WRATH: Profile = Profile {
    version: ClientVersion::Wrath,
    spell_service: Some(SpellServiceKind::Wrath),
    steps: &[
        area_trigger("AreaTrigger.dbc", At(0)),
        names("SkillLine.dbc", Store::Skill, 0, Loc(3)),
        compose("Faction.dbc", Compose::Faction { id: At(0), name: Loc(23) }),
        compose("FactionTemplate.dbc", FACTION_TEMPLATE),
        names("Spell.dbc", Store::Spell, 0, Loc(136)),
        names("Movie.dbc", Store::Movie, 0, At(1)),
        compose(
            "Map.dbc",
            Compose::Map {
                id: At(0),
                name: Loc(5),
                directory: At(1),
                instance_type: At(2),
            },
        ),
        names("Achievement.dbc", Store::Achievement, 0, Loc(4)),
        compose(
            "AreaTable.dbc",
            Compose::Area {
                id: At(0),
                map: At(1),
                parent: At(2),
                flags1: At(4),
                flags2: None,
                name: Loc(11),
            },
        ),
        Step::LinkAreas,
        names("chrClasses.dbc", Store::Class, 0, Loc(4)),
        names("chrRaces.dbc", Store::Race, 0, Loc(14)),
        compose("Emotes.dbc", EMOTES),
        names("EmotesText.dbc", Store::TextEmote, 0, At(1)),
        names("SoundEntries.dbc", Store::Sound, 0, At(2)),
        names("SpellFocusObject.dbc", Store::SpellFocusObject, 0, Loc(1)),
        names("QuestInfo.dbc", Store::QuestInfo, 0, Loc(1)),
        names("CharTitles.dbc", Store::CharTitle, 0, Loc(2)),
        names("CreatureModelData.dbc", Store::CreatureModelData, 0, At(2)),
        ids("CreatureDisplayInfo.dbc", IdStore::CreatureDisplayInfo, 0, 1),
        names("GameObjectDisplayInfo.dbc", Store::GameObjectDisplayInfo, 0, At(1)),
        names("Languages.dbc", Store::Language, 0, Loc(1)),
        names("QuestSort.dbc", Store::QuestSort, 0, Loc(1)),
        compose("ItemExtendedCost.dbc", EXTENDED_COST),
        names("TaxiNodes.dbc", Store::TaxiNode, 0, Loc(5)),
        compose("TaxiPath.dbc", TAXI_PATH),
        names("SpellItemEnchantment.dbc", Store::SpellItemEnchantment, 0, Loc(14)),
        compose("AreaGroup.dbc", AREA_GROUP),
        names("ItemDisplayInfo.dbc", Store::ItemDisplayInfo, 0, At(5)),
        compose(
            "MailTemplate.dbc",
            Compose::MailTemplate {
                id: At(0),
                subject: Some(Loc(1)),
                body: Loc(18),
            },
        ),
        names("LFGDungeons.dbc", Store::LfgDungeon, 0, Loc(1)),
        names("ItemSet.dbc", Store::ItemSet, 0, Loc(1)),
        names("DungeonEncounter.dbc", Store::DungeonEncounter, 0, Loc(5)),
        names("HolidayNames.dbc", Store::HolidayNames, 0, Loc(1)),
        compose("Holidays.dbc", HOLIDAYS),
        names("WorldSafeLocs.dbc", Store::WorldSafeLocs, 0, Loc(5)),
        names("BattlemasterList.dbc", Store::Battleground, 0, Loc(11)),
        names("Achievement_Criteria.dbc", Store::AchievementCriteria, 0, Loc(9)),
        compose("Item.dbc", ITEM),
        names("LockType.dbc", Store::LockType, 0, Loc(1)),
        compose("SpellCastTimes.dbc", CAST_TIME),
        compose("SpellDuration.dbc", DURATION),
        names("SpellRange.dbc", Store::SpellRange, 0, Loc(6)),
        compose(
            "SpellRadius.dbc",
            Compose::Radius {
                id: At(0),
                base: At(1),
                per_level: At(2),
                max: At(3),
            },
        ),
    ],
};

static CATACLYSM: Profile = Profile {
    version: ClientVersion::Cataclysm,
    spell_service: Some(SpellServiceKind::Cataclysm),
    steps: &[
        area_trigger("AreaTrigger.dbc", At(0)),
        names("SkillLine.dbc", Store::Skill, 0, At(2)),
        compose("Faction.dbc", Compose::Faction { id: At(0), name: At(23) }),
        compose("FactionTemplate.dbc", FACTION_TEMPLATE),
        names("CurrencyTypes.db2", Store::CurrencyType, 0, At(2)),
        names("Spell.dbc", Store::Spell, 0, At(21)),
        names("Movie.dbc", Store::Movie, 0, At(1)),
        compose(
            "Map.dbc",
            Compose::Map {
                id: At(0),
                name: At(6),
                directory: At(1),
                instance_type: At(2),
            },
        ),
        names("Achievement.dbc", Store::Achievement, 0, At(4)),
        compose(
            "AreaTable.dbc",
            Compose::Area {
                id: At(0),
                map: At(1),
                parent: At(2),
                flags1: At(4),
                flags2: None,
                name: At(11),
            },
        ),
        Step::LinkAreas,
        names("chrClasses.dbc", Store::Class, 0, At(3)),
        names("chrRaces.dbc", Store::Race, 0, At(14)),
        compose("Emotes.dbc", EMOTES),
        names("EmotesText.dbc", Store::TextEmote, 0, At(1)),
        names("item-sparse.db2", Store::Item, 0, At(99)),
        names("Phase.dbc", Store::Phase, 0, At(1)),
        names("SoundEntries.dbc", Store::Sound, 0, At(2)),
        names("SpellFocusObject.dbc", Store::SpellFocusObject, 0, At(1)),
        names("QuestInfo.dbc", Store::QuestInfo, 0, At(1)),
        names("CharTitles.dbc", Store::CharTitle, 0, At(2)),
        names("CreatureModelData.dbc", Store::CreatureModelData, 0, At(2)),
        ids("CreatureDisplayInfo.dbc", IdStore::CreatureDisplayInfo, 0, 1),
        names("GameObjectDisplayInfo.dbc", Store::GameObjectDisplayInfo, 0, At(1)),
        names("Languages.dbc", Store::Language, 0, At(1)),
        names("QuestSort.dbc", Store::QuestSort, 0, At(1)),
        compose("ItemExtendedCost.dbc", EXTENDED_COST),
        names("TaxiNodes.dbc", Store::TaxiNode, 0, At(5)),
        compose("TaxiPath.dbc", TAXI_PATH),
        names("SpellItemEnchantment.dbc", Store::SpellItemEnchantment, 0, At(14)),
        compose("AreaGroup.dbc", AREA_GROUP),
        names("ItemDisplayInfo.dbc", Store::ItemDisplayInfo, 0, At(5)),
        compose(
            "MailTemplate.dbc",
            Compose::MailTemplate {
                id: At(0),
                subject: Some(At(1)),
                body: At(2),
            },
        ),
        names("LFGDungeons.dbc", Store::LfgDungeon, 0, At(1)),
        names("ItemSet.dbc", Store::ItemSet, 0, At(1)),
        names("DungeonEncounter.dbc", Store::DungeonEncounter, 0, At(5)),
        names("HolidayNames.dbc", Store::HolidayNames, 0, At(1)),
        compose("Holidays.dbc", HOLIDAYS),
        names("WorldSafeLocs.dbc", Store::WorldSafeLocs, 0, At(5)),
        names("BattlemasterList.dbc", Store::Battleground, 0, At(11)),
        names("Achievement_Criteria.dbc", Store::AchievementCriteria, 0, At(10)),
        compose("Item.dbc", ITEM),
        names("LockType.dbc", Store::LockType, 0, At(1)),
        compose("SpellCastTimes.dbc", CAST_TIME),
        compose("SpellDuration.dbc", DURATION),
        names("SpellRange.dbc", Store::SpellRange, 0, At(6)),
        compose(
            "SpellRadius.dbc",
            Compose::Radius {
                id: At(0),
                base: At(1),
                per_level: At(2),
                max: At(3),
            },
        ),
    ],
};

static MISTS: Profile = Profile {
    version: ClientVersion::Mists,
    spell_service: Some(SpellServiceKind::Cataclysm),
    steps: &[
        names("Achievement_Criteria.dbc", Store::AchievementCriteria, 0, At(10)),
        names("FileData.dbc", Store::FileData, 0, At(1)),
        area_trigger("AreaTrigger.dbc", At(0)),
        names("BattlemasterList.dbc", Store::Battleground, 0, At(19)),
        names("SkillLine.dbc", Store::Skill, 0, At(2)),
        compose("Faction.dbc", Compose::Faction { id: At(0), name: At(23) }),
        compose("FactionTemplate.dbc", FACTION_TEMPLATE),
        names("CurrencyTypes.dbc", Store::CurrencyType, 0, At(2)),
        names("Spell.dbc", Store::Spell, 0, At(1)),
        compose("Movie.dbc", Compose::Movie { id: At(0), file: At(3) }),
        compose(
            "Map.dbc",
            Compose::Map {
                id: At(0),
                name: At(5),
                directory: At(1),
                instance_type: At(2),
            },
        ),
        names("Achievement.dbc", Store::Achievement, 0, At(4)),
        compose(
            "AreaTable.dbc",
            Compose::Area {
                id: At(0),
                map: At(1),
                parent: At(2),
                flags1: At(4),
                flags2: Some(At(5)),
                name: At(13),
            },
        ),
        Step::LinkAreas,
        names("ChrClasses.dbc", Store::Class, 0, At(3)),
        names("ChrRaces.dbc", Store::Race, 0, At(14)),
        names("Difficulty.dbc", Store::Difficulty, 0, At(11)),
        compose("Emotes.dbc", EMOTES),
        names("EmotesText.dbc", Store::TextEmote, 0, At(1)),
        names("Item-sparse.db2", Store::Item, 0, At(100)),
        names("Phase.dbc", Store::Phase, 0, At(1)),
        names("SoundEntries.dbc", Store::Sound, 0, At(2)),
        names("SpellFocusObject.dbc", Store::SpellFocusObject, 0, At(1)),
        names("QuestInfo.dbc", Store::QuestInfo, 0, At(1)),
        names("CharTitles.dbc", Store::CharTitle, 0, At(2)),
        names("CreatureModelData.dbc", Store::CreatureModelData, 0, At(2)),
        ids("CreatureDisplayInfo.dbc", IdStore::CreatureDisplayInfo, 0, 1),
        names("GameObjectDisplayInfo.dbc", Store::GameObjectDisplayInfo, 0, At(1)),
        names("Languages.dbc", Store::Language, 0, At(1)),
        names("QuestSort.dbc", Store::QuestSort, 0, At(1)),
        compose("ItemExtendedCost.dbc", EXTENDED_COST),
        names("TaxiNodes.dbc", Store::TaxiNode, 0, At(5)),
        compose("TaxiPath.dbc", TAXI_PATH),
        names("SpellItemEnchantment.dbc", Store::SpellItemEnchantment, 0, At(11)),
        compose("AreaGroup.dbc", AREA_GROUP),
        names("ItemDisplayInfo.dbc", Store::ItemDisplayInfo, 0, At(5)),
        compose(
            "MailTemplate.dbc",
            Compose::MailTemplate {
                id: At(0),
                subject: Some(At(1)),
                body: At(2),
            },
        ),
        names("LFGDungeons.dbc", Store::LfgDungeon, 0, At(1)),
        names("ItemSet.dbc", Store::ItemSet, 0, At(1)),
        names("DungeonEncounter.dbc", Store::DungeonEncounter, 0, At(5)),
        names("HolidayNames.dbc", Store::HolidayNames, 0, At(1)),
        compose("Holidays.dbc", HOLIDAYS),
        names("WorldSafeLocs.dbc", Store::WorldSafeLocs, 0, At(6)),
        compose("Item.dbc", ITEM),
        names("LockType.dbc", Store::LockType, 0, At(1)),
        names("Vignette.dbc", Store::Vignette, 0, At(1)),
        compose("SpellCastTimes.dbc", CAST_TIME),
        compose("SpellDuration.dbc", DURATION),
        names("SpellRange.dbc", Store::SpellRange, 0, At(6)),
        compose(
            "SpellRadius.dbc",
            Compose::Radius {
                id: At(0),
                base: At(1),
                per_level: At(2),
                max: At(4),
            },
        ),
    ],
};

static LEGION: Profile = Profile {
    version: ClientVersion::Legion,
    spell_service: Some(SpellServiceKind::Legion),
    steps: &[
        names("CriteriaTree.db2", Store::AchievementCriteria, 0, At(1)),
        area_trigger("AreaTrigger.db2", At(14)),
        compose(
            "AreaTable.db2",
            Compose::Area {
                id: At(0),
                map: At(5),
                parent: At(6),
                flags1: Rep(3, 0),
                flags2: Some(Rep(3, 1)),
                name: At(2),
            },
        ),
        compose(
            "Map.db2",
            Compose::Map {
                id: At(0),
                name: At(2),
                directory: At(1),
                instance_type: At(17),
            },
        ),
        Step::LinkAreas,
        compose(
            "AreaGroupMember.db2",
            Compose::AreaGroupMembers {
                area: At(1),
                group: At(2),
            },
        ),
        names("BattlemasterList.db2", Store::Battleground, 0, At(1)),
        names("CurrencyTypes.db2", Store::CurrencyType, 0, At(1)),
        names("DungeonEncounter.db2", Store::DungeonEncounter, 6, At(0)),
        names("Difficulty.db2", Store::Difficulty, 0, At(1)),
        names("ItemSparse.db2", Store::Item, 0, At(2)),
        compose(
            "ItemExtendedCost.db2",
            Compose::CurrencyCost {
                id: At(0),
                item: 1,
                count: 2,
                item_count: 3,
                arena: At(4),
                currency: 5,
            },
        ),
        names("ItemSet.db2", Store::ItemSet, 0, At(1)),
        names("LFGDungeons.db2", Store::LfgDungeon, 0, At(1)),
        names("chrRaces.db2", Store::Race, 30, At(2)),
        names("achievement.db2", Store::Achievement, 12, At(0)),
        load(
            "spell.db2",
            Action::Names {
                store: Store::Spell,
                id: Key,
                name: At(1),
            },
        ),
        names("chrClasses.db2", Store::Class, 19, At(1)),
        compose(
            "Emotes.db2",
            Compose::Emotes {
                id: Key,
                name: At(2),
                proc: At(6),
            },
        ),
        names("EmotesText.db2", Store::TextEmote, 0, At(1)),
        names("HolidayNames.db2", Store::HolidayNames, 0, At(1)),
        compose(
            "Holidays.db2",
            Compose::Holidays {
                id: At(0),
                name_id: At(9),
            },
        ),
        names("Languages.db2", Store::Language, 1, At(0)),
        compose(
            "MailTemplate.DB2",
            Compose::MailTemplate {
                id: At(0),
                subject: None,
                body: At(1),
            },
        ),
        compose("Faction.db2", Compose::Faction { id: At(3), name: At(1) }),
        compose(
            "FactionTemplate.db2",
            Compose::FactionTemplate {
                id: Key,
                faction: At(1),
                flags: At(2),
                groups: [At(5), At(6), At(7)],
            },
        ),
        names("SoundKitName.db2", Store::Sound, 0, At(1)),
        names("SpellFocusObject.db2", Store::SpellFocusObject, 0, At(1)),
        names("QuestInfo.db2", Store::QuestInfo, 0, At(1)),
        names("QuestSort.db2", Store::QuestSort, 0, At(1)),
        names("CharTitles.db2", Store::CharTitle, 0, At(1)),
        names("SkillLine.db2", Store::Skill, 0, At(1)),
        names("LockType.db2", Store::LockType, 4, At(0)),
        ids("CreatureDisplayInfo.db2", IdStore::CreatureDisplayInfo, 0, 2),
        compose(
            "SpellCastTimes.db2",
            Compose::CastTime {
                id: At(0),
                base: At(1),
                per_level: At(3),
                min: At(2),
            },
        ),
        compose(
            "SpellDuration.db2",
            Compose::Duration {
                id: At(0),
                base: At(1),
                per_level: At(3),
                max: At(2),
            },
        ),
        names("SpellRange.db2", Store::SpellRange, 0, At(1)),
        compose(
            "SpellRadius.db2",
            Compose::Radius {
                id: At(0),
                base: At(1),
                per_level: At(2),
                max: At(4),
            },
        ),
        names("SpellItemEnchantment.db2", Store::SpellItemEnchantment, 0, At(1)),
        names("TaxiNodes.db2", Store::TaxiNode, 0, At(1)),
        compose(
            "TaxiPath.db2",
            Compose::TaxiPath {
                id: At(2),
                from: At(0),
                to: At(1),
            },
        ),
        names("SceneScriptPackage.db2", Store::Scene, 0, At(1)),
        ids("BattlePetSpecies.db2", IdStore::BattlePetSpecies, 8, 2),
        names("BattlePetAbility.db2", Store::BattlePetAbility, 0, At(1)),
        names("Scenario.db2", Store::Scenario, 0, At(1)),
        names("Vignette.db2", Store::Vignette, 0, At(1)),
        names("GarrClassSpec.db2", Store::GarrisonClassSpec, 7, At(0)),
        names("GarrTalent.db2", Store::GarrisonTalent, 7, At(0)),
        compose(
            "GarrBuilding.db2",
            Compose::GarrisonBuilding {
                id: Key,
                alliance: At(1),
                horde: At(2),
            },
        ),
        compose(
            "ScenarioStep.db2",
            Compose::ScenarioStep {
                id: Key,
                name: At(1),
                scenario: At(3),
                step: At(6),
            },
        ),
        compose(
            "ChrSpecialization.db2",
            Compose::CharSpecialization {
                id: Key,
                name: At(1),
                class: At(5),
            },
        ),
        names("AdventureJournal.db2", Store::AdventureJournal, 0, At(1)),
    ],
};

/// Field names of the tables read by name, as laid out by build 41079
mod fields {
    pub const AREA_TRIGGER: &[&str] = &["ID"];
    pub const SPELL_NAME: &[&str] = &["ID", "Name_lang"];
    pub const ACHIEVEMENT: &[&str] = &[
        "Description_lang",
        "Title_lang",
        "Reward_lang",
        "ID",
        "Instance_ID",
        "Faction",
        "Supercedes",
        "Category",
        "Minimum_criteria",
        "Points",
        "Flags",
        "Ui_order",
        "IconFileID",
        "RewardItemID",
        "Criteria_tree",
        "Shares_criteria",
        "CovenantID",
    ];
    pub const AREA_TABLE: &[&str] = &[
        "ID",
        "ZoneName",
        "AreaName_lang",
        "ContinentID",
        "ParentAreaID",
        "AreaBit",
        "SoundProviderPref",
        "SoundProviderPrefUnderwater",
        "AmbienceID",
        "UwAmbience",
        "ZoneMusic",
        "UwZoneMusic",
        "IntroSound",
        "UwIntroSound",
        "FactionGroupMask",
        "Ambient_multiplier",
        "MountFlags",
        "PvpCombatWorldStateID",
        "WildBattlePetLevelMin",
        "WildBattlePetLevelMax",
        "WindSettingsID",
        "Flags",
        "LiquidTypeID",
    ];
    pub const CHR_CLASSES: &[&str] = &[
        "Name_lang",
        "Filename",
        "Name_male_lang",
        "Name_female_lang",
        "PetNameToken",
        "Description_lang",
        "RoleInfoString_lang",
        "DisabledString_lang",
        "HyphenatedNameMale_lang",
        "HyphenatedNameFemale_lang",
        "ID",
    ];
    pub const CHR_RACES: &[&str] = &[
        "ClientPrefix",
        "ClientFileString",
        "Name_lang",
        "Name_female_lang",
        "Name_lowercase_lang",
        "Name_female_lowercase_lang",
        "Name_S_lang",
        "Name_female_S_lang",
        "Name_lowercase_S_lang",
        "Name_female_lowercase_S_lang",
        "RaceFantasyDescription_lang",
        "Name_L_lang",
        "Name_female_L_lang",
        "Name_lowercase_L_lang",
        "Name_female_lowercase_L_lang",
        "ID",
    ];
    pub const EMOTES: &[&str] = &[
        "ID",
        "RaceMask",
        "EmoteSlashCommand",
        "AnimID",
        "EmoteFlags",
        "EmoteSpecProc",
        "EmoteSpecProcParam",
        "EventSoundID",
        "SpellVisualKitID",
        "ClassMask",
    ];
    pub const EMOTES_TEXT: &[&str] = &["ID", "Name", "EmoteID"];
    pub const ITEM_SPARSE: &[&str] = &[
        "ID",
        "AllowableRace",
        "Description_lang",
        "Display3_lang",
        "Display2_lang",
        "Display1_lang",
        "Display_lang",
    ];
    pub const LANGUAGES: &[&str] = &["Name_lang", "ID", "Flags", "UiTextureKitID"];
    pub const MAP: &[&str] = &[
        "ID",
        "Directory",
        "MapName_lang",
        "MapDescription0_lang",
        "MapDescription1_lang",
        "PvpShortDescription_lang",
        "PvpLongDescription_lang",
    ];
    pub const FACTION: &[&str] = &[
        "ReputationRaceMask",
        "Name_lang",
        "Description_lang",
        "ID",
        "ReputationIndex",
        "ParentFactionID",
    ];
    pub const FACTION_TEMPLATE: &[&str] = &[
        "ID",
        "Faction",
        "Flags",
        "FactionGroup",
        "FriendGroup",
        "EnemyGroup",
        "Enemies",
        "Friend",
    ];
    pub const SCENE_SCRIPT_PACKAGE: &[&str] = &["ID", "Name"];
    pub const SPELL_FOCUS_OBJECT: &[&str] = &["ID", "Name_lang"];
    pub const QUEST_INFO: &[&str] = &["ID", "InfoName_lang", "Type", "Modifiers", "Profession"];
    pub const CHAR_TITLES: &[&str] = &["ID", "Name_lang", "Name1_lang", "Mask_ID", "Flags"];
    pub const QUEST_SORT: &[&str] = &["ID", "SortName_lang", "UiOrderIndex"];
    pub const TAXI_NODES: &[&str] = &[
        "Name_lang",
        "Pos",
        "MapOffset",
        "FlightMapOffset",
        "ID",
        "ContinentID",
    ];
    pub const TAXI_PATH: &[&str] = &["FromTaxiNode", "ToTaxiNode", "ID", "Cost"];
}

static SHADOWLANDS: Profile = Profile {
    version: ClientVersion::Shadowlands,
    spell_service: None,
    steps: &[
        named(
            "AreaTrigger.db2",
            fields::AREA_TRIGGER,
            Action::Label {
                store: Store::AreaTrigger,
                id: Key,
                label: "",
            },
        ),
        named_names("SpellName.db2", fields::SPELL_NAME, Store::Spell, "Name_lang"),
        named_names("Achievement.db2", fields::ACHIEVEMENT, Store::Achievement, "Title_lang"),
        named_names("AreaTable.db2", fields::AREA_TABLE, Store::Area, "AreaName_lang"),
        named_names("ChrClasses.db2", fields::CHR_CLASSES, Store::Class, "Name_lang"),
        named_names("ChrRaces.db2", fields::CHR_RACES, Store::Race, "Name_lang"),
        named(
            "Emotes.db2",
            fields::EMOTES,
            Action::Compose(Compose::Emotes {
                id: Key,
                name: Field("EmoteSlashCommand"),
                proc: Field("EmoteSpecProc"),
            }),
        ),
        named_names("EmotesText.db2", fields::EMOTES_TEXT, Store::TextEmote, "Name"),
        named_names("ItemSparse.db2", fields::ITEM_SPARSE, Store::Item, "Display_lang"),
        named_names("Languages.db2", fields::LANGUAGES, Store::Language, "Name_lang"),
        named_names("Map.db2", fields::MAP, Store::MapDirectory, "Directory"),
        named_names("Map.db2", fields::MAP, Store::Map, "MapName_lang"),
        named_names("Faction.db2", fields::FACTION, Store::Faction, "Name_lang"),
        named(
            "FactionTemplate.db2",
            fields::FACTION_TEMPLATE,
            Action::Ids {
                store: IdStore::FactionTemplate,
                id: Key,
                value: Field("Faction"),
            },
        ),
        named_names(
            "SceneScriptPackage.db2",
            fields::SCENE_SCRIPT_PACKAGE,
            Store::Scene,
            "Name",
        ),
        named_names(
            "SpellFocusObject.db2",
            fields::SPELL_FOCUS_OBJECT,
            Store::SpellFocusObject,
            "Name_lang",
        ),
        named_names("QuestInfo.db2", fields::QUEST_INFO, Store::QuestInfo, "InfoName_lang"),
        named_names("CharTitles.db2", fields::CHAR_TITLES, Store::CharTitle, "Name_lang"),
        named_names("QuestSort.db2", fields::QUEST_SORT, Store::QuestSort, "SortName_lang"),
        named_names("TaxiNodes.db2", fields::TAXI_NODES, Store::TaxiNode, "Name_lang"),
        named(
            "TaxiPath.db2",
            fields::TAXI_PATH,
            Action::Compose(Compose::TaxiPath {
                id: Key,
                from: Field("FromTaxiNode"),
                to: Field("ToTaxiNode"),
            }),
        ),
    ],
};

/// The profile of a client version
pub fn profile(version: ClientVersion) -> &'static Profile {
    match version {
        ClientVersion::Wrath => &WRATH,
        ClientVersion::Cataclysm => &CATACLYSM,
        ClientVersion::Mists => &MISTS,
        ClientVersion::Legion => &LEGION,
        ClientVersion::Shadowlands => &SHADOWLANDS,
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    use super::{profile, Col, Step, Target};
    use crate::settings::ClientVersion;
    use crate::snapshot::Store;

    #[test]
    fn table_counts() {
        let counts: Vec<_> = ClientVersion::iter()
            .map(|v| (v, profile(v).table_count()))
            .collect();
        assert_eq!(
            counts,
            vec![
                (ClientVersion::Wrath, 43),
                (ClientVersion::Cataclysm, 46),
                (ClientVersion::Mists, 49),
                (ClientVersion::Legion, 51),
                (ClientVersion::Shadowlands, 21),
            ]
        );
    }

    #[test]
    fn every_profile_loads_spell_names() {
        for version in ClientVersion::iter() {
            assert!(
                profile(version).targets().contains(&Target::Names(Store::Spell)),
                "{version}"
            );
        }
    }

    #[test]
    fn areas_are_linked_after_maps_and_areas_load() {
        for version in ClientVersion::iter() {
            let steps = profile(version).steps;
            let Some(link) = steps.iter().position(|s| *s == Step::LinkAreas) else {
                continue;
            };
            let loaded: Vec<_> = steps[..link]
                .iter()
                .flat_map(|s| match s {
                    Step::Load(d) => d.action.targets(),
                    Step::LinkAreas => vec![],
                })
                .collect();
            assert!(loaded.contains(&Target::Areas), "{version}");
            assert!(loaded.contains(&Target::Maps), "{version}");
        }
    }

    #[test]
    fn named_fields_exist_in_definitions() {
        for directive in profile(ClientVersion::Shadowlands).directives() {
            assert!(directive.fields.contains(&"ID"), "{}", directive.file);
            for (col, _) in directive.action.columns() {
                if let Col::Field(name) = col {
                    assert!(directive.fields.contains(&name), "{} {name}", directive.file);
                }
            }
        }
    }
}
