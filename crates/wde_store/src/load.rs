//! The generic interpreter of version profiles
//!
//! [`load_tables`] walks the steps of a [`Profile`] in order, reading each table file into
//! a transient [`Tables`]. Nothing here is visible to readers until the store publishes
//! the result.

use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};
use wde_dbc::{DbcTable, Definition, Row};

use crate::entity::{AreaEntry, Faction, FactionGroupMask, FactionTemplate, MapEntry};
use crate::error::{Error, Result};
use crate::format;
use crate::index::{self, area_group_name, fallback};
use crate::profile::{profile, Action, Col, Compose, Directive, Profile, Step};
use crate::settings::DbcSettings;
use crate::snapshot::{IdStore, Store, Tables};
use crate::spell::SpellServices;

/// Progress of a running load, reported before each table is read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub step: usize,
    pub total: usize,
    pub label: String,
}

/// Read every table of the configured version's profile
///
/// The profile's spell service is loaded first. A missing table file is skipped, as is a
/// file in a layout the reader does not support; any other decoding failure aborts the
/// load with [`Error::Format`].
#[instrument(
    skip_all,
    fields(version = %settings.version, path = %settings.path.display()),
    err
)]
pub fn load_tables(
    settings: &DbcSettings,
    services: &SpellServices,
    mut on_progress: impl FnMut(Progress),
) -> Result<Tables> {
    let profile = profile(settings.version);

    if let Some(kind) = profile.spell_service {
        info!("loading {kind} spell service");
        services
            .get(kind)
            .load(&settings.path)
            .map_err(|e| Error::SpellService(e.to_string()))?;
    }

    let mut loader = Loader::new(settings, profile);
    let total = profile.table_count();
    let mut step = 0;
    for s in profile.steps {
        match s {
            Step::Load(directive) => {
                on_progress(Progress {
                    step,
                    total,
                    label: format!("Loading {}", directive.file),
                });
                step += 1;
                loader.load(directive)?;
            }
            Step::LinkAreas => index::link_areas(&mut loader.tables),
        }
    }

    let mut tables = loader.tables;
    tables.index();
    info!(
        stores = tables.filled().len(),
        areas = tables.areas().len(),
        maps = tables.maps().len(),
        "tables loaded"
    );
    Ok(tables)
}

/// Find `file` in `directory`, falling back to a case-insensitive match
pub fn resolve(directory: &Path, file: &str) -> Option<PathBuf> {
    let exact = directory.join(file);
    if exact.is_file() {
        return Some(exact);
    }

    std::fs::read_dir(directory)
        .ok()?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .find(|path| {
            path.is_file()
                && path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.eq_ignore_ascii_case(file))
        })
}

struct Loader<'a> {
    settings: &'a DbcSettings,
    profile: &'static Profile,
    locale: usize,
    tables: Tables,
}

impl<'a> Loader<'a> {
    fn new(settings: &'a DbcSettings, profile: &'static Profile) -> Loader<'a> {
        Loader {
            settings,
            profile,
            locale: settings.locale.offset(),
            tables: Tables::default(),
        }
    }

    fn format_error(&self, file: &str, source: wde_dbc::error::Error) -> Error {
        Error::Format {
            file: file.to_string(),
            version: self.profile.version,
            path: self.settings.path.clone(),
            source,
        }
    }

    fn load(&mut self, directive: &Directive) -> Result<()> {
        let Some(path) = resolve(&self.settings.path, directive.file) else {
            debug!("{} not found, skipped", directive.file);
            return Ok(());
        };

        let opened = if directive.fields.is_empty() {
            DbcTable::open(&path)
        } else {
            DbcTable::open_with_definition(&path, Definition::new(directive.fields.iter().copied()))
        };
        let table = match opened {
            Ok(table) => table,
            Err(e) if e.is_unsupported() => {
                warn!("{} skipped: {e}", directive.file);
                return Ok(());
            }
            Err(e) => return Err(self.format_error(directive.file, e)),
        };

        let mut members = IndexMap::new();
        for row in table.rows() {
            let cells = Cells {
                row,
                locale: self.locale,
            };
            self.apply(&directive.action, &cells, &mut members)
                .map_err(|e| self.format_error(directive.file, e))?;
        }
        for (group, areas) in members {
            let name = area_group_name(self.tables.names(Store::Area), &areas);
            self.tables.names_mut(Store::AreaGroup).insert(group, name);
        }

        debug!(
            file = directive.file,
            format = %table.format(),
            rows = table.len(),
            "table read"
        );
        Ok(())
    }

    fn apply(
        &mut self,
        action: &Action,
        cells: &Cells<'_>,
        members: &mut IndexMap<i64, Vec<u32>>,
    ) -> wde_dbc::error::Result<()> {
        match *action {
            Action::Names { store, id, name } => {
                let name = cells.string(name)?.to_string();
                self.tables.names_mut(store).insert(cells.id(id)?, name);
            }
            Action::Label { store, id, label } => {
                self.tables
                    .names_mut(store)
                    .insert(cells.id(id)?, label.to_string());
            }
            Action::Ids { store, id, value } => {
                let value = i64::from(cells.uint(value)?);
                self.tables.ids_mut(store).insert(cells.id(id)?, value);
            }
            Action::Compose(compose) => self.compose(compose, cells, members)?,
        }
        Ok(())
    }

    fn compose(
        &mut self,
        compose: Compose,
        cells: &Cells<'_>,
        members: &mut IndexMap<i64, Vec<u32>>,
    ) -> wde_dbc::error::Result<()> {
        let tables = &mut self.tables;
        match compose {
            Compose::Faction { id, name } => {
                let faction = Faction {
                    faction_id: cells.ushort(id)?,
                    name: cells.string(name)?.to_string(),
                };
                tables
                    .names_mut(Store::Faction)
                    .insert(faction.faction_id, faction.name.clone());
                tables.factions.push(faction);
            }
            Compose::FactionTemplate {
                id,
                faction,
                flags,
                groups,
            } => {
                let template = FactionTemplate {
                    template_id: cells.uint(id)?,
                    faction: cells.ushort(faction)?,
                    flags: cells.ushort(flags)?,
                    faction_group: FactionGroupMask(cells.ushort(groups[0])?),
                    friend_group: FactionGroupMask(cells.ushort(groups[1])?),
                    enemy_group: FactionGroupMask(cells.ushort(groups[2])?),
                };
                tables
                    .ids_mut(IdStore::FactionTemplate)
                    .insert(template.template_id, i64::from(template.faction));
                tables.faction_templates.push(template);
            }
            Compose::Map {
                id,
                name,
                directory,
                instance_type,
            } => tables.maps.push(MapEntry {
                id: cells.uint(id)?,
                name: cells.string(name)?.to_string(),
                directory: cells.string(directory)?.to_string(),
                instance_type: cells.uint(instance_type)?.into(),
            }),
            Compose::Area {
                id,
                map,
                parent,
                flags1,
                flags2,
                name,
            } => {
                let mut area = AreaEntry::new(
                    cells.uint(id)?,
                    cells.uint(map)?,
                    cells.uint(parent)?,
                    cells.string(name)?,
                );
                area.flags1 = cells.uint(flags1)?;
                if let Some(flags2) = flags2 {
                    area.flags2 = cells.uint(flags2)?;
                }
                tables.areas.push(area);
            }
            Compose::Emotes { id, name, proc } => {
                let id = cells.id(id)?;
                let name = cells.string(name)?;
                tables.names_mut(Store::Emote).insert(id, name.to_string());
                match cells.int(proc)? {
                    0 => tables
                        .names_mut(Store::EmoteOneShot)
                        .insert(id, name.to_string()),
                    2 => tables
                        .names_mut(Store::EmoteState)
                        .insert(id, name.to_string()),
                    _ => {}
                }
            }
            Compose::Holidays { id, name_id } => {
                let id = cells.id(id)?;
                let name = tables
                    .names(Store::HolidayNames)
                    .get(cells.uint(name_id)?)
                    .cloned()
                    .unwrap_or_else(|| fallback("Holiday", id));
                tables.names_mut(Store::Holidays).insert(id, name);
            }
            Compose::ItemDisplay { id, display } => {
                let id = cells.id(id)?;
                let name = tables
                    .names(Store::ItemDisplayInfo)
                    .get(cells.uint(display)?)
                    .cloned()
                    .unwrap_or_else(|| fallback("Item", id));
                tables.names_mut(Store::ItemDbc).insert(id, name);
            }
            Compose::AreaGroup { id, first, count } => {
                let areas = (first..first + count)
                    .map(|c| cells.uint(Col::At(c)))
                    .collect::<wde_dbc::error::Result<Vec<_>>>()?;
                let name = area_group_name(tables.names(Store::Area), &areas);
                tables.names_mut(Store::AreaGroup).insert(cells.id(id)?, name);
            }
            Compose::AreaGroupMembers { area, group } => {
                members
                    .entry(cells.id(group)?)
                    .or_default()
                    .push(cells.uint(area)?);
            }
            Compose::MailTemplate { id, subject, body } => {
                let subject = match subject {
                    Some(col) => cells.string(col)?,
                    None => "",
                };
                let text = if subject.is_empty() {
                    format::trim_to_length(cells.string(body)?, 50)
                } else {
                    subject.to_string()
                };
                tables
                    .names_mut(Store::MailTemplate)
                    .insert(cells.id(id)?, text.replace('\n', ""));
            }
            Compose::ExtendedCost {
                id,
                honor,
                arena,
                item,
            } => {
                let text = format::cost(cells.int(honor)?, cells.int(arena)?, cells.int(item)?);
                tables.names_mut(Store::ExtendedCost).insert(cells.id(id)?, text);
            }
            Compose::CurrencyCost {
                id,
                item,
                count,
                item_count,
                arena,
                currency,
            } => {
                let mut parts = Vec::new();
                for slot in 0..5 {
                    let currency_id = cells.uint(Col::Rep(currency, slot))?;
                    let currency_count = cells.uint(Col::Rep(count, slot))?;
                    if currency_id != 0 && currency_count != 0 {
                        let name = tables
                            .names(Store::CurrencyType)
                            .get(currency_id)
                            .cloned()
                            .unwrap_or_else(|| fallback("Currency", currency_id));
                        parts.push(format!("{currency_count} x {name}"));
                    }

                    let item_id = cells.uint(Col::Rep(item, slot))?;
                    let items = cells.ushort(Col::Rep(item_count, slot))?;
                    if item_id != 0 && items != 0 {
                        let name = tables
                            .names(Store::Item)
                            .get(item_id)
                            .cloned()
                            .unwrap_or_else(|| fallback("item", item_id));
                        parts.push(match items {
                            1 => name,
                            n => format!("{n} x {name}"),
                        });
                    }
                }
                let rating = cells.ushort(arena)?;
                if rating != 0 {
                    parts.push(format!("min arena rating {rating}"));
                }
                tables
                    .names_mut(Store::ExtendedCost)
                    .insert(cells.id(id)?, parts.join(", "));
            }
            Compose::TaxiPath { id, from, to } => {
                let path = (i64::from(cells.uint(from)?), i64::from(cells.uint(to)?));
                tables.taxi_paths.insert(cells.id(id)?, path);
            }
            Compose::CastTime {
                id,
                base,
                per_level,
                min,
            } => {
                let text =
                    format::cast_time(cells.int(base)?, cells.int(per_level)?, cells.int(min)?);
                tables.names_mut(Store::SpellCastTime).insert(cells.id(id)?, text);
            }
            Compose::Duration {
                id,
                base,
                per_level,
                max,
            } => {
                let text =
                    format::duration(cells.int(base)?, cells.int(per_level)?, cells.int(max)?);
                tables.names_mut(Store::SpellDuration).insert(cells.id(id)?, text);
            }
            Compose::Radius {
                id,
                base,
                per_level,
                max,
            } => {
                let text = format::radius(
                    cells.float(base)?,
                    cells.float(per_level)?,
                    cells.float(max)?,
                );
                tables.names_mut(Store::SpellRadius).insert(cells.id(id)?, text);
            }
            Compose::Movie { id, file } => {
                let name = tables
                    .names(Store::FileData)
                    .get(cells.uint(file)?)
                    .cloned()
                    .unwrap_or_else(|| "Unknown movie".to_string());
                tables.names_mut(Store::Movie).insert(cells.id(id)?, name);
            }
            Compose::GarrisonBuilding {
                id,
                alliance,
                horde,
            } => {
                let alliance = cells.string(alliance)?;
                let horde = cells.string(horde)?;
                let name = if alliance == horde {
                    alliance.to_string()
                } else {
                    format!("{alliance} / {horde}")
                };
                tables
                    .names_mut(Store::GarrisonBuilding)
                    .insert(cells.id(id)?, name);
            }
            Compose::ScenarioStep {
                id,
                name,
                scenario,
                step,
            } => {
                let id = cells.id(id)?;
                tables
                    .names_mut(Store::ScenarioStep)
                    .insert(id, cells.string(name)?.to_string());
                tables
                    .scenario_steps
                    .entry(cells.uint(scenario)?)
                    .or_default()
                    .insert(i64::from(cells.uint(step)?), id);
            }
            Compose::CharSpecialization { id, name, class } => {
                let name = cells.string(name)?;
                let name = match tables.names(Store::Class).get(cells.uint(class)?) {
                    Some(class) => format!("{class} - {name}"),
                    None => name.to_string(),
                };
                tables
                    .names_mut(Store::CharSpecialization)
                    .insert(cells.id(id)?, name);
            }
        }
        Ok(())
    }
}

/// Typed reads of a row through [`Col`] addresses
struct Cells<'a> {
    row: Row<'a>,
    locale: usize,
}

impl<'a> Cells<'a> {
    fn id(&self, col: Col) -> wde_dbc::error::Result<i64> {
        self.uint(col).map(i64::from)
    }

    fn uint(&self, col: Col) -> wde_dbc::error::Result<u32> {
        match col {
            Col::Key => Ok(self.row.key()),
            Col::At(c) => self.row.get_uint(c),
            Col::Loc(c) => self.row.get_uint(c + self.locale),
            Col::Rep(c, i) => self.row.get_uint_at(c, i),
            Col::Field(name) => self.row.field_uint(name),
        }
    }

    fn int(&self, col: Col) -> wde_dbc::error::Result<i32> {
        match col {
            Col::Key => Ok(self.row.key() as i32),
            Col::At(c) => self.row.get_int(c),
            Col::Loc(c) => self.row.get_int(c + self.locale),
            Col::Rep(c, i) => self.row.get_int_at(c, i),
            Col::Field(name) => self.row.field_int(name),
        }
    }

    fn ushort(&self, col: Col) -> wde_dbc::error::Result<u16> {
        match col {
            Col::Key => Ok(self.row.key() as u16),
            Col::At(c) => self.row.get_ushort(c),
            Col::Loc(c) => self.row.get_ushort(c + self.locale),
            Col::Rep(c, i) => self.row.get_ushort_at(c, i),
            Col::Field(name) => self.row.field_ushort(name),
        }
    }

    fn float(&self, col: Col) -> wde_dbc::error::Result<f32> {
        match col {
            Col::Key => Ok(self.row.key() as f32),
            Col::At(c) => self.row.get_float(c),
            Col::Loc(c) => self.row.get_float(c + self.locale),
            Col::Rep(c, i) => self.row.get_float_at(c, i),
            Col::Field(name) => self.row.field_float(name),
        }
    }

    fn string(&self, col: Col) -> wde_dbc::error::Result<&'a str> {
        match col {
            Col::Key => Err(wde_dbc::error::Error::NotAString(0)),
            Col::At(c) => self.row.get_string(c),
            Col::Loc(c) => self.row.get_string(c + self.locale),
            Col::Rep(c, i) => self.row.get_string_at(c, i),
            Col::Field(name) => self.row.field_string(name),
        }
    }
}
