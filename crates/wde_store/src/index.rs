//! Cross table resolution run inside the transient tables before publish

use std::collections::HashMap;
use tracing::debug;

use crate::lookup::LookupTable;
use crate::snapshot::{Store, Tables};

/// Link every area to its map and parent area, then derive the area and map lookups
///
/// A missing map leaves the area unlinked, as does a `parent_area_id` of zero or one that
/// names no loaded area.
pub fn link_areas(tables: &mut Tables) {
    let map_by_id: HashMap<u32, usize> = tables
        .maps
        .iter()
        .enumerate()
        .map(|(i, m)| (m.id, i))
        .collect();
    let area_by_id: HashMap<u32, usize> = tables
        .areas
        .iter()
        .enumerate()
        .map(|(i, a)| (a.id, i))
        .collect();

    let mut unlinked = 0usize;
    for area in tables.areas.iter_mut() {
        area.map = map_by_id.get(&area.map_id).copied();
        area.parent_area = match area.parent_area_id {
            0 => None,
            parent => area_by_id.get(&parent).copied(),
        };
        if area.map.is_none() {
            unlinked += 1;
        }
    }
    debug!(
        areas = tables.areas.len(),
        maps = tables.maps.len(),
        unlinked,
        "linked areas"
    );

    let areas: Vec<_> = tables
        .areas
        .iter()
        .map(|a| (a.id, a.name.clone()))
        .collect();
    for (id, name) in areas {
        tables.names_mut(Store::Area).insert(id, name);
    }

    let maps: Vec<_> = tables
        .maps
        .iter()
        .map(|m| (m.id, m.name.clone(), m.directory.clone()))
        .collect();
    for (id, name, directory) in maps {
        tables.names_mut(Store::Map).insert(id, name);
        tables.names_mut(Store::MapDirectory).insert(id, directory);
    }

    tables.map_by_id = map_by_id;
    tables.area_by_id = area_by_id;
}

/// `"{kind} {id}"`, the name given to ids a join could not resolve
pub fn fallback(kind: &str, id: impl std::fmt::Display) -> String {
    format!("{kind} {id}")
}

/// Name of an area group from its member area ids, which end at the first zero
pub fn area_group_name(areas: &LookupTable<String>, ids: &[u32]) -> String {
    let members: Vec<u32> = ids.iter().copied().take_while(|id| *id != 0).collect();
    let name = |id: u32| {
        areas
            .get(id)
            .cloned()
            .unwrap_or_else(|| fallback("Area", id))
    };

    match members.as_slice() {
        [single] => name(*single),
        _ => members
            .iter()
            .map(|id| name(*id))
            .collect::<Vec<_>>()
            .join(", "),
    }
}

/// `"{from} -> {to}"` with `unknown` for a node missing from `nodes`
pub fn taxi_path_name(nodes: &LookupTable<String>, from: i64, to: i64) -> String {
    let name = |id: i64| nodes.get(id).map(String::as_str).unwrap_or("unknown");
    format!("{} -> {}", name(from), name(to))
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{area_group_name, link_areas, taxi_path_name};
    use crate::entity::{AreaEntry, InstanceType, MapEntry};
    use crate::lookup::LookupTable;
    use crate::snapshot::{Store, Tables};

    fn map(id: u32, name: &str) -> MapEntry {
        MapEntry {
            id,
            name: name.to_string(),
            directory: format!("{name}Dir"),
            instance_type: InstanceType::None,
        }
    }

    #[test]
    fn links_resolve_or_stay_empty() {
        let mut tables = Tables::default();
        tables.maps.push(map(0, "Azeroth"));
        tables.areas.push(AreaEntry::new(12, 0, 0, "Elwynn Forest"));
        tables.areas.push(AreaEntry::new(87, 0, 12, "Goldshire"));
        tables.areas.push(AreaEntry::new(88, 0, 999, "Orphan"));
        tables.areas.push(AreaEntry::new(89, 5, 12, "Elsewhere"));

        link_areas(&mut tables);

        let elwynn = tables.area(12).expect("elwynn");
        assert!(!elwynn.has_parent_area());
        assert_eq!(tables.area_map(elwynn).map(|m| m.id), Some(0));

        let goldshire = tables.area(87).expect("goldshire");
        assert_eq!(tables.parent_area(goldshire).map(|a| a.id), Some(12));

        assert!(!tables.area(88).expect("orphan").has_parent_area());
        let elsewhere = tables.area(89).expect("elsewhere");
        assert!(!elsewhere.has_map());
        assert!(elsewhere.has_parent_area());

        assert_eq!(tables.names(Store::Area).len(), 4);
        assert_eq!(
            tables.names(Store::MapDirectory).get(0u32).map(String::as_str),
            Some("AzerothDir")
        );
    }

    #[test]
    fn area_groups() {
        let areas: LookupTable<String> = [(1, "Dun Morogh".to_string()), (2, "Ironforge".to_string())]
            .into_iter()
            .collect();

        assert_eq!(area_group_name(&areas, &[1, 0, 2]), "Dun Morogh");
        assert_eq!(area_group_name(&areas, &[3]), "Area 3");
        assert_eq!(area_group_name(&areas, &[1, 2, 3]), "Dun Morogh, Ironforge, Area 3");
        assert_eq!(area_group_name(&areas, &[0, 1]), "");
    }

    #[test]
    fn taxi_paths() {
        let nodes: LookupTable<String> = [(2, "Stormwind".to_string())].into_iter().collect();
        assert_eq!(taxi_path_name(&nodes, 2, 6), "Stormwind -> unknown");
        assert_eq!(taxi_path_name(&nodes, 7, 2), "unknown -> Stormwind");
    }
}
