//! Entities kept as lists next to the flat lookups
//!
//! Areas refer to their map and parent area by index into the lists of the snapshot they
//! were linked in; use [`Snapshot::area_map`](crate::Tables::area_map) and
//! [`Snapshot::parent_area`](crate::Tables::parent_area) to follow them.

use derive_more::derive::Display;

/// Instance kind of a map
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Display)]
pub enum InstanceType {
    #[default]
    None,
    Party,
    Raid,
    Pvp,
    Arena,
    Scenario,
    #[display("Unknown({_0})")]
    Unknown(u32),
}

impl From<u32> for InstanceType {
    fn from(value: u32) -> Self {
        match value {
            0 => InstanceType::None,
            1 => InstanceType::Party,
            2 => InstanceType::Raid,
            3 => InstanceType::Pvp,
            4 => InstanceType::Arena,
            5 => InstanceType::Scenario,
            other => InstanceType::Unknown(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapEntry {
    pub id: u32,
    pub name: String,
    pub directory: String,
    pub instance_type: InstanceType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaEntry {
    pub id: u32,
    pub map_id: u32,
    pub parent_area_id: u32,
    pub flags1: u32,
    pub flags2: u32,
    pub name: String,
    pub(crate) map: Option<usize>,
    pub(crate) parent_area: Option<usize>,
}

impl AreaEntry {
    pub fn new(id: u32, map_id: u32, parent_area_id: u32, name: impl Into<String>) -> AreaEntry {
        AreaEntry {
            id,
            map_id,
            parent_area_id,
            flags1: 0,
            flags2: 0,
            name: name.into(),
            map: None,
            parent_area: None,
        }
    }

    /// Whether linking found the map of this area
    pub fn has_map(&self) -> bool {
        self.map.is_some()
    }

    /// Whether linking found the parent of this area
    pub fn has_parent_area(&self) -> bool {
        self.parent_area.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Faction {
    pub faction_id: u16,
    pub name: String,
}

/// Faction group bits of a faction template
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct FactionGroupMask(pub u16);

impl FactionGroupMask {
    pub const PLAYER: FactionGroupMask = FactionGroupMask(1);
    pub const ALLIANCE: FactionGroupMask = FactionGroupMask(2);
    pub const HORDE: FactionGroupMask = FactionGroupMask(4);
    pub const MONSTER: FactionGroupMask = FactionGroupMask(8);

    pub fn contains(self, other: FactionGroupMask) -> bool {
        self.0 & other.0 == other.0
    }
}

/// A faction template, `faction` is a key into the faction lookup
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FactionTemplate {
    pub template_id: u32,
    pub faction: u16,
    pub flags: u16,
    pub faction_group: FactionGroupMask,
    pub friend_group: FactionGroupMask,
    pub enemy_group: FactionGroupMask,
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{FactionGroupMask, InstanceType};

    #[test]
    fn instance_types() {
        assert_eq!(InstanceType::from(2), InstanceType::Raid);
        assert_eq!(InstanceType::from(9).to_string(), "Unknown(9)");
    }

    #[test]
    fn group_mask() {
        let mask = FactionGroupMask(FactionGroupMask::PLAYER.0 | FactionGroupMask::HORDE.0);
        assert!(mask.contains(FactionGroupMask::HORDE));
        assert!(!mask.contains(FactionGroupMask::ALLIANCE));
    }
}
