use derive_more::derive::{Constructor, Deref, From, IntoIterator};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::trace;

/// Mapping from a table id to a name or to another id
///
/// Every inserted key has a value; missing names are replaced with a fallback string by
/// whoever fills the table.
#[derive(Constructor, Clone, Debug, PartialEq, Deref, From, IntoIterator)]
#[into_iterator(owned, ref)]
pub struct LookupTable<V>(HashMap<i64, V>);

impl<V> Default for LookupTable<V> {
    fn default() -> Self {
        LookupTable(HashMap::new())
    }
}

impl<V> LookupTable<V> {
    /// Insert a value, a later duplicate replaces the earlier one
    pub fn insert(&mut self, id: impl Into<i64>, value: V) {
        let id = id.into();
        if self.0.insert(id, value).is_some() {
            trace!("duplicate id {id} replaced");
        }
    }

    pub(crate) fn entry(&mut self, id: impl Into<i64>) -> Entry<'_, i64, V> {
        self.0.entry(id.into())
    }

    pub fn get(&self, id: impl Into<i64>) -> Option<&V> {
        self.0.get(&id.into())
    }

    /// Entries sorted by id
    pub fn sorted(&self) -> Vec<(i64, &V)> {
        let mut entries: Vec<_> = self.0.iter().map(|(k, v)| (*k, v)).collect();
        entries.sort_by_key(|(k, _)| *k);
        entries
    }
}

impl<V> FromIterator<(i64, V)> for LookupTable<V> {
    fn from_iter<T: IntoIterator<Item = (i64, V)>>(iter: T) -> Self {
        LookupTable(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::LookupTable;

    #[test]
    fn last_duplicate_wins() {
        let mut table = LookupTable::default();
        table.insert(3u32, "first".to_string());
        table.insert(3u32, "second".to_string());
        table.insert(-1i32, "negative".to_string());

        assert_eq!(table.len(), 2);
        assert_eq!(table.get(3u32).map(String::as_str), Some("second"));
        assert_eq!(
            table.sorted(),
            vec![(-1, &"negative".to_string()), (3, &"second".to_string())]
        );
    }
}
