//! Field name definitions for named table access

use std::sync::Arc;

/// Column names of a table, in column order
///
/// When the table stores its ids in an id list, column 0 is the synthesized id and the
/// definition should name it (usually `ID`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    fields: Arc<[Box<str>]>,
}

impl Definition {
    pub fn new<I, S>(fields: I) -> Definition
    where
        I: IntoIterator<Item = S>,
        S: Into<Box<str>>,
    {
        Definition {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Column index of a field, compared case-sensitively
    pub fn column(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.as_ref() == name)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(AsRef::as_ref)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<S: Into<Box<str>>> FromIterator<S> for Definition {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Definition::new(iter)
    }
}

#[cfg(test)]
mod test {
    use super::Definition;

    #[test]
    fn column_lookup() {
        let definition = Definition::new(["ID", "Name_lang", "Flags"]);

        assert_eq!(definition.column("ID"), Some(0));
        assert_eq!(definition.column("Flags"), Some(2));
        assert_eq!(definition.column("name_lang"), None);
        assert_eq!(definition.len(), 3);
    }
}
