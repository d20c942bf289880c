use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::model::{EntityModel, Level, Record, Value};

/// Nested mapping `level -> id -> field -> value` shared by the JSON and
/// YAML encoders. The id is the key, so it is left out of the inner mapping.
pub(crate) struct MappingDocument<'a> {
    levels: Vec<(Level, Vec<Record<'a>>)>,
}

impl<'a> MappingDocument<'a> {
    pub(crate) fn new(model: &'a EntityModel) -> Self {
        Self {
            levels: Level::ALL
                .into_iter()
                .map(|level| (level, model.records(level)))
                .collect(),
        }
    }

    pub(crate) fn levels(&self) -> &[(Level, Vec<Record<'a>>)] {
        &self.levels
    }
}

/// Fields of a record without the leading id.
pub(crate) fn entry_fields<'r, 'a>(
    record: &'r Record<'a>,
) -> impl Iterator<Item = (&'static str, Value<'a>)> + 'r {
    record.fields().skip(1)
}

impl Serialize for MappingDocument<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.levels.len()))?;
        for (level, records) in &self.levels {
            map.serialize_entry(level.name(), &LevelEntries(records))?;
        }
        map.end()
    }
}

struct LevelEntries<'r, 'a>(&'r [Record<'a>]);

impl Serialize for LevelEntries<'_, '_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for record in self.0 {
            map.serialize_entry(&record.id, &EntryFields(record))?;
        }
        map.end()
    }
}

struct EntryFields<'r, 'a>(&'r Record<'a>);

impl Serialize for EntryFields<'_, '_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.values.len().saturating_sub(1)))?;
        for (name, value) in entry_fields(self.0) {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}
