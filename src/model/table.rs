use std::collections::HashMap;

use super::{Entity, Record};
use crate::error::{DtbError, Result};

/// Insertion-ordered entity collection keyed by id.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<E> {
    entries: Vec<E>,
    index: HashMap<i64, usize>,
}

impl<E> Default for Table<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<E: Entity> Table<E> {
    /// Appends `entity` unless an entity with the same id exists.
    ///
    /// A repeated id must carry exactly the same fields; a differing record is
    /// reported as [`DtbError::ConflictingEntity`].
    pub fn upsert(&mut self, entity: E) -> Result<bool> {
        let id = entity.id();
        match self.index.get(&id) {
            Some(&position) if self.entries[position] == entity => Ok(false),
            Some(_) => Err(DtbError::ConflictingEntity {
                level: E::LEVEL,
                id,
            }),
            None => {
                self.index.insert(id, self.entries.len());
                self.entries.push(entity);
                Ok(true)
            }
        }
    }

    pub fn get(&self, id: i64) -> Option<&E> {
        self.index.get(&id).map(|&position| &self.entries[position])
    }

    pub fn contains(&self, id: i64) -> bool {
        self.index.contains_key(&id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.entries.iter()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn records(&self) -> Vec<Record<'_>> {
        self.entries.iter().map(E::to_record).collect()
    }
}
