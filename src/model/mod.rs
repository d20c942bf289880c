use std::fmt;

use serde::{Serialize, Serializer};

use crate::decode::DecodedRow;
use crate::error::Result;

mod table;

pub use table::Table;

/// Levels of the territorial hierarchy, from the most significant ancestor
/// down to the optional sub-district.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Level {
    Uf,
    Mesorregiao,
    Microrregiao,
    Municipio,
    Distrito,
    Subdistrito,
}

impl Level {
    /// Every level in hierarchy order. Encoders emit levels in this order.
    pub const ALL: [Level; 6] = [
        Level::Uf,
        Level::Mesorregiao,
        Level::Microrregiao,
        Level::Municipio,
        Level::Distrito,
        Level::Subdistrito,
    ];

    /// Table, element and mapping key used for the level.
    pub fn name(self) -> &'static str {
        match self {
            Level::Uf => "uf",
            Level::Mesorregiao => "mesorregiao",
            Level::Microrregiao => "microrregiao",
            Level::Municipio => "municipio",
            Level::Distrito => "distrito",
            Level::Subdistrito => "subdistrito",
        }
    }

    /// Field names of an entity at this level, in the order every encoder
    /// writes them.
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            Level::Uf => &["id", "nome"],
            Level::Mesorregiao => &["id", "id_uf", "nome"],
            Level::Microrregiao => &["id", "id_mesorregiao", "id_uf", "nome"],
            Level::Municipio => &["id", "id_microrregiao", "id_mesorregiao", "id_uf", "nome"],
            Level::Distrito => &[
                "id",
                "id_municipio",
                "id_microrregiao",
                "id_mesorregiao",
                "id_uf",
                "nome",
            ],
            Level::Subdistrito => &[
                "id",
                "id_distrito",
                "id_municipio",
                "id_microrregiao",
                "id_mesorregiao",
                "id_uf",
                "nome",
            ],
        }
    }

    /// Ancestor levels referenced by this level's `id_*` fields, in field order.
    pub fn ancestors(self) -> &'static [Level] {
        match self {
            Level::Uf => &[],
            Level::Mesorregiao => &[Level::Uf],
            Level::Microrregiao => &[Level::Mesorregiao, Level::Uf],
            Level::Municipio => &[Level::Microrregiao, Level::Mesorregiao, Level::Uf],
            Level::Distrito => &[
                Level::Municipio,
                Level::Microrregiao,
                Level::Mesorregiao,
                Level::Uf,
            ],
            Level::Subdistrito => &[
                Level::Distrito,
                Level::Municipio,
                Level::Microrregiao,
                Level::Mesorregiao,
                Level::Uf,
            ],
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single field value borrowed from an entity or flat row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value<'a> {
    Int(i64),
    Text(&'a str),
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(value) => write!(f, "{value}"),
            Value::Text(value) => f.write_str(value),
        }
    }
}

impl Serialize for Value<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Int(value) => serializer.serialize_i64(*value),
            Value::Text(value) => serializer.serialize_str(value),
        }
    }
}

/// Level-agnostic view of one entity, as consumed by the encoders.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<'a> {
    pub level: Level,
    pub id: i64,
    /// Values aligned with [`Level::fields`]; the first one is always the id.
    pub values: Vec<Value<'a>>,
}

impl<'a> Record<'a> {
    /// Pairs every value with its field name.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, Value<'a>)> + '_ {
        self.level
            .fields()
            .iter()
            .copied()
            .zip(self.values.iter().copied())
    }
}

/// Behaviour shared by the fixed-field entity types of every level.
pub trait Entity: Clone + PartialEq + fmt::Debug {
    const LEVEL: Level;

    fn id(&self) -> i64;

    /// Field values in [`Level::fields`] order.
    fn values(&self) -> Vec<Value<'_>>;

    fn table(model: &EntityModel) -> &Table<Self>;

    fn table_mut(model: &mut EntityModel) -> &mut Table<Self>;

    fn to_record(&self) -> Record<'_> {
        Record {
            level: Self::LEVEL,
            id: self.id(),
            values: self.values(),
        }
    }
}

macro_rules! entity {
    ($(#[$meta:meta])* $name:ident, $level:expr, $table:ident { $($ancestor:ident),* }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            pub id: i64,
            $(pub $ancestor: i64,)*
            pub nome: String,
        }

        impl Entity for $name {
            const LEVEL: Level = $level;

            fn id(&self) -> i64 {
                self.id
            }

            fn values(&self) -> Vec<Value<'_>> {
                vec![
                    Value::Int(self.id),
                    $(Value::Int(self.$ancestor),)*
                    Value::Text(&self.nome),
                ]
            }

            fn table(model: &EntityModel) -> &Table<Self> {
                &model.$table
            }

            fn table_mut(model: &mut EntityModel) -> &mut Table<Self> {
                &mut model.$table
            }
        }
    };
}

entity!(
    /// Federative unit (state).
    Uf, Level::Uf, ufs {}
);
entity!(
    /// Geographic meso-region of a state.
    Mesorregiao, Level::Mesorregiao, mesorregioes { id_uf }
);
entity!(
    /// Geographic micro-region.
    Microrregiao, Level::Microrregiao, microrregioes { id_mesorregiao, id_uf }
);
entity!(
    /// Municipality.
    Municipio, Level::Municipio, municipios { id_microrregiao, id_mesorregiao, id_uf }
);
entity!(
    /// Administrative district of a municipality.
    Distrito, Level::Distrito, distritos {
        id_municipio, id_microrregiao, id_mesorregiao, id_uf
    }
);
entity!(
    /// Optional subdivision of a district.
    Subdistrito, Level::Subdistrito, subdistritos {
        id_distrito, id_municipio, id_microrregiao, id_mesorregiao, id_uf
    }
);

/// In-memory relational model built for a single export run.
///
/// Each level keeps its entities deduplicated and in first-seen order, while
/// the flat rows are kept verbatim for the delimited-text encoder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityModel {
    ufs: Table<Uf>,
    mesorregioes: Table<Mesorregiao>,
    microrregioes: Table<Microrregiao>,
    municipios: Table<Municipio>,
    distritos: Table<Distrito>,
    subdistritos: Table<Subdistrito>,
    rows: Vec<DecodedRow>,
}

impl EntityModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the entity at the end of its level unless an identical one is
    /// already present. Returns whether the entity was inserted.
    pub fn upsert<E: Entity>(&mut self, entity: E) -> Result<bool> {
        E::table_mut(self).upsert(entity)
    }

    /// Appends a row to the flat row list. Rows are never deduplicated.
    pub fn append_flat_row(&mut self, row: DecodedRow) {
        self.rows.push(row);
    }

    pub fn flat_rows(&self) -> &[DecodedRow] {
        &self.rows
    }

    pub fn table<E: Entity>(&self) -> &Table<E> {
        E::table(self)
    }

    /// Records of one level in first-seen order.
    pub fn records(&self, level: Level) -> Vec<Record<'_>> {
        match level {
            Level::Uf => self.ufs.records(),
            Level::Mesorregiao => self.mesorregioes.records(),
            Level::Microrregiao => self.microrregioes.records(),
            Level::Municipio => self.municipios.records(),
            Level::Distrito => self.distritos.records(),
            Level::Subdistrito => self.subdistritos.records(),
        }
    }

    /// Number of distinct entities stored for a level.
    pub fn len(&self, level: Level) -> usize {
        match level {
            Level::Uf => self.ufs.len(),
            Level::Mesorregiao => self.mesorregioes.len(),
            Level::Microrregiao => self.microrregioes.len(),
            Level::Municipio => self.municipios.len(),
            Level::Distrito => self.distritos.len(),
            Level::Subdistrito => self.subdistritos.len(),
        }
    }
}
