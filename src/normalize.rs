use tracing::{debug, instrument};

use crate::decode::{DecodedRow, RawRow, decode_row};
use crate::error::Result;
use crate::model::{
    Distrito, EntityModel, Level, Mesorregiao, Microrregiao, Municipio, Subdistrito, Uf,
};

/// Decodes and normalizes the raw rows, in source order, into a fresh model.
#[instrument(level = "debug", skip_all)]
pub fn build_model<I>(rows: I) -> Result<EntityModel>
where
    I: IntoIterator<Item = RawRow>,
{
    let mut model = EntityModel::new();
    for raw in rows {
        ingest(&mut model, decode_row(&raw)?)?;
    }
    for level in Level::ALL {
        debug!(level = %level, entities = model.len(level), "level normalized");
    }
    Ok(model)
}

/// Normalizes already decoded rows into a fresh model.
pub fn normalize<I>(rows: I) -> Result<EntityModel>
where
    I: IntoIterator<Item = DecodedRow>,
{
    let mut model = EntityModel::new();
    for row in rows {
        ingest(&mut model, row)?;
    }
    Ok(model)
}

/// Feeds one decoded row into the model: one entity per level, ancestors
/// first, then the flat row itself.
pub fn ingest(model: &mut EntityModel, row: DecodedRow) -> Result<()> {
    let uf = row.uf.id;
    let mesorregiao = row.mesorregiao.id;
    let microrregiao = row.microrregiao.id;
    let municipio = row.municipio.id;
    let distrito = row.distrito.id;

    model.upsert(Uf {
        id: uf,
        nome: row.uf.nome.clone(),
    })?;
    model.upsert(Mesorregiao {
        id: mesorregiao,
        id_uf: uf,
        nome: row.mesorregiao.nome.clone(),
    })?;
    model.upsert(Microrregiao {
        id: microrregiao,
        id_mesorregiao: mesorregiao,
        id_uf: uf,
        nome: row.microrregiao.nome.clone(),
    })?;
    model.upsert(Municipio {
        id: municipio,
        id_microrregiao: microrregiao,
        id_mesorregiao: mesorregiao,
        id_uf: uf,
        nome: row.municipio.nome.clone(),
    })?;
    model.upsert(Distrito {
        id: distrito,
        id_municipio: municipio,
        id_microrregiao: microrregiao,
        id_mesorregiao: mesorregiao,
        id_uf: uf,
        nome: row.distrito.nome.clone(),
    })?;
    if let Some(subdistrito) = &row.subdistrito {
        model.upsert(Subdistrito {
            id: subdistrito.id,
            id_distrito: distrito,
            id_municipio: municipio,
            id_microrregiao: microrregiao,
            id_mesorregiao: mesorregiao,
            id_uf: uf,
            nome: subdistrito.nome.clone(),
        })?;
    }

    model.append_flat_row(row);
    Ok(())
}
