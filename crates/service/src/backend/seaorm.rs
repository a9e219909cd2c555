use std::str::FromStr;

use async_trait::async_trait;
use models::{contact, feature, service, site_content};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, Iterable, PrimaryKeyTrait, QueryFilter, QueryOrder,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use super::{merge_patch, BackendError, DataBackend, Query, Row, Table};

/// Postgres-backed implementation over the sea-orm entities in `models`.
#[derive(Clone)]
pub struct SeaOrmBackend {
    pub db: DatabaseConnection,
}

impl SeaOrmBackend {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait]
impl DataBackend for SeaOrmBackend {
    async fn select(&self, table: Table, query: &Query) -> Result<Vec<Row>, BackendError> {
        debug!(%table, filters = query.filters.len(), "select");
        match table {
            Table::Services => select_rows::<service::Entity>(&self.db, table, query).await,
            Table::Features => select_rows::<feature::Entity>(&self.db, table, query).await,
            Table::Contacts => select_rows::<contact::Entity>(&self.db, table, query).await,
            Table::SiteContent => select_rows::<site_content::Entity>(&self.db, table, query).await,
        }
    }

    async fn insert(&self, table: Table, row: Row) -> Result<Row, BackendError> {
        match table {
            Table::Services => insert_row::<service::ActiveModel>(&self.db, row).await,
            Table::Features => insert_row::<feature::ActiveModel>(&self.db, row).await,
            Table::Contacts => insert_row::<contact::ActiveModel>(&self.db, row).await,
            Table::SiteContent => insert_row::<site_content::ActiveModel>(&self.db, row).await,
        }
    }

    async fn update(&self, table: Table, id: Uuid, patch: Row) -> Result<Option<Row>, BackendError> {
        match table {
            Table::Services => update_row::<service::ActiveModel>(&self.db, id, patch).await,
            Table::Features => update_row::<feature::ActiveModel>(&self.db, id, patch).await,
            Table::Contacts => update_row::<contact::ActiveModel>(&self.db, id, patch).await,
            Table::SiteContent => update_row::<site_content::ActiveModel>(&self.db, id, patch).await,
        }
    }

    async fn delete(&self, table: Table, id: Uuid) -> Result<bool, BackendError> {
        match table {
            Table::Services => delete_row::<service::Entity>(&self.db, id).await,
            Table::Features => delete_row::<feature::Entity>(&self.db, id).await,
            Table::Contacts => delete_row::<contact::Entity>(&self.db, id).await,
            Table::SiteContent => delete_row::<site_content::Entity>(&self.db, id).await,
        }
    }
}

fn db_err(e: DbErr) -> BackendError {
    match e {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => BackendError::Unavailable(e.to_string()),
        other => BackendError::Rejected(other.to_string()),
    }
}

fn to_row<M: Serialize>(model: M) -> Result<Row, BackendError> {
    serde_json::to_value(model).map_err(|e| BackendError::Malformed(e.to_string()))
}

fn column<E>(table: Table, name: &str) -> Result<E::Column, BackendError>
where
    E: EntityTrait,
    E::Column: FromStr,
{
    E::Column::from_str(name).map_err(|_| BackendError::UnknownColumn { table, column: name.to_string() })
}

fn to_sea_value(field: &str, v: &Value) -> Result<sea_orm::Value, BackendError> {
    match v {
        Value::Bool(b) => Ok((*b).into()),
        Value::String(s) => Ok(s.clone().into()),
        Value::Number(n) => n
            .as_i64()
            .map(sea_orm::Value::from)
            .ok_or_else(|| BackendError::UnsupportedValue(field.to_string())),
        _ => Err(BackendError::UnsupportedValue(field.to_string())),
    }
}

/// Build an active model with every column marked as changed.
fn active_from_row<A>(row: Row) -> Result<A, BackendError>
where
    A: ActiveModelTrait,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A> + DeserializeOwned,
{
    let model: <A::Entity as EntityTrait>::Model =
        serde_json::from_value(row).map_err(|e| BackendError::Malformed(e.to_string()))?;
    let mut am = model.into_active_model();
    for col in <A::Entity as EntityTrait>::Column::iter() {
        am.reset(col);
    }
    Ok(am)
}

/// Rows come back as raw JSON so a stored value the entity enums do not
/// know (an old category name, say) is resolved by the model's serde
/// defaults instead of failing the whole query.
async fn select_rows<E>(db: &DatabaseConnection, table: Table, query: &Query) -> Result<Vec<Row>, BackendError>
where
    E: EntityTrait,
    E::Column: FromStr,
{
    let mut select = E::find();
    for f in &query.filters {
        let col = column::<E>(table, &f.field)?;
        select = select.filter(col.eq(to_sea_value(&f.field, &f.value)?));
    }
    for field in &query.order_by {
        select = select.order_by_asc(column::<E>(table, field)?);
    }
    select.into_json().all(db).await.map_err(db_err)
}

async fn insert_row<A>(db: &DatabaseConnection, row: Row) -> Result<Row, BackendError>
where
    A: ActiveModelTrait + ActiveModelBehavior + Send,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A> + Serialize + DeserializeOwned,
{
    let am: A = active_from_row(row)?;
    let model = am.insert(db).await.map_err(db_err)?;
    to_row(model)
}

async fn update_row<A>(db: &DatabaseConnection, id: Uuid, patch: Row) -> Result<Option<Row>, BackendError>
where
    A: ActiveModelTrait + ActiveModelBehavior + Send,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A> + Serialize + DeserializeOwned,
    <<A::Entity as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType: From<Uuid>,
{
    let found = <A::Entity as EntityTrait>::find_by_id(id).into_json().one(db).await.map_err(db_err)?;
    let Some(mut row) = found else { return Ok(None) };
    merge_patch(&mut row, patch);
    // last write wins: every column is written back
    let am: A = active_from_row(row)?;
    let model = am.update(db).await.map_err(db_err)?;
    Ok(Some(to_row(model)?))
}

async fn delete_row<E>(db: &DatabaseConnection, id: Uuid) -> Result<bool, BackendError>
where
    E: EntityTrait,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<Uuid>,
{
    let res = E::delete_by_id(id).exec(db).await.map_err(db_err)?;
    Ok(res.rows_affected > 0)
}
