use sea_orm::{entity::prelude::*, QueryOrder, Set, DatabaseConnection};
use sea_orm::sea_query::Expr;
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::errors;

/// `engine_id` always carries the same value as `id`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "car")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub engine_id: Uuid,
    pub name: String,
    pub year: i32,
    pub brand: String,
    pub fuel_type: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation { fn def(&self) -> RelationDef { panic!("no relations") } }

impl ActiveModelBehavior for ActiveModel {}

/// Insert a car under a caller-supplied id. Column limits are left to the
/// database and surface as `ModelError::Db`.
pub async fn create(
    db: &DatabaseConnection,
    id: Uuid,
    name: &str,
    year: i32,
    brand: &str,
    fuel_type: &str,
) -> Result<Model, errors::ModelError> {
    let am = ActiveModel {
        id: Set(id),
        engine_id: Set(id),
        name: Set(name.to_string()),
        year: Set(year),
        brand: Set(brand.to_string()),
        fuel_type: Set(fuel_type.to_string()),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn find(db: &DatabaseConnection, id: Uuid) -> Result<Option<Model>, errors::ModelError> {
    Entity::find_by_id(id).one(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Exact brand match, ordered by name then id so listings are stable.
pub async fn find_by_brand(db: &DatabaseConnection, brand: &str) -> Result<Vec<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::Brand.eq(brand))
        .order_by_asc(Column::Name)
        .order_by_asc(Column::Id)
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Overwrite the descriptive columns. Returns the number of rows touched.
pub async fn update_details(
    db: &DatabaseConnection,
    id: Uuid,
    name: &str,
    year: i32,
    brand: &str,
    fuel_type: &str,
) -> Result<u64, errors::ModelError> {
    let res = Entity::update_many()
        .col_expr(Column::Name, Expr::value(name.to_string()))
        .col_expr(Column::Year, Expr::value(year))
        .col_expr(Column::Brand, Expr::value(brand.to_string()))
        .col_expr(Column::FuelType, Expr::value(fuel_type.to_string()))
        .filter(Column::Id.eq(id))
        .exec(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(res.rows_affected)
}

pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<u64, errors::ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(res.rows_affected)
}
