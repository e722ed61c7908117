use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use sea_orm::sea_query::Expr;
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::errors;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "engine")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub displacement: i64,
    pub cylinders: i64,
    pub range: i64,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation { fn def(&self) -> RelationDef { panic!("no relations") } }

impl ActiveModelBehavior for ActiveModel {}

/// Insert an engine under a freshly generated id.
pub async fn create(db: &DatabaseConnection, displacement: i64, cylinders: i64, range: i64) -> Result<Model, errors::ModelError> {
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        displacement: Set(displacement),
        cylinders: Set(cylinders),
        range: Set(range),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn find(db: &DatabaseConnection, id: Uuid) -> Result<Option<Model>, errors::ModelError> {
    Entity::find_by_id(id).one(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Overwrite the numeric columns. Returns the number of rows touched.
pub async fn update_specs(db: &DatabaseConnection, id: Uuid, displacement: i64, cylinders: i64, range: i64) -> Result<u64, errors::ModelError> {
    let res = Entity::update_many()
        .col_expr(Column::Displacement, Expr::value(displacement))
        .col_expr(Column::Cylinders, Expr::value(cylinders))
        .col_expr(Column::Range, Expr::value(range))
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
