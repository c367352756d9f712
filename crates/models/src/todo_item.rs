use sea_orm::{
    entity::prelude::*,
    sea_query::{Expr, Func},
    ActiveModelTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "todo_item")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub description: String,
    pub is_completed: bool,
    pub version: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_description(d: &str) -> Result<(), errors::ModelError> {
    if d.is_empty() {
        return Err(errors::ModelError::Validation("Description is required".into()));
    }
    Ok(())
}

/// Build the filter condition shared by `list` and `exists`.
///
/// `description_ci` compares `lower(description)` against `lower(input)`, so both
/// sides fold under the same database rules.
pub fn condition(is_completed: Option<bool>, description_ci: Option<&str>) -> Condition {
    let mut cond = Condition::all();
    if let Some(done) = is_completed {
        cond = cond.add(Column::IsCompleted.eq(done));
    }
    if let Some(d) = description_ci {
        cond = cond.add(
            Expr::expr(Func::lower(Expr::col(Column::Description))).eq(Func::lower(Expr::val(d.to_string()))),
        );
    }
    cond
}

pub async fn list(
    db: &DatabaseConnection,
    is_completed: Option<bool>,
    description_ci: Option<&str>,
) -> Result<Vec<Model>, errors::ModelError> {
    let rows = Entity::find()
        .filter(condition(is_completed, description_ci))
        .all(db)
        .await?;
    Ok(rows)
}

pub async fn exists(
    db: &DatabaseConnection,
    is_completed: Option<bool>,
    description_ci: Option<&str>,
) -> Result<bool, errors::ModelError> {
    let found = Entity::find()
        .filter(condition(is_completed, description_ci))
        .one(db)
        .await?;
    Ok(found.is_some())
}

pub async fn find(db: &DatabaseConnection, id: Uuid) -> Result<Option<Model>, errors::ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

/// Insert a new row with the caller-generated id. New rows start at version 0.
pub async fn create(
    db: &DatabaseConnection,
    id: Uuid,
    description: &str,
    is_completed: bool,
) -> Result<Model, errors::ModelError> {
    validate_description(description)?;
    let am = ActiveModel {
        id: Set(id),
        description: Set(description.to_string()),
        is_completed: Set(is_completed),
        version: Set(0),
    };
    Ok(am.insert(db).await?)
}

/// Conditional write used for optimistic concurrency.
///
/// Always sets `is_completed` and bumps `version`; sets `description` only when
/// given. When `expected_version` is given the row must still carry it.
/// Returns the number of rows affected (0 means missing or stale).
pub async fn apply_update(
    db: &DatabaseConnection,
    id: Uuid,
    description: Option<&str>,
    is_completed: bool,
    expected_version: Option<i64>,
) -> Result<u64, errors::ModelError> {
    let mut update = Entity::update_many()
        .col_expr(Column::IsCompleted, Expr::value(is_completed))
        .col_expr(Column::Version, Expr::col(Column::Version).add(1i64))
        .filter(Column::Id.eq(id));
    if let Some(d) = description {
        update = update.col_expr(Column::Description, Expr::value(d.to_string()));
    }
    if let Some(v) = expected_version {
        update = update.filter(Column::Version.eq(v));
    }
    let res = update.exec(db).await?;
    Ok(res.rows_affected)
}
