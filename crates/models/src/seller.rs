use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, DbErr, Set, SqlErr};
use serde::{Deserialize, Serialize};

use crate::book;
use crate::errors;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "seller")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Book,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Book => Entity::has_many(book::Entity).into(),
        }
    }
}

impl Related<book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Book.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_email(email: &str) -> Result<(), errors::ModelError> {
    let trimmed = email.trim();
    if trimmed.is_empty() || trimmed.len() > 150 {
        return Err(errors::ModelError::Validation("email required (max 150 chars)".into()));
    }
    // Shape check only; the unique index is the duplicate guard
    let mut parts = trimmed.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(errors::ModelError::Validation("invalid email".into()));
    }
    Ok(())
}

pub fn validate_name(name: &str, field: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() || name.len() > 100 {
        return Err(errors::ModelError::Validation(format!("{} required (max 100 chars)", field)));
    }
    Ok(())
}

pub async fn create(
    db: &DatabaseConnection,
    first_name: &str,
    last_name: &str,
    email: &str,
) -> Result<Model, errors::ModelError> {
    validate_name(first_name, "first_name")?;
    validate_name(last_name, "last_name")?;
    validate_email(email)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        first_name: Set(first_name.to_string()),
        last_name: Set(last_name.to_string()),
        email: Set(email.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    am.insert(db).await.map_err(classify_insert_err)
}

/// The unique index on email is the duplicate guard of record; a violation
/// surfacing here means we lost a check-then-insert race.
pub fn classify_insert_err(e: DbErr) -> errors::ModelError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            errors::ModelError::Conflict("Seller with this email already exists".into())
        }
        _ => errors::ModelError::Db(e.to_string()),
    }
}
