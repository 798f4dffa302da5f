use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::seller;

/// Default page count applied when a request omits it.
pub const DEFAULT_PAGES: i32 = 150;

/// Oldest publication year accepted at the request boundary.
pub const MIN_YEAR: i32 = 2020;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "book")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub author: String,
    pub year: i32,
    pub pages: i32,
    pub seller_id: Option<i32>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Seller,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Seller => Entity::belongs_to(seller::Entity)
                .from(Column::SellerId)
                .to(seller::Column::Id)
                .into(),
        }
    }
}

impl Related<seller::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Seller.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Business rule checked at the request boundary, not at the store layer;
/// rows written through other paths may carry older years.
pub fn validate_year(year: i32) -> Result<(), errors::ModelError> {
    if year < MIN_YEAR {
        return Err(errors::ModelError::Validation("Year is too old!".into()));
    }
    Ok(())
}

pub fn validate_title(title: &str) -> Result<(), errors::ModelError> {
    if title.trim().is_empty() || title.len() > 50 {
        return Err(errors::ModelError::Validation("title required (max 50 chars)".into()));
    }
    Ok(())
}

pub fn validate_author(author: &str) -> Result<(), errors::ModelError> {
    if author.trim().is_empty() || author.len() > 100 {
        return Err(errors::ModelError::Validation("author required (max 100 chars)".into()));
    }
    Ok(())
}

pub async fn create(
    db: &DatabaseConnection,
    title: &str,
    author: &str,
    year: i32,
    pages: i32,
    seller_id: Option<i32>,
) -> Result<Model, errors::ModelError> {
    validate_title(title)?;
    validate_author(author)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        title: Set(title.to_string()),
        author: Set(author.to_string()),
        year: Set(year),
        pages: Set(pages),
        seller_id: Set(seller_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
