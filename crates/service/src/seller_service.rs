use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter, Set,
};
use tracing::info;

use crate::errors::ServiceError;
use models::{book, seller};

/// A seller together with its eagerly loaded books.
pub type SellerWithBooks = (seller::Model, Vec<book::Model>);

/// Create a seller. Duplicate email yields `Conflict`; the unique index
/// covers the check-then-insert race.
pub async fn create_seller(
    db: &DatabaseConnection,
    first_name: &str,
    last_name: &str,
    email: &str,
) -> Result<seller::Model, ServiceError> {
    let existing = seller::Entity::find()
        .filter(seller::Column::Email.eq(email))
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    if existing.is_some() {
        return Err(ServiceError::Conflict("Seller with this email already exists".into()));
    }

    let created = seller::create(db, first_name, last_name, email).await?;
    info!(id = created.id, "created seller");
    Ok(created)
}

/// List all sellers, each with its books.
pub async fn list_sellers(db: &DatabaseConnection) -> Result<Vec<SellerWithBooks>, ServiceError> {
    let sellers = seller::Entity::find()
        .find_with_related(book::Entity)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(sellers)
}

/// Get a seller by id with its books, `Ok(None)` when absent.
pub async fn get_seller(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<SellerWithBooks>, ServiceError> {
    let Some(found) = seller::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
    else {
        return Ok(None);
    };
    let books = found
        .find_related(book::Entity)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(Some((found, books)))
}

/// Partial update: a field is applied only when supplied and non-empty;
/// everything else keeps its prior value.
pub async fn update_seller(
    db: &DatabaseConnection,
    id: i32,
    first_name: Option<&str>,
    last_name: Option<&str>,
    email: Option<&str>,
) -> Result<SellerWithBooks, ServiceError> {
    let found = seller::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("seller"))?;

    let mut am: seller::ActiveModel = found.into();
    if let Some(v) = first_name.filter(|v| !v.is_empty()) {
        seller::validate_name(v, "first_name")?;
        am.first_name = Set(v.to_string());
    }
    if let Some(v) = last_name.filter(|v| !v.is_empty()) {
        seller::validate_name(v, "last_name")?;
        am.last_name = Set(v.to_string());
    }
    if let Some(v) = email.filter(|v| !v.is_empty()) {
        seller::validate_email(v)?;
        am.email = Set(v.to_string());
    }
    am.updated_at = Set(Utc::now().into());

    let updated = am.update(db).await.map_err(|e| ServiceError::from(seller::classify_insert_err(e)))?;
    let books = updated
        .find_related(book::Entity)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok((updated, books))
}

/// Delete a seller; the FK cascade removes its books. Returns `Ok(false)`
/// when the id is absent.
pub async fn delete_seller(db: &DatabaseConnection, id: i32) -> Result<bool, ServiceError> {
    let res = seller::Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    if res.rows_affected > 0 {
        info!(id, "deleted seller");
    }
    Ok(res.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book_service;
    use crate::test_support::get_db;
    use uuid::Uuid;

    fn unique_email() -> String {
        format!("svc_{}@example.com", Uuid::new_v4())
    }

    #[tokio::test]
    async fn seller_crud() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await? else { return Ok(()) };

        let email = unique_email();
        let s = create_seller(&db, "Ivan", "Petrov", &email).await?;
        assert_eq!(s.email, email);

        let (found, books) = get_seller(&db, s.id).await?.unwrap();
        assert_eq!(found.id, s.id);
        assert!(books.is_empty());

        let deleted = delete_seller(&db, s.id).await?;
        assert!(deleted);
        assert!(get_seller(&db, s.id).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await? else { return Ok(()) };

        let email = unique_email();
        let s = create_seller(&db, "Anna", "Smirnova", &email).await?;
        let second = create_seller(&db, "Other", "Person", &email).await;
        assert!(matches!(second, Err(ServiceError::Conflict(_))));

        delete_seller(&db, s.id).await?;
        Ok(())
    }

    #[tokio::test]
    async fn partial_update_keeps_unsupplied_fields() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await? else { return Ok(()) };

        let email = unique_email();
        let s = create_seller(&db, "Ivan", "Petrov", &email).await?;

        let (updated, _) = update_seller(&db, s.id, Some("Pyotr"), None, None).await?;
        assert_eq!(updated.first_name, "Pyotr");
        assert_eq!(updated.last_name, "Petrov");
        assert_eq!(updated.email, email);

        // Empty strings count as not supplied
        let (updated, _) = update_seller(&db, s.id, Some(""), Some(""), Some("")).await?;
        assert_eq!(updated.first_name, "Pyotr");
        assert_eq!(updated.email, email);

        delete_seller(&db, s.id).await?;
        Ok(())
    }

    #[tokio::test]
    async fn update_missing_seller_is_not_found() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await? else { return Ok(()) };

        let res = update_seller(&db, i32::MAX, Some("X"), None, None).await;
        assert!(matches!(res, Err(ServiceError::NotFound(_))));

        assert!(!delete_seller(&db, i32::MAX).await?);
        Ok(())
    }

    #[tokio::test]
    async fn delete_cascades_to_books() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await? else { return Ok(()) };

        let s = create_seller(&db, "Lev", "Tolstoy", &unique_email()).await?;
        let b1 = book_service::create_book(&db, "Mziri", "Lermontov", 2021, 104, Some(s.id)).await?;
        let b2 =
            book_service::create_book(&db, "Fathers and Sons", "Turgenev", 2022, 200, Some(s.id))
                .await?;

        let (_, books) = get_seller(&db, s.id).await?.unwrap();
        assert_eq!(books.len(), 2);

        delete_seller(&db, s.id).await?;
        assert!(book_service::get_book(&db, b1.id).await?.is_none());
        assert!(book_service::get_book(&db, b2.id).await?.is_none());
        Ok(())
    }
}
