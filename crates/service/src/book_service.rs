use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use tracing::info;

use crate::errors::ServiceError;
use models::{book, seller};

async fn seller_exists(db: &DatabaseConnection, id: i32) -> Result<bool, ServiceError> {
    let found = seller::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(found.is_some())
}

/// Create a book. A supplied seller id must reference an existing seller,
/// otherwise `InvalidReference` naming that id.
pub async fn create_book(
    db: &DatabaseConnection,
    title: &str,
    author: &str,
    year: i32,
    pages: i32,
    seller_id: Option<i32>,
) -> Result<book::Model, ServiceError> {
    if let Some(sid) = seller_id {
        if !seller_exists(db, sid).await? {
            return Err(ServiceError::InvalidReference(sid));
        }
    }
    let created = book::create(db, title, author, year, pages, seller_id).await?;
    info!(id = created.id, seller_id = ?created.seller_id, "created book");
    Ok(created)
}

/// List all books; the owning seller reference is the seller_id column.
pub async fn list_books(db: &DatabaseConnection) -> Result<Vec<book::Model>, ServiceError> {
    book::Entity::find()
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Get a book by id, `Ok(None)` when absent.
pub async fn get_book(db: &DatabaseConnection, id: i32) -> Result<Option<book::Model>, ServiceError> {
    book::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Full replacement: title/author/year/pages are always overwritten; the
/// seller reference changes only when a new seller id is supplied, and that
/// seller must exist.
pub async fn update_book(
    db: &DatabaseConnection,
    id: i32,
    title: &str,
    author: &str,
    year: i32,
    pages: i32,
    new_seller_id: Option<i32>,
) -> Result<book::Model, ServiceError> {
    let found = book::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("book"))?;

    let mut am: book::ActiveModel = found.into();
    if let Some(sid) = new_seller_id {
        if !seller_exists(db, sid).await? {
            return Err(ServiceError::not_found("seller"));
        }
        am.seller_id = Set(Some(sid));
    }
    am.title = Set(title.to_string());
    am.author = Set(author.to_string());
    am.year = Set(year);
    am.pages = Set(pages);
    am.updated_at = Set(Utc::now().into());

    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(updated)
}

/// Delete a book. Returns `Ok(false)` when the id is absent.
pub async fn delete_book(db: &DatabaseConnection, id: i32) -> Result<bool, ServiceError> {
    let res = book::Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    if res.rows_affected > 0 {
        info!(id, "deleted book");
    }
    Ok(res.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seller_service;
    use crate::test_support::get_db;
    use uuid::Uuid;

    fn unique_email() -> String {
        format!("book_svc_{}@example.com", Uuid::new_v4())
    }

    #[tokio::test]
    async fn book_crud() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await? else { return Ok(()) };

        let s = seller_service::create_seller(&db, "Ivan", "Petrov", &unique_email()).await?;

        let b = create_book(&db, "Clean Architecture", "Robert Martin", 2025, 300, Some(s.id))
            .await?;
        assert!(b.id > 0);
        assert_eq!(b.pages, 300);

        let found = get_book(&db, b.id).await?.unwrap();
        assert_eq!(found.title, "Clean Architecture");
        assert_eq!(found.author, "Robert Martin");
        assert_eq!(found.year, 2025);
        assert_eq!(found.seller_id, Some(s.id));

        assert!(delete_book(&db, b.id).await?);
        assert!(get_book(&db, b.id).await?.is_none());

        seller_service::delete_seller(&db, s.id).await?;
        Ok(())
    }

    #[tokio::test]
    async fn create_with_missing_seller_is_invalid_reference() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await? else { return Ok(()) };

        let title = format!("Invalid Book {}", Uuid::new_v4());
        let res = create_book(&db, &title, "Unknown", 2025, 100, Some(i32::MAX)).await;
        match res {
            Err(ServiceError::InvalidReference(id)) => assert_eq!(id, i32::MAX),
            other => panic!("expected InvalidReference, got {:?}", other.map(|b| b.id)),
        }
        // Nothing persisted
        use sea_orm::{ColumnTrait, QueryFilter};
        let leftover = models::book::Entity::find()
            .filter(models::book::Column::Title.eq(title))
            .one(&db)
            .await?;
        assert!(leftover.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn update_replaces_all_fields() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await? else { return Ok(()) };

        let s = seller_service::create_seller(&db, "Anna", "Smirnova", &unique_email()).await?;
        let b = create_book(&db, "Eugeny Onegin", "Pushkin", 2021, 104, Some(s.id)).await?;

        let updated = update_book(&db, b.id, "Mziri", "Lermontov", 2027, 100, Some(s.id)).await?;
        assert_eq!(updated.title, "Mziri");
        assert_eq!(updated.author, "Lermontov");
        assert_eq!(updated.year, 2027);
        assert_eq!(updated.pages, 100);
        assert_eq!(updated.seller_id, Some(s.id));

        // Omitting the seller id still rewrites the other fields
        let updated = update_book(&db, b.id, "Onegin", "Pushkin", 2026, 105, None).await?;
        assert_eq!(updated.title, "Onegin");
        assert_eq!(updated.seller_id, Some(s.id));

        seller_service::delete_seller(&db, s.id).await?;
        Ok(())
    }

    #[tokio::test]
    async fn update_with_missing_seller_is_not_found() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await? else { return Ok(()) };

        let s = seller_service::create_seller(&db, "Olga", "Ivanova", &unique_email()).await?;
        let b = create_book(&db, "Some Title", "Some Author", 2022, 50, Some(s.id)).await?;

        let res = update_book(&db, b.id, "X", "Y", 2023, 60, Some(i32::MAX)).await;
        assert!(matches!(res, Err(ServiceError::NotFound(_))));

        // The failed update must not have touched the row
        let found = get_book(&db, b.id).await?.unwrap();
        assert_eq!(found.title, "Some Title");

        seller_service::delete_seller(&db, s.id).await?;
        Ok(())
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await? else { return Ok(()) };

        assert!(get_book(&db, i32::MAX).await?.is_none());
        assert!(!delete_book(&db, i32::MAX).await?);
        let res = update_book(&db, i32::MAX, "X", "Y", 2023, 60, None).await;
        assert!(matches!(res, Err(ServiceError::NotFound(_))));
        Ok(())
    }
}
