use common::types::CategoryRecord;
use models::category;
use sea_orm::DatabaseConnection;
use tracing::info;

use crate::errors::ServiceError;

fn to_record(m: category::Model) -> CategoryRecord {
    CategoryRecord { id: m.id, name: m.name }
}

/// Create a category. A name already in use is a [`ServiceError::Conflict`].
pub async fn create_category(db: &DatabaseConnection, name: &str) -> Result<i32, ServiceError> {
    let created = category::create(db, name).await?;
    info!(category_id = created.id, name = %created.name, "category_created");
    Ok(created.id)
}

pub async fn list_categories(db: &DatabaseConnection) -> Result<Vec<CategoryRecord>, ServiceError> {
    Ok(category::list(db).await?.into_iter().map(to_record).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn create_then_list() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let a = create_category(&db, "Villa").await?;
        let b = create_category(&db, "  Studio ").await?;
        assert_eq!(b, a + 1);

        let all = list_categories(&db).await?;
        let names: Vec<_> = all.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Villa", "Studio"]);
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_name_conflicts() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        create_category(&db, "Villa").await?;
        let err = create_category(&db, "Villa").await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)), "got {err:?}");
        Ok(())
    }

    #[tokio::test]
    async fn empty_name_is_invalid() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let err = create_category(&db, "   ").await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        Ok(())
    }
}
