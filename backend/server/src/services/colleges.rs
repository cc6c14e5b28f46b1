use std::collections::HashMap;

use catalog::{College, DocumentId};
use tracing::debug;

use crate::{
    database::{Collection, DocumentStore, find_all, find_one, save},
    error::AppError,
    utils::parse_id,
};

/// Every college in insertion order.
pub async fn list_colleges(store: &dyn DocumentStore) -> Result<Vec<College>, AppError> {
    let mut colleges: Vec<College> = find_all(store, Collection::Colleges).await?;
    colleges.sort_by(|a, b| a.created_at.cmp(&b.created_at));

    Ok(colleges)
}

pub async fn get_college(store: &dyn DocumentStore, raw_id: &str) -> Result<College, AppError> {
    let id = parse_id(raw_id, "college")?;

    find_college(store, id)
        .await?
        .ok_or(AppError::NotFound("College not found"))
}

pub async fn insert_college(store: &dyn DocumentStore, college: &College) -> Result<(), AppError> {
    debug!("Inserting college {} ({})", college.name, college.id);
    save(store, Collection::Colleges, &college.id.to_string(), college).await?;

    Ok(())
}

pub(crate) async fn find_college(
    store: &dyn DocumentStore,
    id: DocumentId,
) -> Result<Option<College>, AppError> {
    Ok(find_one(store, Collection::Colleges, &id.to_string()).await?)
}

/// Creates may only point at colleges that exist.
pub(crate) async fn ensure_college(
    store: &dyn DocumentStore,
    id: DocumentId,
) -> Result<College, AppError> {
    find_college(store, id)
        .await?
        .ok_or_else(|| AppError::Validation(catalog::ValidationError::single("College not found")))
}

/// Loads every college once so a listing can resolve references without a
/// lookup per document.
pub(crate) async fn college_index(
    store: &dyn DocumentStore,
) -> Result<HashMap<DocumentId, College>, AppError> {
    let colleges: Vec<College> = find_all(store, Collection::Colleges).await?;

    Ok(colleges
        .into_iter()
        .map(|college| (college.id, college))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{memory::MemoryStore, services::fixtures};

    #[tokio::test]
    async fn test_list_in_insertion_order() {
        let store = MemoryStore::default();
        let first = fixtures::college(&store, "Tech Institute").await;
        let second = fixtures::college(&store, "Arts College").await;

        let ids: Vec<_> = list_colleges(&store)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[tokio::test]
    async fn test_get_college() {
        let store = MemoryStore::default();
        let college = fixtures::college(&store, "Tech Institute").await;

        let found = get_college(&store, &college.id.to_string()).await.unwrap();
        assert_eq!(found, college);

        let missing = get_college(&store, &DocumentId::new().to_string()).await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));

        let malformed = get_college(&store, "not-an-id").await;
        assert!(matches!(malformed, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_ensure_college() {
        let store = MemoryStore::default();
        let error = ensure_college(&store, DocumentId::new()).await.unwrap_err();
        assert_eq!(error.to_string(), "College not found");
        assert!(matches!(error, AppError::Validation(_)));
    }
}
