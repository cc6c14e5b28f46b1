use catalog::{Admission, NewAdmission, PopulatedAdmission, normalize_email};
use chrono::Utc;
use tracing::info;

use crate::{
    database::{Collection, DocumentStore, find_all, save},
    error::AppError,
    services::colleges::{college_index, ensure_college},
};

pub async fn create_admission(
    store: &dyn DocumentStore,
    payload: NewAdmission,
) -> Result<Admission, AppError> {
    let admission = payload.into_admission(Utc::now())?;
    ensure_college(store, admission.college_id).await?;

    save(
        store,
        Collection::Admissions,
        &admission.id.to_string(),
        &admission,
    )
    .await?;
    info!("Admission {} submitted for college {}", admission.id, admission.college_id);

    Ok(admission)
}

/// Oldest application first. No match is an empty list, not an error.
pub async fn list_admissions_by_email(
    store: &dyn DocumentStore,
    email: &str,
) -> Result<Vec<PopulatedAdmission>, AppError> {
    let email = normalize_email(email);

    let mut admissions: Vec<Admission> = find_all(store, Collection::Admissions).await?;
    admissions.retain(|admission| admission.email == email);
    if admissions.is_empty() {
        return Ok(Vec::new());
    }

    admissions.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    let colleges = college_index(store).await?;

    Ok(admissions
        .into_iter()
        .map(|admission| {
            let college = colleges.get(&admission.college_id).cloned();
            admission.populate(college)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use catalog::DocumentId;

    use super::*;
    use crate::{memory::MemoryStore, services::fixtures};

    fn application(email: &str, college_id: DocumentId) -> NewAdmission {
        NewAdmission {
            candidate_name: Some("Ann Lee".into()),
            subject: Some("Physics".into()),
            email: Some(email.into()),
            phone: Some("555-0100".into()),
            address: Some("1 Main St".into()),
            dob: Some("2004-02-01".into()),
            image: Some("https://img/ann.jpg".into()),
            college_id: Some(college_id.to_string()),
        }
    }

    #[tokio::test]
    async fn test_round_trip_populates_full_college() {
        let store = MemoryStore::default();
        let college = fixtures::college(&store, "Tech Institute").await;

        let created = create_admission(&store, application(" Ann@Example.com ", college.id))
            .await
            .unwrap();
        assert_eq!(created.email, "ann@example.com");

        let listed = list_admissions_by_email(&store, "ANN@example.com").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, created.id);
        assert_eq!(listed[0].college_id.as_ref(), Some(&college));
    }

    #[tokio::test]
    async fn test_only_matching_email() {
        let store = MemoryStore::default();
        let college = fixtures::college(&store, "Tech Institute").await;

        create_admission(&store, application("ann@example.com", college.id))
            .await
            .unwrap();
        create_admission(&store, application("bob@example.com", college.id))
            .await
            .unwrap();

        let listed = list_admissions_by_email(&store, "bob@example.com").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].email, "bob@example.com");

        assert!(list_admissions_by_email(&store, "nobody@example.com")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_rejects_unknown_college() {
        let store = MemoryStore::default();

        let error = create_admission(&store, application("ann@example.com", DocumentId::new()))
            .await
            .unwrap_err();
        assert_eq!(error.to_string(), "College not found");
        assert!(store.values(Collection::Admissions).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_fields() {
        let store = MemoryStore::default();

        let error = create_admission(&store, NewAdmission::default())
            .await
            .unwrap_err();
        match error {
            AppError::Validation(e) => assert_eq!(e.messages().len(), 8),
            other => panic!("unexpected error: {other}"),
        }
    }
}
