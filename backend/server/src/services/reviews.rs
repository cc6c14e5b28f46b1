use catalog::{NewReview, PopulatedReview, Review};
use chrono::Utc;
use tracing::info;

use crate::{
    database::{Collection, DocumentStore, find_all, save},
    error::AppError,
    services::colleges::{college_index, ensure_college},
};

pub async fn create_review(
    store: &dyn DocumentStore,
    payload: NewReview,
) -> Result<Review, AppError> {
    let review = payload.into_review(Utc::now())?;
    ensure_college(store, review.college_id).await?;

    save(store, Collection::Reviews, &review.id.to_string(), &review).await?;
    info!("Review {} ({} stars) for college {}", review.id, review.rating, review.college_id);

    Ok(review)
}

/// Newest first, each with the reviewed college's name and image.
pub async fn list_reviews(store: &dyn DocumentStore) -> Result<Vec<PopulatedReview>, AppError> {
    let mut reviews: Vec<Review> = find_all(store, Collection::Reviews).await?;
    reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let colleges = college_index(store).await?;

    Ok(reviews
        .into_iter()
        .map(|review| {
            let summary = colleges.get(&review.college_id).map(|c| c.summary());
            review.populate(summary)
        })
        .collect())
}
