use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use catalog::{
    Admission, College, DetailedPaper, NewAdmission, NewPaper, NewReview, PaperFilter,
    PopulatedAdmission, PopulatedPaper, PopulatedReview, ResearchPaper, Review, User, UserUpdate,
};
use serde_json::json;

use crate::{
    error::AppError,
    services::{admissions, colleges, papers, reviews, users},
    state::AppState,
    utils::payload,
};

type Shared = State<Arc<AppState>>;

pub async fn root_handler() -> impl IntoResponse {
    (StatusCode::OK, "College Booking API is running")
}

pub async fn health_handler(State(state): Shared) -> impl IntoResponse {
    let status = if state.store.ping().await {
        "connected"
    } else {
        "disconnected"
    };

    Json(json!({ "status": status }))
}

pub async fn colleges_handler(State(state): Shared) -> Result<Json<Vec<College>>, AppError> {
    Ok(Json(colleges::list_colleges(state.store.as_ref()).await?))
}

pub async fn college_handler(
    State(state): Shared,
    Path(id): Path<String>,
) -> Result<Json<College>, AppError> {
    Ok(Json(colleges::get_college(state.store.as_ref(), &id).await?))
}

pub async fn create_admission_handler(
    State(state): Shared,
    body: Result<Json<NewAdmission>, JsonRejection>,
) -> Result<(StatusCode, Json<Admission>), AppError> {
    let admission = admissions::create_admission(state.store.as_ref(), payload(body)?).await?;

    Ok((StatusCode::CREATED, Json(admission)))
}

pub async fn admissions_handler(
    State(state): Shared,
    Path(email): Path<String>,
) -> Result<Json<Vec<PopulatedAdmission>>, AppError> {
    Ok(Json(
        admissions::list_admissions_by_email(state.store.as_ref(), &email).await?,
    ))
}

pub async fn create_review_handler(
    State(state): Shared,
    body: Result<Json<NewReview>, JsonRejection>,
) -> Result<(StatusCode, Json<Review>), AppError> {
    let review = reviews::create_review(state.store.as_ref(), payload(body)?).await?;

    Ok((StatusCode::CREATED, Json(review)))
}

pub async fn reviews_handler(State(state): Shared) -> Result<Json<Vec<PopulatedReview>>, AppError> {
    Ok(Json(reviews::list_reviews(state.store.as_ref()).await?))
}

pub async fn create_paper_handler(
    State(state): Shared,
    body: Result<Json<NewPaper>, JsonRejection>,
) -> Result<(StatusCode, Json<ResearchPaper>), AppError> {
    let paper = papers::create_paper(state.store.as_ref(), payload(body)?).await?;

    Ok((StatusCode::CREATED, Json(paper)))
}

pub async fn papers_handler(
    State(state): Shared,
    Query(filter): Query<PaperFilter>,
) -> Result<Json<Vec<PopulatedPaper>>, AppError> {
    Ok(Json(papers::list_papers(state.store.as_ref(), &filter).await?))
}

pub async fn college_papers_handler(
    State(state): Shared,
    Path(college_id): Path<String>,
) -> Result<Json<Vec<ResearchPaper>>, AppError> {
    Ok(Json(
        papers::list_papers_by_college(state.store.as_ref(), &college_id).await?,
    ))
}

pub async fn paper_handler(
    State(state): Shared,
    Path(id): Path<String>,
) -> Result<Json<DetailedPaper>, AppError> {
    Ok(Json(papers::get_paper(state.store.as_ref(), &id).await?))
}

pub async fn user_handler(
    State(state): Shared,
    Path(email): Path<String>,
) -> Result<Json<User>, AppError> {
    Ok(Json(users::get_user(state.store.as_ref(), &email).await?))
}

pub async fn update_user_handler(
    State(state): Shared,
    Path(email): Path<String>,
    body: Result<Json<UserUpdate>, JsonRejection>,
) -> Result<Json<User>, AppError> {
    let update = payload(body)?;

    Ok(Json(
        users::upsert_user(state.store.as_ref(), &email, update).await?,
    ))
}
