use catalog::{DetailedPaper, NewPaper, PaperFilter, PopulatedPaper, ResearchPaper};
use chrono::Utc;
use tracing::info;

use crate::{
    database::{Collection, DocumentStore, find_all, find_one, save},
    error::AppError,
    services::colleges::{college_index, ensure_college, find_college},
    utils::parse_id,
};

pub async fn create_paper(
    store: &dyn DocumentStore,
    payload: NewPaper,
) -> Result<ResearchPaper, AppError> {
    let paper = payload.into_paper(Utc::now())?;
    ensure_college(store, paper.college_id).await?;

    save(store, Collection::Papers, &paper.id.to_string(), &paper).await?;
    info!("Paper {} filed under {} for college {}", paper.id, paper.category, paper.college_id);

    Ok(paper)
}

fn newest_first(papers: &mut [ResearchPaper]) {
    papers.sort_by(|a, b| b.publish_date.cmp(&a.publish_date));
}

/// Both filters apply together when given.
pub async fn list_papers(
    store: &dyn DocumentStore,
    filter: &PaperFilter,
) -> Result<Vec<PopulatedPaper>, AppError> {
    let college = filter
        .college()
        .map_err(|_| AppError::BadRequest("Invalid college id".to_string()))?;
    let category = filter.category();

    let mut papers: Vec<ResearchPaper> = find_all(store, Collection::Papers).await?;
    papers.retain(|paper| {
        category.is_none_or(|category| paper.category == category)
            && college.is_none_or(|college| paper.college_id == college)
    });
    newest_first(&mut papers);

    let colleges = college_index(store).await?;

    Ok(papers
        .into_iter()
        .map(|paper| {
            let summary = colleges.get(&paper.college_id).map(|c| c.summary());
            paper.populate(summary)
        })
        .collect())
}

/// Unlike [`list_papers`], `collegeId` stays a raw id here.
pub async fn list_papers_by_college(
    store: &dyn DocumentStore,
    raw_college_id: &str,
) -> Result<Vec<ResearchPaper>, AppError> {
    let college_id = parse_id(raw_college_id, "college")?;

    let mut papers: Vec<ResearchPaper> = find_all(store, Collection::Papers).await?;
    papers.retain(|paper| paper.college_id == college_id);
    newest_first(&mut papers);

    Ok(papers)
}

pub async fn get_paper(store: &dyn DocumentStore, raw_id: &str) -> Result<DetailedPaper, AppError> {
    let id = parse_id(raw_id, "paper")?;

    let paper: ResearchPaper = find_one(store, Collection::Papers, &id.to_string())
        .await?
        .ok_or(AppError::NotFound("Paper not found"))?;
    let detail = find_college(store, paper.college_id)
        .await?
        .map(|college| college.detail());

    Ok(paper.populate(detail))
}
