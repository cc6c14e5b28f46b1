use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::DocumentId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct College {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub name: String,
    pub image: String,
    /// Between 0 and 5.
    pub rating: f64,
    pub admission_date: String,
    #[serde(default)]
    pub events: Vec<String>,
    /// Seeded value, not derived from the papers collection.
    pub research_count: u32,
    #[serde(default)]
    pub sports: Vec<String>,
    #[serde(default)]
    pub gallery: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Projection used by review and paper listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollegeSummary {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub name: String,
    pub image: String,
}

/// Projection used by the single paper view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollegeDetail {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub name: String,
    pub image: String,
    pub gallery: Vec<String>,
    pub events: Vec<String>,
    pub sports: Vec<String>,
}

impl College {
    pub fn summary(&self) -> CollegeSummary {
        CollegeSummary {
            id: self.id,
            name: self.name.clone(),
            image: self.image.clone(),
        }
    }

    pub fn detail(&self) -> CollegeDetail {
        CollegeDetail {
            id: self.id,
            name: self.name.clone(),
            image: self.image.clone(),
            gallery: self.gallery.clone(),
            events: self.events.clone(),
            sports: self.sports.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admission<C = DocumentId> {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub candidate_name: String,
    pub subject: String,
    /// Stored trimmed and lower-cased.
    pub email: String,
    pub phone: String,
    pub address: String,
    pub dob: String,
    pub image: String,
    pub college_id: C,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<C> Admission<C> {
    pub fn populate<D>(self, college: D) -> Admission<D> {
        Admission {
            id: self.id,
            candidate_name: self.candidate_name,
            subject: self.subject,
            email: self.email,
            phone: self.phone,
            address: self.address,
            dob: self.dob,
            image: self.image,
            college_id: college,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review<C = DocumentId> {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub college_id: C,
    pub user_email: String,
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<C> Review<C> {
    pub fn populate<D>(self, college: D) -> Review<D> {
        Review {
            id: self.id,
            college_id: college,
            user_email: self.user_email,
            rating: self.rating,
            comment: self.comment,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchPaper<C = DocumentId> {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub college_id: C,
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(rename = "abstract", default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub link: String,
    pub category: String,
    pub publish_date: DateTime<Utc>,
    pub citations: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<C> ResearchPaper<C> {
    pub fn populate<D>(self, college: D) -> ResearchPaper<D> {
        ResearchPaper {
            id: self.id,
            college_id: college,
            title: self.title,
            authors: self.authors,
            summary: self.summary,
            link: self.link,
            category: self.category,
            publish_date: self.publish_date,
            citations: self.citations,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Profile keyed by lower-cased email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    pub name: String,
    pub email: String,
    pub university: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A dangling reference populates to `None`, serialized as `null`.
pub type PopulatedAdmission = Admission<Option<College>>;
pub type PopulatedReview = Review<Option<CollegeSummary>>;
pub type PopulatedPaper = ResearchPaper<Option<CollegeSummary>>;
pub type DetailedPaper = ResearchPaper<Option<CollegeDetail>>;
