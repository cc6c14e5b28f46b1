//! # Payloads
//!
//! Request bodies as they arrive over the wire. Every field is optional here so
//! that a missing field is reported as a validation message instead of a parse
//! failure. The `into_*` constructors turn a payload into a stored document.
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    id::{DocumentId, InvalidId},
    models::{Admission, College, ResearchPaper, Review, User},
    validation::{
        COMMENT_MAX_CHARS, REVIEW_RATING_RANGE, ValidationError, Validator, comment_length,
        normalize_email, trimmed,
    },
};

pub const DEFAULT_USER_NAME: &str = "User";
pub const NOT_SPECIFIED: &str = "Not specified";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewAdmission {
    pub candidate_name: Option<String>,
    pub subject: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub dob: Option<String>,
    pub image: Option<String>,
    pub college_id: Option<String>,
}

impl NewAdmission {
    pub fn into_admission(self, now: DateTime<Utc>) -> Result<Admission, ValidationError> {
        let mut v = Validator::default();

        let candidate_name = v.required(self.candidate_name, "Candidate name is required");
        let subject = v.required(self.subject, "Subject is required");
        let email = normalize_email(&v.required(self.email, "Email is required"));
        let phone = v.required(self.phone, "Phone number is required");
        let address = v.required(self.address, "Address is required");
        let dob = v.required(self.dob, "Date of birth is required");
        let image = v.required(self.image, "Candidate image is required");
        let college_id = v.college_id(self.college_id);

        let college_id = v.finish(college_id)?;

        Ok(Admission {
            id: DocumentId::new(),
            candidate_name,
            subject,
            email,
            phone,
            address,
            dob,
            image,
            college_id,
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewReview {
    pub college_id: Option<String>,
    pub user_email: Option<String>,
    pub rating: Option<i64>,
    pub comment: Option<String>,
}

impl NewReview {
    pub fn into_review(self, now: DateTime<Utc>) -> Result<Review, ValidationError> {
        // Range is checked ahead of the schema and reported on its own.
        if let Some(rating) = self.rating {
            if !(1..=5).contains(&rating) {
                return Err(ValidationError::single(REVIEW_RATING_RANGE));
            }
        }

        let mut v = Validator::default();

        let college_id = v.college_id(self.college_id);
        let user_email = normalize_email(&v.required(self.user_email, "User email is required"));
        let rating = v.present(
            self.rating.and_then(|r| u8::try_from(r).ok()),
            "Rating is required",
        );
        let comment = v.required(self.comment, "Comment is required");
        v.check(
            comment_length(&comment) <= COMMENT_MAX_CHARS,
            "Comment cannot exceed 500 characters",
        );

        let (college_id, rating) = v.finish(college_id.zip(rating))?;

        Ok(Review {
            id: DocumentId::new(),
            college_id,
            user_email,
            rating,
            comment,
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewPaper {
    pub college_id: Option<String>,
    pub title: Option<String>,
    pub authors: Option<Vec<String>>,
    #[serde(rename = "abstract")]
    pub summary: Option<String>,
    pub link: Option<String>,
    pub category: Option<String>,
    /// RFC 3339 timestamp or `YYYY-MM-DD`.
    pub publish_date: Option<String>,
    pub citations: Option<i64>,
}

impl NewPaper {
    pub fn into_paper(self, now: DateTime<Utc>) -> Result<ResearchPaper, ValidationError> {
        let mut v = Validator::default();

        let college_id = v.college_id(self.college_id);
        let title = v.required(self.title, "Paper title is required");
        let authors = self
            .authors
            .unwrap_or_default()
            .into_iter()
            .filter_map(|author| trimmed(Some(author)))
            .collect();
        let summary = trimmed(self.summary);
        let link = v.required(self.link, "Paper link is required");
        let category = v.required(self.category, "Category is required");

        let publish_date = match trimmed(self.publish_date) {
            None => Some(now),
            Some(raw) => v.present(parse_publish_date(&raw), "Publish date is invalid"),
        };
        let citations = v.present(
            u32::try_from(self.citations.unwrap_or(0)).ok(),
            "Citations cannot be negative",
        );

        let ((college_id, publish_date), citations) =
            v.finish(college_id.zip(publish_date).zip(citations))?;

        Ok(ResearchPaper {
            id: DocumentId::new(),
            college_id,
            title,
            authors,
            summary,
            link,
            category,
            publish_date,
            citations,
            created_at: now,
            updated_at: now,
        })
    }
}

pub fn parse_publish_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|date| date.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|date| date.and_utc())
        })
}

/// Seed-time college record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewCollege {
    pub name: Option<String>,
    pub image: Option<String>,
    pub rating: Option<f64>,
    pub admission_date: Option<String>,
    pub events: Vec<String>,
    pub research_count: Option<i64>,
    pub sports: Vec<String>,
    pub gallery: Vec<String>,
}

impl NewCollege {
    pub fn into_college(self, now: DateTime<Utc>) -> Result<College, ValidationError> {
        let mut v = Validator::default();

        let name = v.required(self.name, "College name is required");
        let image = v.required(self.image, "College image is required");
        let rating = self.rating.unwrap_or(0.0);
        v.check(
            (0.0..=5.0).contains(&rating),
            "Rating must be between 0 and 5",
        );
        let admission_date = v.required(self.admission_date, "Admission date is required");
        let research_count = v.present(
            u32::try_from(self.research_count.unwrap_or(0)).ok(),
            "Research count cannot be negative",
        );

        let research_count = v.finish(research_count)?;

        Ok(College {
            id: DocumentId::new(),
            name,
            image,
            rating,
            admission_date,
            events: trim_all(self.events),
            research_count,
            sports: trim_all(self.sports),
            gallery: self.gallery,
            created_at: now,
            updated_at: now,
        })
    }
}

fn trim_all(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .filter_map(|value| trimmed(Some(value)))
        .collect()
}

/// Partial profile write. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub university: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl UserUpdate {
    /// The profile key is fixed; a body email may only restate it.
    pub fn ensure_key(&self, key: &str) -> Result<(), ValidationError> {
        match &self.email {
            Some(email) if normalize_email(email) != key => {
                Err(ValidationError::single("Email cannot be changed"))
            }
            _ => Ok(()),
        }
    }

    pub fn create(self, key: String, now: DateTime<Utc>) -> User {
        User {
            id: DocumentId::new(),
            name: trimmed(self.name).unwrap_or_else(|| DEFAULT_USER_NAME.to_string()),
            email: key,
            university: trimmed(self.university).unwrap_or_else(|| NOT_SPECIFIED.to_string()),
            address: trimmed(self.address).unwrap_or_else(|| NOT_SPECIFIED.to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(self, user: &mut User, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            user.name = name.trim().to_string();
        }
        if let Some(university) = self.university {
            user.university = university.trim().to_string();
        }
        if let Some(address) = self.address {
            user.address = address.trim().to_string();
        }

        user.updated_at = now;
    }
}

/// Query string of the paper listing. Empty parameters count as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PaperFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub college: Option<String>,
}

impl PaperFilter {
    pub fn category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    pub fn college(&self) -> Result<Option<DocumentId>, InvalidId> {
        match self.college.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw.parse().map(Some),
        }
    }
}
