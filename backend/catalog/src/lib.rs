//! # Catalog
//!
//! Shared document model for the college booking platform.
//!
//! Both the API server and the typed client speak in these types, so the wire
//! format lives in exactly one place.
//!
//! ## Collections
//! - colleges: aggregate root, seeded by the admin CLI, read-only over the API
//! - admissions: one per application, queried by applicant email
//! - reviews: listed newest first
//! - users: profiles keyed by lower-cased email
//! - papers: research papers, filterable by category and college
//!
//! ## References
//! Admissions, reviews and papers point at a college through `collegeId`.
//! The reference is stored as a raw id and resolved at read time. Each entity
//! is generic over its `collegeId` slot so the raw and populated shapes share
//! one definition.
pub mod id;
pub mod models;
pub mod payloads;
pub mod validation;

pub use id::{DocumentId, InvalidId};
pub use models::{
    Admission, College, CollegeDetail, CollegeSummary, DetailedPaper, PopulatedAdmission,
    PopulatedPaper, PopulatedReview, ResearchPaper, Review, User,
};
pub use payloads::{NewAdmission, NewCollege, NewPaper, NewReview, PaperFilter, UserUpdate};
pub use validation::{ValidationError, normalize_email};
