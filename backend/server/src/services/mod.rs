//! # Services
//!
//! One module per collection. Handlers stay thin and call into these, which
//! validate, resolve references, and sort.
//!
//! ## Population
//! - Admissions by email: full college
//! - Reviews and filtered papers: name and image only
//! - Paper by id: name, image, gallery, events, sports
//! - Papers by college: no population, raw `collegeId`
//!
//! A reference whose college is gone resolves to `null` rather than failing the read.
pub mod admissions;
pub mod colleges;
pub mod papers;
pub mod reviews;
pub mod users;
