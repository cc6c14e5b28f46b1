use catalog::{NewCollege, NewPaper};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub colleges: Vec<NewCollege>,
    #[serde(default)]
    pub papers: Vec<SeedPaper>,
}

/// A paper names its college instead of carrying an id, ids only exist once
/// the colleges are inserted.
#[derive(Deserialize)]
pub struct SeedPaper {
    pub college: String,
    #[serde(flatten)]
    pub paper: NewPaper,
}

#[derive(Debug, Default)]
pub struct SeedReport {
    pub colleges: usize,
    pub papers: usize,
    pub skipped: Vec<String>,
}
