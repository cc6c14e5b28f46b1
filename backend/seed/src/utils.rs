use std::{fs, path::Path};

use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};

use crate::models::SeedFile;

pub fn load_seed(path: &Path) -> anyhow::Result<SeedFile> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read seed file {}", path.display()))?;

    parse_seed(&raw).with_context(|| format!("Malformed seed file {}", path.display()))
}

pub fn parse_seed(raw: &str) -> Result<SeedFile, serde_json::Error> {
    serde_json::from_str(raw)
}

/// Case and spacing insensitive key for matching papers to colleges by name.
pub fn college_key(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

pub fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);

    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
    ) {
        pb.set_style(style.progress_chars("=> "));
    }

    pb
}
