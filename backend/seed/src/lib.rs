//! # Catalog Seeding
//!
//! Admin-side loader for the read-only collections.
//!
//! ## Seed File
//! - `colleges`: college records as stored, minus ids and timestamps
//! - `papers`: research papers, each naming its college through `college`
//!
//! ## Steps
//! 1. Validate every college up front, a bad record aborts before anything is cleared.
//!
//! 2. Clear colleges and papers. Reviews are cleared too unless asked to keep them,
//!    so a fresh catalog starts with user reviews only.
//!
//! 3. Insert colleges, remembering the generated id under the college's name.
//!
//! 4. Insert papers, resolving `college` to that id. Unknown names are reported and skipped.
//!
//! ## Notes
//! - Admissions and profiles are left alone. Admissions pointing at a cleared
//!   college read back with a `null` college.
//!
//! - `researchCount` is taken from the seed file as is, it is not counted from `papers`.
use std::collections::HashMap;

use anyhow::Context;
use catalog::{College, DocumentId};
use chrono::Utc;
use server::{
    database::{Collection, DocumentStore},
    services::{colleges::insert_college, papers::create_paper},
};

pub mod models;
pub mod utils;

use models::{SeedFile, SeedPaper, SeedReport};
use utils::{college_key, progress_bar};

pub const DEFAULT_SEED_PATH: &str = "data/seed.json";

pub async fn load_catalog(
    store: &dyn DocumentStore,
    seed: SeedFile,
    keep_reviews: bool,
) -> anyhow::Result<SeedReport> {
    let colleges = seed
        .colleges
        .into_iter()
        .enumerate()
        .map(|(index, college)| {
            college
                .into_college(Utc::now())
                .with_context(|| format!("Invalid college at index {index}"))
        })
        .collect::<anyhow::Result<Vec<College>>>()?;

    println!("Loaded Colleges: {}", colleges.len());
    println!("Loaded Papers: {}\n", seed.papers.len());

    store.clear(Collection::Colleges).await?;
    store.clear(Collection::Papers).await?;
    println!("Cleared existing colleges and papers");

    if !keep_reviews {
        store.clear(Collection::Reviews).await?;
        println!("Cleared existing reviews");
    }

    let pb = progress_bar(colleges.len() + seed.papers.len());
    let mut report = SeedReport::default();
    let mut ids: HashMap<String, DocumentId> = HashMap::new();

    for college in colleges {
        pb.set_message(format!("College {}", college.name));

        insert_college(store, &college).await?;
        ids.insert(college_key(&college.name), college.id);

        #[cfg(feature = "verbose")]
        pb.println(format!("New college! {} ({})", college.name, college.id));

        report.colleges += 1;
        pb.inc(1);
    }

    for SeedPaper { college, mut paper } in seed.papers {
        let Some(id) = ids.get(&college_key(&college)) else {
            pb.println(format!("Unknown college {college:?}, skipping paper"));
            report.skipped.push(paper.title.unwrap_or(college));
            pb.inc(1);
            continue;
        };

        paper.college_id = Some(id.to_string());
        let title = paper.title.clone().unwrap_or_default();
        pb.set_message(format!("Paper {title}"));

        create_paper(store, paper)
            .await
            .with_context(|| format!("Failed to insert paper {title:?}"))?;

        report.papers += 1;
        pb.inc(1);
    }

    pb.finish_with_message("Done");

    Ok(report)
}
