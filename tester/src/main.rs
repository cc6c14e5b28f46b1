//! Walks the public API once, the way a signed in student would.
use anyhow::{Context, bail};
use catalog::{NewReview, UserUpdate};
use clap::Parser;
use client::{ApiClient, ClientConfig};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// API root, `CAMPUS_API_URL` or localhost when omitted.
    #[arg(long)]
    base_url: Option<String>,

    /// Email used for the review and the profile.
    #[arg(long, default_value = "smoke@tester.dev")]
    email: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args = Args::parse();
    let config = match args.base_url {
        Some(base_url) => ClientConfig::new(base_url),
        None => ClientConfig::from_env(),
    };
    println!("Testing {}\n", config.base_url);

    let api = ApiClient::new(config)?;

    let health = api.health().await.context("health")?;
    println!("[ok] health: {}", health.status);

    let colleges = api.colleges().await.context("colleges")?;
    println!("[ok] colleges: {}", colleges.len());

    let Some(college) = colleges.first() else {
        bail!("No colleges to review, run the seed first");
    };

    let review = api
        .submit_review(&NewReview {
            college_id: Some(college.id.to_string()),
            user_email: Some(args.email.clone()),
            rating: Some(5),
            comment: Some("Smoke test review".into()),
        })
        .await
        .context("submit review")?;
    println!("[ok] review: {} for {}", review.id, college.name);

    let reviews = api.reviews().await.context("reviews")?;
    if !reviews.iter().any(|r| r.id == review.id) {
        bail!("Review {} missing from the listing", review.id);
    }
    println!("[ok] reviews: {}", reviews.len());

    let user = api
        .update_user(
            &args.email,
            &UserUpdate {
                name: Some("Smoke Tester".into()),
                university: Some(college.name.clone()),
                ..UserUpdate::default()
            },
        )
        .await
        .context("profile upsert")?;
    println!("[ok] profile upsert: {} at {}", user.email, user.university);

    match api.user(&args.email).await.context("profile fetch")? {
        Some(fetched) if fetched == user => println!("[ok] profile fetch: {}", fetched.name),
        Some(_) => bail!("Fetched profile differs from the upsert"),
        None => bail!("Profile {} not found after upsert", args.email),
    }

    Ok(())
}
