use std::sync::Arc;

use catalog::{College, DocumentId, NewCollege};
use chrono::Utc;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use server::{
    app, config::Config, memory::MemoryStore, services::colleges::insert_college,
    state::AppState,
};
use tokio::net::TcpListener;

struct TestApp {
    base: String,
    state: Arc<AppState>,
    http: Client,
}

impl TestApp {
    async fn spawn() -> Self {
        let state = AppState::with_store(Config::default(), Arc::new(MemoryStore::default()));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();

        let router = app(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            base: format!("http://{address}"),
            state,
            http: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    async fn college(&self, name: &str) -> College {
        let college = NewCollege {
            name: Some(name.to_string()),
            image: Some(format!("https://img/{name}.jpg")),
            rating: Some(4.2),
            admission_date: Some("Spring 2025".into()),
            events: vec!["Science Fair".into()],
            research_count: Some(45),
            sports: vec!["Chess".into()],
            gallery: vec![format!("https://img/{name}/1.jpg")],
        }
        .into_college(Utc::now())
        .unwrap();

        insert_college(self.state.store.as_ref(), &college)
            .await
            .unwrap();
        college
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let response = self.http.get(self.url(path)).send().await.unwrap();
        let status = response.status();
        (status, response.json().await.unwrap())
    }

    async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let response = self.http.post(self.url(path)).json(&body).send().await.unwrap();
        let status = response.status();
        (status, response.json().await.unwrap())
    }

    async fn patch(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let response = self
            .http
            .patch(self.url(path))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = response.status();
        (status, response.json().await.unwrap())
    }
}

#[tokio::test]
async fn test_health_and_banner() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "connected" }));

    let banner = app.http.get(app.url("/")).send().await.unwrap();
    assert_eq!(banner.text().await.unwrap(), "College Booking API is running");
}

#[tokio::test]
async fn test_colleges() {
    let app = TestApp::spawn().await;
    let college = app.college("Science Academy").await;

    let (status, body) = app.get("/api/colleges").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["_id"], json!(college.id.to_string()));
    assert_eq!(body[0]["researchCount"], json!(45));

    let (status, body) = app.get(&format!("/api/colleges/{}", college.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], json!("Science Academy"));

    let (status, body) = app.get(&format!("/api/colleges/{}", DocumentId::new())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], json!("College not found"));

    let (status, _) = app.get("/api/colleges/12345").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_review_scenarios() {
    let app = TestApp::spawn().await;
    let college = app.college("Tech Institute").await;

    let (status, body) = app
        .post(
            "/api/reviews",
            json!({ "collegeId": college.id, "userEmail": "a@b.com", "rating": 6, "comment": "x" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("Rating must be between 1 and 5"));

    let (_, reviews) = app.get("/api/reviews").await;
    assert!(reviews.as_array().unwrap().is_empty());

    app.post(
        "/api/reviews",
        json!({ "collegeId": college.id, "userEmail": "old@b.com", "rating": 3, "comment": "Fine" }),
    )
    .await;

    let (status, created) = app
        .post(
            "/api/reviews",
            json!({ "collegeId": college.id, "userEmail": "a@b.com", "rating": 5, "comment": "Great!" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, reviews) = app.get("/api/reviews").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reviews.as_array().unwrap().len(), 2);
    assert_eq!(reviews[0]["_id"], created["_id"]);
    assert_eq!(reviews[0]["collegeId"]["name"], json!("Tech Institute"));
    assert!(reviews[0]["collegeId"].get("gallery").is_none());
}

#[tokio::test]
async fn test_review_aggregates_schema_errors() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .post("/api/reviews", json!({ "userEmail": "a@b.com", "comment": "   " }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        json!("College ID is required, Rating is required, Comment is required")
    );
}

#[tokio::test]
async fn test_malformed_body() {
    let app = TestApp::spawn().await;

    let response = app
        .http
        .post(app.url("/api/reviews"))
        .header("content-type", "application/json")
        .body("{\"rating\": ")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (status, body) = app
        .post("/api/reviews", json!({ "rating": "five" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("Malformed payload"));
}

#[tokio::test]
async fn test_admission_round_trip() {
    let app = TestApp::spawn().await;
    let college = app.college("Medical University").await;

    let (status, created) = app
        .post(
            "/api/admissions",
            json!({
                "candidateName": "Ann Lee",
                "subject": "Biology",
                "email": "Ann@Example.com",
                "phone": "555-0100",
                "address": "1 Main St",
                "dob": "2004-02-01",
                "image": "https://img/ann.jpg",
                "collegeId": college.id,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["email"], json!("ann@example.com"));
    assert!(created["createdAt"].is_string());

    let (status, admissions) = app.get("/api/admissions/ann@example.com").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(admissions[0]["_id"], created["_id"]);
    assert_eq!(admissions[0]["collegeId"]["name"], json!("Medical University"));
    assert_eq!(admissions[0]["collegeId"]["sports"], json!(["Chess"]));

    let (status, none) = app.get("/api/admissions/nobody@example.com").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(none, json!([]));
}

#[tokio::test]
async fn test_admission_missing_fields() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .post("/api/admissions", json!({ "candidateName": "Ann" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["message"].as_str().unwrap();
    assert!(message.starts_with("Subject is required, Email is required"));
    assert!(message.ends_with("College ID is required"));
}

#[tokio::test]
async fn test_user_upsert_scenario() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get("/api/users/new@x.com").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], json!("User not found"));

    let (status, created) = app
        .patch("/api/users/new@x.com", json!({ "name": "Ann" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["name"], json!("Ann"));
    assert_eq!(created["email"], json!("new@x.com"));
    assert_eq!(created["university"], json!("Not specified"));
    assert_eq!(created["address"], json!("Not specified"));

    let (status, fetched) = app.get("/api/users/NEW@x.com").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["_id"], created["_id"]);

    let (status, body) = app
        .patch("/api/users/new@x.com", json!({ "email": "moved@x.com" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("Email cannot be changed"));
}

#[tokio::test]
async fn test_papers() {
    let app = TestApp::spawn().await;
    let engineering = app.college("Engineering College").await;
    let science = app.college("Science Academy").await;

    for (college, title, category, date) in [
        (&engineering, "Legged locomotion", "Robotics", "2023-04-01"),
        (&science, "Soft grippers", "Robotics", "2024-09-15"),
        (&science, "Exoplanet survey", "Astronomy", "2025-01-20"),
    ] {
        let (status, _) = app
            .post(
                "/api/papers",
                json!({
                    "collegeId": college.id,
                    "title": title,
                    "authors": ["R. Daneel"],
                    "link": format!("https://papers/{title}"),
                    "category": category,
                    "publishDate": date,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, robotics) = app.get("/api/papers?category=Robotics").await;
    assert_eq!(status, StatusCode::OK);
    let robotics = robotics.as_array().unwrap();
    assert_eq!(robotics.len(), 2);
    assert_eq!(robotics[0]["title"], json!("Soft grippers"));
    assert_eq!(robotics[1]["title"], json!("Legged locomotion"));
    assert_eq!(robotics[0]["collegeId"]["name"], json!("Science Academy"));
    assert_eq!(robotics[0]["citations"], json!(0));

    let (_, by_college) = app
        .get(&format!("/api/papers/college/{}", science.id))
        .await;
    let by_college = by_college.as_array().unwrap();
    assert_eq!(by_college.len(), 2);
    assert_eq!(by_college[0]["collegeId"], json!(science.id.to_string()));

    let paper_id = by_college[0]["_id"].as_str().unwrap().to_string();
    let (status, paper) = app.get(&format!("/api/papers/{paper_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(paper["collegeId"]["events"], json!(["Science Fair"]));

    let (status, _) = app.get(&format!("/api/papers/{}", DocumentId::new())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.post("/api/papers", json!({ "title": "Orphan" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        json!("College ID is required, Paper link is required, Category is required")
    );
}
