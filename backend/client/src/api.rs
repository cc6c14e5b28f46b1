use std::sync::Arc;

use catalog::{
    Admission, College, DetailedPaper, NewAdmission, NewPaper, NewReview, PaperFilter,
    PopulatedAdmission, PopulatedPaper, PopulatedReview, ResearchPaper, Review, User, UserUpdate,
};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::{Deserialize, de::DeserializeOwned};
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::{
    config::ClientConfig,
    error::ClientError,
    token::{MemoryTokenStore, TokenStore},
};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Health {
    pub status: String,
}

impl Health {
    pub fn is_connected(&self) -> bool {
        self.status == "connected"
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Typed client for the booking API.
///
/// Every request carries the stored bearer token when there is one. Network
/// failures and 5xx responses are retried with backoff, anything else is
/// returned straight away.
pub struct ApiClient {
    http: Client,
    base: Url,
    config: ClientConfig,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        Self::with_tokens(config, Arc::new(MemoryTokenStore::default()))
    }

    pub fn with_tokens(
        config: ClientConfig,
        tokens: Arc<dyn TokenStore>,
    ) -> Result<Self, ClientError> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {e}", config.base_url)))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(config.base_url.clone()));
        }

        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http,
            base,
            config,
            tokens,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn tokens(&self) -> Arc<dyn TokenStore> {
        self.tokens.clone()
    }

    pub async fn health(&self) -> Result<Health, ClientError> {
        self.execute(|http| http.get(self.url(&["health"]))).await
    }

    pub async fn colleges(&self) -> Result<Vec<College>, ClientError> {
        self.execute(|http| http.get(self.url(&["api", "colleges"])))
            .await
    }

    pub async fn college(&self, id: &str) -> Result<College, ClientError> {
        self.execute(|http| http.get(self.url(&["api", "colleges", id])))
            .await
    }

    pub async fn submit_admission(&self, admission: &NewAdmission) -> Result<Admission, ClientError> {
        self.execute(|http| http.post(self.url(&["api", "admissions"])).json(admission))
            .await
    }

    pub async fn admissions(&self, email: &str) -> Result<Vec<PopulatedAdmission>, ClientError> {
        self.execute(|http| http.get(self.url(&["api", "admissions", email])))
            .await
    }

    pub async fn submit_review(&self, review: &NewReview) -> Result<Review, ClientError> {
        self.execute(|http| http.post(self.url(&["api", "reviews"])).json(review))
            .await
    }

    pub async fn reviews(&self) -> Result<Vec<PopulatedReview>, ClientError> {
        self.execute(|http| http.get(self.url(&["api", "reviews"])))
            .await
    }

    pub async fn papers(&self, filter: &PaperFilter) -> Result<Vec<PopulatedPaper>, ClientError> {
        self.execute(|http| http.get(self.url(&["api", "papers"])).query(filter))
            .await
    }

    pub async fn papers_by_college(&self, college_id: &str) -> Result<Vec<ResearchPaper>, ClientError> {
        self.execute(|http| http.get(self.url(&["api", "papers", "college", college_id])))
            .await
    }

    pub async fn paper(&self, id: &str) -> Result<DetailedPaper, ClientError> {
        self.execute(|http| http.get(self.url(&["api", "papers", id])))
            .await
    }

    pub async fn create_paper(&self, paper: &NewPaper) -> Result<ResearchPaper, ClientError> {
        self.execute(|http| http.post(self.url(&["api", "papers"])).json(paper))
            .await
    }

    /// `None` when the email has no profile yet.
    pub async fn user(&self, email: &str) -> Result<Option<User>, ClientError> {
        match self
            .execute(|http| http.get(self.url(&["api", "users", email])))
            .await
        {
            Ok(user) => Ok(Some(user)),
            Err(ClientError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn update_user(&self, email: &str, update: &UserUpdate) -> Result<User, ClientError> {
        self.execute(|http| http.patch(self.url(&["api", "users", email])).json(update))
            .await
    }

    /// Appends percent-encoded segments, so an email like `ann#1@x.com`
    /// stays one path segment.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }

        url
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        build: impl Fn(&Client) -> RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = self.send(build).await?;
        let body = response.bytes().await?;

        Ok(serde_json::from_slice(&body)?)
    }

    /// Builds and sends the request until it succeeds, fails for good, or runs
    /// out of retries. The builder is called once per attempt.
    async fn send(&self, build: impl Fn(&Client) -> RequestBuilder) -> Result<Response, ClientError> {
        let policy = self.config.retry;
        let mut attempt = 0;

        loop {
            let mut request = build(&self.http);
            if let Some(token) = self.tokens.load() {
                request = request.bearer_auth(token);
            }

            let cause = match request.send().await {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response)
                    if response.status().is_server_error() && attempt < policy.max_retries =>
                {
                    format!("status {}", response.status())
                }
                Ok(response) => return Err(failure(response).await),
                Err(e) if !e.is_builder() && attempt < policy.max_retries => e.to_string(),
                Err(e) => return Err(e.into()),
            };

            attempt += 1;
            let delay = policy.delay_for_attempt(attempt);
            warn!(
                "Request failed ({cause}), retry {attempt}/{} in {delay:?}",
                policy.max_retries
            );

            sleep(delay).await;
        }
    }
}

async fn failure(response: Response) -> ClientError {
    let status = response.status();
    let url = response.url().clone();
    let body = response.text().await.unwrap_or_default();

    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|body| body.message)
        .unwrap_or_else(|_| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        });

    if status == StatusCode::UNAUTHORIZED {
        // Sign-in redirect hooks in here.
        warn!("Unauthorized request to {url}, sign in again");
    } else {
        debug!("{status} from {url}: {message}");
    }

    ClientError::from_status(status, message)
}
