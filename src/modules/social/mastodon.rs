use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use super::classify::{classify_priority, strip_html};
use super::models::{Engagement, SocialMediaPost};

#[derive(Debug, Error)]
pub enum SocialError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Mastodon API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Mastodon access token not configured")]
    NotConfigured,
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Debug, Deserialize)]
pub(super) struct Status {
    id: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    content: String,
    url: Option<String>,
    account: Account,
    #[serde(default)]
    favourites_count: i64,
    #[serde(default)]
    reblogs_count: i64,
    #[serde(default)]
    replies_count: i64,
}

#[derive(Debug, Deserialize)]
struct Account {
    acct: String,
    #[serde(default)]
    username: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    statuses: Vec<Status>,
}

impl Status {
    /// Normalize into a post; official flag from the configured account list
    pub(super) fn into_post(self, official_accounts: &[String]) -> SocialMediaPost {
        let content = strip_html(&self.content);
        let handle = if self.account.username.is_empty() {
            self.account.acct.clone()
        } else {
            self.account.username.clone()
        };
        let local_name = self
            .account
            .acct
            .split('@')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        let is_official = official_accounts.contains(&local_name);

        SocialMediaPost {
            id: self.id,
            platform: "mastodon".to_string(),
            username: handle,
            priority: classify_priority(&content),
            content,
            timestamp: self.created_at,
            disaster_id: None,
            engagement: Some(Engagement {
                likes: self.favourites_count,
                shares: self.reblogs_count,
                replies: self.replies_count,
            }),
            url: self.url,
            is_official,
        }
    }
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct MastodonClient {
    http: reqwest::Client,
    instance_url: String,
    access_token: Option<String>,
}

impl MastodonClient {
    pub fn new(
        instance_url: &str,
        access_token: Option<String>,
        timeout: Duration,
    ) -> reqwest::Result<Self> {
        Ok(Self {
            http: reqwest::Client::builder().timeout(timeout).build()?,
            instance_url: instance_url.trim_end_matches('/').to_string(),
            access_token,
        })
    }

    pub fn has_token(&self) -> bool {
        self.access_token.is_some()
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        let request = self.http.get(format!("{}{}", self.instance_url, path));
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn read<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, SocialError> {
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SocialError::Api { status, body });
        }
        Ok(response.json::<T>().await?)
    }

    /// Full-text status search (instances only return statuses to authenticated callers)
    pub(super) async fn search(&self, query: &str, limit: usize) -> Result<Vec<Status>, SocialError> {
        let path = format!(
            "/api/v2/search?q={}&type=statuses&resolve=false&limit={}",
            urlencoding::encode(query),
            limit
        );
        let response = self.get(&path).send().await?;
        Ok(Self::read::<SearchResponse>(response).await?.statuses)
    }

    pub(super) async fn hashtag_timeline(
        &self,
        hashtag: &str,
        limit: usize,
    ) -> Result<Vec<Status>, SocialError> {
        let tag = hashtag.trim_start_matches('#');
        let path = format!(
            "/api/v1/timelines/tag/{}?limit={}",
            urlencoding::encode(tag),
            limit
        );
        let response = self.get(&path).send().await?;
        Self::read(response).await
    }

    pub(super) async fn trending(&self, limit: usize) -> Result<Vec<Status>, SocialError> {
        let response = self
            .get(&format!("/api/v1/trends/statuses?limit={}", limit))
            .send()
            .await?;
        Self::read(response).await
    }

    pub(super) async fn post_status(&self, content: &str) -> Result<Status, SocialError> {
        let token = self.access_token.as_ref().ok_or(SocialError::NotConfigured)?;
        let response = self
            .http
            .post(format!("{}/api/v1/statuses", self.instance_url))
            .bearer_auth(token)
            .json(&serde_json::json!({ "status": content, "visibility": "public" }))
            .send()
            .await?;
        Self::read(response).await
    }
}
