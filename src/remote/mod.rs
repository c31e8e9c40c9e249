//! Read-only client for the Google Business Profile APIs.
//!
//! Each call issues exactly one bearer-authenticated GET and returns the
//! first page only. No retries, no pagination.

pub mod models;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::config::ApiEndpoints;
use crate::error::ServiceError;
use crate::providers::TokenSet;

pub use models::{Account, Location, Review, ReviewReply, Reviewer, ReviewSummary, StarRating};
use models::{ListAccountsResponse, ListLocationsResponse, ListReviewsResponse};

const LOCATION_READ_MASK: &str = "labels,name,storeCode,title,websiteUri";

pub struct BusinessClient {
    endpoints: ApiEndpoints,
    http: reqwest::Client,
}

// Google's JSON error envelope: {"error": {"code": 403, "message": "...", "status": "..."}}
#[derive(Debug, Deserialize)]
struct GoogleApiError {
    error: GoogleApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GoogleApiErrorBody {
    #[serde(default)]
    message: String,
}

impl BusinessClient {
    pub fn new(endpoints: ApiEndpoints, http: reqwest::Client) -> Self {
        Self { endpoints, http }
    }

    /// List the accounts the token's user can manage.
    pub async fn list_accounts(&self, tokens: &TokenSet) -> Result<Vec<Account>, ServiceError> {
        let url = endpoint(&self.endpoints.accounts, &["v1", "accounts"])?;
        let raw: ListAccountsResponse = self.get_json(tokens, url, "accounts", "current user").await?;
        Ok(raw.accounts)
    }

    /// List the locations of one account.
    pub async fn list_locations(
        &self,
        tokens: &TokenSet,
        account_id: &str,
    ) -> Result<Vec<Location>, ServiceError> {
        let parent = format!("accounts/{account_id}");
        let mut url = endpoint(
            &self.endpoints.information,
            &["v1", "accounts", account_id, "locations"],
        )?;
        url.set_query(Some(&format!("readMask={LOCATION_READ_MASK}")));

        let raw: ListLocationsResponse = self.get_json(tokens, url, "locations", &parent).await?;

        Ok(raw
            .locations
            .into_iter()
            .map(|mut loc| {
                loc.account = parent.clone();
                loc
            })
            .collect())
    }

    /// Fetch the first page of reviews of one location.
    pub async fn get_reviews(
        &self,
        tokens: &TokenSet,
        account_id: &str,
        location_id: &str,
    ) -> Result<ReviewSummary, ServiceError> {
        let target = format!("accounts/{account_id}/locations/{location_id}");
        let url = endpoint(
            &self.endpoints.reviews,
            &["v4", "accounts", account_id, "locations", location_id, "reviews"],
        )?;

        let raw: ListReviewsResponse = self.get_json(tokens, url, "reviews", &target).await?;
        Ok(raw.into())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        tokens: &TokenSet,
        url: Url,
        resource: &'static str,
        target: &str,
    ) -> Result<T, ServiceError> {
        debug!("GET {url}");

        let resp = self
            .http
            .get(url)
            .bearer_auth(&tokens.access_token)
            .send()
            .await
            .map_err(|e| ServiceError::remote(resource, target, format!("request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let reason = match serde_json::from_str::<GoogleApiError>(&body) {
                Ok(err) if !err.error.message.is_empty() => format!("HTTP {status}: {}", err.error.message),
                _ => format!("HTTP {status}"),
            };
            return Err(ServiceError::remote(resource, target, reason));
        }

        resp.json::<T>()
            .await
            .map_err(|e| ServiceError::remote(resource, target, format!("invalid response body: {e}")))
    }
}

/// Append path segments to a base URL, percent-encoding each one.
fn endpoint(base: &str, segments: &[&str]) -> Result<Url, ServiceError> {
    let mut url = Url::parse(base)
        .map_err(|e| ServiceError::Config(format!("invalid API base URL {base}: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| ServiceError::Config(format!("API base URL {base} cannot take a path")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
