//! Typed shapes of the Business Profile API payloads.
//!
//! Every field carries a default so that extraction is total: a response
//! missing a field yields an empty string, empty list or zero instead of an error.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Account {
    /// Resource name, e.g. `accounts/123`.
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_state: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Location {
    /// Resource name, e.g. `locations/456`.
    pub name: String,
    /// Parent account, e.g. `accounts/123`. Not part of the remote payload.
    pub account: String,
    pub labels: Vec<String>,
    pub store_code: String,
    pub title: String,
    pub website_uri: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StarRating {
    One,
    Two,
    Three,
    Four,
    Five,
    /// Also covers any rating value this client does not know about.
    #[default]
    #[serde(other)]
    StarRatingUnspecified,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Reviewer {
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_photo_url: Option<String>,
    pub is_anonymous: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReviewReply {
    pub comment: String,
    pub update_time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Review {
    pub name: String,
    pub review_id: String,
    pub reviewer: Reviewer,
    pub star_rating: StarRating,
    pub comment: String,
    pub create_time: String,
    pub update_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_reply: Option<ReviewReply>,
}

/// First page of reviews for one location, with the remote-computed aggregates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewSummary {
    pub total_count: u64,
    pub average_rating: f64,
    pub reviews: Vec<Review>,
}

// ── Raw list envelopes ──────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ListAccountsResponse {
    pub accounts: Vec<Account>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ListLocationsResponse {
    pub locations: Vec<Location>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct ListReviewsResponse {
    pub reviews: Vec<Review>,
    pub average_rating: f64,
    pub total_review_count: u64,
}

impl From<ListReviewsResponse> for ReviewSummary {
    fn from(raw: ListReviewsResponse) -> Self {
        Self {
            total_count: raw.total_review_count,
            average_rating: raw.average_rating,
            reviews: raw.reviews,
        }
    }
}
