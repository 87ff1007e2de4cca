// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Yandex Tracker REST API (v2).
//!
//! Provides [`TrackerClient`] which handles authentication headers, issue
//! creation, attachment upload and comment listing.

use std::time::Duration;

use helpdesk_core::HelpdeskError;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::types::{ApiErrorResponse, CommentResponse, CreateIssueRequest, IssueResponse};

/// Largest page the tracker serves for comment listings.
const COMMENTS_PAGE_SIZE: usize = 50;

/// HTTP client for Tracker API communication.
#[derive(Debug, Clone)]
pub struct TrackerClient {
    client: reqwest::Client,
    base_url: String,
}

impl TrackerClient {
    /// Creates a new Tracker API client.
    ///
    /// # Arguments
    /// * `token` - OAuth token sent as `Authorization: OAuth <token>`
    /// * `org_id` - Organization id sent as `X-Org-ID`, if any
    /// * `base_url` - API root, e.g. `https://api.tracker.yandex.net/v2`
    pub fn new(token: &str, org_id: Option<&str>, base_url: &str) -> Result<Self, HelpdeskError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "authorization",
            HeaderValue::from_str(&format!("OAuth {token}")).map_err(|e| {
                HelpdeskError::Config(format!("invalid tracker token header value: {e}"))
            })?,
        );
        if let Some(org_id) = org_id {
            headers.insert(
                "x-org-id",
                HeaderValue::from_str(org_id).map_err(|e| {
                    HelpdeskError::Config(format!("invalid tracker org id header value: {e}"))
                })?,
            );
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| HelpdeskError::Tracker {
                message: format!("failed to build HTTP client: {e}"),
                status: None,
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Opens a new issue and returns what the tracker answered.
    pub async fn create_issue(
        &self,
        request: &CreateIssueRequest,
    ) -> Result<IssueResponse, HelpdeskError> {
        let url = format!("{}/issues/", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;
        parse_json(response).await
    }

    /// Uploads a file and attaches it to `key`.
    pub async fn upload_attachment(
        &self,
        key: &str,
        data: Vec<u8>,
        filename: &str,
    ) -> Result<(), HelpdeskError> {
        let url = format!("{}/issues/{key}/attachments/", self.base_url);
        let form = Form::new().part("file", Part::bytes(data).file_name(filename.to_string()));
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;
        check_status(response).await.map(|_| ())
    }

    /// Lists every comment on `key` in the order the tracker returns them.
    ///
    /// The tracker pages comment listings; pages are walked with the `id`
    /// cursor (the last comment id seen) until a short page comes back.
    pub async fn get_comments(&self, key: &str) -> Result<Vec<CommentResponse>, HelpdeskError> {
        let url = format!("{}/issues/{key}/comments", self.base_url);
        let mut comments: Vec<CommentResponse> = Vec::new();
        let mut cursor: Option<i64> = None;
        loop {
            let page_url = match cursor {
                Some(id) => format!("{url}?perPage={COMMENTS_PAGE_SIZE}&id={id}"),
                None => format!("{url}?perPage={COMMENTS_PAGE_SIZE}"),
            };
            let response = self
                .client
                .get(&page_url)
                .send()
                .await
                .map_err(transport_error)?;
            let page: Vec<CommentResponse> = parse_json(response).await?;
            let full = page.len() >= COMMENTS_PAGE_SIZE;
            let next = page.last().map(|c| c.id);
            comments.extend(page);

            match next {
                Some(id) if full && cursor.is_none_or(|prev| id > prev) => cursor = Some(id),
                _ => break,
            }
            debug!(key, cursor = ?cursor, fetched = comments.len(), "fetching next comment page");
        }
        Ok(comments)
    }

    /// Verifies the token by fetching the current user.
    pub async fn myself(&self) -> Result<(), HelpdeskError> {
        let url = format!("{}/myself", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(transport_error)?;
        check_status(response).await.map(|_| ())
    }
}

fn transport_error(e: reqwest::Error) -> HelpdeskError {
    HelpdeskError::Tracker {
        message: format!("HTTP request failed: {e}"),
        status: None,
        source: Some(Box::new(e)),
    }
}

/// Passes 2xx responses through, turns everything else into a tracker error
/// carrying the HTTP status.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, HelpdeskError> {
    let status = response.status();
    debug!(status = %status, url = %response.url(), "tracker response received");
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
        Ok(api_err) if !api_err.error_messages.is_empty() => format!(
            "Tracker API error ({status}): {}",
            api_err.error_messages.join("; ")
        ),
        _ => format!("API returned {status}: {body}"),
    };
    Err(HelpdeskError::Tracker {
        message,
        status: Some(status.as_u16()),
        source: None,
    })
}

async fn parse_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, HelpdeskError> {
    let response = check_status(response).await?;
    let body = response.text().await.map_err(|e| HelpdeskError::Tracker {
        message: format!("failed to read response body: {e}"),
        status: None,
        source: Some(Box::new(e)),
    })?;
    serde_json::from_str(&body).map_err(|e| HelpdeskError::Tracker {
        message: format!("failed to parse API response: {e}"),
        status: None,
        source: Some(Box::new(e)),
    })
}
