use std::time::Duration;

use reqwest::Client;

use super::error::AniListError;
use super::types::{AnimeRecord, GraphQLResponse, MediaResponse};

const API_URL: &str = "https://graphql.anilist.co";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const FIND_ANIME_QUERY: &str = r#"
query ($search: String) {
    Media(search: $search, type: ANIME) {
        id
        title { romaji english }
        episodes
        genres
        coverImage { extraLarge }
    }
}
"#;

/// AniList GraphQL API client.
///
/// Public media lookups are anonymous; no access token is involved.
pub struct AniListClient {
    http: Client,
}

impl AniListClient {
    pub fn new() -> Result<Self, AniListError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { http })
    }

    async fn graphql_request<T: serde::de::DeserializeOwned>(
        &self,
        operation: &str,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<GraphQLResponse<T>, AniListError> {
        tracing::debug!(operation, "AniList GraphQL request");

        let resp = self
            .http
            .post(API_URL)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .json(&serde_json::json!({
                "query": query,
                "variables": variables,
            }))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(operation, status = status_code, "AniList API error");
            return Err(AniListError::Api {
                status: status_code,
                message: body,
            });
        }

        let body: GraphQLResponse<T> = resp
            .json()
            .await
            .map_err(|e| AniListError::Parse(e.to_string()))?;

        if let Some(error) = body.errors.first() {
            tracing::warn!(operation, message = %error.message, "AniList reported an error");
            return Err(AniListError::GraphQL(error.message.clone()));
        }

        Ok(body)
    }

    /// Look up a single anime by free-text search.
    ///
    /// Returns `Ok(None)` when the service has no matching media; transport,
    /// status, and service-reported failures surface as errors so the caller
    /// can log them before collapsing to its own "not found" handling.
    pub async fn find_anime(&self, search: &str) -> Result<Option<AnimeRecord>, AniListError> {
        let resp: GraphQLResponse<MediaResponse> = self
            .graphql_request(
                "FindAnime",
                FIND_ANIME_QUERY,
                serde_json::json!({ "search": search }),
            )
            .await?;

        Ok(resp
            .data
            .and_then(|d| d.media)
            .map(|media| media.into_record()))
    }
}
