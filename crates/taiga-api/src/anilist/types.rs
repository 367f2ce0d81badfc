use serde::Deserialize;

// ── GraphQL response wrappers ────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQLError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQLError {
    pub message: String,
}

// ── Media lookup ─────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MediaResponse {
    #[serde(rename = "Media")]
    pub media: Option<AniListMedia>,
}

#[derive(Debug, Deserialize)]
pub struct AniListMedia {
    pub id: u64,
    pub title: Option<AniListTitle>,
    pub episodes: Option<u32>,
    pub genres: Option<Vec<String>>,
    #[serde(rename = "coverImage")]
    pub cover_image: Option<CoverImage>,
}

#[derive(Debug, Deserialize)]
pub struct AniListTitle {
    pub romaji: Option<String>,
    pub english: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CoverImage {
    #[serde(rename = "extraLarge")]
    pub extra_large: Option<String>,
}

// ── Normalized record ────────────────────────────────────────────

/// Normalized result of a metadata lookup, as consumed by the
/// announcement formatter. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimeRecord {
    pub id: u64,
    pub title_english: Option<String>,
    pub title_romaji: Option<String>,
    pub episodes: Option<u32>,
    pub genres: Vec<String>,
}

// ── Conversions ──────────────────────────────────────────────────

impl AniListMedia {
    pub fn into_record(self) -> AnimeRecord {
        let title_english = self.title.as_ref().and_then(|t| t.english.clone());
        let title_romaji = self.title.as_ref().and_then(|t| t.romaji.clone());

        AnimeRecord {
            id: self.id,
            title_english,
            title_romaji,
            episodes: self.episodes,
            genres: self.genres.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_media_response() {
        let json = r#"{
            "data": {
                "Media": {
                    "id": 20,
                    "title": {
                        "romaji": "Naruto",
                        "english": "Naruto"
                    },
                    "episodes": 220,
                    "genres": ["Action", "Adventure", "Drama"],
                    "coverImage": { "extraLarge": "https://s4.anilist.co/file/anilistcdn/media/anime/cover/extra-large/nx20.jpg" }
                }
            }
        }"#;

        let resp: GraphQLResponse<MediaResponse> = serde_json::from_str(json).unwrap();
        assert!(resp.errors.is_empty());

        let record = resp
            .data
            .unwrap()
            .media
            .unwrap()
            .into_record();
        assert_eq!(record.id, 20);
        assert_eq!(record.title_english.as_deref(), Some("Naruto"));
        assert_eq!(record.episodes, Some(220));
        assert_eq!(record.genres, vec!["Action", "Adventure", "Drama"]);
    }

    #[test]
    fn test_deserialize_null_media() {
        let json = r#"{ "data": { "Media": null } }"#;
        let resp: GraphQLResponse<MediaResponse> = serde_json::from_str(json).unwrap();
        assert!(resp.data.unwrap().media.is_none());
    }

    #[test]
    fn test_deserialize_error_payload() {
        let json = r#"{
            "data": null,
            "errors": [
                { "message": "Not Found.", "status": 404 }
            ]
        }"#;
        let resp: GraphQLResponse<MediaResponse> = serde_json::from_str(json).unwrap();
        assert!(resp.data.is_none());
        assert_eq!(resp.errors[0].message, "Not Found.");
    }

    #[test]
    fn test_deserialize_minimal_media() {
        let json = r#"{ "id": 1, "title": { "romaji": "Test" } }"#;
        let media: AniListMedia = serde_json::from_str(json).unwrap();
        let record = media.into_record();
        assert_eq!(record.id, 1);
        assert_eq!(record.title_romaji.as_deref(), Some("Test"));
        assert!(record.title_english.is_none());
        assert!(record.episodes.is_none());
        assert!(record.genres.is_empty());
    }
}
