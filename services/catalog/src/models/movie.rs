//! Movie models for the catalog service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Movie entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Movie {
    pub id: Uuid,
    pub title: String,
    pub year: i32,
    pub director: String,
    pub genre: Option<String>,
    pub rating: Option<i16>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New movie creation payload
#[derive(Debug, Clone, Deserialize)]
pub struct NewMovie {
    pub title: String,
    pub year: i32,
    pub director: String,
    pub genre: Option<String>,
    pub rating: Option<i16>,
    pub description: Option<String>,
}

/// Partial update payload; only fields present in the request are applied
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieUpdate {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub director: Option<String>,
    pub genre: Option<String>,
    pub rating: Option<i16>,
    pub description: Option<String>,
}

impl MovieUpdate {
    /// True when no updatable field is present
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.year.is_none()
            && self.director.is_none()
            && self.genre.is_none()
            && self.rating.is_none()
            && self.description.is_none()
    }
}

/// Confirmation payload returned by the delete endpoint
#[derive(Debug, Clone, Serialize)]
pub struct DeletedMovie {
    pub id: Uuid,
    pub title: String,
    pub director: String,
}

/// Query parameters for the paginated movie listing
#[derive(Debug, Clone, Deserialize)]
pub struct ListParams {
    /// Page number (1-based; non-positive values clamp to 1)
    pub page: Option<i64>,
    /// Number of items per page
    pub page_size: Option<i64>,
}

/// Query parameters for single-field advanced search
#[derive(Debug, Clone, Deserialize)]
pub struct FieldSearchParams {
    /// Search term
    pub q: String,
    /// Exact match (vs case-insensitive substring)
    #[serde(default)]
    pub exact_match: bool,
    /// Sort key: title, year or rating
    pub sort_by: Option<String>,
    /// Sort direction: asc or desc
    pub sort_order: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// Query parameters for multi-field filtered search
#[derive(Debug, Clone, Deserialize)]
pub struct FilteredSearchParams {
    pub title: Option<String>,
    pub director: Option<String>,
    pub genre: Option<String>,
    /// Exact match for the text filters (vs case-insensitive substring)
    #[serde(default)]
    pub exact_match: bool,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    pub min_rating: Option<i16>,
    pub max_rating: Option<i16>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// Query parameters for instant (typeahead) search
#[derive(Debug, Clone, Deserialize)]
pub struct InstantSearchParams {
    pub q: Option<String>,
    /// Result cap, clamped to [1, 20]
    pub limit: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_update_is_empty() {
        assert!(MovieUpdate::default().is_empty());

        let update = MovieUpdate {
            rating: Some(4),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn test_field_search_params_defaults() {
        let params: FieldSearchParams =
            serde_json::from_value(serde_json::json!({ "q": "nolan" })).unwrap();

        assert_eq!(params.q, "nolan");
        assert!(!params.exact_match);
        assert!(params.sort_by.is_none());
        assert!(params.page.is_none());
    }
}
