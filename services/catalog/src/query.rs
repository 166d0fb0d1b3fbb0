//! Query construction for movie search
//!
//! Composes filter predicates and ordering from untrusted request
//! parameters. Nothing here executes a query; the repository owns
//! execution.

use sqlx::{Postgres, QueryBuilder};

/// Text matching mode for a single field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextMatch {
    /// Case-sensitive equality
    Exact(String),
    /// Case-insensitive substring match
    Contains(String),
}

impl TextMatch {
    /// Build from a search term and an exact-match flag
    pub fn new(term: impl Into<String>, exact: bool) -> Self {
        if exact {
            Self::Exact(term.into())
        } else {
            Self::Contains(term.into())
        }
    }
}

/// Combined field filters; every present filter applies with AND semantics
#[derive(Debug, Clone, Default)]
pub struct MovieFilter {
    pub title: Option<TextMatch>,
    pub director: Option<TextMatch>,
    pub genre: Option<TextMatch>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    pub min_rating: Option<i16>,
    pub max_rating: Option<i16>,
}

fn push_separator(qb: &mut QueryBuilder<'_, Postgres>, first: &mut bool) {
    if *first {
        qb.push(" WHERE ");
        *first = false;
    } else {
        qb.push(" AND ");
    }
}

impl MovieFilter {
    /// True when no filter is present
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.director.is_none()
            && self.genre.is_none()
            && self.min_year.is_none()
            && self.max_year.is_none()
            && self.min_rating.is_none()
            && self.max_rating.is_none()
    }

    /// Append this filter's predicates as a WHERE clause
    ///
    /// A range with min > max produces a predicate that matches nothing;
    /// that is not an error.
    pub fn push_predicates(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        let mut first = true;

        for (column, matcher) in [
            ("title", &self.title),
            ("director", &self.director),
            ("genre", &self.genre),
        ] {
            if let Some(matcher) = matcher {
                push_separator(qb, &mut first);
                match matcher {
                    TextMatch::Exact(term) => {
                        qb.push(column);
                        qb.push(" = ");
                        qb.push_bind(term.clone());
                    }
                    TextMatch::Contains(term) => {
                        qb.push(column);
                        qb.push(" ILIKE ");
                        qb.push_bind(format!("%{}%", term));
                    }
                }
            }
        }

        if let Some(min_year) = self.min_year {
            push_separator(qb, &mut first);
            qb.push("year >= ");
            qb.push_bind(min_year);
        }

        if let Some(max_year) = self.max_year {
            push_separator(qb, &mut first);
            qb.push("year <= ");
            qb.push_bind(max_year);
        }

        if let Some(min_rating) = self.min_rating {
            push_separator(qb, &mut first);
            qb.push("rating >= ");
            qb.push_bind(min_rating);
        }

        if let Some(max_rating) = self.max_rating {
            push_separator(qb, &mut first);
            qb.push("rating <= ");
            qb.push_bind(max_rating);
        }
    }
}

/// Sort key for movie listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortBy {
    #[default]
    Title,
    Year,
    Rating,
}

impl SortBy {
    /// Resolve a requested sort key
    ///
    /// Unrecognized keys fall back to title rather than erroring.
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("year") => Self::Year,
            Some("rating") => Self::Rating,
            _ => Self::Title,
        }
    }

    fn column(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Year => "year",
            Self::Rating => "rating",
        }
    }
}

/// Sort direction; anything other than "desc" is ascending
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("desc") => Self::Desc,
            _ => Self::Asc,
        }
    }

    fn keyword(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Append an ORDER BY clause
///
/// Columns come from the whitelist in [`SortBy`], never from request input.
pub fn push_order_by(
    qb: &mut QueryBuilder<'_, Postgres>,
    sort_by: SortBy,
    sort_order: SortOrder,
) {
    qb.push(" ORDER BY ");
    qb.push(sort_by.column());
    qb.push(" ");
    qb.push(sort_order.keyword());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(filter: &MovieFilter) -> String {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT id FROM movies");
        filter.push_predicates(&mut qb);
        qb.sql().to_string()
    }

    #[test]
    fn test_empty_filter_adds_no_predicates() {
        assert!(MovieFilter::default().is_empty());
        assert_eq!(rendered(&MovieFilter::default()), "SELECT id FROM movies");
    }

    #[test]
    fn test_contains_uses_ilike() {
        let filter = MovieFilter {
            title: Some(TextMatch::new("blade", false)),
            ..Default::default()
        };

        assert_eq!(
            rendered(&filter),
            "SELECT id FROM movies WHERE title ILIKE $1"
        );
    }

    #[test]
    fn test_exact_uses_equality() {
        let filter = MovieFilter {
            director: Some(TextMatch::new("Ridley Scott", true)),
            ..Default::default()
        };

        assert_eq!(
            rendered(&filter),
            "SELECT id FROM movies WHERE director = $1"
        );
    }

    #[test]
    fn test_filters_combine_with_and() {
        let filter = MovieFilter {
            title: Some(TextMatch::new("blade", false)),
            genre: Some(TextMatch::new("sci-fi", false)),
            min_year: Some(1980),
            max_year: Some(1989),
            min_rating: Some(3),
            ..Default::default()
        };

        assert_eq!(
            rendered(&filter),
            "SELECT id FROM movies WHERE title ILIKE $1 AND genre ILIKE $2 \
             AND year >= $3 AND year <= $4 AND rating >= $5"
        );
    }

    #[test]
    fn test_inverted_range_still_builds() {
        // min > max matches nothing at execution time, but building the
        // predicate is not an error
        let filter = MovieFilter {
            min_year: Some(2000),
            max_year: Some(1990),
            ..Default::default()
        };

        assert!(!filter.is_empty());
        assert_eq!(
            rendered(&filter),
            "SELECT id FROM movies WHERE year >= $1 AND year <= $2"
        );
    }

    #[test]
    fn test_sort_by_is_permissive() {
        assert_eq!(SortBy::from_param(Some("year")), SortBy::Year);
        assert_eq!(SortBy::from_param(Some("rating")), SortBy::Rating);
        assert_eq!(SortBy::from_param(Some("title")), SortBy::Title);
        assert_eq!(SortBy::from_param(Some("bogus")), SortBy::Title);
        assert_eq!(SortBy::from_param(None), SortBy::Title);
    }

    #[test]
    fn test_sort_order_is_permissive() {
        assert_eq!(SortOrder::from_param(Some("desc")), SortOrder::Desc);
        assert_eq!(SortOrder::from_param(Some("asc")), SortOrder::Asc);
        assert_eq!(SortOrder::from_param(Some("sideways")), SortOrder::Asc);
        assert_eq!(SortOrder::from_param(None), SortOrder::Asc);
    }

    #[test]
    fn test_order_by_clause() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT id FROM movies");
        push_order_by(&mut qb, SortBy::Rating, SortOrder::Desc);

        assert_eq!(qb.sql(), "SELECT id FROM movies ORDER BY rating DESC");
    }
}
