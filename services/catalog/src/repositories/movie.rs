//! Movie repository for database operations
//!
//! Every operation is a single statement against the pool; dynamic search
//! statements are assembled with [`sqlx::QueryBuilder`] from the predicates
//! in [`crate::query`].

use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use uuid::Uuid;

use crate::models::movie::{Movie, MovieUpdate, NewMovie};
use crate::query::{MovieFilter, SortBy, SortOrder, push_order_by};

const MOVIE_COLUMNS: &str =
    "id, title, year, director, genre, rating, description, created_at, updated_at";

fn movie_from_row(row: &PgRow) -> Movie {
    Movie {
        id: row.get("id"),
        title: row.get("title"),
        year: row.get("year"),
        director: row.get("director"),
        genre: row.get("genre"),
        rating: row.get("rating"),
        description: row.get("description"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Movie repository
#[derive(Clone)]
pub struct MovieRepository {
    pool: PgPool,
}

impl MovieRepository {
    /// Create a new movie repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a movie and return the stored record
    pub async fn insert(&self, new_movie: &NewMovie) -> Result<Movie> {
        let row = sqlx::query(
            r#"
            INSERT INTO movies (title, year, director, genre, rating, description)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, year, director, genre, rating, description, created_at, updated_at
            "#,
        )
        .bind(&new_movie.title)
        .bind(new_movie.year)
        .bind(&new_movie.director)
        .bind(&new_movie.genre)
        .bind(new_movie.rating)
        .bind(&new_movie.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(movie_from_row(&row))
    }

    /// Get a movie by id
    pub async fn get(&self, id: Uuid) -> Result<Option<Movie>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, year, director, genre, rating, description, created_at, updated_at
            FROM movies
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(movie_from_row))
    }

    /// Apply a partial update
    ///
    /// Only the fields present in `update` are written; `updated_at` is
    /// always refreshed. Returns `None` when the id does not resolve.
    pub async fn update(&self, id: Uuid, update: &MovieUpdate) -> Result<Option<Movie>> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE movies SET ");

        {
            let mut fields = qb.separated(", ");

            if let Some(title) = &update.title {
                fields.push("title = ").push_bind_unseparated(title.clone());
            }
            if let Some(year) = update.year {
                fields.push("year = ").push_bind_unseparated(year);
            }
            if let Some(director) = &update.director {
                fields
                    .push("director = ")
                    .push_bind_unseparated(director.clone());
            }
            if let Some(genre) = &update.genre {
                fields.push("genre = ").push_bind_unseparated(genre.clone());
            }
            if let Some(rating) = update.rating {
                fields.push("rating = ").push_bind_unseparated(rating);
            }
            if let Some(description) = &update.description {
                fields
                    .push("description = ")
                    .push_bind_unseparated(description.clone());
            }

            fields.push("updated_at = now()");
        }

        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.push(" RETURNING ");
        qb.push(MOVIE_COLUMNS);

        let row = qb.build().fetch_optional(&self.pool).await?;

        Ok(row.as_ref().map(movie_from_row))
    }

    /// Delete a movie, returning the deleted record
    pub async fn delete(&self, id: Uuid) -> Result<Option<Movie>> {
        let row = sqlx::query(
            r#"
            DELETE FROM movies
            WHERE id = $1
            RETURNING id, title, year, director, genre, rating, description, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(movie_from_row))
    }

    /// Run a filtered, sorted, paginated search
    pub async fn search(
        &self,
        filter: &MovieFilter,
        sort_by: SortBy,
        sort_order: SortOrder,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Movie>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT ");
        qb.push(MOVIE_COLUMNS);
        qb.push(" FROM movies");

        filter.push_predicates(&mut qb);
        push_order_by(&mut qb, sort_by, sort_order);

        qb.push(" LIMIT ");
        qb.push_bind(limit);
        qb.push(" OFFSET ");
        qb.push_bind(offset);

        let rows = qb.build().fetch_all(&self.pool).await?;

        Ok(rows.iter().map(movie_from_row).collect())
    }

    /// Count the records matching the filter
    pub async fn count(&self, filter: &MovieFilter) -> Result<i64> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM movies");
        filter.push_predicates(&mut qb);

        let count: i64 = qb.build_query_scalar().fetch_one(&self.pool).await?;

        Ok(count)
    }

    /// Typeahead search across title, director and genre
    ///
    /// Prefix-matching titles sort first, then rating descending, then
    /// title ascending.
    pub async fn instant_search(&self, term: &str, limit: i64) -> Result<Vec<Movie>> {
        let pattern = format!("%{}%", term);
        let prefix = format!("{}%", term);

        let rows = sqlx::query(
            r#"
            SELECT id, title, year, director, genre, rating, description, created_at, updated_at
            FROM movies
            WHERE title ILIKE $1 OR director ILIKE $1 OR genre ILIKE $1
            ORDER BY (CASE WHEN title ILIKE $2 THEN 0 ELSE 1 END),
                     rating DESC NULLS LAST,
                     title ASC
            LIMIT $3
            "#,
        )
        .bind(&pattern)
        .bind(&prefix)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(movie_from_row).collect())
    }
}
