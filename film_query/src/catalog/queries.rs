// catalog/queries.rs
use std::fmt;

use crate::util::{self, Signature};

const GENRES_AND_YEARS_SQL: &str = "
    SELECT DISTINCT c.name AS genre, CAST(f.release_year AS UNSIGNED) AS release_year
    FROM sakila.film AS f
    JOIN sakila.film_category AS fc ON f.film_id = fc.film_id
    JOIN sakila.category AS c ON c.category_id = fc.category_id
    ORDER BY genre, release_year";

const FILMS_BY_KEYWORD_SQL: &str = "
    SELECT title, description, CAST(release_year AS UNSIGNED) AS release_year
    FROM sakila.film
    WHERE title LIKE ? OR description LIKE ?
    LIMIT 10";

const FILMS_BY_GENRE_AND_YEAR_SQL: &str = "
    SELECT f.title, CAST(f.release_year AS UNSIGNED) AS release_year, c.name AS genre
    FROM sakila.film AS f
    JOIN sakila.film_category AS fc ON f.film_id = fc.film_id
    JOIN sakila.category AS c ON c.category_id = fc.category_id
    WHERE c.name = ? AND f.release_year = ?";

/// Upper bound on keyword search results.
pub const KEYWORD_RESULT_LIMIT: usize = 10;

/// `LIKE` pattern matching the keyword anywhere in a column.
pub fn like_pattern(keyword: &str) -> String {
    format!("%{}%", keyword)
}

/// A value bound to a `?` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryParam {
    Text(String),
    Int(i32),
}

impl fmt::Display for QueryParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryParam::Text(text) => f.write_str(text),
            QueryParam::Int(value) => write!(f, "{}", value),
        }
    }
}

/// The catalog operations the tool knows how to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilmQuery {
    /// Films whose title or description contains the keyword.
    Keyword { keyword: String },
    /// Films in a category released in a given year.
    GenreAndYear { genre: String, year: i32 },
    /// Every distinct (category, release year) pair.
    GenresAndYears,
}

impl FilmQuery {
    pub fn sql(&self) -> &'static str {
        match self {
            FilmQuery::Keyword { .. } => FILMS_BY_KEYWORD_SQL,
            FilmQuery::GenreAndYear { .. } => FILMS_BY_GENRE_AND_YEAR_SQL,
            FilmQuery::GenresAndYears => GENRES_AND_YEARS_SQL,
        }
    }

    /// Parameters in placeholder order.
    pub fn params(&self) -> Vec<QueryParam> {
        match self {
            FilmQuery::Keyword { keyword } => {
                let pattern = like_pattern(keyword);
                vec![QueryParam::Text(pattern.clone()), QueryParam::Text(pattern)]
            }
            FilmQuery::GenreAndYear { genre, year } => {
                vec![QueryParam::Text(genre.clone()), QueryParam::Int(*year)]
            }
            FilmQuery::GenresAndYears => Vec::new(),
        }
    }

    // Different queries with equal parameter lists share a signature.
    pub fn signature(&self) -> Signature {
        util::signature(&self.params())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_params_are_wildcarded_twice() {
        let query = FilmQuery::Keyword {
            keyword: "ALIEN".to_string(),
        };
        assert_eq!(
            query.params(),
            vec![
                QueryParam::Text("%ALIEN%".to_string()),
                QueryParam::Text("%ALIEN%".to_string())
            ]
        );
        assert_eq!(query.signature(), "%ALIEN%, %ALIEN%");
        assert_eq!(query.sql().matches('?').count(), 2);
    }

    #[test]
    fn test_keyword_sql_uses_result_limit() {
        let limit = format!("LIMIT {}", KEYWORD_RESULT_LIMIT);
        assert!(FILMS_BY_KEYWORD_SQL.trim_end().ends_with(&limit));
    }

    #[test]
    fn test_genre_and_year_signature() {
        let query = FilmQuery::GenreAndYear {
            genre: " Action ".to_string(),
            year: 2006,
        };
        assert_eq!(query.signature(), "Action, 2006");
        assert_eq!(query.sql().matches('?').count(), 2);
    }

    #[test]
    fn test_genres_and_years_has_no_params() {
        let query = FilmQuery::GenresAndYears;
        assert!(query.params().is_empty());
        assert_eq!(query.signature(), "");
        assert!(!query.sql().contains('?'));
    }
}
