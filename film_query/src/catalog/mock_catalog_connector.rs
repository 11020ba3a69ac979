// catalog/mock_catalog_connector.rs
use async_trait::async_trait;
use log::debug;
use std::collections::BTreeSet;

use super::catalog_connector::{CatalogConnector, CatalogError, CatalogRow};
use super::queries::{like_pattern, FilmQuery, KEYWORD_RESULT_LIMIT};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockFilm {
    pub title: String,
    pub description: String,
    pub genre: String,
    pub release_year: u16,
}

impl MockFilm {
    pub fn new(title: &str, description: &str, genre: &str, release_year: u16) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            genre: genre.to_string(),
            release_year,
        }
    }
}

/// In-memory catalog that answers film queries the way the sakila schema
/// would: case-insensitive comparison, and `LIKE` wildcards (`%`, `_`, `\`
/// escapes) in keywords.
pub struct MockCatalogConnector {
    films: Vec<MockFilm>,
    fail_with: Option<String>,
}

impl MockCatalogConnector {
    pub fn new(films: Vec<MockFilm>) -> Self {
        Self {
            films,
            fail_with: None,
        }
    }

    /// A connector whose every fetch fails with the given reason.
    pub fn failing(reason: &str) -> Self {
        Self {
            films: Vec::new(),
            fail_with: Some(reason.to_string()),
        }
    }

    /// A handful of films lifted from the sakila sample data.
    pub fn sample() -> Self {
        Self::new(vec![
            MockFilm::new(
                "ACADEMY DINOSAUR",
                "A Epic Drama of a Feminist And a Mad Scientist who must Battle a Teacher in The Canadian Rockies",
                "Documentary",
                2006,
            ),
            MockFilm::new(
                "ALIEN CENTER",
                "A Brilliant Drama of a Cat And a Mad Scientist who must Battle a Feminist in A MySQL Convention",
                "Foreign",
                2006,
            ),
            MockFilm::new(
                "AIRPLANE SIERRA",
                "A Touching Saga of a Hunter And a Butler who must Discover a Butler in A Jet Boat",
                "Comedy",
                2006,
            ),
            MockFilm::new(
                "ANACONDA CONFESSIONS",
                "A Lacklusture Display of a Dentist And a Dentist who must Fight a Girl in Australia",
                "Animation",
                2006,
            ),
            MockFilm::new(
                "AMADEUS HOLY",
                "A Emotional Display of a Pioneer And a Technical Writer who must Battle a Man in A Baloon",
                "Action",
                2006,
            ),
            MockFilm::new(
                "BOWFINGER GABLES",
                "A Fast-Paced Yarn of a Waitress And a Composer who must Outgun a Dentist in California",
                "Action",
                2007,
            ),
        ])
    }

    fn keyword_rows(&self, keyword: &str) -> Vec<CatalogRow> {
        let pattern = like_pattern(keyword);
        self.films
            .iter()
            .filter(|film| {
                like_matches(&pattern, &film.title) || like_matches(&pattern, &film.description)
            })
            .take(KEYWORD_RESULT_LIMIT)
            .map(|film| CatalogRow {
                title: Some(film.title.clone()),
                description: Some(film.description.clone()),
                genre: None,
                release_year: Some(film.release_year),
            })
            .collect()
    }

    fn genre_and_year_rows(&self, genre: &str, year: i32) -> Vec<CatalogRow> {
        self.films
            .iter()
            .filter(|film| {
                film.genre.eq_ignore_ascii_case(genre.trim_end())
                    && i32::from(film.release_year) == year
            })
            .map(|film| CatalogRow {
                title: Some(film.title.clone()),
                description: None,
                genre: Some(film.genre.clone()),
                release_year: Some(film.release_year),
            })
            .collect()
    }

    fn genres_and_years_rows(&self) -> Vec<CatalogRow> {
        let pairs: BTreeSet<(&str, u16)> = self
            .films
            .iter()
            .map(|film| (film.genre.as_str(), film.release_year))
            .collect();
        pairs
            .into_iter()
            .map(|(genre, year)| CatalogRow {
                genre: Some(genre.to_string()),
                release_year: Some(year),
                ..CatalogRow::default()
            })
            .collect()
    }
}

/// Case-insensitive SQL `LIKE`: `%` matches any run of characters, `_` exactly
/// one, and `\` makes the next character literal.
fn like_matches(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.to_lowercase().chars().collect();
    let text: Vec<char> = text.to_lowercase().chars().collect();
    // matched[j]: the pattern consumed so far matches text[..j]
    let mut matched = vec![false; text.len() + 1];
    matched[0] = true;
    let mut i = 0;
    while i < pattern.len() {
        let mut next = vec![false; text.len() + 1];
        match pattern[i] {
            '%' => {
                let mut reachable = false;
                for j in 0..=text.len() {
                    reachable |= matched[j];
                    next[j] = reachable;
                }
            }
            token => {
                let (literal, any) = match token {
                    '\\' if i + 1 < pattern.len() => {
                        i += 1;
                        (Some(pattern[i]), false)
                    }
                    '_' => (None, true),
                    c => (Some(c), false),
                };
                for j in 0..text.len() {
                    next[j + 1] = matched[j] && (any || literal == Some(text[j]));
                }
            }
        }
        matched = next;
        i += 1;
    }
    matched[text.len()]
}

#[async_trait]
impl CatalogConnector for MockCatalogConnector {
    async fn fetch(&self, query: &FilmQuery) -> Result<Vec<CatalogRow>, CatalogError> {
        if let Some(reason) = &self.fail_with {
            return Err(CatalogError::Unavailable(reason.clone()));
        }
        debug!("Mock catalog serving {:?}", query);
        let rows = match query {
            FilmQuery::Keyword { keyword } => self.keyword_rows(keyword),
            FilmQuery::GenreAndYear { genre, year } => self.genre_and_year_rows(genre, *year),
            FilmQuery::GenresAndYears => self.genres_and_years_rows(),
        };
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_keyword_matches_title_case_insensitively() {
        let catalog = MockCatalogConnector::sample();
        let rows = catalog
            .fetch(&FilmQuery::Keyword {
                keyword: "alien".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title.as_deref(), Some("ALIEN CENTER"));
        assert!(rows[0].description.is_some());
    }

    #[tokio::test]
    async fn test_keyword_matches_description() {
        let catalog = MockCatalogConnector::sample();
        let rows = catalog
            .fetch(&FilmQuery::Keyword {
                keyword: "Dentist".to_string(),
            })
            .await
            .unwrap();
        let titles: Vec<_> = rows.iter().filter_map(|row| row.title.as_deref()).collect();
        assert_eq!(titles, vec!["ANACONDA CONFESSIONS", "BOWFINGER GABLES"]);
    }

    #[test]
    fn test_like_matches() {
        assert!(like_matches("%alien%", "ALIEN CENTER"));
        assert!(like_matches("%_%", "x"));
        assert!(!like_matches("%_%", ""));
        assert!(like_matches("a_c", "abc"));
        assert!(!like_matches("a_c", "abbc"));
        assert!(like_matches("%\\%%", "100%"));
        assert!(!like_matches("%\\%%", "100"));
        assert!(like_matches("%%", ""));
    }

    #[tokio::test]
    async fn test_keyword_wildcards_behave_like_mysql() {
        let catalog = MockCatalogConnector::sample();
        let everything = catalog
            .fetch(&FilmQuery::Keyword {
                keyword: "_".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(everything.len(), 6);

        let rows = catalog
            .fetch(&FilmQuery::Keyword {
                keyword: "AL_EN%CEN".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title.as_deref(), Some("ALIEN CENTER"));

        let none = catalog
            .fetch(&FilmQuery::Keyword {
                keyword: "\\_".to_string(),
            })
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_keyword_results_are_limited() {
        let films = (0..25)
            .map(|i| MockFilm::new(&format!("TWIN {}", i), "", "Drama", 2006))
            .collect();
        let catalog = MockCatalogConnector::new(films);
        let rows = catalog
            .fetch(&FilmQuery::Keyword {
                keyword: "twin".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(rows.len(), KEYWORD_RESULT_LIMIT);
    }

    #[tokio::test]
    async fn test_genres_and_years_are_distinct_and_ordered() {
        let catalog = MockCatalogConnector::sample();
        let rows = catalog.fetch(&FilmQuery::GenresAndYears).await.unwrap();
        let pairs: Vec<_> = rows
            .iter()
            .map(|row| (row.genre.clone().unwrap(), row.release_year.unwrap()))
            .collect();
        assert_eq!(pairs[0], ("Action".to_string(), 2006));
        assert_eq!(pairs[1], ("Action".to_string(), 2007));
        assert_eq!(pairs.len(), 6);
    }

    #[tokio::test]
    async fn test_failing_connector() {
        let catalog = MockCatalogConnector::failing("down for maintenance");
        let result = catalog.fetch(&FilmQuery::GenresAndYears).await;
        assert!(matches!(result, Err(CatalogError::Unavailable(_))));
    }
}
