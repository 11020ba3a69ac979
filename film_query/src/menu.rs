// menu.rs
use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::catalog::CatalogRow;
use crate::dispatcher::{QueryDispatcher, QueryOutcome};

const SEPARATOR: &str = "------------------------------";

/// The numbered interactive menu. Reads answers from `reader`, writes
/// everything the user sees to `out`.
pub struct Menu<R, W> {
    reader: R,
    out: W,
    top_n: usize,
}

impl<R, W> Menu<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(reader: R, out: W, top_n: usize) -> Self {
        Self { reader, out, top_n }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Loops until the user picks "Exit" or input runs out.
    pub async fn run(&mut self, dispatcher: &mut QueryDispatcher) -> io::Result<()> {
        loop {
            writeln!(self.out, "\nSelect an action: ")?;
            writeln!(self.out, "1. Search by keyword")?;
            writeln!(self.out, "2. Search by genre and year")?;
            writeln!(self.out, "3. Display all genres and years")?;
            writeln!(self.out, "4. Show popular queries")?;
            writeln!(self.out, "5. Exit")?;

            let choice = match self.prompt("Enter the action number: ").await? {
                Some(choice) => choice,
                None => break,
            };
            let keep_going = match choice.trim() {
                "1" => self.keyword_search(dispatcher).await?,
                "2" => self.genre_and_year_search(dispatcher).await?,
                "3" => {
                    let outcome = dispatcher.list_genres_and_years().await;
                    self.print_genres_and_years(&outcome)?;
                    true
                }
                "4" => {
                    let popular = dispatcher.popular_queries(self.top_n);
                    self.print_popular(&popular)?;
                    true
                }
                "5" => {
                    writeln!(self.out, "Exiting the program.")?;
                    false
                }
                _ => {
                    writeln!(self.out, "invalid choice. Please try again.")?;
                    true
                }
            };
            if !keep_going {
                break;
            }
        }
        self.out.flush()
    }

    /// Returns `None` once the reader is exhausted.
    async fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.out, "{}", text)?;
        self.out.flush()?;
        let mut line = String::new();
        if self.reader.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(&['\r', '\n'][..]).to_string()))
    }

    async fn keyword_search(&mut self, dispatcher: &mut QueryDispatcher) -> io::Result<bool> {
        let keyword = match self.prompt("Enter the keyword to search for movies: ").await? {
            Some(keyword) => keyword,
            None => return Ok(false),
        };
        let outcome = dispatcher.search_by_keyword(&keyword).await;
        self.print_execution(&outcome)?;
        if outcome.rows.is_empty() {
            writeln!(self.out, "No movies found.")?;
        }
        for row in &outcome.rows {
            writeln!(self.out, "Title: {}", text(&row.title))?;
            writeln!(self.out, "Description: {}", text(&row.description))?;
            writeln!(self.out, "Year: {}", year(row))?;
            writeln!(self.out, "{}", SEPARATOR)?;
        }
        Ok(true)
    }

    async fn genre_and_year_search(
        &mut self,
        dispatcher: &mut QueryDispatcher,
    ) -> io::Result<bool> {
        let genre = match self.prompt("Enter the genre: ").await? {
            Some(genre) => genre,
            None => return Ok(false),
        };
        let release_year = loop {
            let answer = match self.prompt("Enter the year: ").await? {
                Some(answer) => answer,
                None => return Ok(false),
            };
            match answer.trim().parse::<i32>() {
                Ok(value) => break value,
                Err(_) => writeln!(self.out, "Error: The year must be a number.")?,
            }
        };
        let outcome = dispatcher
            .search_by_genre_and_year(&genre, release_year)
            .await;
        self.print_execution(&outcome)?;
        if outcome.rows.is_empty() {
            writeln!(self.out, "No movies found.")?;
        }
        for row in &outcome.rows {
            writeln!(self.out, "Title: {}", text(&row.title))?;
            writeln!(self.out, "Genre: {}", text(&row.genre))?;
            writeln!(self.out, "Year: {}", year(row))?;
            writeln!(self.out, "{}", SEPARATOR)?;
        }
        Ok(true)
    }

    fn print_execution(&mut self, outcome: &QueryOutcome) -> io::Result<()> {
        writeln!(self.out, "Params: ({})", outcome.signature)?;
        if let Some(count) = outcome.count {
            writeln!(self.out, "Total Execution for this Query: {}", count)?;
        }
        Ok(())
    }

    fn print_genres_and_years(&mut self, outcome: &QueryOutcome) -> io::Result<()> {
        self.print_execution(outcome)?;
        if outcome.rows.is_empty() {
            writeln!(self.out, "Failed to load genres and years.")?;
            return Ok(());
        }
        writeln!(self.out, "Available genres and years: ")?;
        for (genre, years) in group_years_by_genre(&outcome.rows) {
            let years = years
                .iter()
                .map(|year| year.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(self.out, "Genre: {}", genre)?;
            writeln!(self.out, "Years: {}", years)?;
            writeln!(self.out, "{}", SEPARATOR)?;
        }
        Ok(())
    }

    fn print_popular(&mut self, popular: &[(String, u64)]) -> io::Result<()> {
        if popular.is_empty() {
            writeln!(self.out, "There are no popular queries.")?;
            return Ok(());
        }
        writeln!(self.out, "Most popular queries (parameters):")?;
        for (signature, count) in popular {
            writeln!(
                self.out,
                "Params: {} | Total Execution for this Query: {}",
                signature, count
            )?;
        }
        Ok(())
    }
}

fn group_years_by_genre(rows: &[CatalogRow]) -> BTreeMap<&str, BTreeSet<u16>> {
    let mut grouped: BTreeMap<&str, BTreeSet<u16>> = BTreeMap::new();
    for row in rows {
        if let Some(genre) = row.genre.as_deref() {
            let years = grouped.entry(genre).or_default();
            if let Some(year) = row.release_year {
                years.insert(year);
            }
        }
    }
    grouped
}

fn text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

fn year(row: &CatalogRow) -> String {
    row.release_year
        .map(|year| year.to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(genre: &str, year: u16) -> CatalogRow {
        CatalogRow {
            genre: Some(genre.to_string()),
            release_year: Some(year),
            ..CatalogRow::default()
        }
    }

    #[test]
    fn test_group_years_by_genre() {
        let rows = vec![
            pair("Drama", 2007),
            pair("Action", 2006),
            pair("Drama", 2006),
            pair("Drama", 2007),
        ];
        let grouped = group_years_by_genre(&rows);
        let genres: Vec<&str> = grouped.keys().copied().collect();
        assert_eq!(genres, vec!["Action", "Drama"]);
        let drama: Vec<u16> = grouped["Drama"].iter().copied().collect();
        assert_eq!(drama, vec![2006, 2007]);
    }
}
