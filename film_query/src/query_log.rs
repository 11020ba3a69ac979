// query_log.rs
use std::fs::OpenOptions;
use std::io::{Result as IoResult, Write};
use std::path::{Path, PathBuf};

/// Append-only record of every query the tool has executed.
pub struct QueryLog {
    path: PathBuf,
}

impl QueryLog {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, sql: &str, signature: &str, count: u64) -> IoResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        write!(
            file,
            "Query: {}\nParams: ({})\nTotal Execution for this Query: {}\n\n",
            sql, signature, count
        )?;
        file.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_append_keeps_earlier_records() {
        let dir = TempDir::new().unwrap();
        let log = QueryLog::new(dir.path().join("query_log.log"));
        log.append("SELECT 1", "action, 2006", 1).unwrap();
        log.append("SELECT 1", "action, 2006", 2).unwrap();

        let contents = fs::read_to_string(log.path()).unwrap();
        assert_eq!(
            contents,
            "Query: SELECT 1\nParams: (action, 2006)\nTotal Execution for this Query: 1\n\n\
             Query: SELECT 1\nParams: (action, 2006)\nTotal Execution for this Query: 2\n\n"
        );
    }
}
