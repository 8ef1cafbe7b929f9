//! Ticker list files

use std::path::Path;
use tracing::warn;

/// One symbol per line; blank lines and `#` comments are skipped
///
/// An unreadable file yields an empty list.
pub fn load_ticker_list(path: impl AsRef<Path>) -> Vec<String> {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(text) => parse_ticker_list(&text),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Could not read ticker list");
            Vec::new()
        },
    }
}

fn parse_ticker_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_ticker_list() {
        let tickers = parse_ticker_list("ZWC\n\n# covered calls\n  HMAX.TO  \n");
        assert_eq!(tickers, vec!["ZWC", "HMAX.TO"]);
    }

    #[test]
    fn test_load_ticker_list() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "JEPI").unwrap();
        writeln!(file, "QYLD").unwrap();
        assert_eq!(load_ticker_list(file.path()), vec!["JEPI", "QYLD"]);

        assert!(load_ticker_list("/nonexistent/tickers.txt").is_empty());
    }
}
