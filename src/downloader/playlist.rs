//! Flat-playlist output parsing.

/// Parse the newline-delimited id listing a flat-playlist run prints.
/// Blank lines are skipped; at most `limit` ids are returned.
pub fn parse_playlist_ids(output: &str, limit: usize) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(limit)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_ids_and_skips_blanks() {
        let output = "dQw4w9WgXcQ\n\n  jfKfPfyJRdk  \n\n9bZkp7q19f0\n";
        let ids = parse_playlist_ids(output, 10);
        assert_eq!(ids, ["dQw4w9WgXcQ", "jfKfPfyJRdk", "9bZkp7q19f0"]);
    }

    #[test]
    fn test_limit_truncates() {
        let output = "a\nb\nc\nd";
        assert_eq!(parse_playlist_ids(output, 2), ["a", "b"]);
    }

    #[test]
    fn test_empty_output_is_empty_list() {
        assert!(parse_playlist_ids("", 5).is_empty());
        assert!(parse_playlist_ids("\n\n", 5).is_empty());
    }
}
