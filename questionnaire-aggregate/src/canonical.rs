use regex::Regex;

/// Matches a question number token such as `Q9`, `q09` or `Q11.` anywhere in
/// a column name.
pub const CANONICAL_PATTERN: &str = r"(?i)\bQ0*(\d+)\b";

/// Extracts canonical question ids from column names.
#[derive(Debug, Clone)]
pub struct CanonicalIds {
    pattern: Regex,
}

impl CanonicalIds {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(CANONICAL_PATTERN)?,
        })
    }

    /// The question number of a column, from the first `Q<digits>` token.
    pub fn number(&self, column: &str) -> Option<u32> {
        let captures = self.pattern.captures(column)?;
        captures.get(1)?.as_str().parse().ok()
    }

    /// The canonical id of a column, e.g. `"Q9"` for `"Q9. minimum reliability"`.
    pub fn canonical(&self, column: &str) -> Option<String> {
        self.number(column).map(|n| format!("Q{n}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_numbers() {
        let ids = CanonicalIds::new().unwrap();
        assert_eq!(ids.canonical("Q9. minimum reliability").as_deref(), Some("Q9"));
        assert_eq!(ids.canonical("q12 - overall confidence").as_deref(), Some("Q12"));
        assert_eq!(ids.canonical("Q07").as_deref(), Some("Q7"));
        assert_eq!(ids.canonical("Q0").as_deref(), Some("Q0"));
    }

    #[test]
    fn first_token_wins() {
        let ids = CanonicalIds::new().unwrap();
        assert_eq!(ids.canonical("Q3 (was Q4 in pilot)").as_deref(), Some("Q3"));
    }

    #[test]
    fn passthrough_columns() {
        let ids = CanonicalIds::new().unwrap();
        assert_eq!(ids.canonical("First Name (*)"), None);
        assert_eq!(ids.canonical("Supplier A: in %"), None);
        assert_eq!(ids.canonical("FAQ12"), None);
        assert_eq!(ids.canonical("Q3a"), None);
        assert_eq!(ids.canonical("group_assignment"), None);
    }
}
