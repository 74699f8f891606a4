//! CSV Field Tokenizer
//!
//! Splits one CSV line on commas with a single regex, keeping commas that sit
//! inside double quotes. Quotes are stripped after the split and values are
//! trimmed. Escaped quotes (`""`) are not interpreted.

use regex::Regex;

/// One field per match: a comma, optional blanks, then a quoted run or a
/// plain run. The line is prefixed with a comma so every field, including an
/// empty first one, has a leading separator and no match is ever empty.
const FIELD_PATTERN: &str = r#",\s*("[^"]*"|[^,]*)"#;

/// Compiled field splitter
#[derive(Debug, Clone)]
pub struct FieldTokenizer {
    pattern: Regex,
}

impl FieldTokenizer {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(FIELD_PATTERN)?,
        })
    }

    /// Split `line` into cleaned field values
    pub fn split(&self, line: &str) -> Vec<String> {
        let line = line.trim_end_matches(['\r', '\n']);
        let prefixed = format!(",{line}");

        self.pattern
            .captures_iter(&prefixed)
            .map(|caps| clean(caps.get(1).map_or("", |m| m.as_str())))
            .collect()
    }
}

/// Strip one leading and one trailing quote, then trim
fn clean(raw: &str) -> String {
    let raw = raw.trim();
    let raw = raw.strip_prefix('"').unwrap_or(raw);
    let raw = raw.strip_suffix('"').unwrap_or(raw);
    raw.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(line: &str) -> Vec<String> {
        FieldTokenizer::new().unwrap().split(line)
    }

    #[test]
    fn test_plain_fields_keep_positions() {
        assert_eq!(
            split(",Dr. X,Cardiologue,,,Tunis,36.8,10.2,,"),
            vec!["", "Dr. X", "Cardiologue", "", "", "Tunis", "36.8", "10.2", "", ""]
        );
    }

    #[test]
    fn test_unquoted_line() {
        assert_eq!(split("a,b,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_blank_before_quoted_field() {
        assert_eq!(
            split(r#"0, "Ben Ali, Sami",ORL"#),
            vec!["0", "Ben Ali, Sami", "ORL"]
        );
    }

    #[test]
    fn test_quoted_commas_stay_in_field() {
        assert_eq!(
            split(r#"u,"Ben Ali, Sami",ORL,"Rue de Marseille, Tunis""#),
            vec!["u", "Ben Ali, Sami", "ORL", "Rue de Marseille, Tunis"]
        );
    }

    #[test]
    fn test_values_are_trimmed() {
        assert_eq!(split(" a , \" b \" ,c\r"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_line_is_one_empty_field() {
        assert_eq!(split(""), vec![""]);
    }
}
