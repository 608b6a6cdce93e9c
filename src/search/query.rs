//! Quoting of free-text values inside search filter expressions

/// Characters that end a bare filter term
fn needs_quotes(value: &str) -> bool {
    value
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '(' | ')'))
}

/// Quote a value so the search engine reads it as a single term.
///
/// Bare words pass through. Otherwise the value is wrapped in double quotes,
/// or single quotes if it contains a double quote but no single quote. A value
/// containing both gets double quotes with its double quotes escaped.
pub fn quote_filter_string(value: &str) -> String {
    if !needs_quotes(value) {
        return value.to_string();
    }

    if !value.contains('"') {
        format!("\"{}\"", value)
    } else if !value.contains('\'') {
        format!("'{}'", value)
    } else {
        format!("\"{}\"", value.replace('"', "\\\""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_words_pass_through() {
        assert_eq!(quote_filter_string("Fatebringer"), "Fatebringer");
        assert_eq!(quote_filter_string("Hammer-Forged"), "Hammer-Forged");
    }

    #[test]
    fn test_quoting() {
        assert_eq!(quote_filter_string("Explosive Payload"), "\"Explosive Payload\"");
        assert_eq!(quote_filter_string("The \"Best\" Gun"), "'The \"Best\" Gun'");
        assert_eq!(quote_filter_string("Hawkmoon's"), "\"Hawkmoon's\"");
        assert_eq!(
            quote_filter_string("it's \"fine\""),
            "\"it's \\\"fine\\\"\""
        );
    }
}
