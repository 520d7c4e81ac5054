// Line classification for conditional text input.

/// Classification of one input line.
///
/// Keywords are matched case-insensitively against the first
/// whitespace-delimited token. For `If`, the argument is the following
/// token, or `None` when the line ends after the keyword. Anything past
/// a directive's last consumed token is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    If(Option<&'a str>),
    Else,
    Endif,
    Text,
}

const BOOLEAN_SPELLINGS: &[(&str, bool)] = &[
    ("0", false),
    ("1", true),
    ("false", false),
    ("true", true),
    ("no", false),
    ("yes", true),
];

pub fn classify(line: &str) -> LineKind<'_> {
    let mut tokens = line.split_whitespace();
    let Some(keyword) = tokens.next() else {
        return LineKind::Text;
    };
    if keyword.eq_ignore_ascii_case("if") {
        LineKind::If(tokens.next())
    } else if keyword.eq_ignore_ascii_case("else") {
        LineKind::Else
    } else if keyword.eq_ignore_ascii_case("endif") {
        LineKind::Endif
    } else {
        LineKind::Text
    }
}

/// Map a textual boolean spelling to its value.
pub fn parse_bool(text: &str) -> Option<bool> {
    BOOLEAN_SPELLINGS
        .iter()
        .find(|(spelling, _)| spelling.eq_ignore_ascii_case(text))
        .map(|&(_, value)| value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_match_case_insensitively() {
        assert_eq!(classify("if 1"), LineKind::If(Some("1")));
        assert_eq!(classify("IF true"), LineKind::If(Some("true")));
        assert_eq!(classify("  If  yes  "), LineKind::If(Some("yes")));
        assert_eq!(classify("else"), LineKind::Else);
        assert_eq!(classify("ELSE"), LineKind::Else);
        assert_eq!(classify("EndIf"), LineKind::Endif);
    }

    #[test]
    fn if_without_argument_reports_none() {
        assert_eq!(classify("if"), LineKind::If(None));
        assert_eq!(classify("  IF   "), LineKind::If(None));
    }

    #[test]
    fn trailing_text_after_directive_is_ignored() {
        assert_eq!(classify("if 0 trailing junk"), LineKind::If(Some("0")));
        assert_eq!(classify("else trailing"), LineKind::Else);
        assert_eq!(classify("endif trailing"), LineKind::Endif);
    }

    #[test]
    fn non_keywords_are_text() {
        assert_eq!(classify(""), LineKind::Text);
        assert_eq!(classify("   "), LineKind::Text);
        assert_eq!(classify("hello world"), LineKind::Text);
        assert_eq!(classify("iffy"), LineKind::Text);
        assert_eq!(classify("elsewhere"), LineKind::Text);
        assert_eq!(classify("endiffy"), LineKind::Text);
    }

    #[test]
    fn boolean_spellings_resolve_case_insensitively() {
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool("false"), Some(false));
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("No"), Some(false));
        assert_eq!(parse_bool("YES"), Some(true));
    }

    #[test]
    fn unknown_spellings_do_not_resolve() {
        assert_eq!(parse_bool(""), None);
        assert_eq!(parse_bool("2"), None);
        assert_eq!(parse_bool("maybe"), None);
        assert_eq!(parse_bool("truthy"), None);
    }
}
