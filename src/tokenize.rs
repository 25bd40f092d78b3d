//! Quote-aware line splitting used by the ARFF reader.

use regex::Regex;
use thiserror::Error;

/// The line holds an odd number of quote characters.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("unbalanced quote characters")]
pub struct UnbalancedQuotes;

/// Split `line` on every match of `delimiter` that lies outside a pair of
/// `quote` characters.
///
/// Quote characters are stripped from the emitted tokens.
///
/// ```
/// use regex::Regex;
/// use featio::split_quoted;
///
/// let comma = Regex::new(",").unwrap();
/// let tokens = split_quoted(r#"a,"b,c",d"#, &comma, '"').unwrap();
/// assert_eq!(tokens, vec!["a", "b,c", "d"]);
/// ```
pub fn split_quoted(
    line: &str,
    delimiter: &Regex,
    quote: char,
) -> Result<Vec<String>, UnbalancedQuotes> {
    Ok(split_quoted_raw(line, delimiter, quote)?
        .into_iter()
        .map(|token| strip_quotes(token, quote))
        .collect())
}

/// Like [`split_quoted`], but tokens keep their quote characters.
pub(crate) fn split_quoted_raw<'a>(
    line: &'a str,
    delimiter: &Regex,
    quote: char,
) -> Result<Vec<&'a str>, UnbalancedQuotes> {
    let quote_positions: Vec<usize> = if quote.is_ascii() {
        if bytecount::count(line.as_bytes(), quote as u8) == 0 {
            return Ok(delimiter.split(line).collect());
        }
        line.bytes()
            .enumerate()
            .filter(|&(_, b)| b == quote as u8)
            .map(|(i, _)| i)
            .collect()
    } else {
        line.match_indices(quote).map(|(i, _)| i).collect()
    };

    if quote_positions.len() % 2 != 0 {
        return Err(UnbalancedQuotes);
    }

    let mut tokens = Vec::new();
    let mut start = 0;
    for m in delimiter.find_iter(line) {
        if m.is_empty() {
            continue;
        }
        let quotes_before = quote_positions.partition_point(|&p| p < m.start());
        if quotes_before % 2 == 1 {
            continue;
        }
        tokens.push(&line[start..m.start()]);
        start = m.end();
    }
    tokens.push(&line[start..]);

    Ok(tokens)
}

pub(crate) fn strip_quotes(token: &str, quote: char) -> String {
    token.chars().filter(|&c| c != quote).collect()
}

/// Wrap `token` in `quote` when it would not survive [`split_quoted`] as a
/// single token on comma or whitespace delimiters.
///
/// The grammar has no escape for the quote character, so any occurrence
/// inside `token` is dropped: `say "hi"` is written as `"say hi"` and reads
/// back as `say hi`. This loss is accepted.
pub fn quote_if_needed(token: &str, quote: char) -> String {
    let needs_quotes = token.is_empty()
        || token
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, ',' | '{' | '}' | '%' | '\'' | '"'));
    if needs_quotes {
        let inner: String = token.chars().filter(|&c| c != quote).collect();
        format!("{quote}{inner}{quote}")
    } else {
        token.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comma() -> Regex {
        Regex::new(r",\s*").unwrap()
    }

    #[test]
    fn test_split_quoted_comma() {
        let tokens = split_quoted(r#"a,"b,c",d"#, &Regex::new(",").unwrap(), '"').unwrap();
        assert_eq!(tokens, vec!["a", "b,c", "d"]);
    }

    #[test]
    fn test_split_no_quotes() {
        let tokens = split_quoted("x, y,z", &comma(), '"').unwrap();
        assert_eq!(tokens, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_split_multiple_quoted_spans() {
        let tokens = split_quoted("'a b' 'c d' e", &Regex::new(r"\s+").unwrap(), '\'').unwrap();
        assert_eq!(tokens, vec!["a b", "c d", "e"]);
    }

    #[test]
    fn test_split_quote_inside_token() {
        let tokens = split_quoted(r#"pre"x,y"post,z"#, &comma(), '"').unwrap();
        assert_eq!(tokens, vec!["prex,ypost", "z"]);
    }

    #[test]
    fn test_unbalanced_quotes() {
        assert_eq!(
            split_quoted(r#"a,"b,c"#, &comma(), '"'),
            Err(UnbalancedQuotes)
        );
    }

    #[test]
    fn test_quote_if_needed() {
        assert_eq!(quote_if_needed("plain", '"'), "plain");
        assert_eq!(quote_if_needed("two words", '"'), "\"two words\"");
        assert_eq!(quote_if_needed("a,b", '\''), "'a,b'");
        assert_eq!(quote_if_needed("", '"'), "\"\"");
    }

    #[test]
    fn test_quote_if_needed_drops_embedded_quotes() {
        let written = quote_if_needed(r#"say "hi""#, '"');
        assert_eq!(written, r#""say hi""#);

        let tokens = split_quoted(&written, &comma(), '"').unwrap();
        assert_eq!(tokens, vec!["say hi"]);

        // the other quote character is kept inside the quotes
        assert_eq!(quote_if_needed("it's", '"'), r#""it's""#);
    }
}
