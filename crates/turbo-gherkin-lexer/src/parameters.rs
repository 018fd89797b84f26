//! Embedded literal scanning for names and step text.
//!
//! The scanners run inside the lexer's default mode whenever a word starts,
//! so literals become their own tokens interleaved with free text.

use std::fmt;

use crate::token::TokenKind;

/// Kind of a literal parameter embedded in free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    /// Quoted string.
    String,
    /// Integer.
    Decimal,
    /// Floating-point number.
    Float,
}

impl ParameterKind {
    /// Parameter kind carried by a literal token kind.
    #[must_use]
    pub const fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::String => Some(Self::String),
            TokenKind::Decimal => Some(Self::Decimal),
            TokenKind::Float => Some(Self::Float),
            _ => None,
        }
    }

    /// Token kind used for literals of this kind.
    #[must_use]
    pub const fn token_kind(self) -> TokenKind {
        match self {
            Self::String => TokenKind::String,
            Self::Decimal => TokenKind::Decimal,
            Self::Float => TokenKind::Float,
        }
    }
}

/// Value of a literal parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue<'a> {
    /// String contents without the surrounding quotes.
    String(&'a str),
    /// Parsed integer.
    Decimal(i64),
    /// Parsed floating-point number.
    Float(f64),
}

impl ParameterValue<'_> {
    /// Interpret literal `text` of the given kind.
    ///
    /// Returns `None` when the text does not hold a value of that kind, for
    /// example an integer that overflows `i64`.
    ///
    /// # Examples
    ///
    /// ```
    /// use turbo_gherkin_lexer::{ParameterKind, ParameterValue};
    ///
    /// assert_eq!(
    ///     ParameterValue::parse(ParameterKind::String, "'строка'"),
    ///     Some(ParameterValue::String("строка"))
    /// );
    /// assert_eq!(
    ///     ParameterValue::parse(ParameterKind::Decimal, "42"),
    ///     Some(ParameterValue::Decimal(42))
    /// );
    /// ```
    #[must_use]
    pub fn parse(kind: ParameterKind, text: &str) -> Option<ParameterValue<'_>> {
        match kind {
            ParameterKind::String => unquote(text).map(ParameterValue::String),
            ParameterKind::Decimal => text.parse().ok().map(ParameterValue::Decimal),
            ParameterKind::Float => text.parse().ok().map(ParameterValue::Float),
        }
    }
}

impl fmt::Display for ParameterValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(text) => f.write_str(text),
            Self::Decimal(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
        }
    }
}

fn unquote(text: &str) -> Option<&str> {
    let quote = text.chars().next().filter(|c| is_quote(*c))?;
    text.strip_prefix(quote)?.strip_suffix(quote)
}

pub(crate) fn is_quote(ch: char) -> bool {
    matches!(ch, '"' | '\'')
}

fn is_line_break(ch: char) -> bool {
    matches!(ch, '\r' | '\n')
}

/// Byte length of a quoted string at the start of `text`, quotes included.
///
/// The string must close with its opening quote on the same line.
pub(crate) fn scan_string(text: &str) -> Option<usize> {
    let mut chars = text.char_indices();
    let (_, quote) = chars.next().filter(|(_, c)| is_quote(*c))?;
    chars
        .take_while(|(_, c)| !is_line_break(*c))
        .find(|(_, c)| *c == quote)
        .map(|(index, c)| index + c.len_utf8())
}

/// Kind and byte length of a number at the start of `text`.
///
/// Numbers fused with letters, underscores or a further `.digit` group are
/// not literals.
pub(crate) fn scan_number(text: &str) -> Option<(TokenKind, usize)> {
    let integer = digit_run(text);
    if integer == 0 {
        return None;
    }
    let mut kind = TokenKind::Decimal;
    let mut len = integer;
    let fraction = text
        .get(len..)
        .and_then(|after| after.strip_prefix('.'))
        .map_or(0, digit_run);
    if fraction > 0 {
        kind = TokenKind::Float;
        len += 1 + fraction;
    }
    let rest = text.get(len..).unwrap_or_default();
    let mut chars = rest.chars();
    let fused = match chars.next() {
        Some(c) if c.is_alphanumeric() || c == '_' => true,
        Some('.') => chars.next().is_some_and(|c| c.is_ascii_digit()),
        _ => false,
    };
    (!fused).then_some((kind, len))
}

fn digit_run(text: &str) -> usize {
    text.bytes().take_while(u8::is_ascii_digit).count()
}

/// Byte length of an `<name>` placeholder at the start of `text`.
pub(crate) fn scan_angle_parameter(text: &str) -> Option<usize> {
    let inner = text.strip_prefix('<')?;
    let mut chars = inner.char_indices();
    let (_, first) = chars.next()?;
    if first.is_whitespace() || matches!(first, '<' | '>') {
        return None;
    }
    for (index, c) in chars {
        match c {
            '>' => return Some(index + 2),
            '<' => return None,
            c if is_line_break(c) => return None,
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("\"abc\" tail", Some(5))]
    #[case("'строка'", Some(14))]
    #[case("\"\"", Some(2))]
    #[case("\"abc'", None)]
    #[case("\"abc\n\"", None)]
    #[case("abc", None)]
    fn scans_quoted_strings(#[case] text: &str, #[case] expected: Option<usize>) {
        assert_eq!(scan_string(text), expected);
    }

    #[rstest]
    #[case("1", Some((TokenKind::Decimal, 1)))]
    #[case("1.23 но", Some((TokenKind::Float, 4)))]
    #[case("12.", Some((TokenKind::Decimal, 2)))]
    #[case("0.99\n", Some((TokenKind::Float, 4)))]
    #[case("7,5", Some((TokenKind::Decimal, 1)))]
    #[case("1st", None)]
    #[case("1_000", None)]
    #[case("1.2.3", None)]
    #[case("v1", None)]
    fn scans_numbers(#[case] text: &str, #[case] expected: Option<(TokenKind, usize)>) {
        assert_eq!(scan_number(text), expected);
    }

    #[rstest]
    #[case("<Значение2> x", Some(19))]
    #[case("<a b>", Some(5))]
    #[case("< a>", None)]
    #[case("<>", None)]
    #[case("<a<b>", None)]
    #[case("<a\n>", None)]
    fn scans_angle_parameters(#[case] text: &str, #[case] expected: Option<usize>) {
        assert_eq!(scan_angle_parameter(text), expected);
    }

    #[test]
    fn parses_values() {
        assert_eq!(
            ParameterValue::parse(ParameterKind::Float, "1.23"),
            Some(ParameterValue::Float(1.23))
        );
        assert_eq!(
            ParameterValue::parse(ParameterKind::String, "\"x'"),
            None
        );
        assert_eq!(
            ParameterValue::parse(ParameterKind::Decimal, "99999999999999999999"),
            None
        );
    }
}
