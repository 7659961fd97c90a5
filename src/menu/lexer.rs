//! logos tokenizer for menu item strings.
//!
//! Two-character codes beat the lone `%` by length. Everything that is
//! neither `|` nor `%` is plain text.

use logos::Logos;

/// Menu item-string token.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// `|` ends an entry.
    #[token("|")]
    Pipe,

    /// `%x` followed by a return value.
    #[token("%x")]
    Value,

    /// `%t` marks the entry as the title.
    #[token("%t")]
    Title,

    /// `%l` makes the entry a separator.
    #[token("%l")]
    Line,

    /// `%i` followed by an icon id.
    #[token("%i")]
    Icon,

    /// A `%` that starts no known code.
    #[token("%")]
    Percent,

    #[regex(r"[^|%]+")]
    Text,
}

/// Tokenize an item string into `(token, byte span)` pairs.
pub fn tokenize(input: &str) -> Vec<(Token, std::ops::Range<usize>)> {
    Token::lexer(input)
        .spanned()
        .filter_map(|(result, span)| result.ok().map(|token| (token, span)))
        .collect()
}

/// `atoi`: optional leading whitespace and sign, then digits. 0 when there are none.
pub fn leading_int(s: &str) -> i32 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let mut n: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        n = (n * 10 + i64::from(b - b'0')).min(i64::from(i32::MAX) + 1);
    }
    let n = if negative { -n } else { n };
    n.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        tokenize(input).into_iter().map(|(t, _)| t).collect()
    }

    #[test]
    fn codes_and_text() {
        assert_eq!(
            tokens("Title%t|A|B%x5|%l"),
            vec![
                Token::Text,
                Token::Title,
                Token::Pipe,
                Token::Text,
                Token::Pipe,
                Token::Text,
                Token::Value,
                Token::Text,
                Token::Pipe,
                Token::Line,
            ]
        );
    }

    #[test]
    fn lone_percent() {
        assert_eq!(tokens("50%"), vec![Token::Text, Token::Percent]);
        assert_eq!(tokens("%q"), vec![Token::Percent, Token::Text]);
    }

    #[test]
    fn spans_index_input() {
        let input = "ab|%i3";
        let spans = tokenize(input);
        assert_eq!(&input[spans[0].1.clone()], "ab");
        assert_eq!(spans[2].1, 3..5);
    }

    #[test]
    fn leading_int_is_permissive() {
        assert_eq!(leading_int("12abc"), 12);
        assert_eq!(leading_int("  -7|x"), -7);
        assert_eq!(leading_int("abc"), 0);
        assert_eq!(leading_int(""), 0);
        assert_eq!(leading_int("99999999999"), i32::MAX);
    }
}
