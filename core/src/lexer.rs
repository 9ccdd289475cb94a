//! Tokenizer for raw command argument text.
//!
//! The input is scanned left to right. At each step the remaining text is
//! matched against these rules, first match wins:
//!
//! | Rule | Starts with | Produces |
//! |------|-------------|----------|
//! | double quote | `"` | [`TokenFormat::DoubleQuoted`] |
//! | single quote | `'` | [`TokenFormat::SingleQuoted`] |
//! | fence | ```` ``` ```` | [`TokenFormat::CodeBlock`] |
//! | backtick | `` ` `` (not ` `` `) | [`TokenFormat::InlineCode`] |
//! | anything else | | [`TokenFormat::UnquotedWord`] |
//!
//! A delimiter rule only matches when its closing delimiter exists. An
//! unterminated quote or fence falls through to the unquoted-word rule, so
//! the opening character becomes literal text. There are no escapes and no
//! nesting.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::{Token, TokenFormat};

const FENCE: &str = "```";

/// Optional lowercase language name on the first line of a fenced block.
static LANGUAGE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A([a-z]+)?\r?\n").expect("static regex must compile"));

/// Splits raw argument text into tokens.
///
/// Never fails: malformed quoting degrades to plain words.
///
/// # Examples
///
/// ```
/// use cmdarg_core::{TokenFormat, tokenize};
///
/// let tokens = tokenize(r#""a b" c"#);
/// assert_eq!(tokens.len(), 2);
/// assert_eq!(tokens[0].value, "a b");
/// assert_eq!(tokens[0].format, TokenFormat::DoubleQuoted);
/// assert_eq!(tokens[1].value, "c");
///
/// // Unterminated quotes are kept as literal text
/// let tokens = tokenize(r#""unterminated rest"#);
/// assert_eq!(tokens[0].value, "\"unterminated");
/// assert_eq!(tokens[0].format, TokenFormat::UnquotedWord);
/// ```
pub fn tokenize(raw: &str) -> Vec<Token> {
    let mut rest = raw.trim();
    let mut tokens = Vec::new();

    while !rest.is_empty() {
        let (token, consumed) = next_token(rest);
        tokens.push(token);
        rest = rest[consumed..].trim();
    }

    debug!(count = tokens.len(), "tokenized argument text");
    tokens
}

/// Returns the next token and the number of bytes it consumed.
fn next_token(s: &str) -> (Token, usize) {
    quoted(s, '"', TokenFormat::DoubleQuoted)
        .or_else(|| quoted(s, '\'', TokenFormat::SingleQuoted))
        .or_else(|| code_block(s))
        .or_else(|| inline_code(s))
        .unwrap_or_else(|| unquoted_word(s))
}

fn quoted(s: &str, quote: char, format: TokenFormat) -> Option<(Token, usize)> {
    let body = s.strip_prefix(quote)?;
    let end = body.find(quote)?;
    let consumed = quote.len_utf8() * 2 + end;
    Some((Token::new(&body[..end], format), consumed))
}

fn code_block(s: &str) -> Option<(Token, usize)> {
    let body = s.strip_prefix(FENCE)?;
    let end = body.find(FENCE)?;
    let interior = &body[..end];

    let token = match LANGUAGE_LINE.captures(interior) {
        Some(caps) => {
            let line_len = caps.get(0).map_or(0, |m| m.end());
            let language = caps.get(1).map(|m| m.as_str().to_string());
            Token::code_block(interior[line_len..].trim(), language)
        }
        None => Token::code_block(interior.trim(), None),
    };

    Some((token, FENCE.len() * 2 + end))
}

fn inline_code(s: &str) -> Option<(Token, usize)> {
    // A double backtick can only be the start of a fence or literal text
    if s.starts_with("``") {
        return None;
    }
    quoted(s, '`', TokenFormat::InlineCode)
}

fn unquoted_word(s: &str) -> (Token, usize) {
    let end = s.find(char::is_whitespace).unwrap_or(s.len());
    (Token::new(&s[..end], TokenFormat::UnquotedWord), end)
}
