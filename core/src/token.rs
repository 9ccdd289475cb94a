//! Lexical tokens produced by [`tokenize`](crate::tokenize).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Delimiter style that produced a [`Token`].
///
/// # Examples
///
/// ```
/// use cmdarg_core::{TokenFormat, tokenize};
///
/// let tokens = tokenize("plain `code`");
/// assert_eq!(tokens[0].format, TokenFormat::UnquotedWord);
/// assert_eq!(tokens[1].format, TokenFormat::InlineCode);
/// assert!(tokens[1].format.is_code());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenFormat {
    /// A bare whitespace-delimited word.
    UnquotedWord,
    /// Text between a pair of `"`.
    DoubleQuoted,
    /// Text between a pair of `'`.
    SingleQuoted,
    /// Text between a pair of single backticks.
    InlineCode,
    /// Text between a pair of triple-backtick fences.
    CodeBlock,
}

impl TokenFormat {
    /// Returns `true` for inline code spans and fenced code blocks.
    pub fn is_code(self) -> bool {
        matches!(self, Self::InlineCode | Self::CodeBlock)
    }

    /// Returns `true` for single- and double-quoted strings.
    pub fn is_quoted(self) -> bool {
        matches!(self, Self::DoubleQuoted | Self::SingleQuoted)
    }
}

impl fmt::Display for TokenFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::UnquotedWord => "unquoted word",
            Self::DoubleQuoted => "double-quoted string",
            Self::SingleQuoted => "single-quoted string",
            Self::InlineCode => "inline code",
            Self::CodeBlock => "code block",
        };
        f.write_str(name)
    }
}

/// One lexical unit of a raw command string.
///
/// `language` is only ever set on [`TokenFormat::CodeBlock`] tokens whose
/// first line names a language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The token text with its delimiters removed.
    pub value: String,
    /// Delimiter style.
    pub format: TokenFormat,
    /// Language tag of a fenced code block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Token {
    /// Creates a token without a language tag.
    ///
    /// # Examples
    ///
    /// ```
    /// use cmdarg_core::{Token, TokenFormat};
    ///
    /// let token = Token::new("hello", TokenFormat::UnquotedWord);
    /// assert_eq!(token.value, "hello");
    /// assert!(token.language.is_none());
    /// ```
    pub fn new(value: impl Into<String>, format: TokenFormat) -> Self {
        Self {
            value: value.into(),
            format,
            language: None,
        }
    }

    /// Creates a fenced code block token with an optional language tag.
    pub fn code_block(value: impl Into<String>, language: Option<String>) -> Self {
        Self {
            value: value.into(),
            format: TokenFormat::CodeBlock,
            language,
        }
    }

    /// Returns the token text.
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}
