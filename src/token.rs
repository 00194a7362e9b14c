use log::debug;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use std::mem;

/// Declares [`TokenType`] together with its upper‑case variant names, so the
/// `tokenize` output can never drift from the enum.
macro_rules! token_types {
    ($($(#[$group:meta])* $($variant:ident),+;)*) => {
        /// The different kinds of tokens recognized by the Rox scanner.
        ///
        /// `STRING` and `NUMBER` carry their literal values; every other
        /// variant is fully described by its lexeme.
        #[allow(non_camel_case_types)]
        #[derive(Debug, Clone, Serialize)]
        pub enum TokenType {
            /// A string literal (contents without quotes)
            STRING(String),

            /// A numeric literal
            NUMBER(f64),

            $($(#[$group])* $($variant,)+)*
        }

        impl TokenType {
            /// Upper‑case name of the variant, without payload.
            pub fn name(&self) -> &'static str {
                match self {
                    TokenType::STRING(_) => "STRING",
                    TokenType::NUMBER(_) => "NUMBER",
                    $($(TokenType::$variant => stringify!($variant),)+)*
                }
            }
        }
    };
}

token_types! {
    /// Single‑character punctuation
    LEFT_PAREN, RIGHT_PAREN, LEFT_BRACE, RIGHT_BRACE, COMMA, DOT, MINUS, PLUS, SEMICOLON, SLASH, STAR;

    /// One or two character operators
    BANG, BANG_EQUAL, EQUAL, EQUAL_EQUAL, GREATER, GREATER_EQUAL, LESS, LESS_EQUAL;

    IDENTIFIER;

    /// Reserved words
    AND, CLASS, ELSE, FALSE, FUN, FOR, IF, NIL, OR, PRINT, RETURN, SUPER, THIS, TRUE, VAR, WHILE;

    EOF;
}

/// Variants compare by kind alone; literal payloads are ignored.
impl PartialEq for TokenType {
    fn eq(&self, other: &Self) -> bool {
        mem::discriminant(self) == mem::discriminant(other)
    }
}

/// A scanned token: its type (carrying any literal value), the original
/// lexeme, and the line number where it ended.
///
/// Tokens own their lexeme so the AST built from them can outlive the source
/// buffer; closures created in one REPL line are called from later ones.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Token {
    /// The category of this token.
    pub token_type: TokenType,

    /// The exact substring from the source that produced this token.
    pub lexeme: String,

    /// 1‑based line number in the source.
    pub line: usize,
}

impl Token {
    /// Create a new Token with the given type, lexeme, and line.
    pub fn new<S: Into<String>>(token_type: TokenType, lexeme: S, line: usize) -> Self {
        let lexeme: String = lexeme.into();

        debug!(
            "Creating new token: type={:?}, lexeme={}, line={}",
            token_type, lexeme, line
        );

        Self {
            token_type,
            lexeme,
            line,
        }
    }

    /// Synthetic identifier token, used for names the interpreter binds itself
    /// (`this`, `super`).
    pub fn synthetic(lexeme: &str, line: usize) -> Self {
        Self::new(TokenType::IDENTIFIER, lexeme, line)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // ── 1. decide literal string (may borrow or format) ────────────────
        let literal_str: Cow<'_, str> = match &self.token_type {
            TokenType::STRING(s) => Cow::Borrowed(s.as_str()),
            TokenType::NUMBER(n) => {
                // 3 → "3.0", 3.14 → "3.14"
                if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
                    let mut buf: itoa::Buffer = itoa::Buffer::new();
                    Cow::Owned(format!("{}.0", buf.format(*n as i64)))
                } else {
                    Cow::Owned(n.to_string())
                }
            }
            _ => Cow::Borrowed("null"),
        };

        // ── 2. variant name without payloads ───────────────────────────────
        write!(
            f,
            "{} {} {}",
            self.token_type.name(),
            self.lexeme,
            literal_str
        )
    }
}
