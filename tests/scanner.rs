#[cfg(test)]
mod scanner_tests {
    use pretty_assertions::assert_eq;

    use rox::error::Diagnostics;
    use rox::scanner::*;
    use rox::token::*;

    fn assert_token_sequence(source: &str, expected: &[(TokenType, &str)]) {
        let scanner = Scanner::new(source);
        let tokens: Vec<_> = scanner.filter_map(Result::ok).collect();

        assert_eq!(tokens.len(), expected.len());

        for (actual, (expected_type, expected_lexeme)) in tokens.iter().zip(expected.iter()) {
            assert_eq!(actual.token_type, *expected_type);
            assert_eq!(actual.lexeme, *expected_lexeme);
        }
    }

    #[test]
    fn test_scanner_01_symbols() {
        assert_token_sequence(
            "({*.,+*})",
            &[
                (TokenType::LEFT_PAREN, "("),
                (TokenType::LEFT_BRACE, "{"),
                (TokenType::STAR, "*"),
                (TokenType::DOT, "."),
                (TokenType::COMMA, ","),
                (TokenType::PLUS, "+"),
                (TokenType::STAR, "*"),
                (TokenType::RIGHT_BRACE, "}"),
                (TokenType::RIGHT_PAREN, ")"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_02_longest_match_operators() {
        assert_token_sequence(
            "! != = == < <= > >= / // trailing comment",
            &[
                (TokenType::BANG, "!"),
                (TokenType::BANG_EQUAL, "!="),
                (TokenType::EQUAL, "="),
                (TokenType::EQUAL_EQUAL, "=="),
                (TokenType::LESS, "<"),
                (TokenType::LESS_EQUAL, "<="),
                (TokenType::GREATER, ">"),
                (TokenType::GREATER_EQUAL, ">="),
                (TokenType::SLASH, "/"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_03_keywords_and_identifiers() {
        assert_token_sequence(
            "class Foo < Bar { init() { this.x_1 = super.y; } } orchid",
            &[
                (TokenType::CLASS, "class"),
                (TokenType::IDENTIFIER, "Foo"),
                (TokenType::LESS, "<"),
                (TokenType::IDENTIFIER, "Bar"),
                (TokenType::LEFT_BRACE, "{"),
                (TokenType::IDENTIFIER, "init"),
                (TokenType::LEFT_PAREN, "("),
                (TokenType::RIGHT_PAREN, ")"),
                (TokenType::LEFT_BRACE, "{"),
                (TokenType::THIS, "this"),
                (TokenType::DOT, "."),
                (TokenType::IDENTIFIER, "x_1"),
                (TokenType::EQUAL, "="),
                (TokenType::SUPER, "super"),
                (TokenType::DOT, "."),
                (TokenType::IDENTIFIER, "y"),
                (TokenType::SEMICOLON, ";"),
                (TokenType::RIGHT_BRACE, "}"),
                (TokenType::RIGHT_BRACE, "}"),
                (TokenType::IDENTIFIER, "orchid"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_number_dot_needs_a_digit_after_it() {
        let tokens: Vec<Token> = Scanner::new("12.5 7. .3")
            .filter_map(Result::ok)
            .collect();

        let kinds: Vec<&str> = tokens.iter().map(|t| t.token_type.name()).collect();
        assert_eq!(kinds, ["NUMBER", "NUMBER", "DOT", "DOT", "NUMBER", "EOF"]);

        let TokenType::NUMBER(n) = tokens[0].token_type else {
            panic!("expected a number, got {:?}", tokens[0]);
        };
        assert_eq!(n, 12.5);
        assert_eq!(tokens[1].lexeme, "7");
        assert_eq!(tokens[4].lexeme, "3");
    }

    #[test]
    fn test_multiline_string_advances_line_counter() {
        let tokens: Vec<Token> = Scanner::new("\"one\ntwo\"\nident")
            .filter_map(Result::ok)
            .collect();

        match &tokens[0].token_type {
            TokenType::STRING(s) => assert_eq!(s, "one\ntwo"),
            other => panic!("expected a string, got {:?}", other),
        }
        assert_eq!(tokens[0].line, 2);
        assert_eq!(tokens[1].line, 3);
        assert_eq!(tokens[2].token_type, TokenType::EOF);
        assert_eq!(tokens[2].line, 3);
    }

    #[test]
    fn test_unexpected_chars_token_sequence() {
        let results: Vec<_> = Scanner::new(",.$(#").collect();

        // COMMA, DOT, error for '$', LEFT_PAREN, error for '#', EOF
        assert_eq!(results.len(), 6, "Expected 6 items in result");

        let error_count = results.iter().filter(|r| r.is_err()).count();
        assert_eq!(error_count, 2, "Expected 2 error messages");

        for err in results.iter().filter_map(|r| r.as_ref().err()) {
            assert!(
                err.to_string().contains("Unexpected character"),
                "got: {}",
                err
            );
        }

        let last = results.last().and_then(|r| r.as_ref().ok());
        assert_eq!(last.map(|t| t.token_type.clone()), Some(TokenType::EOF));
    }

    #[test]
    fn test_non_ascii_character_is_one_error() {
        let mut diagnostics = Diagnostics::new();
        let tokens = scan("a é b", &mut diagnostics);

        assert_eq!(diagnostics.errors().len(), 1);
        assert_eq!(
            diagnostics.errors()[0].to_string(),
            "[line 1] Error: Unexpected character: é"
        );
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn test_unterminated_string_still_ends_with_eof() {
        let mut diagnostics = Diagnostics::new();
        let tokens = scan("print \"never closed;\nvar x = 1;", &mut diagnostics);

        assert!(diagnostics.had_error());
        assert_eq!(
            diagnostics.errors()[0].to_string(),
            "[line 2] Error: Unterminated string."
        );

        let kinds: Vec<&str> = tokens.iter().map(|t| t.token_type.name()).collect();
        assert_eq!(kinds, ["PRINT", "EOF"]);
    }

    #[test]
    fn test_display_format() {
        let tokens: Vec<Token> = Scanner::new("42 \"hi\" foo")
            .filter_map(Result::ok)
            .collect();

        let rendered: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
        assert_eq!(
            rendered,
            [
                "NUMBER 42 42.0",
                "STRING \"hi\" hi",
                "IDENTIFIER foo null",
                "EOF  null"
            ]
        );
    }
}
