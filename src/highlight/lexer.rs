//! Single-line lexer with state carried across lines.

use super::{HighlightedLine, LexState, TokenKind};

const KEYWORDS: &[&str] = &[
    "pub", "fn", "let", "mut", "if", "else", "while", "for", "in", "break", "continue", "import",
    "newtype", "type", "literal", "alias", "extern", "return", "signal", "compare", "spawn", "is",
    "finally", "async", "await", "macro", "pragma", "own", "true", "false", "nothing",
];

const BUILTIN_TYPES: &[&str] = &[
    "int", "uint", "float", "int8", "int16", "int32", "int64", "uint8", "uint16", "uint32",
    "uint64", "float16", "float32", "float64", "bool", "string",
];

/// Classify one line, starting from the state the previous line ended in.
///
/// Returns the segments covering the line and the state to feed the next line.
pub fn highlight_line(line: &str, state: LexState) -> (HighlightedLine, LexState) {
    let chars: Vec<char> = line.chars().collect();
    let mut lexer = Lexer {
        chars: &chars,
        pos: 0,
        state,
        out: HighlightedLine::default(),
    };
    lexer.run();
    (lexer.out, lexer.state)
}

struct Lexer<'a> {
    chars: &'a [char],
    pos: usize,
    state: LexState,
    out: HighlightedLine,
}

impl Lexer<'_> {
    fn run(&mut self) {
        while self.pos < self.chars.len() {
            let start = self.pos;

            if self.state.block_comment_depth > 0 {
                self.scan_block_comment();
                self.emit(TokenKind::Comment, start);
                continue;
            }

            if self.state.in_unterminated_string {
                self.scan_string_body();
                self.emit(TokenKind::String, start);
                continue;
            }

            if self.starts_with("///") {
                self.pos = self.chars.len();
                self.emit(TokenKind::Directive, start);
                break;
            }

            if self.starts_with("//") {
                self.pos = self.chars.len();
                self.emit(TokenKind::Comment, start);
                break;
            }

            if self.starts_with("/*") {
                self.pos += 2;
                self.state.block_comment_depth += 1;
                self.scan_block_comment();
                self.emit(TokenKind::Comment, start);
                continue;
            }

            let c = self.chars[self.pos];

            if c.is_whitespace() {
                self.eat_while(char::is_whitespace);
                self.emit(TokenKind::Plain, start);
                continue;
            }

            if c == '"' {
                self.pos += 1;
                self.state.in_unterminated_string = true;
                self.scan_string_body();
                self.emit(TokenKind::String, start);
                continue;
            }

            if self.at_number_start() {
                self.scan_number();
                self.emit(TokenKind::Number, start);
                continue;
            }

            if c == '@' {
                self.pos += 1;
                self.eat_while(is_identifier_part);
                self.emit(TokenKind::Attribute, start);
                continue;
            }

            if is_identifier_start(c) {
                self.pos += 1;
                self.eat_while(is_identifier_part);
                let word: String = self.chars[start..self.pos].iter().collect();
                self.out.push(classify_identifier(&word), &word);
                continue;
            }

            if is_operator(c) {
                self.pos += 1;
                while self.pos < self.chars.len() && is_operator(self.chars[self.pos]) {
                    if self.starts_with("//") || self.starts_with("/*") {
                        break;
                    }
                    self.pos += 1;
                }
                self.emit(TokenKind::Operator, start);
                continue;
            }

            self.pos += 1;
            self.emit(TokenKind::Plain, start);
        }
    }

    fn emit(&mut self, kind: TokenKind, start: usize) {
        let text: String = self.chars[start..self.pos].iter().collect();
        self.out.push(kind, &text);
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn starts_with(&self, pattern: &str) -> bool {
        pattern
            .chars()
            .enumerate()
            .all(|(i, p)| self.peek(i) == Some(p))
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek(0).is_some_and(&pred) {
            self.pos += 1;
        }
    }

    /// Consume comment text until the nesting depth returns to zero or the
    /// line ends.
    fn scan_block_comment(&mut self) {
        while self.pos < self.chars.len() {
            if self.starts_with("/*") {
                self.state.block_comment_depth += 1;
                self.pos += 2;
            } else if self.starts_with("*/") {
                self.state.block_comment_depth -= 1;
                self.pos += 2;
                if self.state.block_comment_depth == 0 {
                    return;
                }
            } else {
                self.pos += 1;
            }
        }
    }

    /// Consume string contents after the opening quote (or from the start of
    /// a continuation line). Clears the open-string flag on the closing quote.
    fn scan_string_body(&mut self) {
        while self.pos < self.chars.len() {
            match self.chars[self.pos] {
                '\\' if self.pos + 1 < self.chars.len() => self.pos += 2,
                '"' => {
                    self.pos += 1;
                    self.state.in_unterminated_string = false;
                    return;
                }
                _ => self.pos += 1,
            }
        }
    }

    fn at_number_start(&self) -> bool {
        match self.peek(0) {
            Some(c) if c.is_ascii_digit() => true,
            Some('.') => self.peek(1).is_some_and(|c| c.is_ascii_digit()),
            _ => false,
        }
    }

    fn scan_number(&mut self) {
        if self.peek(0) == Some('0') {
            match self.peek(1) {
                Some('x' | 'X') => {
                    self.pos += 2;
                    self.eat_while(|c| c.is_ascii_hexdigit() || c == '_');
                    return;
                }
                Some('b' | 'B') => {
                    self.pos += 2;
                    self.eat_while(|c| matches!(c, '0' | '1' | '_'));
                    return;
                }
                _ => {}
            }
        }
        self.eat_while(is_digit_or_separator);
        if self.peek(0) == Some('.') && self.peek(1).is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
            self.eat_while(is_digit_or_separator);
        }
        if matches!(self.peek(0), Some('e' | 'E')) {
            let mut j = 1;
            if matches!(self.peek(j), Some('+' | '-')) {
                j += 1;
            }
            if self.peek(j).is_some_and(|c| c.is_ascii_digit()) {
                self.pos += j;
                self.eat_while(is_digit_or_separator);
            }
        }
    }
}

fn is_digit_or_separator(c: char) -> bool {
    c.is_ascii_digit() || c == '_'
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_identifier_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

const fn is_operator(c: char) -> bool {
    matches!(
        c,
        '+' | '-' | '*' | '/' | '%' | '=' | '!' | '<' | '>' | '&' | '|' | '^' | '~' | '?' | ':'
            | '.' | '#'
    )
}

fn classify_identifier(word: &str) -> TokenKind {
    let lower = word.to_lowercase();
    if KEYWORDS.contains(&lower.as_str()) {
        TokenKind::Keyword
    } else if BUILTIN_TYPES.contains(&lower.as_str()) {
        TokenKind::BuiltinType
    } else if is_type_name(word) {
        TokenKind::TypeName
    } else {
        TokenKind::Plain
    }
}

fn is_type_name(word: &str) -> bool {
    word.chars().next().is_some_and(char::is_uppercase) && word.chars().all(is_identifier_part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::Segment;

    fn kinds(line: &str) -> Vec<(TokenKind, String)> {
        let (hl, _) = highlight_line(line, LexState::default());
        hl.segments()
            .iter()
            .map(|s| (s.kind, s.text.clone()))
            .collect()
    }

    fn seg(kind: TokenKind, text: &str) -> (TokenKind, String) {
        (kind, text.to_string())
    }

    // --- Identifiers ---

    #[test]
    fn test_keywords_types_and_plain_identifiers() {
        assert_eq!(
            kinds("let x: int = Foo"),
            vec![
                seg(TokenKind::Keyword, "let"),
                seg(TokenKind::Plain, " x"),
                seg(TokenKind::Operator, ":"),
                seg(TokenKind::Plain, " "),
                seg(TokenKind::BuiltinType, "int"),
                seg(TokenKind::Plain, " "),
                seg(TokenKind::Operator, "="),
                seg(TokenKind::Plain, " "),
                seg(TokenKind::TypeName, "Foo"),
            ]
        );
    }

    #[test]
    fn test_keywords_match_case_insensitively() {
        assert_eq!(kinds("RETURN"), vec![seg(TokenKind::Keyword, "RETURN")]);
        assert_eq!(kinds("Bool"), vec![seg(TokenKind::BuiltinType, "Bool")]);
    }

    #[test]
    fn test_attribute() {
        assert_eq!(
            kinds("@inline fn"),
            vec![
                seg(TokenKind::Attribute, "@inline"),
                seg(TokenKind::Plain, " "),
                seg(TokenKind::Keyword, "fn"),
            ]
        );
    }

    // --- Comments ---

    #[test]
    fn test_directive_takes_rest_of_line() {
        assert_eq!(
            kinds("x /// doc"),
            vec![
                seg(TokenKind::Plain, "x "),
                seg(TokenKind::Directive, "/// doc"),
            ]
        );
    }

    #[test]
    fn test_line_comment_takes_rest_of_line() {
        assert_eq!(
            kinds("a // \"not a string\""),
            vec![
                seg(TokenKind::Plain, "a "),
                seg(TokenKind::Comment, "// \"not a string\""),
            ]
        );
    }

    #[test]
    fn test_block_comment_closed_on_same_line() {
        let (hl, state) = highlight_line("/* a */ b", LexState::default());
        assert_eq!(state, LexState::default());
        assert_eq!(hl.segments()[0].kind, TokenKind::Comment);
        assert_eq!(hl.segments()[0].text, "/* a */");
    }

    #[test]
    fn test_nested_block_comment_tracks_depth() {
        let (_, state) = highlight_line("/* outer /* inner */", LexState::default());
        assert_eq!(state.block_comment_depth, 1);
        let (hl, state) = highlight_line("still */ x", state);
        assert_eq!(state.block_comment_depth, 0);
        assert_eq!(hl.segments()[0].text, "still */");
        assert_eq!(hl.segments()[0].kind, TokenKind::Comment);
    }

    #[test]
    fn test_block_comment_carries_across_lines() {
        let (first, state) = highlight_line("/* start", LexState::default());
        assert_eq!(first.segments(), &[Segment::new(TokenKind::Comment, "/* start")]);
        assert_eq!(state.block_comment_depth, 1);

        let (second, state) = highlight_line("end */ x", state);
        assert_eq!(
            second
                .segments()
                .iter()
                .map(|s| (s.kind, s.text.as_str()))
                .collect::<Vec<_>>(),
            vec![(TokenKind::Comment, "end */"), (TokenKind::Plain, " x")]
        );
        assert_eq!(state.block_comment_depth, 0);
    }

    // --- Strings ---

    #[test]
    fn test_string_with_escaped_quote() {
        assert_eq!(
            kinds(r#"s = "a\"b" + 1"#),
            vec![
                seg(TokenKind::Plain, "s "),
                seg(TokenKind::Operator, "="),
                seg(TokenKind::Plain, " "),
                seg(TokenKind::String, r#""a\"b""#),
                seg(TokenKind::Plain, " "),
                seg(TokenKind::Operator, "+"),
                seg(TokenKind::Plain, " "),
                seg(TokenKind::Number, "1"),
            ]
        );
    }

    #[test]
    fn test_unterminated_string_carries_to_next_line() {
        let (_, state) = highlight_line("x = \"open", LexState::default());
        assert!(state.in_unterminated_string);
        let (hl, state) = highlight_line("still\" done", state);
        assert!(!state.in_unterminated_string);
        assert_eq!(hl.segments()[0].kind, TokenKind::String);
        assert_eq!(hl.segments()[0].text, "still\"");
    }

    // --- Numbers ---

    #[test]
    fn test_number_forms() {
        for literal in ["42", "1_000", "0xFF_ff", "0b1010", "3.14", ".5", "1e10", "2.5E-3"] {
            assert_eq!(
                kinds(literal),
                vec![seg(TokenKind::Number, literal)],
                "literal {literal}"
            );
        }
    }

    #[test]
    fn test_trailing_dot_is_not_part_of_number() {
        assert_eq!(
            kinds("1.x"),
            vec![
                seg(TokenKind::Number, "1"),
                seg(TokenKind::Operator, "."),
                seg(TokenKind::Plain, "x"),
            ]
        );
    }

    #[test]
    fn test_exponent_without_digit_is_not_consumed() {
        assert_eq!(
            kinds("1e+"),
            vec![
                seg(TokenKind::Number, "1"),
                seg(TokenKind::Plain, "e"),
                seg(TokenKind::Operator, "+"),
            ]
        );
    }

    // --- Operators ---

    #[test]
    fn test_operator_run_stops_before_comment() {
        assert_eq!(
            kinds("a =// c"),
            vec![
                seg(TokenKind::Plain, "a "),
                seg(TokenKind::Operator, "="),
                seg(TokenKind::Comment, "// c"),
            ]
        );
    }

    #[test]
    fn test_fallback_char_is_plain() {
        assert_eq!(kinds("(x)"), vec![seg(TokenKind::Plain, "(x)")]);
    }
}
