// Copyright (C) Brian G. Milnes 2025

//! Lossless lexer for PHP
//!
//! Every byte of the input ends up in exactly one token, trivia included,
//! so concatenating the token texts gives back the source. The parser
//! classifies grammar leaves with `classify`.

pub mod lexer {
    use crate::syntax_kind::syntax_kind::SyntaxKind::{self, *};

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Token {
        pub kind: SyntaxKind,
        pub text: String,
    }

    /// Longest operators first so that prefixes never shadow them.
    const OPERATORS: &[(&str, SyntaxKind)] = &[
        ("**=", STAR2_EQ),
        ("<<=", SHL_EQ),
        (">>=", SHR_EQ),
        ("<=>", SPACESHIP),
        ("...", ELLIPSIS),
        ("===", EQ3),
        ("!==", NEQ2),
        ("??=", QUESTION2_EQ),
        ("?->", NULLSAFE_ARROW),
        ("->", ARROW),
        ("=>", FAT_ARROW),
        ("::", COLON2),
        ("&&", AMP2),
        ("||", PIPE2),
        ("==", EQ2),
        ("!=", NEQ),
        ("<>", NEQ),
        ("<=", LTEQ),
        (">=", GTEQ),
        ("+=", PLUS_EQ),
        ("-=", MINUS_EQ),
        ("*=", STAR_EQ),
        ("/=", SLASH_EQ),
        (".=", DOT_EQ),
        ("%=", PERCENT_EQ),
        ("&=", AMP_EQ),
        ("|=", PIPE_EQ),
        ("^=", CARET_EQ),
        ("**", STAR2),
        ("<<", SHL),
        (">>", SHR),
        ("??", QUESTION2),
        ("++", PLUS2),
        ("--", MINUS2),
        ("(", L_PAREN),
        (")", R_PAREN),
        ("[", L_BRACK),
        ("]", R_BRACK),
        ("{", L_CURLY),
        ("}", R_CURLY),
        (";", SEMICOLON),
        (",", COMMA),
        ("?", QUESTION),
        (":", COLON),
        ("@", AT),
        ("=", EQ),
        ("!", BANG),
        ("<", LT),
        (">", GT),
        ("+", PLUS),
        ("-", MINUS),
        ("*", STAR),
        ("/", SLASH),
        ("%", PERCENT),
        (".", DOT),
        ("&", AMP),
        ("|", PIPE),
        ("^", CARET),
        ("~", TILDE),
        ("$", DOLLAR),
        ("\\", BACKSLASH),
    ];

    /// Tokenize a whole file: text before `<?php` is inline HTML.
    pub fn tokenize(source: &str) -> Vec<Token> {
        Lexer::new(source, false).run()
    }

    /// Tokenize a snippet that is already PHP code (no open tag needed).
    pub fn tokenize_php(source: &str) -> Vec<Token> {
        Lexer::new(source, true).run()
    }

    /// Kind of `text` when it lexes as exactly one PHP token.
    pub fn classify(text: &str) -> Option<SyntaxKind> {
        match tokenize_php(text).as_slice() {
            [only] if only.kind != ERROR_TOKEN => Some(only.kind),
            _ => None,
        }
    }

    struct Lexer<'a> {
        src: &'a str,
        pos: usize,
        in_php: bool,
        tokens: Vec<Token>,
    }

    impl<'a> Lexer<'a> {
        fn new(src: &'a str, in_php: bool) -> Self {
            Lexer { src, pos: 0, in_php, tokens: Vec::new() }
        }

        fn run(mut self) -> Vec<Token> {
            while self.pos < self.src.len() {
                if self.in_php {
                    self.php_token();
                } else {
                    self.inline_html();
                }
            }
            self.tokens
        }

        fn rest(&self) -> &'a str {
            &self.src[self.pos..]
        }

        fn peek_char(&self) -> Option<char> {
            self.rest().chars().next()
        }

        fn push(&mut self, kind: SyntaxKind, len: usize) {
            let text = self.src[self.pos..self.pos + len].to_string();
            self.tokens.push(Token { kind, text });
            self.pos += len;
        }

        fn inline_html(&mut self) {
            let rest = self.rest();
            match find_ascii_ci(rest, "<?php") {
                Some(0) => {
                    self.push(OPEN_TAG, 5);
                    self.in_php = true;
                }
                Some(at) => self.push(INLINE_HTML, at),
                None => self.push(INLINE_HTML, rest.len()),
            }
        }

        fn php_token(&mut self) {
            let rest = self.rest();
            let Some(c) = self.peek_char() else { return };

            if rest.starts_with("?>") {
                let mut len = 2;
                if rest[2..].starts_with('\n') {
                    len += 1;
                }
                self.push(CLOSE_TAG, len);
                self.in_php = false;
                return;
            }

            if c.is_whitespace() {
                let len = rest.find(|ch: char| !ch.is_whitespace()).unwrap_or(rest.len());
                self.push(WHITESPACE, len);
                return;
            }

            if rest.starts_with("#[") {
                let len = attribute_len(rest);
                self.push(COMMENT, len);
                return;
            }

            if rest.starts_with("<<<") {
                if let Some(len) = heredoc_len(rest) {
                    self.push(HEREDOC, len);
                    return;
                }
            }

            if c == '`' {
                let len = string_len(rest, '`');
                match len {
                    Some(len) => self.push(SHELL_COMMAND, len),
                    None => self.push(ERROR_TOKEN, rest.len()),
                }
                return;
            }

            if rest.starts_with("//") || c == '#' {
                let len = line_comment_len(rest);
                self.push(COMMENT, len);
                return;
            }

            if rest.starts_with("/*") {
                let len = rest[2..].find("*/").map(|at| at + 4).unwrap_or(rest.len());
                self.push(COMMENT, len);
                return;
            }

            if c == '$' {
                let len = ident_len(&rest[1..]);
                if len > 0 {
                    self.push(VAR_NAME, len + 1);
                } else {
                    self.push(DOLLAR, 1);
                }
                return;
            }

            if c == '\'' || c == '"' {
                let len = string_len(rest, c);
                match len {
                    Some(len) => self.push(STRING, len),
                    None => self.push(ERROR_TOKEN, rest.len()),
                }
                return;
            }

            if c.is_ascii_digit() || (c == '.' && rest[1..].starts_with(|ch: char| ch.is_ascii_digit())) {
                let (kind, len) = number(rest);
                self.push(kind, len);
                return;
            }

            if is_ident_start(c) || (c == '\\' && rest[1..].starts_with(is_ident_start)) {
                let len = qualified_name_len(rest);
                let text = &rest[..len];
                let kind = if text.contains('\\') {
                    IDENT
                } else {
                    SyntaxKind::from_keyword(text).unwrap_or(IDENT)
                };
                self.push(kind, len);
                return;
            }

            for (op, kind) in OPERATORS {
                if rest.starts_with(op) {
                    self.push(*kind, op.len());
                    return;
                }
            }

            self.push(ERROR_TOKEN, c.len_utf8());
        }
    }

    fn find_ascii_ci(haystack: &str, needle: &str) -> Option<usize> {
        let lower = haystack.to_ascii_lowercase();
        lower.find(needle)
    }

    fn line_comment_len(rest: &str) -> usize {
        let mut end = rest.find('\n').unwrap_or(rest.len());
        if let Some(close) = rest[..end].find("?>") {
            end = close;
        }
        end
    }

    /// `#[Attr(...)]` is kept as a comment; brackets nest.
    fn attribute_len(rest: &str) -> usize {
        let mut depth = 0usize;
        for (at, c) in rest.char_indices().skip(1) {
            match c {
                '[' => depth += 1,
                ']' => {
                    depth -= 1;
                    if depth == 0 {
                        return at + 1;
                    }
                }
                _ => {}
            }
        }
        rest.len()
    }

    /// `<<<EOT`, `<<<"EOT"` or `<<<'EOT'` up to and including the closing
    /// marker, which may be indented.
    fn heredoc_len(rest: &str) -> Option<usize> {
        let head = rest[3..].trim_start_matches([' ', '\t']);
        let opener = rest.len() - head.len();
        let quote = head.chars().next().filter(|c| *c == '\'' || *c == '"');
        let name_at = opener + quote.map_or(0, |q| q.len_utf8());
        let name_len = ident_len(&rest[name_at..]);
        if name_len == 0 {
            return None;
        }
        let label = &rest[name_at..name_at + name_len];
        let mut at = name_at + name_len + quote.map_or(0, |q| q.len_utf8());
        at += rest[at..].find('\n')? + 1;
        loop {
            let line_end = rest[at..].find('\n').map_or(rest.len(), |n| at + n);
            let line = &rest[at..line_end];
            let body = line.trim_start_matches([' ', '\t']);
            let indent = line.len() - body.len();
            if body.starts_with(label) && !body[label.len()..].starts_with(is_ident_continue) {
                return Some(at + indent + label.len());
            }
            if line_end == rest.len() {
                return None;
            }
            at = line_end + 1;
        }
    }

    fn is_ident_start(c: char) -> bool {
        c == '_' || c.is_ascii_alphabetic() || !c.is_ascii()
    }

    fn is_ident_continue(c: char) -> bool {
        c == '_' || c.is_ascii_alphanumeric() || !c.is_ascii()
    }

    fn ident_len(rest: &str) -> usize {
        let mut chars = rest.char_indices();
        match chars.next() {
            Some((_, c)) if is_ident_start(c) => {}
            _ => return 0,
        }
        rest.char_indices()
            .find(|(_, c)| !is_ident_continue(*c))
            .map(|(at, _)| at)
            .unwrap_or(rest.len())
    }

    /// `Foo`, `\Foo`, `Foo\Bar`, `\Foo\Bar\baz`
    fn qualified_name_len(rest: &str) -> usize {
        let mut len = 0;
        loop {
            let tail = &rest[len..];
            if tail.starts_with('\\') && tail[1..].starts_with(is_ident_start) {
                len += 1;
                continue;
            }
            let part = ident_len(tail);
            if part == 0 {
                break;
            }
            len += part;
            if !(rest[len..].starts_with('\\') && rest[len + 1..].starts_with(is_ident_start)) {
                break;
            }
        }
        len
    }

    fn string_len(rest: &str, quote: char) -> Option<usize> {
        let mut escaped = false;
        for (at, c) in rest.char_indices().skip(1) {
            if escaped {
                escaped = false;
                continue;
            }
            if c == '\\' {
                escaped = true;
            } else if c == quote {
                return Some(at + 1);
            }
        }
        None
    }

    fn number(rest: &str) -> (SyntaxKind, usize) {
        let bytes = rest.as_bytes();
        if bytes.len() > 2 && bytes[0] == b'0' && matches!(bytes[1], b'x' | b'X' | b'b' | b'B' | b'o' | b'O') {
            let len = 2 + rest[2..]
                .find(|c: char| !(c.is_ascii_hexdigit() || c == '_'))
                .unwrap_or(rest.len() - 2);
            return (INT_NUMBER, len);
        }

        let digits = |s: &str| s.find(|c: char| !(c.is_ascii_digit() || c == '_')).unwrap_or(s.len());
        let mut len = digits(rest);
        let mut kind = INT_NUMBER;
        if rest[len..].starts_with('.') && rest[len + 1..].starts_with(|c: char| c.is_ascii_digit()) {
            len += 1 + digits(&rest[len + 1..]);
            kind = FLOAT_NUMBER;
        } else if len == 0 && rest.starts_with('.') {
            len = 1 + digits(&rest[1..]);
            kind = FLOAT_NUMBER;
        }
        let tail = &rest[len..];
        if tail.starts_with(['e', 'E']) {
            let sign = usize::from(tail[1..].starts_with(['+', '-']));
            let exp = digits(&tail[1 + sign..]);
            if exp > 0 {
                len += 1 + sign + exp;
                kind = FLOAT_NUMBER;
            }
        }
        (kind, len)
    }
}
