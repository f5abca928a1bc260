// Copyright (C) Brian G. Milnes 2025

//! Tests for the lexer

use phpinspect::lexer::lexer::{classify, tokenize, tokenize_php, Token};
use phpinspect::SyntaxKind::{self, *};

fn kinds(tokens: &[Token]) -> Vec<SyntaxKind> {
    tokens.iter().filter(|t| !t.kind.is_trivia()).map(|t| t.kind).collect()
}

fn concat(tokens: &[Token]) -> String {
    tokens.iter().map(|t| t.text.as_str()).collect()
}

#[test]
fn test_tokens_cover_every_byte() {
    let source = "<html>\n<?php\n// line\n# hash\n/* block */\n#[Attr([1, 2])]\n$a = \"x\\\"y\" . 'z';\n?>\n</html>\n";
    let tokens = tokenize(source);
    assert_eq!(concat(&tokens), source);
    assert_eq!(tokens[0].kind, INLINE_HTML);
    assert_eq!(tokens[1].kind, OPEN_TAG);
    assert!(tokens.iter().any(|t| t.kind == CLOSE_TAG && t.text == "?>\n"));
    assert_eq!(tokens.last().unwrap().kind, INLINE_HTML);
}

#[test]
fn test_attribute_is_a_single_comment() {
    let tokens = tokenize_php("#[Route('/a', methods: ['GET'])] function");
    assert_eq!(tokens[0].kind, COMMENT);
    assert_eq!(tokens[0].text, "#[Route('/a', methods: ['GET'])]");
    assert_eq!(kinds(&tokens), vec![FUNCTION_KW]);
}

#[test]
fn test_keywords_are_case_insensitive() {
    let tokens = tokenize_php("IF Else and OR instanceof ISSET null");
    assert_eq!(kinds(&tokens), vec![IF_KW, ELSE_KW, AND_KW, OR_KW, INSTANCEOF_KW, ISSET_KW, NULL_KW]);
}

#[test]
fn test_longest_operator_wins() {
    let tokens = tokenize_php("!== === != <> ?-> -> => ?? ??= ... :: && ||");
    assert_eq!(
        kinds(&tokens),
        vec![NEQ2, EQ3, NEQ, NEQ, NULLSAFE_ARROW, ARROW, FAT_ARROW, QUESTION2, QUESTION2_EQ, ELLIPSIS, COLON2, AMP2, PIPE2]
    );
}

#[test]
fn test_numbers() {
    let tokens = tokenize_php("42 0x1F 0b101 1_000 1.5 .5 1e3 2.5E-2");
    assert_eq!(
        kinds(&tokens),
        vec![INT_NUMBER, INT_NUMBER, INT_NUMBER, INT_NUMBER, FLOAT_NUMBER, FLOAT_NUMBER, FLOAT_NUMBER, FLOAT_NUMBER]
    );
}

#[test]
fn test_qualified_names_are_one_token() {
    let tokens = tokenize_php("\\Foo\\Bar Baz\\qux strlen");
    let names: Vec<&str> = tokens.iter().filter(|t| t.kind == IDENT).map(|t| t.text.as_str()).collect();
    assert_eq!(names, vec!["\\Foo\\Bar", "Baz\\qux", "strlen"]);
}

#[test]
fn test_variables_and_strings() {
    let tokens = tokenize_php("$this->name = 'it\\'s';");
    assert_eq!(kinds(&tokens), vec![VAR_NAME, ARROW, IDENT, EQ, STRING, SEMICOLON]);
    assert_eq!(tokens[0].text, "$this");
    let string = tokens.iter().find(|t| t.kind == STRING).unwrap();
    assert_eq!(string.text, "'it\\'s'");
}

#[test]
fn test_unterminated_string_is_an_error_token() {
    let tokens = tokenize_php("$a = 'open");
    let last = tokens.last().unwrap();
    assert_eq!(last.kind, ERROR_TOKEN);
    assert_eq!(last.text, "'open");
}

#[test]
fn test_text_before_open_tag_is_inline_html() {
    let tokens = tokenize("no php here");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, INLINE_HTML);
}

#[test]
fn test_line_comment_stops_at_close_tag() {
    let tokens = tokenize("<?php // note ?>after");
    let comment = tokens.iter().find(|t| t.kind == COMMENT).unwrap();
    assert_eq!(comment.text, "// note ");
    assert!(tokens.iter().any(|t| t.kind == CLOSE_TAG));
    assert_eq!(tokens.last().unwrap().text, "after");
}

#[test]
fn test_heredoc_and_shell_command_are_single_tokens() {
    let tokens = tokenize_php("$a = <<<EOT\nline $x\n  EOT;\n$b = `ls -l`;");
    let heredoc = tokens.iter().find(|t| t.kind == HEREDOC).unwrap();
    assert_eq!(heredoc.text, "<<<EOT\nline $x\n  EOT");
    assert!(tokens.iter().any(|t| t.kind == SHELL_COMMAND && t.text == "`ls -l`"));
    assert_eq!(kinds(&tokens).last(), Some(&SEMICOLON));
}

#[test]
fn test_classify_single_tokens() {
    assert_eq!(classify("ElseIf"), Some(ELSEIF_KW));
    assert_eq!(classify("**="), Some(STAR2_EQ));
    assert_eq!(classify("<=>"), Some(SPACESHIP));
    assert_eq!(classify("$"), Some(DOLLAR));
    assert_eq!(classify("\\Foo\\Bar"), Some(IDENT));
    assert_eq!(classify("?>"), Some(CLOSE_TAG));
    assert_eq!(classify("a b"), None);
    assert_eq!(classify(""), None);
}
