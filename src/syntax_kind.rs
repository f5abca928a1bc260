// Copyright (C) Brian G. Milnes 2025

//! Syntax kinds for the PHP subset understood by phpinspect
//!
//! One closed enumeration covers both token kinds and node kinds, in the
//! style of rust-analyzer's `SyntaxKind`. Token kinds come first; every kind
//! declared before `SOURCE_FILE` is a token.

pub mod syntax_kind {
    use serde::Serialize;

    #[allow(non_camel_case_types)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
    #[repr(u16)]
    pub enum SyntaxKind {
        // Trivia and markup
        WHITESPACE,
        COMMENT,
        INLINE_HTML,
        OPEN_TAG,
        CLOSE_TAG,

        // Atoms
        VAR_NAME,
        IDENT,
        STRING,
        INT_NUMBER,
        FLOAT_NUMBER,
        HEREDOC,
        SHELL_COMMAND,

        // Punctuation
        L_PAREN,
        R_PAREN,
        L_BRACK,
        R_BRACK,
        L_CURLY,
        R_CURLY,
        SEMICOLON,
        COMMA,
        ARROW,
        NULLSAFE_ARROW,
        COLON2,
        FAT_ARROW,
        QUESTION,
        COLON,
        ELLIPSIS,
        AT,
        DOLLAR,
        BACKSLASH,

        // Assignment operators
        EQ,
        PLUS_EQ,
        MINUS_EQ,
        STAR_EQ,
        SLASH_EQ,
        DOT_EQ,
        PERCENT_EQ,
        QUESTION2_EQ,
        STAR2_EQ,
        SHL_EQ,
        SHR_EQ,
        AMP_EQ,
        PIPE_EQ,
        CARET_EQ,

        // Operators
        AMP2,
        PIPE2,
        BANG,
        EQ2,
        EQ3,
        NEQ,
        NEQ2,
        LT,
        GT,
        LTEQ,
        GTEQ,
        PLUS,
        MINUS,
        STAR,
        SLASH,
        PERCENT,
        DOT,
        AMP,
        PIPE,
        CARET,
        TILDE,
        STAR2,
        SHL,
        SHR,
        SPACESHIP,
        QUESTION2,
        PLUS2,
        MINUS2,

        // Keywords
        ABSTRACT_KW,
        AND_KW,
        ARRAY_KW,
        AS_KW,
        BREAK_KW,
        CASE_KW,
        CATCH_KW,
        CLASS_KW,
        CLONE_KW,
        CONST_KW,
        CONTINUE_KW,
        DECLARE_KW,
        DEFAULT_KW,
        DO_KW,
        ECHO_KW,
        ELSE_KW,
        ELSEIF_KW,
        EMPTY_KW,
        ENDFOR_KW,
        ENDFOREACH_KW,
        ENDIF_KW,
        ENDSWITCH_KW,
        ENDWHILE_KW,
        ENUM_KW,
        EXIT_KW,
        EXTENDS_KW,
        FALSE_KW,
        FINAL_KW,
        FINALLY_KW,
        FN_KW,
        FOR_KW,
        FOREACH_KW,
        FUNCTION_KW,
        GLOBAL_KW,
        GOTO_KW,
        IF_KW,
        IMPLEMENTS_KW,
        INCLUDE_KW,
        INSTANCEOF_KW,
        INSTEADOF_KW,
        INTERFACE_KW,
        ISSET_KW,
        LIST_KW,
        MATCH_KW,
        NAMESPACE_KW,
        NEW_KW,
        NULL_KW,
        OR_KW,
        PRINT_KW,
        PRIVATE_KW,
        PROTECTED_KW,
        PUBLIC_KW,
        RETURN_KW,
        STATIC_KW,
        SWITCH_KW,
        THROW_KW,
        TRAIT_KW,
        TRUE_KW,
        TRY_KW,
        UNSET_KW,
        USE_KW,
        WHILE_KW,
        XOR_KW,
        YIELD_KW,

        ERROR_TOKEN,

        // Nodes
        SOURCE_FILE,
        BLOCK,
        EXPR_STMT,
        EMPTY_STMT,
        ECHO_STMT,
        IF_STMT,
        ELSE_IF_CLAUSE,
        ELSE_CLAUSE,
        FOR_STMT,
        FOREACH_STMT,
        WHILE_STMT,
        DO_WHILE_STMT,
        RETURN_STMT,
        BREAK_STMT,
        TRY_STMT,
        CATCH_CLAUSE,
        FINALLY_CLAUSE,
        SWITCH_STMT,
        CASE_CLAUSE,
        GLOBAL_STMT,
        CONTINUE_STMT,
        UNSET_STMT,
        DECLARE_STMT,
        LABEL_STMT,
        GOTO_STMT,
        FUNCTION_DECL,
        METHOD_DECL,
        CLASS_DECL,
        INTERFACE_DECL,
        TRAIT_DECL,
        ENUM_DECL,
        ENUM_CASE,
        PROPERTY_DECL,
        CONST_DECL,
        NAMESPACE_DECL,
        USE_DECL,
        USE_ITEM,
        EXTENDS_LIST,
        IMPLEMENTS_LIST,
        PARAM_LIST,
        PARAM,
        CLOSURE_USE,
        TYPE_REF,
        ASSIGN_EXPR,
        BINARY_EXPR,
        UNARY_EXPR,
        POSTFIX_EXPR,
        CAST_EXPR,
        TERNARY_EXPR,
        PAREN_EXPR,
        CALL_EXPR,
        METHOD_CALL_EXPR,
        STATIC_CALL_EXPR,
        PROPERTY_FETCH,
        STATIC_PROPERTY_FETCH,
        CLASS_CONST_FETCH,
        ARRAY_ACCESS_EXPR,
        NEW_EXPR,
        ISSET_EXPR,
        EMPTY_EXPR,
        CLOSURE_EXPR,
        ARROW_FN_EXPR,
        MATCH_EXPR,
        MATCH_ARM,
        YIELD_EXPR,
        SHELL_EXPR,
        ARRAY_EXPR,
        ARRAY_ELEMENT,
        ARG_LIST,
        LITERAL,
        VARIABLE,
        NAME,
        NAME_REF,
        // Text the parser could not place
        ERROR,
    }

    use SyntaxKind::*;

    impl SyntaxKind {
        pub fn is_token(self) -> bool {
            (self as u16) < (SOURCE_FILE as u16)
        }

        pub fn is_trivia(self) -> bool {
            matches!(self, WHITESPACE | COMMENT)
        }

        pub fn is_keyword(self) -> bool {
            (self as u16) >= (ABSTRACT_KW as u16) && (self as u16) <= (YIELD_KW as u16)
        }

        pub fn is_assignment_op(self) -> bool {
            matches!(
                self,
                EQ | PLUS_EQ
                    | MINUS_EQ
                    | STAR_EQ
                    | SLASH_EQ
                    | DOT_EQ
                    | PERCENT_EQ
                    | QUESTION2_EQ
                    | STAR2_EQ
                    | SHL_EQ
                    | SHR_EQ
                    | AMP_EQ
                    | PIPE_EQ
                    | CARET_EQ
            )
        }

        /// `&&`, `||`, `and`, `or`
        pub fn is_logical_op(self) -> bool {
            matches!(self, AMP2 | PIPE2 | AND_KW | OR_KW)
        }

        pub fn is_equality_op(self) -> bool {
            matches!(self, EQ2 | EQ3 | NEQ | NEQ2)
        }

        pub fn is_loop(self) -> bool {
            matches!(self, FOR_STMT | FOREACH_STMT | WHILE_STMT | DO_WHILE_STMT)
        }

        pub fn is_function_like(self) -> bool {
            matches!(self, FUNCTION_DECL | METHOD_DECL | CLOSURE_EXPR | ARROW_FN_EXPR)
        }

        pub fn is_class_like(self) -> bool {
            matches!(self, CLASS_DECL | INTERFACE_DECL | TRAIT_DECL | ENUM_DECL)
        }

        pub fn is_call(self) -> bool {
            matches!(self, CALL_EXPR | METHOD_CALL_EXPR | STATIC_CALL_EXPR)
        }

        pub fn is_statement(self) -> bool {
            matches!(
                self,
                BLOCK
                    | EXPR_STMT
                    | EMPTY_STMT
                    | ECHO_STMT
                    | IF_STMT
                    | FOR_STMT
                    | FOREACH_STMT
                    | WHILE_STMT
                    | DO_WHILE_STMT
                    | RETURN_STMT
                    | BREAK_STMT
                    | TRY_STMT
                    | SWITCH_STMT
                    | GLOBAL_STMT
                    | CONTINUE_STMT
                    | FUNCTION_DECL
                    | CLASS_DECL
                    | INTERFACE_DECL
                    | TRAIT_DECL
                    | ENUM_DECL
                    | CONST_DECL
                    | NAMESPACE_DECL
                    | USE_DECL
                    | UNSET_STMT
                    | DECLARE_STMT
                    | LABEL_STMT
                    | GOTO_STMT
            )
        }

        /// Keyword lookup, case-insensitive as in PHP.
        pub fn from_keyword(ident: &str) -> Option<SyntaxKind> {
            let kind = match ident.to_ascii_lowercase().as_str() {
                "abstract" => ABSTRACT_KW,
                "and" => AND_KW,
                "array" => ARRAY_KW,
                "as" => AS_KW,
                "break" => BREAK_KW,
                "case" => CASE_KW,
                "catch" => CATCH_KW,
                "class" => CLASS_KW,
                "clone" => CLONE_KW,
                "const" => CONST_KW,
                "continue" => CONTINUE_KW,
                "declare" => DECLARE_KW,
                "default" => DEFAULT_KW,
                "do" => DO_KW,
                "echo" => ECHO_KW,
                "else" => ELSE_KW,
                "elseif" => ELSEIF_KW,
                "empty" => EMPTY_KW,
                "endfor" => ENDFOR_KW,
                "endforeach" => ENDFOREACH_KW,
                "endif" => ENDIF_KW,
                "endswitch" => ENDSWITCH_KW,
                "endwhile" => ENDWHILE_KW,
                "enum" => ENUM_KW,
                "exit" | "die" => EXIT_KW,
                "extends" => EXTENDS_KW,
                "false" => FALSE_KW,
                "final" => FINAL_KW,
                "finally" => FINALLY_KW,
                "fn" => FN_KW,
                "for" => FOR_KW,
                "foreach" => FOREACH_KW,
                "function" => FUNCTION_KW,
                "global" => GLOBAL_KW,
                "goto" => GOTO_KW,
                "if" => IF_KW,
                "implements" => IMPLEMENTS_KW,
                "include" | "include_once" | "require" | "require_once" => INCLUDE_KW,
                "instanceof" => INSTANCEOF_KW,
                "insteadof" => INSTEADOF_KW,
                "interface" => INTERFACE_KW,
                "isset" => ISSET_KW,
                "list" => LIST_KW,
                "match" => MATCH_KW,
                "namespace" => NAMESPACE_KW,
                "new" => NEW_KW,
                "null" => NULL_KW,
                "or" => OR_KW,
                "print" => PRINT_KW,
                "private" => PRIVATE_KW,
                "protected" => PROTECTED_KW,
                "public" => PUBLIC_KW,
                "return" => RETURN_KW,
                "static" => STATIC_KW,
                "switch" => SWITCH_KW,
                "throw" => THROW_KW,
                "trait" => TRAIT_KW,
                "true" => TRUE_KW,
                "try" => TRY_KW,
                "unset" => UNSET_KW,
                "use" => USE_KW,
                "while" => WHILE_KW,
                "xor" => XOR_KW,
                "yield" => YIELD_KW,
                _ => return None,
            };
            Some(kind)
        }
    }
}
