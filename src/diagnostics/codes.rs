// src/diagnostics/codes.rs

/// Represents a specific error code with its associated information.
/// This struct serves as the single source of truth for all parser diagnostics.
#[derive(Debug, Clone)]
pub struct ErrorCode {
    pub code: &'static str,
    pub message: &'static str,
    pub explanation: &'static str,
}

/*
E00xx: 词法分析 (Lexical Analysis) 错误。

E01xx: 语法分析 (Parsing / Syntax) 错误。

E02xx: 资源限制 (Resource) 错误。
*/
// --- E00xx: Lexical Analysis Errors ---

pub const E0000_INVALID_CHARACTER: ErrorCode = ErrorCode {
    code: "E0000",
    message: "Invalid character",
    explanation: "The lexer encountered a character that is not part of the Mo language definition. \
                  The character is skipped and scanning continues with the next one.",
};

pub const E0001_UNTERMINATED_STRING: ErrorCode = ErrorCode {
    code: "E0001",
    message: "Unterminated string literal",
    explanation: "A string literal must be closed by a `\"` on the same line. \
                  The literal is treated as ending at the end of the line.",
};

pub const E0002_INVALID_ESCAPE: ErrorCode = ErrorCode {
    code: "E0002",
    message: "Invalid escape sequence",
    explanation: "Only `\\\"`, `\\\\`, `\\n`, `\\r`, `\\t`, `\\0` and `\\'` are valid escapes inside a Mo string literal. \
                  The offending escape is kept verbatim.",
};

pub const E0003_INVALID_NUMBER_LITERAL: ErrorCode = ErrorCode {
    code: "E0003",
    message: "Invalid number literal",
    explanation: "Number literals are decimal (`42`), fractional (`4.2`), hexadecimal (`0x2A`), octal (`0o52`) \
                  or binary (`0b101010`). Digits must be valid for the chosen base; `_` may be used as a separator.",
};

// --- E01xx: Syntax Analysis (Parsing) Errors ---

pub const E0100_UNEXPECTED_TOKEN: ErrorCode = ErrorCode {
    code: "E0100",
    message: "Unexpected token",
    explanation: "The token does not start any construct that is valid at this position. \
                  The parser skips to the next line break or closing brace and continues.",
};

pub const E0101_MISSING_EXPECTED_TOKEN: ErrorCode = ErrorCode {
    code: "E0101",
    message: "Missing expected token",
    explanation: "The construct being parsed requires a specific token here, such as a closing `)` or `}`, \
                  an identifier or a type.",
};

pub const E0102_AMBIGUOUS_CONSTRUCT: ErrorCode = ErrorCode {
    code: "E0102",
    message: "Ambiguous construct",
    explanation: "The statement could be read in more than one way and none of the readings is valid. \
                  For example, in a compound assignment the operator and `=` must be written together (`x += 1`).",
};

// --- E02xx: Resource Errors ---

pub const E0200_RECURSION_LIMIT_EXCEEDED: ErrorCode = ErrorCode {
    code: "E0200",
    message: "Nesting limit exceeded",
    explanation: "The source nests expressions, blocks or types deeper than the configured maximum depth. \
                  The innermost construct is replaced by an error node and parsing continues after it.",
};

pub const E0201_TOKEN_LIMIT_EXCEEDED: ErrorCode = ErrorCode {
    code: "E0201",
    message: "Token limit exceeded",
    explanation: "The source contains more tokens than the configured budget. Tokens past the budget are ignored.",
};

/// 错误码表中的全部条目，按编号排列。
pub const ALL: &[&ErrorCode] = &[
    &E0000_INVALID_CHARACTER,
    &E0001_UNTERMINATED_STRING,
    &E0002_INVALID_ESCAPE,
    &E0003_INVALID_NUMBER_LITERAL,
    &E0100_UNEXPECTED_TOKEN,
    &E0101_MISSING_EXPECTED_TOKEN,
    &E0102_AMBIGUOUS_CONSTRUCT,
    &E0200_RECURSION_LIMIT_EXCEEDED,
    &E0201_TOKEN_LIMIT_EXCEEDED,
];

/// 按编号查找错误码，大小写不敏感（`e0102` 和 `E0102` 都可以）。
pub fn lookup(code: &str) -> Option<&'static ErrorCode> {
    ALL.iter()
        .copied()
        .find(|entry| entry.code.eq_ignore_ascii_case(code))
}
