//! Mo 的词法分析器。
//!
//! 分两步完成：先用 logos 生成的扫描器得到原始 token（[`RawToken`]），
//! 再把原始 token 转换成带有行列信息的 [`Token`]，同时完成关键字归类、字面量规范化和词法错误报告。
//! 注释和换行都会作为 token 输出，注释由解析器前的 trivia 过滤器丢弃，换行则保留给语法使用。

// 导入logos分词库
use logos::Logos;
use thiserror::Error;

use crate::diagnostics::{Diagnostic, DiagnosticBag, DiagnosticKind, Label};
use crate::utils::{LineIndex, Span};

mod literal;
pub mod token;

pub use token::*;


/// logos 解析时需要使用的错误类型
#[derive(Debug, Default, Clone, PartialEq, Error)]
pub enum LexingError {
    /// 使用 `#[default]` 来指定当 logos 遇到无法识别的输入时使用哪个变体。
    #[default]
    #[error("invalid character")]
    InvalidCharacter,
}

/// 原始词素定义。只负责切分，不做任何校验。
#[derive(Logos, Debug, PartialEq, Clone, Copy)]
#[logos(error = LexingError)]
// 跳过普通空白（换行不是空白）
#[logos(skip r"[ \t\f]+")]
enum RawToken {
    #[regex(r"//[^\r\n]*")]
    Comment,

    #[regex(r"\r?\n")]
    LineBreak,

    // 字符串不能跨行
    #[regex(r#""([^"\\\r\n]|\\[^\r\n])*""#, priority = 3)]
    String,

    // 到行尾都没有闭合的字符串
    #[regex(r#""([^"\\\r\n]|\\[^\r\n])*\\?"#, priority = 2)]
    UnterminatedString,

    // 故意写得比语法宽松：`12ab`、`0b102` 这类写法整体切成一个 token，再报告为非法数字
    #[regex(r"[0-9][0-9a-zA-Z_]*")]
    Number,

    #[regex(r"[0-9][0-9_]*\.[0-9][0-9a-zA-Z_]*")]
    Float,

    // 关键字先按标识符切分，之后再通过 `Keyword::lookup` 归类
    #[regex("[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    // 运算符号
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("~")]
    Tilde,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("!")]
    Bang,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("=")]
    Assign,
    #[token(":=")]
    ColonAssign,

    // 分割符号
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token(":")]
    Colon,
}

impl RawToken {
    fn fixed_kind(self) -> Option<TokenKind> {
        let kind = match self {
            RawToken::Plus => TokenKind::Operator(Operator::Plus),
            RawToken::Minus => TokenKind::Operator(Operator::Minus),
            RawToken::Star => TokenKind::Operator(Operator::Star),
            RawToken::Slash => TokenKind::Operator(Operator::Slash),
            RawToken::Percent => TokenKind::Operator(Operator::Percent),
            RawToken::Amp => TokenKind::Operator(Operator::Amp),
            RawToken::Pipe => TokenKind::Operator(Operator::Pipe),
            RawToken::Caret => TokenKind::Operator(Operator::Caret),
            RawToken::Tilde => TokenKind::Operator(Operator::Tilde),
            RawToken::Shl => TokenKind::Operator(Operator::Shl),
            RawToken::Shr => TokenKind::Operator(Operator::Shr),
            RawToken::Bang => TokenKind::Operator(Operator::Bang),
            RawToken::EqEq => TokenKind::Operator(Operator::EqEq),
            RawToken::NotEq => TokenKind::Operator(Operator::NotEq),
            RawToken::Lt => TokenKind::Operator(Operator::Lt),
            RawToken::Gt => TokenKind::Operator(Operator::Gt),
            RawToken::LtEq => TokenKind::Operator(Operator::LtEq),
            RawToken::GtEq => TokenKind::Operator(Operator::GtEq),
            RawToken::Assign => TokenKind::Operator(Operator::Assign),
            RawToken::ColonAssign => TokenKind::Operator(Operator::ColonAssign),
            RawToken::LParen => TokenKind::Punctuation(Punctuation::LParen),
            RawToken::RParen => TokenKind::Punctuation(Punctuation::RParen),
            RawToken::LBrace => TokenKind::Punctuation(Punctuation::LBrace),
            RawToken::RBrace => TokenKind::Punctuation(Punctuation::RBrace),
            RawToken::LBracket => TokenKind::Punctuation(Punctuation::LBracket),
            RawToken::RBracket => TokenKind::Punctuation(Punctuation::RBracket),
            RawToken::Comma => TokenKind::Punctuation(Punctuation::Comma),
            RawToken::Dot => TokenKind::Punctuation(Punctuation::Dot),
            RawToken::Colon => TokenKind::Punctuation(Punctuation::Colon),
            RawToken::Comment => TokenKind::Comment,
            RawToken::LineBreak => TokenKind::LineBreak,
            RawToken::String
            | RawToken::UnterminatedString
            | RawToken::Number
            | RawToken::Float
            | RawToken::Ident => return None,
        };
        Some(kind)
    }
}

/// 对整个源文件进行词法分析。
///
/// 返回的 token 序列总是以一个 [`TokenKind::Eof`] 结尾；所有词法错误报告给 `diagnostics`，
/// 出错的片段被跳过或替换，扫描不会中断。
pub fn lex(source: &str, diagnostics: &mut DiagnosticBag) -> Vec<Token> {
    lex_from(source, 0, diagnostics)
}

/// 从 `offset` 处重新开始词法分析，产生的 span 和行列号都相对于整个源文件。
///
/// `offset` 必须落在字符边界上，否则只返回 EOF。
pub fn lex_from(source: &str, offset: usize, diagnostics: &mut DiagnosticBag) -> Vec<Token> {
    let line_index = LineIndex::new(source);
    let rest = source.get(offset..).unwrap_or("");
    let base = source.len() - rest.len();

    let mut tokens = Vec::new();
    // 非 ASCII 的非法字符可能被 logos 按字节拆成多个错误，这里只报告一次
    let mut skip_until = base;

    for (result, range) in RawToken::lexer(rest).spanned() {
        let span = Span::new(base + range.start, base + range.end);
        if span.start < skip_until {
            continue;
        }

        let raw = match result {
            Ok(raw) => raw,
            Err(LexingError::InvalidCharacter) => {
                let bad = source
                    .get(span.start..)
                    .and_then(|s| s.chars().next())
                    .unwrap_or_default();
                let bad_span = Span::new(span.start, span.start + bad.len_utf8().max(1));
                skip_until = bad_span.end;
                diagnostics.report(
                    Diagnostic::new(
                        DiagnosticKind::InvalidCharacter,
                        Label::new(bad_span, "this character is not valid in Mo"),
                    )
                    .with_dynamic_message(format!("invalid character `{}`", bad.escape_debug())),
                );
                continue;
            }
        };

        let lexeme = &source[span.into_range()];
        let kind = match raw.fixed_kind() {
            Some(kind) => kind,
            None => classify(raw, lexeme, span, diagnostics),
        };

        let (line, column) = line_index.position(source, span.start);
        tokens.push(Token {
            kind,
            lexeme: lexeme.to_string(),
            span,
            line,
            column,
        });
    }

    let (line, column) = line_index.position(source, source.len());
    tokens.push(Token {
        kind: TokenKind::Eof,
        lexeme: String::new(),
        span: Span::empty(source.len()),
        line,
        column,
    });

    log::debug!(
        "lexed {} tokens from offset {} ({} diagnostics so far)",
        tokens.len(),
        base,
        diagnostics.len()
    );
    tokens
}

/// 处理需要进一步检查的原始 token：标识符、数字和字符串。
fn classify(raw: RawToken, lexeme: &str, span: Span, diagnostics: &mut DiagnosticBag) -> TokenKind {
    match raw {
        RawToken::Ident => match Keyword::lookup(lexeme) {
            Some(keyword) => TokenKind::Keyword(keyword),
            None => TokenKind::Identifier(lexeme.to_string()),
        },
        RawToken::Number | RawToken::Float => {
            let number = literal::normalize_number(lexeme).unwrap_or_else(|error| {
                diagnostics.report(
                    Diagnostic::new(
                        DiagnosticKind::InvalidNumberLiteral,
                        Label::new(span, "this number literal is malformed"),
                    )
                    .with_dynamic_message(error.to_string()),
                );
                // 用同进制的 0 代替，解析器可以继续把它当作字面量
                let (radix, _) = literal::split_radix(lexeme);
                NumberLiteral {
                    radix,
                    fractional: raw == RawToken::Float,
                    digits: "0".to_string(),
                }
            });
            TokenKind::Literal(Literal::Number(number))
        }
        RawToken::String => {
            // 去掉首尾的引号 "..."
            let body = &lexeme[1..lexeme.len() - 1];
            let value = unescape_reporting(body, span.start + 1, diagnostics);
            TokenKind::Literal(Literal::String(value))
        }
        RawToken::UnterminatedString => {
            diagnostics.report(
                Diagnostic::new(
                    DiagnosticKind::UnterminatedString,
                    Label::new(span, "this string is never closed"),
                )
                .with_dynamic_message("unterminated string literal")
                .with_note("string literals must end with `\"` on the same line"),
            );
            let value = unescape_reporting(&lexeme[1..], span.start + 1, diagnostics);
            TokenKind::Literal(Literal::String(value))
        }
        _ => unreachable!("fixed tokens are converted by `RawToken::fixed_kind`"),
    }
}

fn unescape_reporting(body: &str, body_start: usize, diagnostics: &mut DiagnosticBag) -> String {
    let (value, invalid) = literal::unescape(body, body_start);
    for (escape_span, c) in invalid {
        diagnostics.report(
            Diagnostic::new(
                DiagnosticKind::InvalidEscape,
                Label::new(escape_span, "unknown escape"),
            )
            .with_dynamic_message(format!("invalid escape sequence `\\{}`", c.escape_debug())),
        );
    }
    value
}
