//! 解析器看到的 token 流。
//!
//! 注释在这里被过滤掉；换行保留，由语法规则决定在哪些位置跳过。
//! 游标可以记下位置（[`Mark`]）并在试探失败后回到该位置。

use crate::lexer::{Token, TokenKind};
use crate::utils::Span;

/// 游标上的一个位置，用于回溯。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark(usize);

#[derive(Debug, Clone)]
pub struct TokenCursor {
    tokens: Vec<Token>,
    current: usize,
}

impl TokenCursor {
    /// 丢弃 trivia，并保证序列以 EOF 结尾。
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut tokens: Vec<Token> = tokens.into_iter().filter(|t| !t.is_trivia()).collect();
        if tokens.last().is_none_or(|t| t.kind != TokenKind::Eof) {
            let end = tokens.last().map(|t| t.span.end).unwrap_or(0);
            let (line, column) = tokens.last().map(|t| (t.line, t.column)).unwrap_or((1, 1));
            tokens.push(Token {
                kind: TokenKind::Eof,
                lexeme: String::new(),
                span: Span::empty(end),
                line,
                column,
            });
        }
        Self { tokens, current: 0 }
    }

    /// 非 EOF token 的数量。
    pub fn significant_len(&self) -> usize {
        self.tokens.len() - 1
    }

    /// 只保留前 `limit` 个 token，其余丢弃，EOF 保持不变。
    ///
    /// 返回第一个被丢弃的 token；没有超出时返回 `None`。
    pub fn truncate(&mut self, limit: usize) -> Option<Token> {
        if self.significant_len() <= limit {
            return None;
        }
        let eof = self.tokens.pop()?;
        let first_dropped = self.tokens.get(limit).cloned();
        self.tokens.truncate(limit);
        self.tokens.push(eof);
        first_dropped
    }

    /// 向前看第 `k` 个 token，越界时稳定地返回 EOF。
    pub fn peek(&self, k: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.current + k).min(last)]
    }

    /// 刚刚被消费的 token；还没有消费过任何 token 时返回第一个。
    pub fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    pub fn is_at_end(&self) -> bool {
        self.peek(0).kind == TokenKind::Eof
    }

    /// 消费当前 token 并返回它。停在 EOF 上不再前进。
    pub fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    pub fn mark(&self) -> Mark {
        Mark(self.current)
    }

    pub fn reset(&mut self, mark: Mark) {
        self.current = mark.0;
    }

    /// 自 `mark` 以来是否消费过 token。
    pub fn moved_since(&self, mark: Mark) -> bool {
        self.current != mark.0
    }
}
