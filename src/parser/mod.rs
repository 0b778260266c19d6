//! Mo 语言的解析器实现。
//!
//! 采用手写的递归下降：声明和语句按首个 token 分发，表达式按优先级分层解析（precedence climbing）。
//! 语法中存在歧义的地方（声明 / 赋值 / 表达式语句，数组字面量后的类型标注）
//! 通过 [`cursor::Mark`] 记录位置、按固定顺序逐个试探来解决，试探失败时连同诊断一起回滚。

pub mod ast;
pub mod cursor;
mod declarations;
mod expressions;
pub mod printer;
mod statements;
mod types;
pub mod visit;

#[cfg(test)]
mod test;

use crate::diagnostics::{Diagnostic, DiagnosticBag, DiagnosticKind, Label};
use crate::lexer::{Keyword, Operator, Punctuation, Token, TokenKind};
use crate::utils::Span;
use ast::*;
use cursor::{Mark, TokenCursor};

// --- 1. 解析配置 ---

/// 解析选项。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// 表达式、语句和类型允许的最大嵌套深度。
    pub max_depth: usize,
    /// 允许处理的最多 token 数（不含注释和 EOF）；`None` 表示不限制。
    pub max_tokens: Option<usize>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: 64,
            max_tokens: None,
        }
    }
}

// --- 2. 主解析器结构体 ---

/// 解析器结构体，持有解析过程所需的全部状态。
pub struct Parser<'a> {
    /// 已经过滤掉注释的 token 流。
    cursor: TokenCursor,
    /// 诊断信息收集器，用于报告所有解析错误。
    diagnostics: &'a mut DiagnosticBag,
    options: ParseOptions,
    /// 当前的嵌套深度。
    depth: usize,
}

/// 回溯点：游标位置加上当时的诊断数量。
#[derive(Debug, Clone, Copy)]
struct Checkpoint {
    mark: Mark,
    diagnostics: usize,
}

// --- 3. Trait 定义：用于组织解析逻辑 ---

/// `Parse` Trait 是解析器的总入口。
pub trait Parse {
    /// 消耗解析器并启动整个解析过程，最终生成一个 `Program` AST 节点。
    fn parse(self) -> Program;
}

/// `DeclarationParser` Trait 负责解析顶层声明。
trait DeclarationParser {
    /// 解析一个顶层声明（`use`、`struct` 或 `fn`）。
    fn parse_declaration(&mut self) -> Result<Node<Declaration>, ()>;
    fn parse_use_declaration(&mut self) -> Result<Node<UseDecl>, ()>;
    fn parse_struct_declaration(&mut self) -> Result<Node<StructDecl>, ()>;
    fn parse_struct_field(&mut self) -> Result<Node<StructField>, ()>;
    fn parse_fn_declaration(&mut self) -> Result<Node<FnDecl>, ()>;
    /// 解析函数参数列表，包括两侧的括号。
    fn parse_parameter_list(&mut self) -> Result<Vec<Node<Parameter>>, ()>;
}

/// `StatementParser` Trait 负责解析各类语句。
trait StatementParser {
    /// 解析任意类型的语句。
    fn parse_statement(&mut self) -> Result<Node<Statement>, ()>;
    /// 解析一个 `{...}` 代码块。
    fn parse_code_block(&mut self) -> Result<Node<CodeBlock>, ()>;
    fn parse_for_loop(&mut self) -> Result<Node<ForLoop>, ()>;
    fn parse_if_statement(&mut self) -> Result<Node<IfStatement>, ()>;
    fn parse_ret_statement(&mut self) -> Result<Node<RetStatement>, ()>;
    fn parse_defer_statement(&mut self) -> Result<Node<DeferStatement>, ()>;
    /// 以标识符或表达式开头的语句：变量声明、赋值、复合赋值或表达式语句。
    fn parse_simple_statement(&mut self) -> Result<Node<Statement>, ()>;
    /// 试探 `ident TypeExpr :=`，成功时返回名字和类型。
    fn parse_typed_declaration_head(&mut self) -> Result<(Identifier, Node<TypeExpr>), ()>;
}

/// `ExpressionParser` Trait 负责解析各类表达式。
trait ExpressionParser {
    /// 解析表达式的主入口（最低的相等层）。
    fn parse_expression(&mut self) -> Result<Node<Expression>, ()>;
    /// 解析某一优先级层上左结合的二元运算。
    fn parse_binary_tier(&mut self, tier: Precedence) -> Result<Node<Expression>, ()>;
    /// 解析一元表达式（最多一个前缀运算符）。
    fn parse_unary_expression(&mut self) -> Result<Node<Expression>, ()>;
    /// 解析主表达式及其后的 `.` 链。
    fn parse_dot_expression(&mut self) -> Result<Node<Expression>, ()>;
    /// 解析主表达式：字面量、括号表达式、变量或调用、数组字面量。
    fn parse_primary_expression(&mut self) -> Result<Node<Expression>, ()>;
    fn parse_variable_or_call(&mut self) -> Result<Node<Expression>, ()>;
    fn parse_array_literal(&mut self) -> Result<Node<Expression>, ()>;
    /// 解析逗号分隔的表达式列表，直到 `close`（开括号已被消费，`close` 会被消费）。
    fn parse_expression_list(&mut self, close: Punctuation) -> Result<(Vec<Node<Expression>>, Span), ()>;
}

/// `TypeParser` Trait 负责解析类型表达式。
trait TypeParser {
    /// 解析一个类型表达式（例如 `i32`, `*u8`, `[4]std:io:File`）。
    fn parse_type(&mut self) -> Result<Node<TypeExpr>, ()>;
    fn parse_array_type(&mut self) -> Result<Node<TypeExpr>, ()>;
}

/// `Util` Trait 提供了解析过程中常用的一系列辅助函数。
trait Util {
    // --- Token 流操作 ---
    /// 查看当前的 Token。
    fn peek(&self) -> &Token;
    /// 查看当前位置之后第 `k` 个 Token。
    fn peek_nth(&self, k: usize) -> &Token;
    /// 获取上一个被消费的 Token。
    fn previous(&self) -> &Token;
    fn is_at_end(&self) -> bool;
    /// 消费当前 Token 并返回它。
    fn advance(&mut self) -> &Token;
    /// 检查当前 Token 的种类，但不消费。
    fn check(&self, kind: &TokenKind) -> bool;
    /// 如果当前 Token 是指定种类，则消费它。
    fn match_token(&mut self, kind: &TokenKind) -> bool;
    /// 消费一个指定种类的 Token，否则报告 `MissingExpectedToken`。
    fn consume(&mut self, kind: &TokenKind, message: &str) -> Result<&Token, ()>;
    /// 跳过所有连续的换行。
    fn skip_line_breaks(&mut self);

    // --- 共享的小语法单元 ---
    fn parse_identifier(&mut self, message: &str) -> Result<Identifier, ()>;
    /// 标识符后跟零个或多个 `:ident`。
    fn parse_ident_or_path(&mut self, message: &str) -> Result<IdentOrPath, ()>;

    // --- 错误报告 ---
    /// 报告当前 Token 不符合任何候选。
    fn report_unexpected(&mut self, expected: &str);

    // --- 回溯 ---
    fn checkpoint(&self) -> Checkpoint;
    /// 回到 `checkpoint`，并丢弃其后产生的诊断。
    fn rewind(&mut self, checkpoint: Checkpoint);
    /// 试探性地运行 `f`，失败时回溯并返回 `None`。
    fn attempt<T>(&mut self, what: &str, f: impl FnOnce(&mut Self) -> Result<T, ()>) -> Option<T>;

    // --- 嵌套深度 ---
    /// 进入一层嵌套后运行 `f`。超过最大深度时报告一次错误，跳过当前子树并返回占位节点；
    /// 当前位置没有可跳过的内容（例如多余的 `)`）时返回 `Err`，由调用者负责同步。
    fn nested<T>(
        &mut self,
        placeholder: T,
        stop: fn(&TokenKind) -> bool,
        f: impl FnOnce(&mut Self) -> Result<Node<T>, ()>,
    ) -> Result<Node<T>, ()>;
    /// 跳过一个括号平衡的子树，返回跳过的范围。
    fn skip_subtree(&mut self, stop: fn(&TokenKind) -> bool) -> Span;

    // --- 错误恢复 ---
    /// 语句级恢复：跳到同一嵌套层的下一个换行或 `}`。
    fn synchronize_statement(&mut self);
    /// 顶层恢复：跳到下一个 `use`、`struct` 或 `fn`。
    fn synchronize_declaration(&mut self);
}

// --- 4. Token 种类的简写 ---

fn punct(p: Punctuation) -> TokenKind {
    TokenKind::Punctuation(p)
}

fn op(o: Operator) -> TokenKind {
    TokenKind::Operator(o)
}

fn kw(k: Keyword) -> TokenKind {
    TokenKind::Keyword(k)
}

fn starts_declaration(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Keyword(Keyword::Use | Keyword::Struct | Keyword::Fn)
    )
}

// 超出深度时，各类子树在最外层遇到这些 token 时停止跳过。
fn stops_expression(kind: &TokenKind) -> bool {
    *kind == punct(Punctuation::Comma)
}

fn stops_statement(_: &TokenKind) -> bool {
    false
}

fn stops_type(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Punctuation(Punctuation::Comma | Punctuation::LBrace)
            | TokenKind::Operator(Operator::ColonAssign | Operator::Assign)
    )
}

// --- 5. 解析器实现 ---

impl<'a> Parser<'a> {
    /// 创建一个新的解析器实例。
    ///
    /// 注释在这里被过滤掉；如果设置了 token 上限，超出的部分被截断并报告一次。
    pub fn new(tokens: Vec<Token>, diagnostics: &'a mut DiagnosticBag, options: ParseOptions) -> Self {
        let mut cursor = TokenCursor::new(tokens);
        if let Some(limit) = options.max_tokens {
            if let Some(dropped) = cursor.truncate(limit) {
                diagnostics.report(
                    Diagnostic::new(
                        DiagnosticKind::TokenLimitExceeded,
                        Label::new(dropped.span, "parsing stopped here"),
                    )
                    .with_dynamic_message(format!("input exceeds the limit of {} tokens", limit)),
                );
            }
        }
        Parser {
            cursor,
            diagnostics,
            options,
            depth: 0,
        }
    }
}

impl Parse for Parser<'_> {
    fn parse(mut self) -> Program {
        let mut declarations = Vec::new();
        self.skip_line_breaks();
        while !self.is_at_end() {
            let start = self.cursor.mark();
            match self.parse_declaration() {
                Ok(decl) => declarations.push(decl),
                // 没闭合的声明可能已经停在下一个声明的关键字上，这时不再跳过
                Err(()) if self.cursor.moved_since(start) && starts_declaration(&self.peek().kind) => {}
                Err(()) => self.synchronize_declaration(),
            }
            self.skip_line_breaks();
        }

        // EOF 的 span 位于输入末尾，根节点从 0 开始覆盖全部输入
        let end = self.peek().span.end;
        log::debug!(
            "parsed {} top-level declarations ({} diagnostics)",
            declarations.len(),
            self.diagnostics.len()
        );
        Program {
            declarations,
            span: Span::new(0, end),
        }
    }
}

impl Util for Parser<'_> {
    fn peek(&self) -> &Token {
        self.cursor.peek(0)
    }

    fn peek_nth(&self, k: usize) -> &Token {
        self.cursor.peek(k)
    }

    fn previous(&self) -> &Token {
        self.cursor.previous()
    }

    fn is_at_end(&self) -> bool {
        self.cursor.is_at_end()
    }

    fn advance(&mut self) -> &Token {
        self.cursor.advance()
    }

    fn check(&self, kind: &TokenKind) -> bool {
        &self.peek().kind == kind
    }

    fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn consume(&mut self, kind: &TokenKind, message: &str) -> Result<&Token, ()> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            let found = self.peek();
            let label_msg = format!(
                "expected {}, found {}",
                kind.to_string_for_error(),
                found.kind.to_string_for_error()
            );
            let label = Label::new(found.span, label_msg);
            self.diagnostics
                .report_error(DiagnosticKind::MissingExpectedToken, message, label);
            Err(())
        }
    }

    fn skip_line_breaks(&mut self) {
        while self.match_token(&TokenKind::LineBreak) {}
    }

    fn parse_identifier(&mut self, message: &str) -> Result<Identifier, ()> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Identifier(name) => {
                self.advance();
                Ok(Identifier {
                    name,
                    span: token.span,
                })
            }
            other => {
                let label = Label::new(
                    token.span,
                    format!("expected an identifier, found {}", other.to_string_for_error()),
                );
                self.diagnostics
                    .report_error(DiagnosticKind::MissingExpectedToken, message, label);
                Err(())
            }
        }
    }

    fn parse_ident_or_path(&mut self, message: &str) -> Result<IdentOrPath, ()> {
        let first = self.parse_identifier(message)?;
        let mut segments = vec![first];
        // 只有 `:` 后面紧跟标识符时才继续，否则把 `:` 留给调用者
        while self.check(&punct(Punctuation::Colon))
            && matches!(self.peek_nth(1).kind, TokenKind::Identifier(_))
        {
            self.advance();
            segments.push(self.parse_identifier("expected a path segment after `:`")?);
        }

        if segments.len() == 1 {
            Ok(IdentOrPath::Identifier(segments.remove(0)))
        } else {
            Ok(IdentOrPath::Path(ModulePath { segments }))
        }
    }

    fn report_unexpected(&mut self, expected: &str) {
        let found = self.peek();
        let message = format!("expected {}, found {}", expected, found.kind.to_string_for_error());
        let label = Label::new(found.span, format!("unexpected {}", found.kind.to_string_for_error()));
        self.diagnostics
            .report_error(DiagnosticKind::UnexpectedToken, message, label);
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            mark: self.cursor.mark(),
            diagnostics: self.diagnostics.len(),
        }
    }

    fn rewind(&mut self, checkpoint: Checkpoint) {
        self.cursor.reset(checkpoint.mark);
        self.diagnostics.truncate(checkpoint.diagnostics);
    }

    fn attempt<T>(&mut self, what: &str, f: impl FnOnce(&mut Self) -> Result<T, ()>) -> Option<T> {
        let checkpoint = self.checkpoint();
        match f(self) {
            Ok(value) => {
                log::trace!("{} matched at {}:{}", what, self.previous().line, self.previous().column);
                Some(value)
            }
            Err(()) => {
                self.rewind(checkpoint);
                log::trace!(
                    "{} did not match, backtracking to {}:{}",
                    what,
                    self.peek().line,
                    self.peek().column
                );
                None
            }
        }
    }

    fn nested<T>(
        &mut self,
        placeholder: T,
        stop: fn(&TokenKind) -> bool,
        f: impl FnOnce(&mut Self) -> Result<Node<T>, ()>,
    ) -> Result<Node<T>, ()> {
        if self.depth >= self.options.max_depth {
            let at = self.peek().span;
            self.diagnostics.report(
                Diagnostic::new(
                    DiagnosticKind::RecursionLimitExceeded,
                    Label::new(at, "nesting limit reached here"),
                )
                .with_dynamic_message(format!(
                    "nesting exceeds the limit of {} levels",
                    self.options.max_depth
                ))
                .with_note("the rest of this construct was skipped"),
            );
            let span = self.skip_subtree(stop);
            // 什么都没跳过时交给调用者同步，否则循环会停在原地
            if span.is_empty() {
                return Err(());
            }
            return Ok(Node::new(placeholder, span));
        }

        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn skip_subtree(&mut self, stop: fn(&TokenKind) -> bool) -> Span {
        let start = self.peek().span;
        let mut end = Span::empty(start.start);
        let mut nesting = 0usize;

        loop {
            let kind = &self.peek().kind;
            if *kind == TokenKind::Eof {
                break;
            }
            if nesting == 0 {
                let closes = matches!(
                    kind,
                    TokenKind::Punctuation(Punctuation::RParen | Punctuation::RBracket | Punctuation::RBrace)
                );
                if closes || *kind == TokenKind::LineBreak || stop(kind) {
                    break;
                }
            }
            match kind {
                TokenKind::Punctuation(Punctuation::LParen | Punctuation::LBracket | Punctuation::LBrace) => {
                    nesting += 1
                }
                TokenKind::Punctuation(Punctuation::RParen | Punctuation::RBracket | Punctuation::RBrace) => {
                    nesting -= 1
                }
                _ => {}
            }
            end = self.advance().span;
        }

        if end.is_empty() {
            end
        } else {
            start.to(end)
        }
    }

    fn synchronize_statement(&mut self) {
        let mut nesting = 0usize;
        while !self.is_at_end() {
            match self.peek().kind {
                TokenKind::LineBreak if nesting == 0 => return,
                TokenKind::Punctuation(Punctuation::RBrace) if nesting == 0 => return,
                TokenKind::Punctuation(Punctuation::LParen | Punctuation::LBracket | Punctuation::LBrace) => {
                    nesting += 1
                }
                TokenKind::Punctuation(Punctuation::RParen | Punctuation::RBracket | Punctuation::RBrace) => {
                    nesting = nesting.saturating_sub(1)
                }
                _ => {}
            }
            self.advance();
        }
    }

    fn synchronize_declaration(&mut self) {
        self.advance(); // 跳过导致错误的 Token

        while !self.is_at_end() {
            if starts_declaration(&self.peek().kind) {
                return;
            }
            self.advance();
        }
    }
}
