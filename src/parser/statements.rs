use super::*;

impl StatementParser for Parser<'_> {
    /// 解析一条语句。
    ///
    /// 以关键字或 `{` 开头的语句直接分发；其余的由 [`StatementParser::parse_simple_statement`]
    /// 按固定顺序试探。
    fn parse_statement(&mut self) -> Result<Node<Statement>, ()> {
        self.nested(Statement::Error, stops_statement, |p| match p.peek().kind {
            TokenKind::Keyword(Keyword::For) => p.parse_for_loop().map(|node| node.map(Statement::For)),
            TokenKind::Keyword(Keyword::If) => p.parse_if_statement().map(|node| node.map(Statement::If)),
            TokenKind::Keyword(Keyword::Ret) => p.parse_ret_statement().map(|node| node.map(Statement::Ret)),
            TokenKind::Keyword(Keyword::Defer) => p
                .parse_defer_statement()
                .map(|node| node.map(Statement::Defer)),
            TokenKind::Punctuation(Punctuation::LBrace) => {
                p.parse_code_block().map(|node| node.map(Statement::Block))
            }
            _ => p.parse_simple_statement(),
        })
    }

    /// 解析 `{ ... }`。
    ///
    /// 语句之间的换行是可选的。块内出错的语句被跳过到下一个换行或 `}`，
    /// 缺少 `}` 时报告错误但仍然返回已经解析出的部分。
    fn parse_code_block(&mut self) -> Result<Node<CodeBlock>, ()> {
        let start_span = self
            .consume(&punct(Punctuation::LBrace), "expected `{` to start a code block")?
            .span;

        let mut statements = Vec::new();
        loop {
            self.skip_line_breaks();
            if self.check(&punct(Punctuation::RBrace)) || self.is_at_end() || starts_declaration(&self.peek().kind) {
                break;
            }
            match self.parse_statement() {
                Ok(stmt) => statements.push(stmt),
                Err(()) => self.synchronize_statement(),
            }
        }

        let end_span = if self.check(&punct(Punctuation::RBrace)) {
            self.advance().span
        } else {
            let found = self.peek();
            let label = Label::new(
                found.span,
                format!("expected `}}`, found {}", found.kind.to_string_for_error()),
            );
            self.diagnostics.report(
                Diagnostic::new(DiagnosticKind::MissingExpectedToken, label)
                    .with_dynamic_message("expected `}` to close the code block")
                    .with_secondary_label(Label::new(start_span, "block opened here")),
            );
            self.previous().span
        };
        Ok(Node::new(CodeBlock { statements }, start_span.to(end_span)))
    }

    /// `for cond { ... }`
    fn parse_for_loop(&mut self) -> Result<Node<ForLoop>, ()> {
        let start_span = self.consume(&kw(Keyword::For), "expected `for`")?.span;
        let condition = self.parse_expression()?;
        self.skip_line_breaks();
        let body = self.parse_code_block()?;
        let span = start_span.to(body.span);
        Ok(Node::new(ForLoop { condition, body }, span))
    }

    /// `if cond { ... } else { ... }`，`else` 后面只能是代码块。
    fn parse_if_statement(&mut self) -> Result<Node<IfStatement>, ()> {
        let start_span = self.consume(&kw(Keyword::If), "expected `if`")?.span;
        let condition = self.parse_expression()?;
        self.skip_line_breaks();
        let then_block = self.parse_code_block()?;

        // 只有换行之后确实是 `else` 时才跳过这些换行
        let mut lookahead = 0;
        while self.peek_nth(lookahead).kind == TokenKind::LineBreak {
            lookahead += 1;
        }
        let else_block = if self.peek_nth(lookahead).kind == kw(Keyword::Else) {
            self.skip_line_breaks();
            self.advance(); // else
            self.skip_line_breaks();
            Some(self.parse_code_block()?)
        } else {
            None
        };

        let end_span = else_block.as_ref().map_or(then_block.span, |block| block.span);
        Ok(Node::new(
            IfStatement {
                condition,
                then_block,
                else_block,
            },
            start_span.to(end_span),
        ))
    }

    /// `ret` 或 `ret expr`。`ret` 后面直接是换行、`}` 或文件结尾时没有返回值。
    fn parse_ret_statement(&mut self) -> Result<Node<RetStatement>, ()> {
        let start_span = self.consume(&kw(Keyword::Ret), "expected `ret`")?.span;

        let ends_here = self.check(&TokenKind::LineBreak)
            || self.check(&punct(Punctuation::RBrace))
            || self.is_at_end();
        if ends_here {
            return Ok(Node::new(RetStatement { value: None }, start_span));
        }

        let value = self.parse_expression()?;
        let span = start_span.to(value.span);
        Ok(Node::new(RetStatement { value: Some(value) }, span))
    }

    /// `defer stmt`。被推迟的语句走同一套分发，所以 `defer defer x()` 也是合法的。
    fn parse_defer_statement(&mut self) -> Result<Node<DeferStatement>, ()> {
        let start_span = self.consume(&kw(Keyword::Defer), "expected `defer`")?.span;
        let statement = self.parse_statement()?;
        let span = start_span.to(statement.span);
        Ok(Node::new(
            DeferStatement {
                statement: Box::new(statement),
            },
            span,
        ))
    }

    /// 四种语句共享同一个前缀，按下面的顺序决定：
    ///
    /// 1. `ident :=` 是推断类型的声明；
    /// 2. 试探 `ident TypeExpr :=`，成功则是显式类型的声明；
    /// 3. 解析一个一元表达式，之后是 `=` 则为赋值，紧贴着 `=` 的二元运算符则为复合赋值；
    /// 4. 否则回到起点，整体作为表达式语句解析。
    fn parse_simple_statement(&mut self) -> Result<Node<Statement>, ()> {
        let start = self.checkpoint();

        if matches!(self.peek().kind, TokenKind::Identifier(_)) {
            // 1. 推断类型的声明
            if self.peek_nth(1).kind == op(Operator::ColonAssign) {
                let name = self.parse_identifier("expected a variable name")?;
                self.advance(); // :=
                let value = self.parse_expression()?;
                let span = name.span.to(value.span);
                return Ok(Node::new(
                    Statement::VarDecl(VarDecl {
                        name,
                        declared_type: None,
                        value,
                    }),
                    span,
                ));
            }

            // 2. 显式类型的声明。只试探到 `:=` 为止，值里的错误不会被回滚
            if let Some((name, declared_type)) =
                self.attempt("typed declaration", |p| p.parse_typed_declaration_head())
            {
                let value = self.parse_expression()?;
                let span = name.span.to(value.span);
                return Ok(Node::new(
                    Statement::VarDecl(VarDecl {
                        name,
                        declared_type: Some(declared_type),
                        value,
                    }),
                    span,
                ));
            }
        }

        // 3. 赋值和复合赋值
        let target = self.parse_unary_expression()?;
        let next = self.peek().clone();
        match next.kind {
            TokenKind::Operator(Operator::Assign) => {
                self.advance();
                let value = self.parse_expression()?;
                let span = target.span.to(value.span);
                return Ok(Node::new(Statement::Assignment(Assignment { target, value }), span));
            }
            TokenKind::Operator(operator) if self.peek_nth(1).kind == op(Operator::Assign) => {
                if let Some(binary) = BinaryOperator::from_compound(operator) {
                    let assign_span = self.peek_nth(1).span;
                    if next.span.end != assign_span.start {
                        let label = Label::new(next.span.to(assign_span), "separated by whitespace");
                        self.diagnostics.report(
                            Diagnostic::new(DiagnosticKind::AmbiguousConstructUnresolved, label)
                                .with_dynamic_message(format!(
                                    "`{}` and `=` must be adjacent in a compound assignment",
                                    operator
                                ))
                                .with_note(format!("write `{}=` without a space", operator)),
                        );
                        return Err(());
                    }

                    self.advance(); // 运算符
                    self.advance(); // =
                    let value = self.parse_expression()?;
                    let span = target.span.to(value.span);
                    return Ok(Node::new(
                        Statement::CompoundAssignment(CompoundAssignment {
                            target,
                            operator: Node::new(binary, next.span),
                            value,
                        }),
                        span,
                    ));
                }
            }
            _ => {}
        }

        // 4. 表达式语句
        self.rewind(start);
        log::trace!("statement at {}:{} is an expression", self.peek().line, self.peek().column);
        let expr = self.parse_expression()?;
        let span = expr.span;
        Ok(Node::new(Statement::Expression(expr), span))
    }

    fn parse_typed_declaration_head(&mut self) -> Result<(Identifier, Node<TypeExpr>), ()> {
        let name = self.parse_identifier("expected a variable name")?;
        let declared_type = self.parse_type()?;
        self.consume(&op(Operator::ColonAssign), "expected `:=` after the declared type")?;
        Ok((name, declared_type))
    }
}
