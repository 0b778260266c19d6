use super::*;
use crate::lexer::Literal;

impl ExpressionParser for Parser<'_> {
    /// 表达式的主入口。每进入一次都算一层嵌套，括号、参数和下标都会经过这里。
    fn parse_expression(&mut self) -> Result<Node<Expression>, ()> {
        self.nested(Expression::Error, stops_expression, |p| {
            p.parse_binary_tier(Precedence::Equality)
        })
    }

    /// 先解析更高一层的操作数，然后只要当前 token 属于这一层的运算符，
    /// 就继续解析下一个操作数并向左折叠。
    fn parse_binary_tier(&mut self, tier: Precedence) -> Result<Node<Expression>, ()> {
        let mut left = match tier.tighter() {
            Some(next) => self.parse_binary_tier(next)?,
            None => self.parse_unary_expression()?,
        };

        loop {
            let operator = match self.peek().kind {
                TokenKind::Operator(o) => match BinaryOperator::from_infix(o) {
                    Some(binary) if binary.precedence() == tier => binary,
                    _ => break,
                },
                _ => break,
            };
            let operator_span = self.advance().span;
            // 中缀运算符之后可以换行
            self.skip_line_breaks();

            let right = match tier.tighter() {
                Some(next) => self.parse_binary_tier(next)?,
                None => self.parse_unary_expression()?,
            };
            let span = left.span.to(right.span);
            let binary = BinaryExpression {
                left: Box::new(left),
                operator: Node::new(operator, operator_span),
                right: Box::new(right),
            };
            left = Node::new(tier.wrap(binary), span);
        }

        Ok(left)
    }

    /// 前缀位置上的 `&` 和 `*` 是取地址和解引用；同样的符号在中缀位置由
    /// [`ExpressionParser::parse_binary_tier`] 当作按位与和乘法处理。
    fn parse_unary_expression(&mut self) -> Result<Node<Expression>, ()> {
        let prefix = match self.peek().kind {
            TokenKind::Operator(o) => UnaryOperator::from_prefix(o),
            _ => None,
        };
        let Some(operator) = prefix else {
            return self.parse_dot_expression();
        };

        let operator_span = self.advance().span;
        let operand = self.parse_dot_expression()?;
        let span = operator_span.to(operand.span);
        Ok(Node::new(
            Expression::Unary(UnaryExpression {
                operator: Node::new(operator, operator_span),
                operand: Box::new(operand),
            }),
            span,
        ))
    }

    /// 主表达式后跟零个或多个 `.` 后缀。
    ///
    /// 每个后缀单独判断：标识符后紧跟 `(` 时是方法调用，否则是字段访问。
    /// 字段访问之后不能再直接跟下标或调用。
    fn parse_dot_expression(&mut self) -> Result<Node<Expression>, ()> {
        let receiver = self.parse_primary_expression()?;

        let mut suffixes = Vec::new();
        while self.check(&punct(Punctuation::Dot)) {
            let dot_span = self.advance().span;
            let name = self.parse_identifier("expected a field or method name after `.`")?;

            let suffix = if self.check(&punct(Punctuation::LParen)) {
                self.advance();
                let (arguments, close_span) = self.parse_expression_list(Punctuation::RParen)?;
                Node::new(DotSuffix::Call { name, arguments }, dot_span.to(close_span))
            } else {
                let span = dot_span.to(name.span);
                Node::new(DotSuffix::Field(name), span)
            };
            suffixes.push(suffix);
        }

        let Some(last) = suffixes.last() else {
            return Ok(receiver);
        };
        let span = receiver.span.to(last.span);
        Ok(Node::new(
            Expression::Dot(DotExpression {
                receiver: Box::new(receiver),
                suffixes,
            }),
            span,
        ))
    }

    fn parse_primary_expression(&mut self) -> Result<Node<Expression>, ()> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Literal(Literal::Number(number)) => {
                self.advance();
                Ok(Node::new(Expression::Literal(LiteralValue::Number(number)), token.span))
            }
            TokenKind::Literal(Literal::String(value)) => {
                self.advance();
                Ok(Node::new(Expression::Literal(LiteralValue::String(value)), token.span))
            }
            TokenKind::Keyword(Keyword::True) => {
                self.advance();
                Ok(Node::new(Expression::Literal(LiteralValue::Bool(true)), token.span))
            }
            TokenKind::Keyword(Keyword::False) => {
                self.advance();
                Ok(Node::new(Expression::Literal(LiteralValue::Bool(false)), token.span))
            }
            TokenKind::Punctuation(Punctuation::LParen) => {
                self.advance();
                self.skip_line_breaks();
                let inner = self.parse_expression()?;
                self.skip_line_breaks();
                let end_span = self
                    .consume(&punct(Punctuation::RParen), "expected `)` to close the parenthesized expression")?
                    .span;
                Ok(Node::new(Expression::Grouped(Box::new(inner)), token.span.to(end_span)))
            }
            TokenKind::Punctuation(Punctuation::LBracket) => self.parse_array_literal(),
            TokenKind::Identifier(_) => self.parse_variable_or_call(),
            _ => {
                self.report_unexpected("an expression");
                Err(())
            }
        }
    }

    /// 标识符或模块路径，后面最多跟一个 `[index]` 或 `(args)`，不会两者都有。
    fn parse_variable_or_call(&mut self) -> Result<Node<Expression>, ()> {
        let target = self.parse_ident_or_path("expected a variable or function name")?;
        let start_span = target.span();

        if self.match_token(&punct(Punctuation::LBracket)) {
            self.skip_line_breaks();
            let index = self.parse_expression()?;
            self.skip_line_breaks();
            let end_span = self
                .consume(&punct(Punctuation::RBracket), "expected `]` to close the index")?
                .span;
            return Ok(Node::new(
                Expression::Index(IndexExpression {
                    target,
                    index: Box::new(index),
                }),
                start_span.to(end_span),
            ));
        }

        if self.match_token(&punct(Punctuation::LParen)) {
            let (arguments, end_span) = self.parse_expression_list(Punctuation::RParen)?;
            return Ok(Node::new(
                Expression::Call(CallExpression {
                    callee: target,
                    arguments,
                }),
                start_span.to(end_span),
            ));
        }

        Ok(Node::new(Expression::Variable(target), start_span))
    }

    /// `[a, b, c]`，后面可以跟一个元素类型，例如 `[1, 2]u8`。
    ///
    /// 只有 `]` 之后是 `[` 或标识符时才尝试解析类型；`[1, 2] * 3` 中的 `*` 永远是乘法。
    fn parse_array_literal(&mut self) -> Result<Node<Expression>, ()> {
        let start_span = self
            .consume(&punct(Punctuation::LBracket), "expected `[` to start an array literal")?
            .span;
        let (elements, mut end_span) = self.parse_expression_list(Punctuation::RBracket)?;

        let may_have_type = matches!(
            self.peek().kind,
            TokenKind::Identifier(_) | TokenKind::Punctuation(Punctuation::LBracket)
        );
        let element_type = if may_have_type {
            self.attempt("array literal element type", |p| p.parse_type())
        } else {
            None
        };
        if let Some(ty) = &element_type {
            end_span = ty.span;
        }

        Ok(Node::new(
            Expression::ArrayLiteral(ArrayLiteral {
                elements,
                element_type,
            }),
            start_span.to(end_span),
        ))
    }

    fn parse_expression_list(&mut self, close: Punctuation) -> Result<(Vec<Node<Expression>>, Span), ()> {
        let mut items = Vec::new();
        self.skip_line_breaks();

        if !self.check(&punct(close)) {
            loop {
                items.push(self.parse_expression()?);
                self.skip_line_breaks();
                if !self.match_token(&punct(Punctuation::Comma)) {
                    break;
                }
                self.skip_line_breaks();
            }
        }

        let message = format!("expected `{}` to close the list", close);
        let end_span = self.consume(&punct(close), &message)?.span;
        Ok((items, end_span))
    }
}
