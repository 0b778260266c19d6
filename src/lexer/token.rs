use crate::utils::Span;
use std::fmt::{Display, Formatter, Result};

/// 主体 Token 定义，包含其种类、原始文本和在源代码中的位置。
///
/// Token 一旦产生就不再修改。
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// 源代码中对应的原始文本。
    pub lexeme: String,
    pub span: Span,
    /// 从 1 开始的行号。
    pub line: usize,
    /// 从 1 开始的列号（按字符计数）。
    pub column: usize,
}

impl Token {
    pub fn is_trivia(&self) -> bool {
        self.kind == TokenKind::Comment
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}", self.kind.to_string_for_error())
    }
}

/// Mo 语言中所有可能的词法单元。
#[derive(Debug, PartialEq, Clone)]
pub enum TokenKind {
    /// 文件结束标志。
    Eof,

    /// 标识符。
    Identifier(String),

    /// 数字或字符串字面量。`true`/`false` 是关键字。
    Literal(Literal),

    /// 关键字。
    Keyword(Keyword),

    /// 操作符。
    Operator(Operator),

    /// 分隔符与标点。
    Punctuation(Punctuation),

    /// 换行（`\n` 或 `\r\n`）。它在语法中充当可选分隔符，因此不算 trivia。
    LineBreak,

    /// `//` 注释，在进入解析器之前被过滤掉。
    Comment,
}

impl TokenKind {
    /// 一个用于错误报告的简单字符串表示。
    pub fn to_string_for_error(&self) -> String {
        match self {
            TokenKind::Eof => "end of file".to_string(),
            TokenKind::Identifier(name) => format!("identifier `{}`", name),
            TokenKind::Literal(l) => match l {
                Literal::Number(_) => "a number literal".to_string(),
                Literal::String(_) => "a string literal".to_string(),
            },
            TokenKind::Keyword(k) => format!("keyword `{}`", k),
            TokenKind::Operator(o) => format!("operator `{}`", o),
            TokenKind::Punctuation(p) => format!("`{}`", p),
            TokenKind::LineBreak => "a line break".to_string(),
            TokenKind::Comment => "a comment".to_string(),
        }
    }
}

/// Mo 语言中的关键字。
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Keyword {
    // 声明
    Use,
    Struct,
    Fn,

    // 控制流
    For,
    If,
    Else,
    Ret,
    Defer,

    // 布尔字面量
    True,
    False,
}

impl Keyword {
    /// 尝试将一个标识符形状的字符串切片重新归类为关键字。
    ///
    /// 这张表在编译期固定，所有解析调用共享且只读。
    pub fn lookup(s: &str) -> Option<Keyword> {
        match s {
            "use" => Some(Keyword::Use),
            "struct" => Some(Keyword::Struct),
            "fn" => Some(Keyword::Fn),
            "for" => Some(Keyword::For),
            "if" => Some(Keyword::If),
            "else" => Some(Keyword::Else),
            "ret" => Some(Keyword::Ret),
            "defer" => Some(Keyword::Defer),
            "true" => Some(Keyword::True),
            "false" => Some(Keyword::False),
            _ => None,
        }
    }
}

impl Display for Keyword {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let s = match self {
            Keyword::Use => "use",
            Keyword::Struct => "struct",
            Keyword::Fn => "fn",
            Keyword::For => "for",
            Keyword::If => "if",
            Keyword::Else => "else",
            Keyword::Ret => "ret",
            Keyword::Defer => "defer",
            Keyword::True => "true",
            Keyword::False => "false",
        };
        write!(f, "{}", s)
    }
}

/// 字面量。
#[derive(Debug, PartialEq, Clone)]
pub enum Literal {
    Number(NumberLiteral),
    /// 已经处理过转义的字符串内容（不含引号）。
    String(String),
}

/// 数字字面量声明时使用的进制。
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Radix {
    Binary,
    Octal,
    Decimal,
    Hexadecimal,
}

impl Radix {
    pub fn base(self) -> u32 {
        match self {
            Radix::Binary => 2,
            Radix::Octal => 8,
            Radix::Decimal => 10,
            Radix::Hexadecimal => 16,
        }
    }

    pub fn prefix(self) -> &'static str {
        match self {
            Radix::Binary => "0b",
            Radix::Octal => "0o",
            Radix::Decimal => "",
            Radix::Hexadecimal => "0x",
        }
    }
}

/// 规范化后的数字字面量。
///
/// `digits` 去掉了进制前缀和所有 `_`；数值的宽度和类型留给后续阶段决定。
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct NumberLiteral {
    pub radix: Radix,
    pub fractional: bool,
    pub digits: String,
}

impl NumberLiteral {
    /// 整数字面量的值；小数或溢出时返回 `None`。
    pub fn as_u64(&self) -> Option<u64> {
        if self.fractional {
            return None;
        }
        u64::from_str_radix(&self.digits, self.radix.base()).ok()
    }
}

impl Display for NumberLiteral {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{}{}", self.radix.prefix(), self.digits)
    }
}

/// 运算符。
///
/// `&` 和 `*` 既可以是前缀（取地址/解引用）也可以是中缀（按位与/乘法），
/// 具体含义由解析器根据所处位置决定。
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Operator {
    // Arithmetic
    Plus,    // +
    Minus,   // -
    Star,    // *
    Slash,   // /
    Percent, // %

    // Bitwise
    Amp,   // &
    Pipe,  // |
    Caret, // ^
    Tilde, // ~
    Shl,   // <<
    Shr,   // >>

    // Logical
    Bang, // !

    // Comparison
    EqEq,  // ==
    NotEq, // !=
    Lt,    // <
    Gt,    // >
    LtEq,  // <=
    GtEq,  // >=

    // Assignment
    Assign,      // =
    ColonAssign, // :=
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let s = match self {
            Operator::Plus => "+",
            Operator::Minus => "-",
            Operator::Star => "*",
            Operator::Slash => "/",
            Operator::Percent => "%",
            Operator::Amp => "&",
            Operator::Pipe => "|",
            Operator::Caret => "^",
            Operator::Tilde => "~",
            Operator::Shl => "<<",
            Operator::Shr => ">>",
            Operator::Bang => "!",
            Operator::EqEq => "==",
            Operator::NotEq => "!=",
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::LtEq => "<=",
            Operator::GtEq => ">=",
            Operator::Assign => "=",
            Operator::ColonAssign => ":=",
        };
        write!(f, "{}", s)
    }
}

/// 分隔符与标点。
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Punctuation {
    LParen,   // (
    RParen,   // )
    LBrace,   // {
    RBrace,   // }
    LBracket, // [
    RBracket, // ]
    Comma,    // ,
    Dot,      // .
    Colon,    // :
}

impl Display for Punctuation {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let s = match self {
            Punctuation::LParen => "(",
            Punctuation::RParen => ")",
            Punctuation::LBrace => "{",
            Punctuation::RBrace => "}",
            Punctuation::LBracket => "[",
            Punctuation::RBracket => "]",
            Punctuation::Comma => ",",
            Punctuation::Dot => ".",
            Punctuation::Colon => ":",
        };
        write!(f, "{}", s)
    }
}
