use crate::lexer::{NumberLiteral, Operator};
use crate::utils::Span;

// --- 1. 核心 AST 节点与标识符 ---

/// 所有 AST 节点的通用包装，包含了节点本身和其在源代码中的位置。
///
/// 节点只持有子节点，不持有父节点的引用；遍历总是自顶向下进行。
#[derive(Debug, Clone, PartialEq)]
pub struct Node<T> {
    pub kind: T,
    pub span: Span,
}

impl<T> Node<T> {
    pub fn new(kind: T, span: Span) -> Self {
        Self { kind, span }
    }

    /// 将一个节点的内部类型 `T` 映射（转换）为类型 `U`，同时保持 `span` 不变。
    ///
    /// 解析过程中用它把具体的节点（如 `Node<RetStatement>`）转换为更通用的
    /// `Node<Statement>`，而无需手动重建整个 `Node` 结构。
    pub fn map<U, F>(self, f: F) -> Node<U>
    where
        F: FnOnce(T) -> U,
    {
        Node {
            kind: f(self.kind),
            span: self.span,
        }
    }
}

/// 一个标识符，例如变量名或函数名。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

/// 用 `:` 连接的模块路径，例如 `std:io:File`。至少有两段。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModulePath {
    pub segments: Vec<Identifier>,
}

impl ModulePath {
    pub fn span(&self) -> Span {
        match (self.segments.first(), self.segments.last()) {
            (Some(first), Some(last)) => first.span.to(last.span),
            _ => Span::default(),
        }
    }
}

/// 单个标识符或模块路径。单个标识符永远不会被提升为只有一段的路径。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IdentOrPath {
    Identifier(Identifier),
    Path(ModulePath),
}

impl IdentOrPath {
    pub fn span(&self) -> Span {
        match self {
            IdentOrPath::Identifier(ident) => ident.span,
            IdentOrPath::Path(path) => path.span(),
        }
    }
}

// --- 2. 程序顶层结构 ---

/// AST 的根节点，代表一个完整的 Mo 源文件。它的 span 覆盖整个输入。
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// 顶层声明（`use`、`struct` 和 `fn`）的列表。
    pub declarations: Vec<Node<Declaration>>,
    pub span: Span,
}

/// 顶层声明。
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Use(UseDecl),
    Struct(StructDecl),
    Fn(FnDecl),
}

/// `use std:io "io"`
#[derive(Debug, Clone, PartialEq)]
pub struct UseDecl {
    pub path: ModulePath,
    /// 可选的字符串别名。
    pub alias: Option<Node<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructDecl {
    pub name: Identifier,
    pub fields: Vec<Node<StructField>>,
}

/// 结构体中的一个字段：一个标识符加一个类型。
#[derive(Debug, Clone, PartialEq)]
pub struct StructField {
    pub name: Identifier,
    pub field_type: Node<TypeExpr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FnDecl {
    pub name: Identifier,
    pub params: Vec<Node<Parameter>>,
    pub return_type: Option<Node<TypeExpr>>,
    pub body: Node<CodeBlock>,
}

/// 函数定义中的单个参数。
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: Identifier,
    pub param_type: Node<TypeExpr>,
}

// --- 3. 语句 ---

/// 由 `{ ... }` 包围的代码块。
#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock {
    pub statements: Vec<Node<Statement>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    For(ForLoop),
    If(IfStatement),
    Ret(RetStatement),
    Defer(DeferStatement),
    Block(CodeBlock),
    VarDecl(VarDecl),
    Assignment(Assignment),
    CompoundAssignment(CompoundAssignment),
    /// 仅由表达式构成的语句，例如 `print(x)`。
    Expression(Node<Expression>),
    /// 超过嵌套深度时插入的占位节点。
    Error,
}

/// `for cond { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct ForLoop {
    pub condition: Node<Expression>,
    pub body: Node<CodeBlock>,
}

/// `if cond { ... } else { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    pub condition: Node<Expression>,
    pub then_block: Node<CodeBlock>,
    pub else_block: Option<Node<CodeBlock>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetStatement {
    /// 要返回的值，对于单独的 `ret` 则为 `None`。
    pub value: Option<Node<Expression>>,
}

/// `defer` 包裹紧随其后的一条语句，被包裹的语句本身也可以是 `defer`。
#[derive(Debug, Clone, PartialEq)]
pub struct DeferStatement {
    pub statement: Box<Node<Statement>>,
}

/// 变量声明：`x := 1`（推断类型）或 `x i32 := 1`（显式类型）。
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub name: Identifier,
    pub declared_type: Option<Node<TypeExpr>>,
    pub value: Node<Expression>,
}

impl VarDecl {
    pub fn is_inferred(&self) -> bool {
        self.declared_type.is_none()
    }
}

/// `target = value`
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub target: Node<Expression>,
    pub value: Node<Expression>,
}

/// `target += value`，运算符和 `=` 之间不能有空白。
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundAssignment {
    pub target: Node<Expression>,
    pub operator: Node<BinaryOperator>,
    pub value: Node<Expression>,
}

// --- 4. 表达式 ---

/// 表达式。每一层优先级都有自己的变体，便于区分 `1 + 2 * 3` 中谁包裹谁。
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Equality(BinaryExpression),
    Comparison(BinaryExpression),
    Term(BinaryExpression),
    Factor(BinaryExpression),
    Unary(UnaryExpression),
    /// 主表达式后跟一串 `.field` 或 `.method(args)`。
    Dot(DotExpression),
    Literal(LiteralValue),
    /// `( expr )`
    Grouped(Box<Node<Expression>>),
    /// 单独的标识符或模块路径。
    Variable(IdentOrPath),
    /// `name[index]`
    Index(IndexExpression),
    /// `name(args)`
    Call(CallExpression),
    ArrayLiteral(ArrayLiteral),
    /// 超过嵌套深度时插入的占位节点。
    Error,
}

/// 二元运算所在的优先级层，从低到高。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precedence {
    Equality,
    Comparison,
    Term,
    Factor,
}

impl Precedence {
    /// 下一层（更高）优先级；`Factor` 之上是一元表达式。
    pub fn tighter(self) -> Option<Precedence> {
        match self {
            Precedence::Equality => Some(Precedence::Comparison),
            Precedence::Comparison => Some(Precedence::Term),
            Precedence::Term => Some(Precedence::Factor),
            Precedence::Factor => None,
        }
    }

    /// 用这一层对应的表达式变体包裹二元运算。
    pub fn wrap(self, binary: BinaryExpression) -> Expression {
        match self {
            Precedence::Equality => Expression::Equality(binary),
            Precedence::Comparison => Expression::Comparison(binary),
            Precedence::Term => Expression::Term(binary),
            Precedence::Factor => Expression::Factor(binary),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpression {
    pub left: Box<Node<Expression>>,
    pub operator: Node<BinaryOperator>,
    pub right: Box<Node<Expression>>,
}

/// 二元运算符。注意位运算和移位与乘除处于同一优先级。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Eq,
    NotEq,
    Gt,
    GtEq,
    Lt,
    LtEq,
    Add,
    Sub,
    Div,
    Mul,
    Rem,
    BitAnd,
    Tilde,
    Shl,
    Shr,
    BitXor,
    BitOr,
}

impl BinaryOperator {
    /// 中缀位置上的运算符。
    pub fn from_infix(op: Operator) -> Option<Self> {
        let binary = match op {
            Operator::EqEq => BinaryOperator::Eq,
            Operator::NotEq => BinaryOperator::NotEq,
            Operator::Gt => BinaryOperator::Gt,
            Operator::GtEq => BinaryOperator::GtEq,
            Operator::Lt => BinaryOperator::Lt,
            Operator::LtEq => BinaryOperator::LtEq,
            Operator::Plus => BinaryOperator::Add,
            Operator::Minus => BinaryOperator::Sub,
            Operator::Slash => BinaryOperator::Div,
            Operator::Star => BinaryOperator::Mul,
            Operator::Percent => BinaryOperator::Rem,
            Operator::Amp => BinaryOperator::BitAnd,
            Operator::Tilde => BinaryOperator::Tilde,
            Operator::Shl => BinaryOperator::Shl,
            Operator::Shr => BinaryOperator::Shr,
            Operator::Caret => BinaryOperator::BitXor,
            Operator::Pipe => BinaryOperator::BitOr,
            Operator::Bang | Operator::Assign | Operator::ColonAssign => return None,
        };
        Some(binary)
    }

    /// 可以出现在复合赋值（`op=`）中的运算符。
    pub fn from_compound(op: Operator) -> Option<Self> {
        Self::from_infix(op).filter(|binary| {
            matches!(binary.precedence(), Precedence::Term | Precedence::Factor)
        })
    }

    pub fn precedence(self) -> Precedence {
        match self {
            BinaryOperator::Eq | BinaryOperator::NotEq => Precedence::Equality,
            BinaryOperator::Gt | BinaryOperator::GtEq | BinaryOperator::Lt | BinaryOperator::LtEq => {
                Precedence::Comparison
            }
            BinaryOperator::Add | BinaryOperator::Sub => Precedence::Term,
            BinaryOperator::Div
            | BinaryOperator::Mul
            | BinaryOperator::Rem
            | BinaryOperator::BitAnd
            | BinaryOperator::Tilde
            | BinaryOperator::Shl
            | BinaryOperator::Shr
            | BinaryOperator::BitXor
            | BinaryOperator::BitOr => Precedence::Factor,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Eq => "==",
            BinaryOperator::NotEq => "!=",
            BinaryOperator::Gt => ">",
            BinaryOperator::GtEq => ">=",
            BinaryOperator::Lt => "<",
            BinaryOperator::LtEq => "<=",
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Div => "/",
            BinaryOperator::Mul => "*",
            BinaryOperator::Rem => "%",
            BinaryOperator::BitAnd => "&",
            BinaryOperator::Tilde => "~",
            BinaryOperator::Shl => "<<",
            BinaryOperator::Shr => ">>",
            BinaryOperator::BitXor => "^",
            BinaryOperator::BitOr => "|",
        }
    }
}

/// 一元运算，例如 `-x`, `!flag`, `&var`, `*ptr`。
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpression {
    pub operator: Node<UnaryOperator>,
    pub operand: Box<Node<Expression>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Not,
    Negate,
    AddressOf,
    Deref,
}

impl UnaryOperator {
    /// 前缀位置上的运算符。`&` 和 `*` 在这里表示取地址和解引用。
    pub fn from_prefix(op: Operator) -> Option<Self> {
        match op {
            Operator::Bang => Some(UnaryOperator::Not),
            Operator::Minus => Some(UnaryOperator::Negate),
            Operator::Amp => Some(UnaryOperator::AddressOf),
            Operator::Star => Some(UnaryOperator::Deref),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOperator::Not => "!",
            UnaryOperator::Negate => "-",
            UnaryOperator::AddressOf => "&",
            UnaryOperator::Deref => "*",
        }
    }
}

/// `receiver.a.b(1).c`
#[derive(Debug, Clone, PartialEq)]
pub struct DotExpression {
    pub receiver: Box<Node<Expression>>,
    pub suffixes: Vec<Node<DotSuffix>>,
}

/// `.` 之后的一段。
#[derive(Debug, Clone, PartialEq)]
pub enum DotSuffix {
    /// `.name(args)`
    Call {
        name: Identifier,
        arguments: Vec<Node<Expression>>,
    },
    /// `.name`
    Field(Identifier),
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Number(NumberLiteral),
    String(String),
    Bool(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexExpression {
    pub target: IdentOrPath,
    pub index: Box<Node<Expression>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    pub callee: IdentOrPath,
    pub arguments: Vec<Node<Expression>>,
}

/// `[1, 2, 3]` 或带元素类型的 `[1, 2, 3]u8`。
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayLiteral {
    pub elements: Vec<Node<Expression>>,
    pub element_type: Option<Node<TypeExpr>>,
}

// --- 5. 类型 ---

/// 类型表达式，例如 `i32`, `*u8`, `[4]std:io:File`。
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    Array(ArrayType),
    /// 指向另一个类型的指针，例如 `*i32`。
    Pointer(Box<Node<TypeExpr>>),
    /// 命名类型，如 `i32` 或 `std:io:File`。
    Named(IdentOrPath),
    /// 超过嵌套深度时插入的占位节点。
    Error,
}

/// `[N]T`，`N` 可以省略。
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayType {
    pub length: Option<Node<NumberLiteral>>,
    pub element: Box<Node<TypeExpr>>,
}
