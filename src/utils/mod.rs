//! 前端各阶段共用的小工具。

pub mod span;

pub use span::{LineIndex, Span};
