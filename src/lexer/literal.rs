//! 字面量的规范化：数字去掉 `_` 并校验进制，字符串处理转义。

use super::token::{NumberLiteral, Radix};
use crate::utils::Span;
use thiserror::Error;

/// 数字字面量不合法的原因。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumberError {
    #[error("number literal `{text}` has no digits after its `{prefix}` prefix")]
    MissingDigits { text: String, prefix: &'static str },

    #[error("invalid digit `{digit}` in {radix_name} literal `{text}`")]
    InvalidDigit {
        text: String,
        digit: char,
        radix_name: &'static str,
    },
}

fn radix_name(radix: Radix) -> &'static str {
    match radix {
        Radix::Binary => "binary",
        Radix::Octal => "octal",
        Radix::Decimal => "decimal",
        Radix::Hexadecimal => "hexadecimal",
    }
}

/// 判断一段数字文本声明的进制，返回进制和去掉前缀后的部分。
pub(super) fn split_radix(text: &str) -> (Radix, &str) {
    if let Some(rest) = text.strip_prefix("0x") {
        (Radix::Hexadecimal, rest)
    } else if let Some(rest) = text.strip_prefix("0o") {
        (Radix::Octal, rest)
    } else if let Some(rest) = text.strip_prefix("0b") {
        (Radix::Binary, rest)
    } else {
        (Radix::Decimal, text)
    }
}

/// 校验并规范化一个数字字面量。
///
/// 小数只允许十进制；`_` 只用于排版，在这里被去掉。
pub(super) fn normalize_number(text: &str) -> Result<NumberLiteral, NumberError> {
    let (radix, body) = split_radix(text);
    let fractional = radix == Radix::Decimal && body.contains('.');

    let mut digits = String::with_capacity(body.len());
    for c in body.chars() {
        match c {
            '_' => {}
            '.' if fractional => digits.push(c),
            c if c.is_digit(radix.base()) => digits.push(c),
            other => {
                return Err(NumberError::InvalidDigit {
                    text: text.to_string(),
                    digit: other,
                    radix_name: radix_name(radix),
                });
            }
        }
    }

    if digits.is_empty() {
        // `0x_`、`0b__` 这类只有 `_` 的写法合法，值为 0
        if !body.is_empty() && radix != Radix::Decimal {
            digits.push('0');
            return Ok(NumberLiteral {
                radix,
                fractional,
                digits,
            });
        }
        return Err(NumberError::MissingDigits {
            text: text.to_string(),
            prefix: radix.prefix(),
        });
    }

    Ok(NumberLiteral {
        radix,
        fractional,
        digits,
    })
}

/// 处理字符串内容中的转义字符。
///
/// `body` 是去掉引号后的内容，`body_start` 是它在源文件中的字节偏移。
/// 返回处理后的字符串，以及每个非法转义的位置和字符。非法转义按原样保留。
pub(super) fn unescape(body: &str, body_start: usize) -> (String, Vec<(Span, char)>) {
    // 预先分配空间
    let mut s = String::with_capacity(body.len());
    let mut invalid = Vec::new();
    let mut chars = body.char_indices();

    while let Some((i, c)) = chars.next() {
        if c != '\\' {
            s.push(c);
            continue;
        }
        match chars.next() {
            Some((_, '"')) => s.push('"'),
            Some((_, '\\')) => s.push('\\'),
            Some((_, 'n')) => s.push('\n'),
            Some((_, 'r')) => s.push('\r'),
            Some((_, 't')) => s.push('\t'),
            Some((_, '0')) => s.push('\0'),
            Some((_, '\'')) => s.push('\''),
            Some((j, other)) => {
                let start = body_start + i;
                let end = body_start + j + other.len_utf8();
                invalid.push((Span::new(start, end), other));
                s.push('\\');
                s.push(other);
            }
            // 只会出现在未闭合的字符串末尾，由未闭合错误统一报告
            None => s.push('\\'),
        }
    }
    (s, invalid)
}
