use std::ops::Range;

/// 代表源代码中的一个位置范围，包含起始和结束的字节索引。
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// 一个长度为零的位置，常用于文件末尾。
    pub fn empty(at: usize) -> Self {
        Self { start: at, end: at }
    }

    /// 从 `self` 的起点一直覆盖到 `other` 的终点。
    pub fn to(self, other: Span) -> Self {
        Self::new(self.start, other.end)
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// `other` 是否完全落在 `self` 之内。
    pub fn contains(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn into_range(self) -> Range<usize> {
        self.start..self.end
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end,
        }
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Self {
        span.start..span.end
    }
}

/// 行首偏移量表，用于把字节偏移换算成 (行, 列)。
///
/// 行号和列号都从 1 开始，列按字符（而不是字节）计数。
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { line_starts }
    }

    /// 返回 `offset` 所在的 (行, 列)。
    pub fn position(&self, source: &str, offset: usize) -> (usize, usize) {
        let offset = offset.min(source.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let line_start = self.line_starts[line];
        let column = source
            .get(line_start..offset)
            .map_or(offset - line_start, |prefix| prefix.chars().count());
        (line + 1, column + 1)
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_join_and_contains() {
        let a = Span::new(2, 5);
        let b = Span::new(7, 9);
        let joined = a.to(b);
        assert_eq!(joined, Span::new(2, 9));
        assert!(joined.contains(a));
        assert!(joined.contains(b));
        assert!(!a.contains(joined));
        assert_eq!(joined.into_range(), 2..9);
    }

    #[test]
    fn test_line_index_positions() {
        let source = "fn main() {\n  x := 1\r\n}\n";
        let index = LineIndex::new(source);
        assert_eq!(index.line_count(), 4);
        assert_eq!(index.position(source, 0), (1, 1));
        assert_eq!(index.position(source, 3), (1, 4));
        // `x` 位于第二行的第三列
        assert_eq!(index.position(source, 14), (2, 3));
        assert_eq!(index.position(source, 22), (3, 1));
        assert_eq!(index.position(source, source.len()), (4, 1));
    }

    #[test]
    fn test_line_index_counts_chars_not_bytes() {
        let source = "\"héllo\" x";
        let index = LineIndex::new(source);
        let x = source.find('x').unwrap();
        assert_eq!(index.position(source, x), (1, 9));
    }
}
