//! # 行扫描工具
//!
//! 按行切分文本并保留行号与字节偏移，供两种格式的提取器共用。
//!
//! ## 依赖关系
//! - 被 `parsers/bandstructure.rs`, `parsers/legacy.rs`, `parsers/modern.rs` 使用
//! - 使用 `error.rs`

use crate::error::{Bs2CsvError, Result};

/// 带位置信息的一行文本（不含行尾换行符）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// 文档中的行号（从 1 开始）
    pub number: usize,
    /// 行首字节偏移
    pub offset: usize,
    /// 行尾（含换行符）之后的字节偏移
    pub end: usize,
    pub text: &'a str,
}

/// 逐行迭代器，可克隆以便从同一位置重新扫描
#[derive(Debug, Clone)]
pub struct LineIter<'a> {
    text: &'a str,
    pos: usize,
    number: usize,
}

impl<'a> LineIter<'a> {
    /// `first_line` 为第一行在原文档中的行号
    pub fn new(text: &'a str, first_line: usize) -> Self {
        LineIter {
            text,
            pos: 0,
            number: first_line,
        }
    }
}

impl<'a> Iterator for LineIter<'a> {
    type Item = Line<'a>;

    fn next(&mut self) -> Option<Line<'a>> {
        if self.pos >= self.text.len() {
            return None;
        }

        let rest = &self.text[self.pos..];
        let (raw, consumed) = match rest.find('\n') {
            Some(idx) => (&rest[..idx], idx + 1),
            None => (rest, rest.len()),
        };

        let line = Line {
            number: self.number,
            offset: self.pos,
            end: self.pos + consumed,
            text: raw.strip_suffix('\r').unwrap_or(raw),
        };

        self.pos += consumed;
        self.number += 1;
        Some(line)
    }
}

/// 单个 k 点集合对应的文本片段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment<'a> {
    pub text: &'a str,
    /// 片段首行在原文档中的行号
    pub first_line: usize,
}

impl<'a> Fragment<'a> {
    pub fn new(text: &'a str, first_line: usize) -> Self {
        Fragment { text, first_line }
    }

    pub fn lines(&self) -> LineIter<'a> {
        LineIter::new(self.text, self.first_line)
    }
}

/// 是否为纯数字（正则中的 `\d+`）
pub fn is_unsigned(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

/// 解析浮点字段
pub fn parse_f64(token: &str, format: &str, line: usize, field: &str) -> Result<f64> {
    token.parse::<f64>().map_err(|_| {
        Bs2CsvError::malformed(
            format,
            line,
            format!("expected a number for {}, found '{}'", field, token),
        )
    })
}

/// 解析序号类字段（只会在 `is_unsigned` 通过后调用，失败仅可能是溢出）
pub fn parse_index(token: &str, format: &str, line: usize, field: &str) -> Result<u32> {
    token.parse::<u32>().map_err(|_| {
        Bs2CsvError::malformed(
            format,
            line,
            format!("{} '{}' is not a valid index", field, token),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_positions() {
        let text = "first\r\nsecond\nthird";
        let lines: Vec<_> = LineIter::new(text, 10).collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].text, "first");
        assert_eq!(lines[0].number, 10);
        assert_eq!(lines[1].offset, 7);
        assert_eq!(lines[1].end, 14);
        assert_eq!(lines[2].text, "third");
        assert_eq!(lines[2].end, text.len());
        assert_eq!(lines[2].number, 12);
    }

    #[test]
    fn test_empty_text_has_no_lines() {
        assert_eq!(LineIter::new("", 1).count(), 0);
    }

    #[test]
    fn test_is_unsigned() {
        assert!(is_unsigned("12"));
        assert!(!is_unsigned(""));
        assert!(!is_unsigned("-1"));
        assert!(!is_unsigned("1.0"));
    }

    #[test]
    fn test_parse_f64_reports_line() {
        assert_eq!(parse_f64("-5.5", "legacy", 3, "band").unwrap(), -5.5);

        match parse_f64("abc", "legacy", 42, "band energy") {
            Err(Bs2CsvError::ParseError { line, reason, .. }) => {
                assert_eq!(line, 42);
                assert!(reason.contains("abc"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
