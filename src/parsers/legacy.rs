//! # 旧版 CP2K 能带输出解析器
//!
//! CP2K 8 之前的能带结构文件，按列排布，无注释前缀。
//!
//! ## 格式说明
//! ```text
//!  SET:       1                 TOTAL POINTS:      51
//!   POINT   1                  GAMMA     0.00000000  0.00000000  0.00000000
//!   POINT   2                      X     0.50000000  0.00000000  0.50000000
//!   Nr.    1    Spin 1        K-Point  0.00000000  0.00000000  0.00000000
//!       8
//!      -5.79683956    6.25017620    6.25017620    6.25017620
//!       8.84738327    8.84738327    8.84738327   11.80214170
//!   Nr.    2    Spin 1        K-Point  ...
//! ```
//!
//! ## 依赖关系
//! - 被 `parsers/bandstructure.rs` 分派调用
//! - 使用 `parsers/scan.rs`, `models/kpoint.rs`

use super::scan::{is_unsigned, parse_f64, parse_index, Fragment, Line, LineIter};
use crate::error::Result;
use crate::models::{Point, SpecialPoint};

use once_cell::sync::Lazy;
use regex::Regex;
use std::iter::Peekable;

/// 错误信息中使用的格式名
pub const FORMAT: &str = "legacy";

/// 集合头: `SET: <setnr>  TOTAL POINTS: <totalpoints>`
pub static SET_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*SET:\s*(\d+)\s*TOTAL POINTS:\s*(\d+)\s*$").unwrap());

/// 高对称点迭代器: `POINT <index> <label> <a> <b> <c>`
#[derive(Debug, Clone)]
pub struct SpecialPoints<'a> {
    lines: LineIter<'a>,
}

impl<'a> SpecialPoints<'a> {
    pub fn new(fragment: Fragment<'a>) -> Self {
        SpecialPoints {
            lines: fragment.lines(),
        }
    }
}

impl<'a> Iterator for SpecialPoints<'a> {
    type Item = Result<SpecialPoint>;

    fn next(&mut self) -> Option<Self::Item> {
        for line in self.lines.by_ref() {
            let parts: Vec<&str> = line.text.split_whitespace().collect();
            if parts.len() >= 6 && parts[0] == "POINT" && is_unsigned(parts[1]) {
                return Some(parse_special_point(&parts, line.number));
            }
        }
        None
    }
}

fn parse_special_point(parts: &[&str], line: usize) -> Result<SpecialPoint> {
    Ok(SpecialPoint {
        number: parse_index(parts[1], FORMAT, line, "special point number")?,
        name: parts[2].to_string(),
        a: parse_f64(parts[3], FORMAT, line, "coordinate a")?,
        b: parse_f64(parts[4], FORMAT, line, "coordinate b")?,
        c: parse_f64(parts[5], FORMAT, line, "coordinate c")?,
    })
}

/// 采样 k 点迭代器
///
/// 每条记录由 `Nr.` 行、能带数行和随后的能量数值块组成，
/// 数值块一直延续到下一个 `Nr.` 行或片段末尾。
#[derive(Debug, Clone)]
pub struct Points<'a> {
    lines: Peekable<LineIter<'a>>,
}

impl<'a> Points<'a> {
    pub fn new(fragment: Fragment<'a>) -> Self {
        Points {
            lines: fragment.lines().peekable(),
        }
    }

    fn read_record(&mut self, header: Line<'a>) -> Result<Point> {
        // Nr. <n> Spin <s> K-Point <a> <b> <c>
        let parts: Vec<&str> = header.text.split_whitespace().collect();
        let line = header.number;

        let spin = parse_index(parts[3], FORMAT, line, "spin")?;
        let a = parse_f64(parts[5], FORMAT, line, "coordinate a")?;
        let b = parse_f64(parts[6], FORMAT, line, "coordinate b")?;
        let c = parse_f64(parts[7], FORMAT, line, "coordinate c")?;

        let mut bands = Vec::new();
        while let Some(values) = self.lines.next_if(|l| !is_record_header(l.text)) {
            for token in values.text.split_whitespace() {
                bands.push(parse_f64(token, FORMAT, values.number, "band energy")?);
            }
        }

        Ok(Point {
            a,
            b,
            c,
            bands,
            spin,
            weight: None,
        })
    }

    /// 丢弃当前记录剩余的数值块
    fn skip_values(&mut self) {
        while self.lines.next_if(|l| !is_record_header(l.text)).is_some() {}
    }
}

impl<'a> Iterator for Points<'a> {
    type Item = Result<Point>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let header = self.lines.by_ref().find(|l| is_record_header(l.text))?;

            // 缺少能带数行的 Nr. 行不构成记录
            if self.lines.next_if(|l| is_band_count(l.text)).is_none() {
                self.skip_values();
                continue;
            }

            return Some(self.read_record(header));
        }
    }
}

fn is_record_header(text: &str) -> bool {
    let parts: Vec<&str> = text.split_whitespace().collect();
    parts.len() == 8
        && parts[0] == "Nr."
        && is_unsigned(parts[1])
        && parts[2] == "Spin"
        && is_unsigned(parts[3])
        && parts[4] == "K-Point"
}

fn is_band_count(text: &str) -> bool {
    is_unsigned(text.trim())
}
