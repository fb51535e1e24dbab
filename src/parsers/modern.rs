//! # CP2K 8+ 能带输出解析器
//!
//! 新版能带结构文件，所有元数据行以 `#` 开头，数值行为
//! `能带序号 能量 占据数` 三列。
//!
//! ## 格式说明
//! ```text
//! # Set 1: 2 special points, 51 k-points, 8 bands
//! #  Special point 1      0.00000000     0.00000000     0.00000000  GAMMA
//! #  Special point 2      0.50000000     0.00000000     0.50000000  X
//! #  Point 1  Spin 1:    0.00000000   0.00000000   0.00000000   0.01960784
//! #   Band    Energy [eV]     Occupation
//!        1     -5.79683956    2.00000000
//!        2      6.25017620    2.00000000
//! #  Point 2  Spin 1:    ...
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
pub const FORMAT: &str = "modern";

/// 集合头: `# Set <setnr>: <n> special points, <totalpoints> k-points, <n> bands`
pub static SET_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*#\s*Set\s+(\d+):\s*\d+\s+special points?,\s*(\d+)\s+k-points?,\s*\d+\s+bands?\s*$",
    )
    .unwrap()
});

/// 能量表头各列
const BAND_TABLE_HEADER: [&str; 5] = ["#", "Band", "Energy", "[eV]", "Occupation"];

/// 高对称点迭代器: `# Special point <index> <a> <b> <c> <label>`
///
/// 注意坐标在标签之前，与旧格式相反。
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
            if parts.len() >= 8
                && parts[0] == "#"
                && parts[1] == "Special"
                && parts[2] == "point"
                && is_unsigned(parts[3])
            {
                return Some(parse_special_point(&parts, line.number));
            }
        }
        None
    }
}

fn parse_special_point(parts: &[&str], line: usize) -> Result<SpecialPoint> {
    Ok(SpecialPoint {
        number: parse_index(parts[3], FORMAT, line, "special point number")?,
        name: parts[7].to_string(),
        a: parse_f64(parts[4], FORMAT, line, "coordinate a")?,
        b: parse_f64(parts[5], FORMAT, line, "coordinate b")?,
        c: parse_f64(parts[6], FORMAT, line, "coordinate c")?,
    })
}

/// 采样 k 点迭代器
///
/// 记录由 `#  Point` 行、固定的能量表头行和随后的三列数值行组成，
/// 只保留能量列，能带序号和占据数丢弃。
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
        // # Point <n> Spin <s>: <a> <b> <c> [<weight>]
        let parts: Vec<&str> = header.text.split_whitespace().collect();
        let line = header.number;

        let spin = parse_index(spin_token(parts[4]), FORMAT, line, "spin")?;
        let a = parse_f64(parts[5], FORMAT, line, "coordinate a")?;
        let b = parse_f64(parts[6], FORMAT, line, "coordinate b")?;
        let c = parse_f64(parts[7], FORMAT, line, "coordinate c")?;
        let weight = match parts.get(8) {
            Some(token) => Some(parse_f64(token, FORMAT, line, "weight")?),
            None => None,
        };

        // 展平后每三个取一个：序号 能量 占据数
        let mut values: Vec<(usize, &'a str)> = Vec::new();
        while let Some(row) = self.lines.next_if(|l| !is_record_header(l.text)) {
            values.extend(row.text.split_whitespace().map(|t| (row.number, t)));
        }

        let bands = values
            .iter()
            .skip(1)
            .step_by(3)
            .map(|(number, token)| parse_f64(token, FORMAT, *number, "band energy"))
            .collect::<Result<Vec<f64>>>()?;

        Ok(Point {
            a,
            b,
            c,
            bands,
            spin,
            weight,
        })
    }

    fn skip_values(&mut self) {
        while self.lines.next_if(|l| !is_record_header(l.text)).is_some() {}
    }
}

impl<'a> Iterator for Points<'a> {
    type Item = Result<Point>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let header = self.lines.by_ref().find(|l| is_record_header(l.text))?;

            if self.lines.next_if(|l| is_band_table_header(l.text)).is_none() {
                self.skip_values();
                continue;
            }

            return Some(self.read_record(header));
        }
    }
}

/// `1:` -> `1`
fn spin_token(token: &str) -> &str {
    token.strip_suffix(':').unwrap_or(token)
}

fn is_record_header(text: &str) -> bool {
    let parts: Vec<&str> = text.split_whitespace().collect();
    (parts.len() == 8 || parts.len() == 9)
        && parts[0] == "#"
        && parts[1] == "Point"
        && is_unsigned(parts[2])
        && parts[3] == "Spin"
        && parts[4].ends_with(':')
        && is_unsigned(spin_token(parts[4]))
}

fn is_band_table_header(text: &str) -> bool {
    text.split_whitespace().eq(BAND_TABLE_HEADER.iter().copied())
}
