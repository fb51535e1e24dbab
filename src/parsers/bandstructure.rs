//! # 能带结构文档分派与集合枚举
//!
//! 检测文档使用的输出格式（整篇文档只属于一种格式），
//! 按集合头把文本切成片段，并为每个片段绑定对应格式的提取器。
//!
//! ## 检测规则
//! - 先查找新格式集合头 `# Set N: ...`，找到即按新格式处理，
//!   并从第一个命中的集合头继续枚举
//! - 否则回退到旧格式集合头 `SET: N ... TOTAL POINTS: N`
//! - 两者都没有时得到空序列，不视为错误
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `parsers/legacy.rs`, `parsers/modern.rs`, `parsers/scan.rs`

use super::scan::{parse_index, Fragment, Line, LineIter};
use super::{legacy, modern};
use crate::error::{Bs2CsvError, Result};
use crate::models::{Point, SpecialPoint};

use regex::Regex;

/// 输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// CP2K 8 之前的按列格式
    Legacy,
    /// CP2K 8+ 的 `#` 注释格式
    Modern,
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::Legacy => write!(f, "legacy (CP2K < 8)"),
            Dialect::Modern => write!(f, "modern (CP2K 8+)"),
        }
    }
}

impl Dialect {
    /// 错误信息中的格式名
    pub fn name(self) -> &'static str {
        match self {
            Dialect::Legacy => legacy::FORMAT,
            Dialect::Modern => modern::FORMAT,
        }
    }

    fn set_header(self) -> &'static Regex {
        match self {
            Dialect::Legacy => &legacy::SET_HEADER,
            Dialect::Modern => &modern::SET_HEADER,
        }
    }

    fn is_set_header(self, text: &str) -> bool {
        self.set_header().is_match(text)
    }

    /// 查找该格式的第一个集合头
    fn first_header(self, content: &str) -> Option<(Line<'_>, LineIter<'_>)> {
        let mut lines = LineIter::new(content, 1);
        let header = lines.by_ref().find(|l| self.is_set_header(l.text))?;
        Some((header, lines))
    }

    /// 解析集合头中的集合序号与声明的 k 点总数
    fn read_set_header(self, header: &Line<'_>) -> Result<(u32, usize)> {
        let format = self.name();
        let caps = self.set_header().captures(header.text).ok_or_else(|| {
            Bs2CsvError::malformed(format, header.number, "expected a set header")
        })?;
        let setnr = parse_index(&caps[1], format, header.number, "set number")?;
        let totalpoints = parse_index(&caps[2], format, header.number, "total points")?;
        Ok((setnr, totalpoints as usize))
    }
}

/// 一个 k 点集合
///
/// 两个记录序列都是按需从同一段不可变文本重新扫描得到的，
/// 多次调用会得到相同结果。
#[derive(Debug, Clone, Copy)]
pub struct KpointSet<'a> {
    /// 源文件声明的集合序号
    pub setnr: u32,
    /// 源文件声明的 k 点总数，不与实际解析出的点数交叉校验
    pub totalpoints: usize,
    dialect: Dialect,
    fragment: Fragment<'a>,
}

impl<'a> KpointSet<'a> {
    pub fn special_points(&self) -> SpecialPoints<'a> {
        match self.dialect {
            Dialect::Legacy => SpecialPoints::Legacy(legacy::SpecialPoints::new(self.fragment)),
            Dialect::Modern => SpecialPoints::Modern(modern::SpecialPoints::new(self.fragment)),
        }
    }

    pub fn points(&self) -> Points<'a> {
        match self.dialect {
            Dialect::Legacy => Points::Legacy(legacy::Points::new(self.fragment)),
            Dialect::Modern => Points::Modern(modern::Points::new(self.fragment)),
        }
    }
}

/// 高对称点序列
#[derive(Debug, Clone)]
pub enum SpecialPoints<'a> {
    Legacy(legacy::SpecialPoints<'a>),
    Modern(modern::SpecialPoints<'a>),
}

impl<'a> Iterator for SpecialPoints<'a> {
    type Item = Result<SpecialPoint>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            SpecialPoints::Legacy(it) => it.next(),
            SpecialPoints::Modern(it) => it.next(),
        }
    }
}

/// 采样 k 点序列
#[derive(Debug, Clone)]
pub enum Points<'a> {
    Legacy(legacy::Points<'a>),
    Modern(modern::Points<'a>),
}

impl<'a> Iterator for Points<'a> {
    type Item = Result<Point>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Points::Legacy(it) => it.next(),
            Points::Modern(it) => it.next(),
        }
    }
}

/// 集合枚举器
#[derive(Debug, Clone)]
pub struct SetIter<'a> {
    content: &'a str,
    dialect: Option<Dialect>,
    lines: LineIter<'a>,
    /// 下一个集合的集合头
    pending: Option<Line<'a>>,
}

impl<'a> SetIter<'a> {
    /// 检测到的格式，文档中没有任何集合头时为 `None`
    pub fn dialect(&self) -> Option<Dialect> {
        self.dialect
    }
}

impl<'a> Iterator for SetIter<'a> {
    type Item = Result<KpointSet<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        let dialect = self.dialect?;
        let header = self.pending.take()?;

        let next_header = self.lines.by_ref().find(|l| dialect.is_set_header(l.text));
        let end = next_header.map_or(self.content.len(), |l| l.offset);
        self.pending = next_header;

        let fragment = Fragment::new(&self.content[header.end..end], header.number + 1);

        Some(
            dialect
                .read_set_header(&header)
                .map(|(setnr, totalpoints)| KpointSet {
                    setnr,
                    totalpoints,
                    dialect,
                    fragment,
                }),
        )
    }
}

/// 枚举文档中的所有 k 点集合
pub fn sets(content: &str) -> SetIter<'_> {
    for dialect in [Dialect::Modern, Dialect::Legacy] {
        if let Some((header, lines)) = dialect.first_header(content) {
            return SetIter {
                content,
                dialect: Some(dialect),
                lines,
                pending: Some(header),
            };
        }
    }

    SetIter {
        content,
        dialect: None,
        lines: LineIter::new("", 1),
        pending: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEGACY: &str = r#" SET:       1                 TOTAL POINTS:       3
  POINT   1                  GAMMA     0.00000000  0.00000000  0.00000000
  POINT   2                      X     0.50000000  0.00000000  0.50000000
  Nr.    1    Spin 1        K-Point  0.00000000  0.00000000  0.00000000
      2
     -5.79683956    6.25017620
  Nr.    2    Spin 1        K-Point  0.50000000  0.00000000  0.50000000
      2
     -3.00000000    4.00000000
 SET:       2                 TOTAL POINTS:       1
  POINT   1                      L     0.50000000  0.50000000  0.50000000
  Nr.    1    Spin 1        K-Point  0.50000000  0.50000000  0.50000000
      2
     -1.00000000    2.00000000
"#;

    const MODERN: &str = r#"# Set 1: 2 special points, 2 k-points, 2 bands
#  Special point 1      0.00000000     0.00000000     0.00000000  GAMMA
#  Special point 2      0.50000000     0.00000000     0.50000000  X
#  Point 1  Spin 1:    0.00000000   0.00000000   0.00000000   0.50000000
#   Band    Energy [eV]     Occupation
       1     -5.79683956    2.00000000
       2      6.25017620    0.00000000
#  Point 2  Spin 1:    0.50000000   0.00000000   0.50000000   0.50000000
#   Band    Energy [eV]     Occupation
       1     -3.00000000    2.00000000
       2      4.00000000    0.00000000
# Set 2: 1 special points, 1 k-points, 2 bands
#  Special point 1      0.50000000     0.50000000     0.50000000  L
#  Point 1  Spin 1:    0.50000000   0.50000000   0.50000000   1.00000000
#   Band    Energy [eV]     Occupation
       1     -1.00000000    2.00000000
       2      2.00000000    0.00000000
"#;

    #[test]
    fn test_detect() {
        assert_eq!(sets(LEGACY).dialect(), Some(Dialect::Legacy));
        assert_eq!(sets(MODERN).dialect(), Some(Dialect::Modern));
        assert_eq!(sets("").dialect(), None);
        assert_eq!(sets("nothing to see here\n").dialect(), None);
    }

    #[test]
    fn test_legacy_with_hash_character() {
        let content = format!("# generated by CP2K, run #42\n{}", LEGACY);
        let iter = sets(&content);
        assert_eq!(iter.dialect(), Some(Dialect::Legacy));
        assert_eq!(iter.count(), 2);
    }

    #[test]
    fn test_empty_document_yields_no_sets() {
        assert_eq!(sets("").count(), 0);
        assert_eq!(sets("\n\n   \n").count(), 0);
        assert_eq!(sets("").dialect(), None);
    }

    #[test]
    fn test_legacy_sets_are_independent() {
        let sets: Vec<KpointSet> = sets(LEGACY).collect::<Result<_>>().unwrap();
        assert_eq!(sets.len(), 2);

        assert_eq!(sets[0].setnr, 1);
        assert_eq!(sets[0].totalpoints, 3);
        let special: Vec<SpecialPoint> = sets[0].special_points().collect::<Result<_>>().unwrap();
        let points: Vec<Point> = sets[0].points().collect::<Result<_>>().unwrap();
        assert_eq!(special.len(), 2);
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].bands, vec![-3.0, 4.0]);

        assert_eq!(sets[1].setnr, 2);
        let special: Vec<SpecialPoint> = sets[1].special_points().collect::<Result<_>>().unwrap();
        let points: Vec<Point> = sets[1].points().collect::<Result<_>>().unwrap();
        assert_eq!(special.len(), 1);
        assert_eq!(special[0].name, "L");
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].bands, vec![-1.0, 2.0]);
    }

    #[test]
    fn test_modern_sets_are_independent() {
        let sets: Vec<KpointSet> = sets(MODERN).collect::<Result<_>>().unwrap();
        assert_eq!(sets.len(), 2);

        let special: Vec<SpecialPoint> = sets[0].special_points().collect::<Result<_>>().unwrap();
        assert_eq!(special.len(), 2);
        assert_eq!(special[1].name, "X");

        let points: Vec<Point> = sets[0].points().collect::<Result<_>>().unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].weight, Some(0.5));
        assert_eq!(points[1].bands, vec![-3.0, 4.0]);

        let points: Vec<Point> = sets[1].points().collect::<Result<_>>().unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].weight, Some(1.0));
    }

    #[test]
    fn test_sequences_are_restartable() {
        let set = sets(MODERN).next().unwrap().unwrap();
        let first: Vec<Point> = set.points().collect::<Result<_>>().unwrap();
        let second: Vec<Point> = set.points().collect::<Result<_>>().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_modern_takes_precedence() {
        // 同时含两种集合头时按新格式处理
        let content = format!("{}{}", LEGACY, MODERN);
        let iter = sets(&content);
        assert_eq!(iter.dialect(), Some(Dialect::Modern));
        assert_eq!(iter.count(), 2);
    }

    #[test]
    fn test_declared_total_is_not_validated() {
        // 第一组声明 3 个点，实际只有 2 个
        let set = sets(LEGACY).next().unwrap().unwrap();
        assert_eq!(set.totalpoints, 3);
        assert_eq!(set.points().count(), 2);
    }

    #[test]
    fn test_malformed_value_reports_document_line() {
        let content = LEGACY.replace("-3.00000000", "-3.0000x000");
        let set = sets(&content).next().unwrap().unwrap();
        let result: Result<Vec<Point>> = set.points().collect();

        match result {
            Err(Bs2CsvError::ParseError { format, line, .. }) => {
                assert_eq!(format, "legacy");
                assert_eq!(line, 9);
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}
