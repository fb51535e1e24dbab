//! # inspect 命令实现
//!
//! 列出文档格式与每个 k 点集合的概况。
//! 声明的 k 点数与实际解析出的点数不一致时只给出提示，不作为错误。
//!
//! ## 依赖关系
//! - 使用 `cli/inspect.rs` 定义的参数
//! - 使用 `parsers/`
//! - 使用 `utils/output.rs`

use crate::cli::inspect::InspectArgs;
use crate::error::Result;
use crate::parsers::{self, Dialect};
use crate::utils::output;

use tabled::{Table, Tabled};

/// 单个集合的统计
#[derive(Debug, Clone, PartialEq)]
pub struct SetSummary {
    pub setnr: u32,
    /// 源文件声明的 k 点数
    pub declared: usize,
    /// 实际解析出的采样点数
    pub parsed: usize,
    pub special_points: Vec<String>,
    /// 各采样点中最多的能带数
    pub bands: usize,
    /// 出现过的自旋通道（按首次出现顺序）
    pub spins: Vec<u32>,
}

impl SetSummary {
    pub fn is_consistent(&self) -> bool {
        self.declared == self.parsed
    }
}

/// 表格行
#[derive(Debug, Clone, Tabled)]
struct SetRow {
    #[tabled(rename = "Set")]
    setnr: u32,
    #[tabled(rename = "Declared k-points")]
    declared: usize,
    #[tabled(rename = "Parsed k-points")]
    parsed: usize,
    #[tabled(rename = "Special points")]
    special: String,
    #[tabled(rename = "Bands")]
    bands: usize,
    #[tabled(rename = "Spins")]
    spins: String,
}

impl From<&SetSummary> for SetRow {
    fn from(s: &SetSummary) -> Self {
        SetRow {
            setnr: s.setnr,
            declared: s.declared,
            parsed: s.parsed,
            special: s.special_points.join(" - "),
            bands: s.bands,
            spins: s
                .spins
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

/// 扫描整个文档并统计每个集合
pub fn summarize(content: &str) -> Result<(Option<Dialect>, Vec<SetSummary>)> {
    let sets = parsers::sets(content);
    let dialect = sets.dialect();
    let mut summaries = Vec::new();

    for set in sets {
        let set = set?;

        let special_points = set
            .special_points()
            .map(|sp| sp.map(|sp| sp.name))
            .collect::<Result<Vec<_>>>()?;

        let mut summary = SetSummary {
            setnr: set.setnr,
            declared: set.totalpoints,
            parsed: 0,
            special_points,
            bands: 0,
            spins: Vec::new(),
        };

        for point in set.points() {
            let point = point?;
            summary.parsed += 1;
            summary.bands = summary.bands.max(point.bands.len());
            if !summary.spins.contains(&point.spin) {
                summary.spins.push(point.spin);
            }
        }

        summaries.push(summary);
    }

    Ok((dialect, summaries))
}

/// 执行 inspect 命令
pub fn execute(args: InspectArgs) -> Result<()> {
    output::print_header("Inspecting CP2K Band Structure");

    let content = parsers::read_bandstructure_file(&args.input)?;
    let (dialect, summaries) = summarize(&content)?;

    let dialect = match dialect {
        Some(d) => d,
        None => {
            output::print_warning(&format!(
                "No k-point sets found in '{}'",
                args.input.display()
            ));
            return Ok(());
        }
    };

    output::print_info(&format!("File: {}", args.input.display()));
    output::print_info(&format!("Format: {}", dialect));
    output::print_info(&format!("Sets: {}", summaries.len()));

    let rows: Vec<SetRow> = summaries.iter().map(SetRow::from).collect();
    println!("\n{}\n", Table::new(&rows));

    for summary in summaries.iter().filter(|s| !s.is_consistent()) {
        output::print_warning(&format!(
            "Set {} declares {} k-points but {} were parsed",
            summary.setnr, summary.declared, summary.parsed
        ));
    }

    Ok(())
}
