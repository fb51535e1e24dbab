//! # convert 子命令 CLI 定义
//!
//! 将能带结构文件按 k 点集合拆分为表格文件，输入为目录时批量处理。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/convert.rs`

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 表格输出格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum TableFormat {
    /// Space-separated fixed-width columns: a b c followed by the band energies
    #[default]
    Fixed,
    /// Comma-separated values with a header row, spin and weight columns
    Csv,
}

/// convert 子命令参数
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Band structure file generated by CP2K, or a directory of such files
    #[arg(required = true)]
    pub input: Option<PathBuf>,

    /// Output file pattern; placeholders: {bsfile}, {name}, {stem}, {setnr}
    #[arg(
        short = 'p',
        long,
        env = "BS2CSV_OUTPUT_PATTERN",
        default_value = "{bsfile}.set-{setnr}.csv"
    )]
    pub output_pattern: String,

    /// Row format of the output files
    #[arg(short, long, value_enum, default_value = "fixed")]
    pub format: TableFormat,

    /// Also write the special points of each set to '<output>.special.csv'
    #[arg(long, default_value_t = false)]
    pub special_points: bool,

    /// Skip sets whose output file already exists instead of overwriting it
    #[arg(long, default_value_t = false)]
    pub skip_existing: bool,

    // ─────────────────────────────────────────────────────────────
    // 批量处理参数
    // ─────────────────────────────────────────────────────────────
    /// Glob pattern for input files (batch mode, comma-separated)
    #[arg(long, default_value = "*.bs,*.bs.out")]
    pub pattern: String,

    /// Recurse into subdirectories (batch mode)
    #[arg(short, long, default_value_t = false)]
    pub recursive: bool,

    /// Number of parallel jobs (0 = auto, batch mode only)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,
}
