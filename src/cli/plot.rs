//! # plot 子命令 CLI 定义
//!
//! 为每个 k 点集合绘制能带图。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/plot.rs`

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 图像输出格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum PlotFormat {
    /// PNG image
    Png,
    /// SVG vector image
    Svg,
}

impl PlotFormat {
    pub fn extension(self) -> &'static str {
        match self {
            PlotFormat::Png => "png",
            PlotFormat::Svg => "svg",
        }
    }
}

/// plot 子命令参数
#[derive(Args, Debug)]
pub struct PlotArgs {
    /// Band structure file generated by CP2K
    pub input: PathBuf,

    /// Output file pattern (default: '{bsfile}.set-{setnr}.<format>')
    #[arg(short, long)]
    pub output: Option<String>,

    /// Image format
    #[arg(short, long, value_enum, default_value = "png")]
    pub format: PlotFormat,

    /// Figure width in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 1200)]
    pub width: u32,

    /// Figure height in pixels (for PNG) or points (for SVG)
    #[arg(long, default_value_t = 800)]
    pub height: u32,

    /// Title for the plot (default: '<file name> set <setnr>')
    #[arg(long)]
    pub title: Option<String>,

    /// Lower bound of the energy axis in eV (default: from data)
    #[arg(long, allow_negative_numbers = true)]
    pub emin: Option<f64>,

    /// Upper bound of the energy axis in eV (default: from data)
    #[arg(long, allow_negative_numbers = true)]
    pub emax: Option<f64>,
}

impl PlotArgs {
    /// 输出文件名模板
    pub fn output_pattern(&self) -> String {
        self.output
            .clone()
            .unwrap_or_else(|| format!("{{bsfile}}.set-{{setnr}}.{}", self.format.extension()))
    }
}
