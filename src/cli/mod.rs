//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `convert`: 能带结构文件 -> 每个 k 点集合一个表格文件。
//!   也是默认命令，`bs2csv Si.bs -p PATTERN` 等同于 `bs2csv convert Si.bs -p PATTERN`
//! - `inspect`: 列出文档格式与各集合概况
//! - `plot`: 绘制每个集合的能带图
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: convert, inspect, plot

pub mod convert;
pub mod inspect;
pub mod plot;

use clap::{Parser, Subcommand};

/// bs2csv - CP2K 能带结构输出转换工具
#[derive(Parser)]
#[command(name = "bs2csv")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Convert CP2K band structure output into per-set CSV files", long_about = None)]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// 省略子命令时的 convert 参数
    #[command(flatten)]
    pub convert: convert::ConvertArgs,
}

impl Cli {
    /// 要执行的命令，省略子命令时为 convert
    pub fn into_command(self) -> Option<Commands> {
        match self.command {
            Some(command) => Some(command),
            None if self.convert.input.is_some() => Some(Commands::Convert(self.convert)),
            None => None,
        }
    }
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Convert a band structure file (or a directory of them) into one table per k-point set
    Convert(convert::ConvertArgs),

    /// Show the detected format and a summary of every k-point set
    Inspect(inspect::InspectArgs),

    /// Plot the band structure of every k-point set
    Plot(plot::PlotArgs),
}
