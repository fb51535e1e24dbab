//! # bs2csv - CP2K 能带结构输出转换工具
//!
//! 解析 CP2K 的能带结构输出（CP2K 8 之前的旧格式与 CP2K 8+ 的新格式），
//! 将每个 k 点集合写成单独的表格文件。
//!
//! ## 子命令
//! - `convert` - 按集合拆分为定宽文本 / CSV 文件（支持目录批量）
//! - `inspect` - 显示格式与各集合概况
//! - `plot`    - 绘制能带图
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── parsers/   (格式检测与解析)
//!   │     ├── export/    (表格与图像导出)
//!   │     ├── batch/     (目录批量处理)
//!   │     └── models/    (数据模型)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod error;
mod export;
mod models;
mod parsers;
mod utils;

use clap::{CommandFactory, Parser};
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let Some(command) = Cli::parse().into_command() else {
        Cli::command().print_help().ok();
        return;
    };

    if let Err(e) = commands::run(command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
