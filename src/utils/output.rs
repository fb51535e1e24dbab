//! # 美化输出工具
//!
//! 提供统一的终端输出样式，以及转换过程中每个集合的报告格式。
//!
//! ## 依赖关系
//! - 被所有 `commands/` 模块使用
//! - 使用 `colored` crate

use crate::models::SpecialPoint;

use colored::Colorize;
use std::path::Path;

/// 打印成功消息
pub fn print_success(msg: &str) {
    println!("{} {}", "[OK]".green().bold(), msg);
}

/// 打印错误消息
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "[ERR]".red().bold(), msg);
}

/// 打印警告消息
pub fn print_warning(msg: &str) {
    println!("{} {}", "[WARN]".yellow().bold(), msg);
}

/// 打印信息消息
pub fn print_info(msg: &str) {
    println!("{} {}", "[*]".blue().bold(), msg);
}

/// 打印跳过消息
pub fn print_skip(msg: &str) {
    println!("{} {}", "[SKIP]".dimmed(), msg);
}

/// 打印完成消息
pub fn print_done(msg: &str) {
    println!("{} {}", "[DONE]".green().bold(), msg);
}

/// 打印标题栏
pub fn print_header(title: &str) {
    let line = "─".repeat(60);
    println!("\n{}", line.dimmed());
    println!("  {}", title.bold());
    println!("{}\n", line.dimmed());
}

/// 打印分隔线
pub fn print_separator() {
    println!("{}", "─".repeat(60).dimmed());
}

/// 打印即将写出的集合，后面紧跟高对称点列表
pub fn print_point_set(output: &Path, totalpoints: usize) {
    println!(
        "{} writing point set {} (total number of k-points: {})",
        "[*]".blue().bold(),
        output.display().to_string().cyan(),
        totalpoints
    );
    println!("with the following special points:");
}

/// 高对称点列表的一行
pub fn format_special_point(point: &SpecialPoint) -> String {
    format!(
        "  {:>8}: {:10.8} / {:10.8} / {:10.8}",
        point.name, point.a, point.b, point.c
    )
}

/// 打印高对称点
pub fn print_special_point(point: &SpecialPoint) {
    println!("{}", format_special_point(point));
}
