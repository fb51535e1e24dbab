//! # 数据模型模块
//!
//! 定义能带结构输出解析后的统一数据模型。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `export/` 和 `commands/` 使用
//! - 子模块: kpoint

pub mod kpoint;

pub use kpoint::{Point, SpecialPoint};
