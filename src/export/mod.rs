//! # 导出模块
//!
//! 将解析后的 k 点集合写出为表格文件或能带图。
//!
//! ## 子模块
//! - `naming`: 输出文件名模板展开
//! - `table`: 定宽文本 / CSV 表格写出
//! - `plot`: 基于 `plotters` 的能带图
//!
//! ## 依赖关系
//! - 被 `commands/` 调用
//! - 使用 `models/` 数据模型

pub mod naming;
pub mod plot;
pub mod table;

pub use naming::{expand_pattern, require_input_placeholder, validate_pattern};
pub use plot::{build_paths, generate_band_plot, special_ticks};
pub use table::{write_csv, write_fixed_width, write_special_points};
