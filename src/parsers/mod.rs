//! # 解析器模块
//!
//! 解析 CP2K 能带结构输出文件，支持两种互斥的文本格式。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: bandstructure (格式分派与集合枚举), legacy, modern, scan

pub mod bandstructure;
pub mod legacy;
pub mod modern;
pub mod scan;

pub use bandstructure::{sets, Dialect};

use crate::error::{Bs2CsvError, Result};
use std::fs;
use std::path::Path;

/// 读取整个能带结构文件
pub fn read_bandstructure_file(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(Bs2CsvError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    fs::read_to_string(path).map_err(|e| Bs2CsvError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })
}
