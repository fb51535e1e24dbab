//! # 输出文件名模板
//!
//! 模板中可用的占位符:
//! - `{bsfile}`: 输入文件路径（按命令行给出的形式），`{bsfile.name}` 为其别名
//! - `{name}`: 输入文件名
//! - `{stem}`: 去掉扩展名的输入文件名
//! - `{setnr}`: 源文件声明的集合序号
//!
//! ## 依赖关系
//! - 被 `commands/convert.rs`, `commands/plot.rs` 使用

use crate::error::{Bs2CsvError, Result};

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::path::{Path, PathBuf};

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([^{}]*)\}").unwrap());

const KNOWN_PLACEHOLDERS: [&str; 5] = ["bsfile", "bsfile.name", "name", "stem", "setnr"];

/// 随输入文件变化的占位符
const INPUT_PLACEHOLDERS: [&str; 4] = ["bsfile", "bsfile.name", "name", "stem"];

/// 检查模板中的占位符是否都可识别
pub fn validate_pattern(pattern: &str) -> Result<()> {
    for caps in PLACEHOLDER.captures_iter(pattern) {
        let key = &caps[1];
        if !KNOWN_PLACEHOLDERS.contains(&key) {
            return Err(Bs2CsvError::InvalidArgument(format!(
                "Unknown placeholder '{{{}}}' in output pattern '{}'. Available: {}",
                key,
                pattern,
                KNOWN_PLACEHOLDERS
                    .iter()
                    .map(|k| format!("{{{}}}", k))
                    .collect::<Vec<_>>()
                    .join(", ")
            )));
        }
    }
    Ok(())
}

/// 检查模板是否引用了输入文件
///
/// 批量模式下所有输入共用一个模板，不含输入文件占位符时
/// 不同文件的同号集合会写到同一路径。
pub fn require_input_placeholder(pattern: &str) -> Result<()> {
    let names_input = PLACEHOLDER
        .captures_iter(pattern)
        .any(|caps| INPUT_PLACEHOLDERS.contains(&&caps[1]));

    if names_input {
        Ok(())
    } else {
        Err(Bs2CsvError::InvalidArgument(format!(
            "Output pattern '{}' must contain {{bsfile}}, {{name}} or {{stem}} in batch mode",
            pattern
        )))
    }
}

/// 展开模板得到某个集合的输出路径
pub fn expand_pattern(pattern: &str, input: &Path, setnr: u32) -> Result<PathBuf> {
    validate_pattern(pattern)?;

    let bsfile = input.display().to_string();
    let name = input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("bandstructure")
        .to_string();
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("bandstructure")
        .to_string();

    let expanded = PLACEHOLDER.replace_all(pattern, |caps: &Captures| match &caps[1] {
        "bsfile" | "bsfile.name" => bsfile.clone(),
        "name" => name.clone(),
        "stem" => stem.clone(),
        "setnr" => setnr.to_string(),
        _ => String::new(),
    });

    Ok(PathBuf::from(expanded.into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pattern() {
        let path = expand_pattern("{bsfile}.set-{setnr}.csv", Path::new("out/Si.bs"), 2).unwrap();
        assert_eq!(path, PathBuf::from("out/Si.bs.set-2.csv"));
    }

    #[test]
    fn test_name_and_stem() {
        let input = Path::new("runs/Si.bs");
        assert_eq!(
            expand_pattern("csv/{stem}_{setnr}.csv", input, 1).unwrap(),
            PathBuf::from("csv/Si_1.csv")
        );
        assert_eq!(
            expand_pattern("{name}.dat", input, 1).unwrap(),
            PathBuf::from("Si.bs.dat")
        );
    }

    #[test]
    fn test_bsfile_name_alias() {
        let input = Path::new("out/Si.bs");
        assert_eq!(
            expand_pattern("{bsfile.name}.set-{setnr}.csv", input, 3).unwrap(),
            expand_pattern("{bsfile}.set-{setnr}.csv", input, 3).unwrap()
        );
    }

    #[test]
    fn test_require_input_placeholder() {
        assert!(require_input_placeholder("{bsfile}.set-{setnr}.csv").is_ok());
        assert!(require_input_placeholder("{bsfile.name}.set-{setnr}.csv").is_ok());
        assert!(require_input_placeholder("csv/{stem}_{setnr}.csv").is_ok());
        assert!(matches!(
            require_input_placeholder("out/set-{setnr}.csv"),
            Err(Bs2CsvError::InvalidArgument(_))
        ));
        assert!(require_input_placeholder("plain.csv").is_err());
    }

    #[test]
    fn test_unknown_placeholder() {
        assert!(validate_pattern("{bsfile}.{set}.csv").is_err());
        assert!(expand_pattern("{}.csv", Path::new("a.bs"), 1).is_err());
        assert!(validate_pattern("plain.csv").is_ok());
    }
}
