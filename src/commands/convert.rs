//! # convert 命令实现
//!
//! 将 CP2K 能带结构文件按 k 点集合拆分为表格文件。
//!
//! ## 功能
//! - 自动识别新旧两种输出格式
//! - 每个集合写出一个定宽文本或 CSV 文件
//! - 可选写出高对称点列表
//! - 输入为目录时并行批量转换
//!
//! 解析错误立即中止当前文档，此前已写出的集合文件保留。
//!
//! ## 依赖关系
//! - 使用 `cli/convert.rs` 定义的参数
//! - 使用 `parsers/`, `export/`, `batch/`
//! - 使用 `utils/output.rs`

use crate::batch::{BatchResult, BatchRunner, FileCollector, ProcessResult};
use crate::cli::convert::{ConvertArgs, TableFormat};
use crate::error::{Bs2CsvError, Result};
use crate::export;
use crate::models::SpecialPoint;
use crate::parsers::{self, Dialect};
use crate::utils::output;

use std::path::{Path, PathBuf};

/// 转换配置
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub output_pattern: String,
    pub format: TableFormat,
    pub special_points: bool,
    pub skip_existing: bool,
}

impl From<&ConvertArgs> for ConvertOptions {
    fn from(args: &ConvertArgs) -> Self {
        ConvertOptions {
            output_pattern: args.output_pattern.clone(),
            format: args.format,
            special_points: args.special_points,
            skip_existing: args.skip_existing,
        }
    }
}

/// 单个文档的转换统计
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ConvertSummary {
    pub dialect: Option<Dialect>,
    /// 写出的集合数
    pub sets: usize,
    /// 因输出已存在而跳过的集合数
    pub skipped: usize,
    /// 写出的数据行总数
    pub rows: usize,
}

/// 执行 convert 命令
pub fn execute(args: ConvertArgs) -> Result<()> {
    output::print_header("Converting CP2K Band Structure");

    // 在读取任何文件之前检查模板
    export::validate_pattern(&args.output_pattern)?;
    let options = ConvertOptions::from(&args);

    let input = args.input.as_deref().ok_or_else(|| {
        Bs2CsvError::InvalidArgument("No input file or directory given".to_string())
    })?;

    if input.is_file() {
        execute_single_file(input, &options)
    } else if input.is_dir() {
        export::require_input_placeholder(&args.output_pattern)?;
        execute_batch(input, &args, &options).map(|_| ())
    } else {
        Err(Bs2CsvError::FileNotFound {
            path: input.display().to_string(),
        })
    }
}

/// 单文件模式
fn execute_single_file(input: &Path, options: &ConvertOptions) -> Result<()> {
    let content = parsers::read_bandstructure_file(input)?;
    let summary = convert_document(input, &content, options, true)?;

    match summary.dialect {
        None => {
            output::print_warning(&format!(
                "No k-point sets found in '{}' (neither CP2K band structure format matched)",
                input.display()
            ));
        }
        Some(_) => {
            output::print_done(&format!(
                "Wrote {} set(s), {} k-point row(s) ({} skipped)",
                summary.sets, summary.rows, summary.skipped
            ));
        }
    }

    Ok(())
}

/// 批量处理模式
fn execute_batch(dir: &Path, args: &ConvertArgs, options: &ConvertOptions) -> Result<BatchResult> {
    output::print_info(&format!("Batch mode: directory '{}'", dir.display()));

    let files = FileCollector::new(dir.to_path_buf())
        .with_pattern(&args.pattern)?
        .recursive(args.recursive)
        .collect();

    if files.is_empty() {
        output::print_warning(&format!(
            "No matching files found with pattern '{}'",
            args.pattern
        ));
        return Ok(BatchResult::default());
    }

    output::print_info(&format!("Found {} band structure files", files.len()));

    let runner = BatchRunner::new(args.jobs);
    output::print_info(&format!("Using {} parallel jobs", runner.jobs()));
    let result = runner.run(files, |file| process_batch_file(file, options));

    output::print_separator();
    output::print_success(&format!(
        "Batch complete: {} files, {} success, {} skipped, {} failed",
        result.total(),
        result.success,
        result.skipped,
        result.failed
    ));

    if !result.failures.is_empty() {
        output::print_warning("Failed files:");
        for (path, err) in result.failures.iter().take(10) {
            output::print_error(&format!("  {}: {}", path, err));
        }
        if result.failures.len() > 10 {
            output::print_warning(&format!("  ... and {} more", result.failures.len() - 10));
        }
    }

    Ok(result)
}

/// 处理批量模式中的单个文件
fn process_batch_file(input: &PathBuf, options: &ConvertOptions) -> ProcessResult {
    let summary = parsers::read_bandstructure_file(input)
        .and_then(|content| convert_document(input, &content, options, false));

    match summary {
        Ok(summary) if summary.dialect.is_none() => {
            ProcessResult::Skipped(format!("{}: no k-point sets", input.display()))
        }
        Ok(summary) => ProcessResult::Success(format!(
            "{}: {} set(s), {} row(s)",
            input.display(),
            summary.sets,
            summary.rows
        )),
        Err(e) => ProcessResult::Failed(input.display().to_string(), e.to_string()),
    }
}

/// 转换一个已读入内存的文档
///
/// `verbose` 为真时逐集合打印输出文件名、声明的 k 点数和高对称点。
pub fn convert_document(
    input: &Path,
    content: &str,
    options: &ConvertOptions,
    verbose: bool,
) -> Result<ConvertSummary> {
    let sets = parsers::sets(content);
    let mut summary = ConvertSummary {
        dialect: sets.dialect(),
        ..Default::default()
    };

    if verbose {
        if let Some(dialect) = summary.dialect {
            output::print_info(&format!("Detected {} format", dialect));
        }
    }

    for set in sets {
        let set = set?;
        let output_path = export::expand_pattern(&options.output_pattern, input, set.setnr)?;

        if options.skip_existing && output_path.exists() {
            if verbose {
                output::print_skip(&format!(
                    "Set {}: '{}' already exists",
                    set.setnr,
                    output_path.display()
                ));
            }
            summary.skipped += 1;
            continue;
        }

        let special_points: Vec<SpecialPoint> = set.special_points().collect::<Result<_>>()?;

        if verbose {
            output::print_point_set(&output_path, set.totalpoints);
            for point in &special_points {
                output::print_special_point(point);
            }
        }

        let rows = match options.format {
            TableFormat::Fixed => export::write_fixed_width(set.points(), &output_path)?,
            TableFormat::Csv => export::write_csv(set.points(), &output_path)?,
        };

        if options.special_points {
            let special_path = special_points_path(&output_path);
            export::write_special_points(special_points.into_iter().map(Ok), &special_path)?;
        }

        summary.sets += 1;
        summary.rows += rows;
    }

    Ok(summary)
}

/// `<output>.special.csv`
fn special_points_path(output_path: &Path) -> PathBuf {
    let mut name = output_path.as_os_str().to_owned();
    name.push(".special.csv");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const LEGACY: &str = r#" SET:       1                 TOTAL POINTS:      10
  POINT   1                  GAMMA     0.00000000  0.00000000  0.00000000
  POINT   2                      X     0.50000000  0.00000000  0.50000000
  Nr.    1    Spin 1        K-Point  0.00000000  0.00000000  0.00000000
      3
     -5.79683956    6.25017620    6.25017620
  Nr.    2    Spin 1        K-Point  0.50000000  0.00000000  0.50000000
      3
     -3.00000000    4.00000000    4.50000000
 SET:       2                 TOTAL POINTS:       1
  POINT   1                      L     0.50000000  0.50000000  0.50000000
  Nr.    1    Spin 1        K-Point  0.50000000  0.50000000  0.50000000
      3
     -1.00000000    2.00000000    2.50000000
"#;

    const MODERN: &str = r#"# Set 1: 1 special points, 1 k-points, 2 bands
#  Special point 1      0.00000000     0.00000000     0.00000000  GAMMA
#  Point 1  Spin 1:    0.00000000   0.00000000   0.00000000   1.00000000
#   Band    Energy [eV]     Occupation
       1     -5.12300000    2.00000000
       2     -3.00100000    0.00000000
"#;

    fn options(dir: &Path) -> ConvertOptions {
        ConvertOptions {
            output_pattern: format!("{}/{{stem}}.set-{{setnr}}.csv", dir.display()),
            format: TableFormat::Fixed,
            special_points: false,
            skip_existing: false,
        }
    }

    #[test]
    fn test_convert_legacy_document() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("Si.bs");
        let summary = convert_document(&input, LEGACY, &options(dir.path()), false).unwrap();

        assert_eq!(summary.dialect, Some(Dialect::Legacy));
        assert_eq!(summary.sets, 2);
        assert_eq!(summary.rows, 3);

        // 行数与声明的 TOTAL POINTS 无关
        let set1 = fs::read_to_string(dir.path().join("Si.set-1.csv")).unwrap();
        assert_eq!(set1.lines().count(), 2);
        assert_eq!(
            set1.lines().nth(1),
            Some("0.50000000 0.00000000 0.50000000 -3.00000000 4.00000000 4.50000000")
        );

        let set2 = fs::read_to_string(dir.path().join("Si.set-2.csv")).unwrap();
        assert_eq!(set2.lines().count(), 1);
    }

    #[test]
    fn test_convert_modern_csv_with_special_points() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("Si.bs");
        let opts = ConvertOptions {
            format: TableFormat::Csv,
            special_points: true,
            ..options(dir.path())
        };

        let summary = convert_document(&input, MODERN, &opts, false).unwrap();
        assert_eq!(summary.sets, 1);

        let table = fs::read_to_string(dir.path().join("Si.set-1.csv")).unwrap();
        assert_eq!(table.lines().next(), Some("a,b,c,spin,weight,band_1,band_2"));
        assert!(table.contains("1.00000000,-5.12300000,-3.00100000"));

        let special = fs::read_to_string(dir.path().join("Si.set-1.csv.special.csv")).unwrap();
        assert_eq!(special.lines().count(), 2);
        assert!(special.contains("GAMMA"));
    }

    #[test]
    fn test_document_without_sets() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("empty.bs");
        let summary = convert_document(&input, "", &options(dir.path()), false).unwrap();

        assert_eq!(summary, ConvertSummary::default());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_malformed_value_aborts_after_earlier_sets() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("Si.bs");
        let content = LEGACY.replace("-1.00000000", "-1.0000ERR0");

        let result = convert_document(&input, &content, &options(dir.path()), false);
        assert!(matches!(result, Err(Bs2CsvError::ParseError { .. })));

        // 第一组已写出，不回滚
        assert!(dir.path().join("Si.set-1.csv").exists());
    }

    #[test]
    fn test_skip_existing() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("Si.bs");
        let existing = dir.path().join("Si.set-1.csv");
        fs::write(&existing, "keep me\n").unwrap();

        let opts = ConvertOptions {
            skip_existing: true,
            ..options(dir.path())
        };
        let summary = convert_document(&input, LEGACY, &opts, false).unwrap();

        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.sets, 1);
        assert_eq!(fs::read_to_string(&existing).unwrap(), "keep me\n");
    }

    fn batch_args(input: &Path, output_pattern: String) -> ConvertArgs {
        ConvertArgs {
            input: Some(input.to_path_buf()),
            output_pattern,
            format: TableFormat::Fixed,
            special_points: false,
            skip_existing: false,
            pattern: "*.bs".to_string(),
            recursive: false,
            jobs: 2,
        }
    }

    #[test]
    fn test_execute_batch_directory() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.bs"), LEGACY).unwrap();
        fs::write(dir.path().join("b.bs"), MODERN).unwrap();
        fs::write(dir.path().join("c.bs"), "not a band structure\n").unwrap();

        let args = batch_args(dir.path(), "{bsfile}.set-{setnr}.csv".to_string());
        let options = ConvertOptions::from(&args);
        let result = execute_batch(dir.path(), &args, &options).unwrap();

        // 没有任何集合的文件计为跳过
        assert_eq!(result.success, 2);
        assert_eq!(result.skipped, 1);
        assert_eq!(result.failed, 0);

        assert!(dir.path().join("a.bs.set-1.csv").exists());
        assert!(dir.path().join("a.bs.set-2.csv").exists());
        assert!(dir.path().join("b.bs.set-1.csv").exists());
        assert!(!dir.path().join("c.bs.set-1.csv").exists());
    }

    #[test]
    fn test_batch_rejects_pattern_without_input_name() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.bs"), LEGACY).unwrap();
        let shifted = LEGACY.replace("0.50000000  0.50000000", "0.25000000  0.25000000");
        fs::write(dir.path().join("b.bs"), shifted).unwrap();

        let out = dir.path().join("out");
        let args = batch_args(dir.path(), format!("{}/set-{{setnr}}.csv", out.display()));

        assert!(matches!(execute(args), Err(Bs2CsvError::InvalidArgument(_))));
        // 在收集文件之前就拒绝，不写出任何文件
        assert!(!out.join("set-1.csv").exists());
        assert!(!out.join("set-2.csv").exists());
    }

    #[test]
    fn test_single_file_accepts_pattern_without_input_name() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("Si.bs");
        fs::write(&input, LEGACY).unwrap();

        let args = ConvertArgs {
            input: Some(input),
            ..batch_args(dir.path(), format!("{}/set-{{setnr}}.csv", dir.path().display()))
        };
        execute(args).unwrap();

        assert!(dir.path().join("set-1.csv").exists());
        assert!(dir.path().join("set-2.csv").exists());
    }

    #[test]
    fn test_execute_rejects_unknown_placeholder() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("Si.bs");
        fs::write(&input, LEGACY).unwrap();

        let args = ConvertArgs {
            input: Some(input),
            output_pattern: "{file}.csv".to_string(),
            format: TableFormat::Fixed,
            special_points: false,
            skip_existing: false,
            pattern: "*.bs".to_string(),
            recursive: false,
            jobs: 0,
        };
        assert!(matches!(execute(args), Err(Bs2CsvError::InvalidArgument(_))));
    }
}
