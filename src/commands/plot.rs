//! # plot 命令实现
//!
//! 为文档中的每个 k 点集合生成能带图。
//!
//! ## 依赖关系
//! - 使用 `cli/plot.rs` 定义的参数
//! - 使用 `parsers/`, `export/plot.rs`
//! - 使用 `utils/output.rs`

use crate::cli::plot::{PlotArgs, PlotFormat};
use crate::error::Result;
use crate::export;
use crate::models::{Point, SpecialPoint};
use crate::parsers;
use crate::utils::output;

/// 执行 plot 命令
pub fn execute(args: PlotArgs) -> Result<()> {
    output::print_header("Plotting CP2K Band Structure");

    let pattern = args.output_pattern();
    export::validate_pattern(&pattern)?;

    let content = parsers::read_bandstructure_file(&args.input)?;
    let sets = parsers::sets(&content);

    match sets.dialect() {
        Some(dialect) => output::print_info(&format!("Detected {} format", dialect)),
        None => {
            output::print_warning(&format!(
                "No k-point sets found in '{}'",
                args.input.display()
            ));
            return Ok(());
        }
    }

    let file_name = args
        .input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("bandstructure")
        .to_string();

    let mut written = 0;

    for set in sets {
        let set = set?;
        let special_points: Vec<SpecialPoint> = set.special_points().collect::<Result<_>>()?;
        let points: Vec<Point> = set.points().collect::<Result<_>>()?;

        if points.is_empty() {
            output::print_skip(&format!("Set {}: no sampled k-points", set.setnr));
            continue;
        }

        let paths = export::build_paths(points);
        let ticks = export::special_ticks(&paths[0], &special_points);
        let output_path = export::expand_pattern(&pattern, &args.input, set.setnr)?;
        let title = args
            .title
            .clone()
            .unwrap_or_else(|| format!("{} set {}", file_name, set.setnr));

        export::generate_band_plot(
            &paths,
            &ticks,
            &output_path,
            &title,
            args.width,
            args.height,
            args.emin,
            args.emax,
            args.format == PlotFormat::Svg,
        )?;

        output::print_success(&format!(
            "Set {} -> {}",
            set.setnr,
            output_path.display()
        ));
        written += 1;
    }

    output::print_done(&format!("Generated {} plot(s)", written));

    Ok(())
}
