//! # 能带图生成
//!
//! 使用 `plotters` 库绘制 k 点集合的能带结构图。
//!
//! ## 功能
//! - 横轴为分数坐标下的累计路径长度
//! - 每个自旋通道单独成组绘制
//! - 与采样点重合的高对称点画成带标签的竖线
//! - 支持 PNG 和 SVG 输出
//!
//! ## 依赖关系
//! - 被 `commands/plot.rs` 调用
//! - 使用 `models/kpoint.rs`
//! - 使用 `plotters` 渲染图表

use crate::error::{Bs2CsvError, Result};
use crate::models::{Point, SpecialPoint};

use plotters::prelude::*;
use std::path::Path;

/// 高对称点与采样点坐标比对的容差
const COORD_TOLERANCE: f64 = 1e-6;

/// 单个自旋通道的能带路径
#[derive(Debug, Clone, PartialEq)]
pub struct BandPath {
    pub spin: u32,
    /// 每个采样点的累计路径长度
    pub distances: Vec<f64>,
    /// 与 `distances` 一一对应的采样点
    pub points: Vec<Point>,
}

impl BandPath {
    /// 最多的能带数
    pub fn band_count(&self) -> usize {
        self.points.iter().map(|p| p.bands.len()).max().unwrap_or(0)
    }

    /// 第 `band` 条能带的 (路径长度, 能量) 序列
    pub fn band_series(&self, band: usize) -> Vec<(f64, f64)> {
        self.distances
            .iter()
            .zip(&self.points)
            .filter_map(|(x, p)| p.bands.get(band).map(|e| (*x, *e)))
            .collect()
    }

    pub fn length(&self) -> f64 {
        self.distances.last().copied().unwrap_or(0.0)
    }
}

/// 横轴上的高对称点标记
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub position: f64,
    pub label: String,
}

/// 按自旋分组（保持首次出现顺序）并计算累计路径长度
pub fn build_paths(points: Vec<Point>) -> Vec<BandPath> {
    let mut paths: Vec<BandPath> = Vec::new();

    for point in points {
        let idx = match paths.iter().position(|p| p.spin == point.spin) {
            Some(idx) => idx,
            None => {
                paths.push(BandPath {
                    spin: point.spin,
                    distances: Vec::new(),
                    points: Vec::new(),
                });
                paths.len() - 1
            }
        };

        let path = &mut paths[idx];
        let distance = match path.points.last() {
            Some(prev) => path.length() + prev.distance_to(&point),
            None => 0.0,
        };
        path.distances.push(distance);
        path.points.push(point);
    }

    paths
}

/// 把高对称点定位到路径上
///
/// 按顺序向后查找坐标重合的采样点，路径多次经过同一点时各自对应。
/// 找不到对应采样点的高对称点不标记。
pub fn special_ticks(path: &BandPath, special_points: &[SpecialPoint]) -> Vec<Tick> {
    let mut ticks = Vec::new();
    let mut start = 0;

    for sp in special_points {
        let found = path.points[start..]
            .iter()
            .position(|p| p.is_at(sp.coords(), COORD_TOLERANCE));

        if let Some(offset) = found {
            let idx = start + offset;
            ticks.push(Tick {
                position: path.distances[idx],
                label: sp.name.clone(),
            });
            start = idx;
        }
    }

    ticks
}

/// 根据数据确定能量范围，两端各留 5% 余量
fn energy_range(paths: &[BandPath], emin: Option<f64>, emax: Option<f64>) -> (f64, f64) {
    let energies = || paths.iter().flat_map(|p| p.points.iter().flat_map(|pt| pt.bands.iter()));
    let lo = energies().copied().fold(f64::INFINITY, f64::min);
    let hi = energies().copied().fold(f64::NEG_INFINITY, f64::max);

    let (lo, hi) = if lo.is_finite() && hi.is_finite() {
        let pad = ((hi - lo) * 0.05).max(0.1);
        (lo - pad, hi + pad)
    } else {
        (-1.0, 1.0)
    };

    (emin.unwrap_or(lo), emax.unwrap_or(hi))
}

fn spin_color(spin: u32) -> RGBColor {
    match spin {
        2 => RGBColor(204, 51, 0),
        _ => RGBColor(0, 102, 204),
    }
}

/// 生成能带图
#[allow(clippy::too_many_arguments)]
pub fn generate_band_plot(
    paths: &[BandPath],
    ticks: &[Tick],
    output_path: &Path,
    title: &str,
    width: u32,
    height: u32,
    emin: Option<f64>,
    emax: Option<f64>,
    use_svg: bool,
) -> Result<()> {
    if paths.iter().all(|p| p.points.is_empty()) {
        return Err(Bs2CsvError::PlotError(
            "no sampled k-points to plot".to_string(),
        ));
    }

    let (y_min, y_max) = energy_range(paths, emin, emax);
    if y_min >= y_max {
        return Err(Bs2CsvError::InvalidArgument(format!(
            "Empty energy window: {} .. {}",
            y_min, y_max
        )));
    }

    if use_svg {
        let root = SVGBackend::new(output_path, (width, height)).into_drawing_area();
        draw_band_chart(&root, paths, ticks, title, (y_min, y_max))?;
        root.present()
            .map_err(|e| Bs2CsvError::PlotError(e.to_string()))?;
    } else {
        let root = BitMapBackend::new(output_path, (width, height)).into_drawing_area();
        draw_band_chart(&root, paths, ticks, title, (y_min, y_max))?;
        root.present()
            .map_err(|e| Bs2CsvError::PlotError(e.to_string()))?;
    }
    Ok(())
}

/// 绘制能带图的核心逻辑
fn draw_band_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    paths: &[BandPath],
    ticks: &[Tick],
    title: &str,
    (y_min, y_max): (f64, f64),
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)
        .map_err(|e| Bs2CsvError::PlotError(format!("{:?}", e)))?;

    let x_max = paths
        .iter()
        .map(|p| p.length())
        .fold(0.0, f64::max)
        .max(1e-6);

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 28).into_font())
        .margin(30)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..x_max, y_min..y_max)
        .map_err(|e| Bs2CsvError::PlotError(format!("{:?}", e)))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("k-path length (fractional)")
        .y_desc("Energy (eV)")
        .x_label_style(("sans-serif", 16))
        .y_label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 18))
        .draw()
        .map_err(|e| Bs2CsvError::PlotError(format!("{:?}", e)))?;

    // 高对称点竖线
    for tick in ticks {
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(tick.position, y_min), (tick.position, y_max)],
                BLACK.mix(0.4).stroke_width(1),
            )))
            .map_err(|e| Bs2CsvError::PlotError(format!("{:?}", e)))?;

        chart
            .draw_series(std::iter::once(Text::new(
                tick.label.clone(),
                (tick.position, y_max),
                ("sans-serif", 14).into_font().color(&BLACK),
            )))
            .map_err(|e| Bs2CsvError::PlotError(format!("{:?}", e)))?;
    }

    let with_legend = paths.len() > 1;

    for path in paths {
        let color = spin_color(path.spin);

        for band in 0..path.band_count() {
            let anno = chart
                .draw_series(LineSeries::new(
                    path.band_series(band),
                    color.stroke_width(2),
                ))
                .map_err(|e| Bs2CsvError::PlotError(format!("{:?}", e)))?;

            if with_legend && band == 0 {
                anno.label(format!("Spin {}", path.spin)).legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                });
            }
        }
    }

    if with_legend {
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(|e| Bs2CsvError::PlotError(format!("{:?}", e)))?;
    }

    Ok(())
}
