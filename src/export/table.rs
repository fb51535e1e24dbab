//! # 表格数据导出
//!
//! ## 支持格式
//! - 定宽文本: 每行 `a b c E1 E2 ...`，每个字段宽 10、保留 8 位小数，空格分隔
//! - CSV: 带表头的标准 CSV，额外包含自旋与权重列
//! - 高对称点列表: `number,name,a,b,c`
//!
//! 所有写出函数都直接消费解析器产生的惰性序列，遇到解析错误立即返回，
//! 已写出的部分保留在磁盘上。
//!
//! ## 依赖关系
//! - 被 `commands/convert.rs` 调用
//! - 使用 `models/kpoint.rs`
//! - 使用 `csv` 库写入 CSV 文件

use crate::error::{Bs2CsvError, Result};
use crate::models::{Point, SpecialPoint};

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// 定宽数值字段
fn fixed(value: f64) -> String {
    format!("{:10.8}", value)
}

/// 一个采样点对应的定宽文本行（不含换行符）
pub fn format_row(point: &Point) -> String {
    let mut row = format!("{} {} {}", fixed(point.a), fixed(point.b), fixed(point.c));
    for value in &point.bands {
        row.push(' ');
        row.push_str(&fixed(*value));
    }
    row
}

fn write_error(path: &Path) -> impl Fn(std::io::Error) -> Bs2CsvError + '_ {
    move |e| Bs2CsvError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    }
}

/// 导出为定宽文本，返回写出的行数
pub fn write_fixed_width<I>(points: I, output_path: &Path) -> Result<usize>
where
    I: IntoIterator<Item = Result<Point>>,
{
    let file = File::create(output_path).map_err(write_error(output_path))?;
    let mut out = BufWriter::new(file);
    let mut rows = 0;

    for point in points {
        let point = point?;
        writeln!(out, "{}", format_row(&point)).map_err(write_error(output_path))?;
        rows += 1;
    }

    out.flush().map_err(write_error(output_path))?;
    Ok(rows)
}

/// 导出为 CSV，返回写出的数据行数
///
/// 能带列数以第一个采样点为准；各点能带数不同时按实际数量写出。
pub fn write_csv<I>(points: I, output_path: &Path) -> Result<usize>
where
    I: IntoIterator<Item = Result<Point>>,
{
    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(output_path)?;
    let mut rows = 0;

    for point in points {
        let point = point?;

        if rows == 0 {
            let mut header: Vec<String> = ["a", "b", "c", "spin", "weight"]
                .iter()
                .map(|s| s.to_string())
                .collect();
            header.extend((1..=point.bands.len()).map(|i| format!("band_{}", i)));
            wtr.write_record(&header)?;
        }

        let mut record = vec![
            format!("{:.8}", point.a),
            format!("{:.8}", point.b),
            format!("{:.8}", point.c),
            point.spin.to_string(),
            point.weight.map(|w| format!("{:.8}", w)).unwrap_or_default(),
        ];
        record.extend(point.bands.iter().map(|e| format!("{:.8}", e)));
        wtr.write_record(&record)?;
        rows += 1;
    }

    wtr.flush().map_err(write_error(output_path))?;
    Ok(rows)
}

/// 导出高对称点列表，返回写出的点数
pub fn write_special_points<I>(special_points: I, output_path: &Path) -> Result<usize>
where
    I: IntoIterator<Item = Result<SpecialPoint>>,
{
    let mut wtr = csv::Writer::from_path(output_path)?;
    let mut count = 0;

    for point in special_points {
        wtr.serialize(point?)?;
        count += 1;
    }

    wtr.flush().map_err(write_error(output_path))?;
    Ok(count)
}
