//! # k 点数据模型
//!
//! 高对称点与采样 k 点的记录类型，两种输出格式解析后都落到这里。
//!
//! ## 依赖关系
//! - 被 `parsers/legacy.rs`, `parsers/modern.rs` 构造
//! - 被 `export/` 和 `commands/` 消费

use serde::Serialize;

/// 高对称点（带标签的特殊 k 点）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecialPoint {
    /// 序号（按源文件声明）
    pub number: u32,
    /// 标签，如 GAMMA, X
    pub name: String,
    /// 分数坐标
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl SpecialPoint {
    pub fn coords(&self) -> [f64; 3] {
        [self.a, self.b, self.c]
    }
}

/// 采样 k 点及其能带能量
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    /// 分数坐标
    pub a: f64,
    pub b: f64,
    pub c: f64,
    /// 能带能量，保持源文件中的能带顺序
    pub bands: Vec<f64>,
    /// 自旋通道（从 1 开始）
    pub spin: u32,
    /// k 点权重，仅新格式提供
    pub weight: Option<f64>,
}

impl Point {
    pub fn coords(&self) -> [f64; 3] {
        [self.a, self.b, self.c]
    }

    /// 与另一 k 点的分数坐标距离
    pub fn distance_to(&self, other: &Point) -> f64 {
        let da = self.a - other.a;
        let db = self.b - other.b;
        let dc = self.c - other.c;
        (da * da + db * db + dc * dc).sqrt()
    }

    /// 坐标是否与给定位置重合
    pub fn is_at(&self, coords: [f64; 3], tolerance: f64) -> bool {
        self.coords()
            .iter()
            .zip(coords.iter())
            .all(|(x, y)| (x - y).abs() <= tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(a: f64, b: f64, c: f64) -> Point {
        Point {
            a,
            b,
            c,
            bands: vec![],
            spin: 1,
            weight: None,
        }
    }

    #[test]
    fn test_distance() {
        let gamma = point(0.0, 0.0, 0.0);
        let x = point(0.5, 0.0, 0.0);
        assert!((gamma.distance_to(&x) - 0.5).abs() < 1e-12);
        assert!((x.distance_to(&gamma) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_is_at() {
        let p = point(0.5, 0.25, 0.0);
        assert!(p.is_at([0.5, 0.25, 0.0], 1e-6));
        assert!(p.is_at([0.5000001, 0.25, 0.0], 1e-6));
        assert!(!p.is_at([0.5, 0.0, 0.25], 1e-6));
    }
}
