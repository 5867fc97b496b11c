//! 数学类型
//!
//! 基于 nalgebra 的双精度三维类型别名，以及点阵输入的转换工具。

use crate::error::SpaceError;

pub type Point3 = nalgebra::Point3<f64>;
pub type Vector3 = nalgebra::Vector3<f64>;
pub type Rotation3 = nalgebra::Rotation3<f64>;

/// 浮点比较容差
pub const EPSILON: f64 = 1e-10;

/// 从 N×3 行数组创建点列表
pub fn points_from_rows(rows: &[[f64; 3]]) -> Vec<Point3> {
    rows.iter().map(|&row| Point3::from(row)).collect()
}

/// 从按行展开的扁平数组创建点列表
///
/// 数组长度必须是3的倍数，否则返回 `InvalidPoints`。
pub fn points_from_flat(values: &[f64]) -> Result<Vec<Point3>, SpaceError> {
    if values.len() % 3 != 0 {
        return Err(SpaceError::InvalidPoints(format!(
            "expected a multiple of 3 coordinates, got {}",
            values.len()
        )));
    }

    Ok(values
        .chunks_exact(3)
        .map(|c| Point3::new(c[0], c[1], c[2]))
        .collect())
}
