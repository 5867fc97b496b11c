//! 坐标系
//!
//! 笛卡尔坐标系由原点和一组欧拉角定义，用于把空间节点放置到父空间的坐标系中。
//! 织构学约定（[`EulerConvention`]）先换算为 Bunge 角，再按 ZXZ 内旋：
//! `R = R_z(φ1) · R_x(Φ) · R_z(φ2)`。Tait-Bryan 约定直接按各自轴序内旋。

use crate::error::SpaceError;
use crate::math::{Point3, Rotation3, Vector3};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;
use std::fmt;
use std::str::FromStr;

/// 坐标轴
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// 绕该轴旋转指定角度（弧度）
    pub fn rotation(self, angle: f64) -> Rotation3 {
        let axis = match self {
            Axis::X => Vector3::x_axis(),
            Axis::Y => Vector3::y_axis(),
            Axis::Z => Vector3::z_axis(),
        };
        Rotation3::from_axis_angle(&axis, angle)
    }
}

/// 欧拉角约定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EulerConvention {
    /// Bunge (φ1, Φ, φ2)，ZXZ
    #[default]
    Bunge,
    /// Canova (ω, θ, φ)：φ1 = π/2 - ω，Φ = θ，φ2 = 3π/2 - φ
    Canova,
    /// Matthies (α, β, γ)，与 Roe 相同
    Matthies,
    /// Roe (Ψ, Θ, Φ)：φ1 = Ψ + π/2，Φ = Θ，φ2 = Φ - π/2
    Roe,
    /// Kocks (Ψ, Θ, φ)：φ1 = Ψ + π/2，Φ = Θ，φ2 = π/2 - φ
    Kocks,
    /// Tait-Bryan 内旋 XYZ
    Xyz,
    /// Tait-Bryan 内旋 ZYX（偏航-俯仰-滚转）
    Zyx,
}

impl EulerConvention {
    pub const ALL: [EulerConvention; 7] = [
        EulerConvention::Bunge,
        EulerConvention::Canova,
        EulerConvention::Matthies,
        EulerConvention::Roe,
        EulerConvention::Kocks,
        EulerConvention::Xyz,
        EulerConvention::Zyx,
    ];

    /// 约定名称（小写）
    pub fn name(&self) -> &'static str {
        match self {
            EulerConvention::Bunge => "bunge",
            EulerConvention::Canova => "canova",
            EulerConvention::Matthies => "matthies",
            EulerConvention::Roe => "roe",
            EulerConvention::Kocks => "kocks",
            EulerConvention::Xyz => "xyz",
            EulerConvention::Zyx => "zyx",
        }
    }

    /// 换算为 Bunge 角 (φ1, Φ, φ2)
    ///
    /// Tait-Bryan 约定与 Bunge 角没有固定的换算关系，返回 `None`。
    pub fn to_bunge(&self, angles: [f64; 3]) -> Option<[f64; 3]> {
        let [a, b, c] = angles;
        match self {
            EulerConvention::Bunge => Some(angles),
            EulerConvention::Canova => Some([FRAC_PI_2 - a, b, 3.0 * FRAC_PI_2 - c]),
            EulerConvention::Matthies | EulerConvention::Roe => {
                Some([a + FRAC_PI_2, b, c - FRAC_PI_2])
            }
            EulerConvention::Kocks => Some([a + FRAC_PI_2, b, FRAC_PI_2 - c]),
            EulerConvention::Xyz | EulerConvention::Zyx => None,
        }
    }

    /// 由三个欧拉角构造旋转矩阵
    pub fn rotation(&self, angles: [f64; 3]) -> Rotation3 {
        if let Some([phi1, phi, phi2]) = self.to_bunge(angles) {
            return Axis::Z.rotation(phi1) * Axis::X.rotation(phi) * Axis::Z.rotation(phi2);
        }

        let [a, b, c] = angles;
        match self {
            EulerConvention::Zyx => Axis::Z.rotation(a) * Axis::Y.rotation(b) * Axis::X.rotation(c),
            _ => Axis::X.rotation(a) * Axis::Y.rotation(b) * Axis::Z.rotation(c),
        }
    }
}

impl FromStr for EulerConvention {
    type Err = SpaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        EulerConvention::ALL
            .into_iter()
            .find(|c| c.name() == normalized)
            .ok_or_else(|| SpaceError::UnknownConvention(s.to_string()))
    }
}

impl fmt::Display for EulerConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 笛卡尔坐标系
///
/// 描述局部坐标系相对父坐标系的位置（原点）与朝向（欧拉角）。
///
/// 坐标系的类型在编译期确定，不能用任意值代替：
///
/// ```compile_fail
/// use bdspace_core::prelude::*;
///
/// let space = Space::with_coordinate_system("xxx", "0");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinateSystem {
    origin: Point3,
    euler_angles: [f64; 3],
    convention: EulerConvention,
}

impl Default for CoordinateSystem {
    fn default() -> Self {
        Self {
            origin: Point3::origin(),
            euler_angles: [0.0; 3],
            convention: EulerConvention::default(),
        }
    }
}

impl CoordinateSystem {
    /// 创建坐标系
    pub fn new(origin: Point3, euler_angles: [f64; 3], convention: EulerConvention) -> Self {
        Self {
            origin,
            euler_angles,
            convention,
        }
    }

    /// 按约定名称创建坐标系（欧拉角为零）
    ///
    /// 未知的约定名称返回 `UnknownConvention`。
    pub fn from_convention_name(origin: Point3, convention: &str) -> Result<Self, SpaceError> {
        Ok(Self::new(origin, [0.0; 3], convention.parse()?))
    }

    pub fn origin(&self) -> Point3 {
        self.origin
    }

    pub fn set_origin(&mut self, origin: Point3) {
        self.origin = origin;
    }

    /// 平移原点
    pub fn translate(&mut self, offset: Vector3) {
        self.origin += offset;
    }

    pub fn euler_angles(&self) -> [f64; 3] {
        self.euler_angles
    }

    pub fn set_euler_angles(&mut self, angles: [f64; 3]) {
        self.euler_angles = angles;
    }

    pub fn convention(&self) -> EulerConvention {
        self.convention
    }

    pub fn set_convention(&mut self, convention: EulerConvention) {
        self.convention = convention;
    }

    /// 局部坐标系到父坐标系的旋转
    pub fn rotation(&self) -> Rotation3 {
        self.convention.rotation(self.euler_angles)
    }

    /// 局部坐标轴在父坐标系中的表示 `[x, y, z]`
    pub fn basis(&self) -> [Vector3; 3] {
        let rotation = self.rotation();
        let matrix = rotation.matrix();
        [
            matrix.column(0).into_owned(),
            matrix.column(1).into_owned(),
            matrix.column(2).into_owned(),
        ]
    }

    /// 将局部坐标系中的点变换到父坐标系
    pub fn to_parent(&self, points: &[Point3]) -> Vec<Point3> {
        let rotation = self.rotation();
        points
            .iter()
            .map(|p| self.origin + (rotation * p).coords)
            .collect()
    }

    /// 将父坐标系中的点变换到局部坐标系
    pub fn to_local(&self, points: &[Point3]) -> Vec<Point3> {
        let inverse = self.rotation().inverse();
        points
            .iter()
            .map(|p| Point3::from(inverse * (p - self.origin)))
            .collect()
    }

    /// 将局部坐标系中的自由矢量旋转到父坐标系（不受原点影响）
    pub fn vectors_to_parent(&self, vectors: &[Vector3]) -> Vec<Vector3> {
        let rotation = self.rotation();
        vectors.iter().map(|v| rotation * v).collect()
    }

    /// 将父坐标系中的自由矢量旋转到局部坐标系
    pub fn vectors_to_local(&self, vectors: &[Vector3]) -> Vec<Vector3> {
        let inverse = self.rotation().inverse();
        vectors.iter().map(|v| inverse * v).collect()
    }
}

impl fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.euler_angles;
        write!(
            f,
            "Cartesian coordinate system, origin: [{}, {}, {}], Euler angles ({}): [{}, {}, {}]",
            self.origin.x, self.origin.y, self.origin.z, self.convention, a, b, c
        )
    }
}
