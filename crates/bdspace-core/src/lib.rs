//! BDSpace 核心库
//!
//! 提供层级空间建模功能：
//! - `Space`: 带坐标系的命名空间树
//! - `Figure` / `Curve`: 可容纳子元素的几何元素
//! - `Field`: 在三维点阵上逐点求值的标量场/矢量场
//!
//! # 架构设计
//!
//! 元素是一个封闭的变体集合（[`element::Element`]）：
//! - 容器变体（Space、Figure、Curve）可以添加/移除子元素
//! - 场（Field）不是容器，对其调用添加/移除会返回 `NotSupported`
//!
//! # 示例
//!
//! ```rust
//! use bdspace_core::prelude::*;
//!
//! let mut solar_system = Space::new("Solar System");
//! let mars = solar_system.add_element(Space::new("Mars")).unwrap();
//! mars.add_element(Space::new("Phobos")).unwrap();
//!
//! assert_eq!(solar_system.descendant_count(), 2);
//! assert!(solar_system.find("Phobos").is_some());
//! ```

pub mod coordinates;
pub mod curve;
pub mod element;
pub mod error;
pub mod field;
pub mod figure;
pub mod math;
pub mod space;

pub mod prelude {
    //! 常用类型的便捷导入
    pub use crate::coordinates::{Axis, CoordinateSystem, EulerConvention};
    pub use crate::curve::{Curve, CurveShape};
    pub use crate::element::{Element, ElementId, ElementKind, OnCollision};
    pub use crate::error::{ErrorKind, SpaceError};
    pub use crate::field::{Field, FieldFunction, PointSourceField, UniformField, ZeroField};
    pub use crate::figure::{Figure, FigureShape};
    pub use crate::math::{points_from_flat, points_from_rows, Point3, Rotation3, Vector3};
    pub use crate::space::Space;
}
