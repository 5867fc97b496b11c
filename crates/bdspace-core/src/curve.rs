//! 曲线元素
//!
//! 曲线是带有可选参数化形状的容器，形状定义在曲线的局部坐标系中。

use crate::coordinates::CoordinateSystem;
use crate::element::{Element, ElementId, ElementKind};
use crate::error::SpaceError;
use crate::math::Point3;
use crate::space::Space;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::fmt;

/// 曲线形状
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum CurveShape {
    /// 无参数化形状
    #[default]
    Generic,
    /// 线段，t ∈ [0, 1]
    Line { start: Point3, end: Point3 },
    /// XY平面内以原点为圆心的圆弧（角度为弧度），t ∈ [0, 1]
    Arc {
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    },
    /// 沿Z轴的螺旋线，t 为绕转角（弧度），每转一圈上升 `pitch`
    Helix { radius: f64, pitch: f64 },
}

impl CurveShape {
    pub fn name(&self) -> &'static str {
        match self {
            CurveShape::Generic => "Generic",
            CurveShape::Line { .. } => "Line",
            CurveShape::Arc { .. } => "Arc",
            CurveShape::Helix { .. } => "Helix",
        }
    }

    fn point_at(&self, t: f64) -> Option<Point3> {
        match *self {
            CurveShape::Generic => None,
            CurveShape::Line { start, end } => Some(start + (end - start) * t),
            CurveShape::Arc {
                radius,
                start_angle,
                end_angle,
            } => {
                let angle = start_angle + (end_angle - start_angle) * t;
                Some(Point3::new(radius * angle.cos(), radius * angle.sin(), 0.0))
            }
            CurveShape::Helix { radius, pitch } => Some(Point3::new(
                radius * t.cos(),
                radius * t.sin(),
                pitch * t / TAU,
            )),
        }
    }
}

/// 曲线
#[derive(Debug, Clone)]
pub struct Curve {
    space: Space,
    shape: CurveShape,
}

impl Curve {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_shape(name, CurveShape::Generic)
    }

    pub fn with_shape(name: impl Into<String>, shape: CurveShape) -> Self {
        Self {
            space: Space::new(name),
            shape,
        }
    }

    pub fn id(&self) -> ElementId {
        self.space.id()
    }

    pub fn name(&self) -> &str {
        self.space.name()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.space.set_name(name);
    }

    pub fn shape(&self) -> CurveShape {
        self.shape
    }

    pub fn set_shape(&mut self, shape: CurveShape) {
        self.shape = shape;
    }

    pub fn coordinate_system(&self) -> &CoordinateSystem {
        self.space.coordinate_system()
    }

    pub fn set_coordinate_system(&mut self, coordinate_system: CoordinateSystem) {
        self.space.set_coordinate_system(coordinate_system);
    }

    pub fn space(&self) -> &Space {
        &self.space
    }

    pub fn space_mut(&mut self) -> &mut Space {
        &mut self.space
    }

    pub fn add_element<E: Into<Element>>(
        &mut self,
        element: E,
    ) -> Result<&mut Element, SpaceError> {
        self.space.add_element(element)
    }

    pub fn remove_element(&mut self, id: ElementId) -> Result<Element, SpaceError> {
        self.space.remove_element(id)
    }

    pub fn elements(&self) -> &[Element] {
        self.space.elements()
    }

    /// 按参数采样曲线上的点（局部坐标系）
    pub fn points(&self, t: &[f64]) -> Result<Vec<Point3>, SpaceError> {
        if self.shape == CurveShape::Generic {
            return Err(SpaceError::NotSupported {
                operation: "points",
                kind: ElementKind::Curve,
            });
        }
        Ok(t.iter().filter_map(|&t| self.shape.point_at(t)).collect())
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Curve: {} [{}] ({} elements), {}",
            self.name(),
            self.shape.name(),
            self.space.len(),
            self.coordinate_system()
        )
    }
}
