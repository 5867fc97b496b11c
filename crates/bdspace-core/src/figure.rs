//! 图形元素
//!
//! 图形是带有可选解析形状的容器：它拥有自己的坐标系，可以挂载场等子元素。

use crate::coordinates::CoordinateSystem;
use crate::element::{Element, ElementId, ElementKind};
use crate::error::SpaceError;
use crate::math::Point3;
use crate::space::Space;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 图形形状（在图形局部坐标系中定义）
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum FigureShape {
    /// 无解析形状
    #[default]
    Generic,
    /// 以原点为一角、沿三个坐标轴展开的长方体
    Parallelepiped { a: f64, b: f64, c: f64 },
    /// 以原点为中心的球
    Sphere { radius: f64 },
}

impl FigureShape {
    pub fn name(&self) -> &'static str {
        match self {
            FigureShape::Generic => "Generic",
            FigureShape::Parallelepiped { .. } => "Parallelepiped",
            FigureShape::Sphere { .. } => "Sphere",
        }
    }
}

/// 图形
#[derive(Debug, Clone)]
pub struct Figure {
    space: Space,
    shape: FigureShape,
}

impl Figure {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_shape(name, FigureShape::Generic)
    }

    pub fn with_shape(name: impl Into<String>, shape: FigureShape) -> Self {
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

    pub fn shape(&self) -> FigureShape {
        self.shape
    }

    pub fn set_shape(&mut self, shape: FigureShape) {
        self.shape = shape;
    }

    pub fn coordinate_system(&self) -> &CoordinateSystem {
        self.space.coordinate_system()
    }

    pub fn set_coordinate_system(&mut self, coordinate_system: CoordinateSystem) {
        self.space.set_coordinate_system(coordinate_system);
    }

    /// 图形自身的空间（坐标系与子元素）
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

    /// 判断局部坐标系中的点是否位于图形内部（含边界）
    pub fn contains_points(&self, points: &[Point3]) -> Result<Vec<bool>, SpaceError> {
        let inside = match self.shape {
            FigureShape::Generic => {
                return Err(SpaceError::NotSupported {
                    operation: "contains_points",
                    kind: ElementKind::Figure,
                })
            }
            FigureShape::Parallelepiped { a, b, c } => points
                .iter()
                .map(|p| {
                    (0.0..=a).contains(&p.x)
                        && (0.0..=b).contains(&p.y)
                        && (0.0..=c).contains(&p.z)
                })
                .collect(),
            FigureShape::Sphere { radius } => {
                points.iter().map(|p| p.coords.norm() <= radius).collect()
            }
        };
        Ok(inside)
    }
}

impl fmt::Display for Figure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Figure: {} [{}] ({} elements), {}",
            self.name(),
            self.shape.name(),
            self.space.len(),
            self.coordinate_system()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Field;
    use crate::math::points_from_rows;

    #[test]
    fn test_figure_holds_field() {
        let mut figure = Figure::new("My figure");
        figure.add_element(Field::new("My Field", "My Field type")).unwrap();

        assert_eq!(figure.elements().len(), 1);
        assert_eq!(figure.elements()[0].name(), "My Field");

        let id = figure.elements()[0].id();
        figure.remove_element(id).unwrap();
        assert!(figure.elements().is_empty());
    }

    #[test]
    fn test_sphere_contains() {
        let figure = Figure::with_shape("ball", FigureShape::Sphere { radius: 1.0 });
        let points = points_from_rows(&[[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]]);
        assert_eq!(figure.contains_points(&points).unwrap(), vec![true, true, false]);
    }

    #[test]
    fn test_parallelepiped_contains() {
        let figure = Figure::with_shape(
            "box",
            FigureShape::Parallelepiped { a: 2.0, b: 1.0, c: 1.0 },
        );
        let points = points_from_rows(&[[1.5, 0.5, 0.5], [-0.1, 0.5, 0.5], [2.0, 1.0, 1.0]]);
        assert_eq!(figure.contains_points(&points).unwrap(), vec![true, false, true]);
    }

    #[test]
    fn test_generic_contains_not_supported() {
        let figure = Figure::new("blob");
        let err = figure.contains_points(&[Point3::origin()]).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::NotSupported);

        // 无论点集是否为空，无解析形状都不能判断
        let err = figure.contains_points(&[]).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::NotSupported);
    }

    #[test]
    fn test_display() {
        let text = Figure::new("My figure").to_string();
        assert!(text.starts_with("Figure: My figure [Generic] (0 elements)"));
    }
}
