//! 场
//!
//! 场在三维点阵上逐点求值：
//! - 标量场：每个点一个标量
//! - 矢量场：每个点一个三维矢量
//!
//! 具体的场函数通过 [`FieldFunction`] 提供，默认实现返回零。

use crate::element::{Element, ElementId, ElementKind};
use crate::error::SpaceError;
use crate::math::{Point3, Vector3};
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// 场函数
///
/// 点坐标在场所属容器的局部坐标系中给出。
pub trait FieldFunction: fmt::Debug + Send + Sync {
    fn scalar(&self, _point: &Point3) -> f64 {
        0.0
    }

    fn vector(&self, _point: &Point3) -> Vector3 {
        Vector3::zeros()
    }
}

/// 零场
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroField;

impl FieldFunction for ZeroField {}

/// 均匀场
///
/// 矢量值处处为 `value`，标量为对应的势 `-value·r`。
#[derive(Debug, Clone, Copy)]
pub struct UniformField {
    pub value: Vector3,
}

impl UniformField {
    pub fn new(value: Vector3) -> Self {
        Self { value }
    }
}

impl FieldFunction for UniformField {
    fn scalar(&self, point: &Point3) -> f64 {
        -self.value.dot(&point.coords)
    }

    fn vector(&self, _point: &Point3) -> Vector3 {
        self.value
    }
}

/// 点源场（平方反比）
///
/// 标量 `q/|r-p|`，矢量 `q(r-p)/|r-p|³`。在源点处结果非有限值。
#[derive(Debug, Clone, Copy)]
pub struct PointSourceField {
    pub position: Point3,
    pub strength: f64,
}

impl PointSourceField {
    pub fn new(position: Point3, strength: f64) -> Self {
        Self { position, strength }
    }
}

impl FieldFunction for PointSourceField {
    fn scalar(&self, point: &Point3) -> f64 {
        self.strength / (point - self.position).norm()
    }

    fn vector(&self, point: &Point3) -> Vector3 {
        let r = point - self.position;
        let distance = r.norm();
        r * (self.strength / (distance * distance * distance))
    }
}

/// 场元素
///
/// 名称与类型都是字符串：
///
/// ```compile_fail
/// use bdspace_core::prelude::*;
///
/// let mut field = Field::new("My Field", "The Type of My Field");
/// field.set_field_type(3.14);
/// ```
///
/// 克隆会得到新的标识符，场函数在克隆之间共享。
#[derive(Debug)]
pub struct Field {
    id: ElementId,
    name: String,
    field_type: String,
    function: Arc<dyn FieldFunction>,
}

impl Field {
    /// 创建零场
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self::with_function(name, field_type, ZeroField)
    }

    /// 使用指定的场函数创建场
    pub fn with_function(
        name: impl Into<String>,
        field_type: impl Into<String>,
        function: impl FieldFunction + 'static,
    ) -> Self {
        Self {
            id: ElementId::new(),
            name: name.into(),
            field_type: field_type.into(),
            function: Arc::new(function),
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn field_type(&self) -> &str {
        &self.field_type
    }

    pub fn set_field_type(&mut self, field_type: impl Into<String>) {
        self.field_type = field_type.into();
    }

    /// 替换场函数
    pub fn set_function(&mut self, function: impl FieldFunction + 'static) {
        self.function = Arc::new(function);
    }

    pub fn function(&self) -> &dyn FieldFunction {
        self.function.as_ref()
    }

    /// 场不能拥有子元素
    pub fn add_element<E: Into<Element>>(
        &mut self,
        _element: E,
    ) -> Result<&mut Element, SpaceError> {
        Err(SpaceError::NotSupported {
            operation: "add_element",
            kind: ElementKind::Field,
        })
    }

    /// 场不能拥有子元素
    pub fn remove_element(&mut self, _id: ElementId) -> Result<Element, SpaceError> {
        Err(SpaceError::NotSupported {
            operation: "remove_element",
            kind: ElementKind::Field,
        })
    }

    /// 标量场：每个点返回一个标量
    pub fn scalar_field(&self, points: &[Point3]) -> Vec<f64> {
        trace!("Field '{}': scalar evaluation at {} points", self.name, points.len());
        points.iter().map(|p| self.function.scalar(p)).collect()
    }

    /// 矢量场：每个点返回一个三维矢量
    pub fn vector_field(&self, points: &[Point3]) -> Vec<Vector3> {
        trace!("Field '{}': vector evaluation at {} points", self.name, points.len());
        points.iter().map(|p| self.function.vector(p)).collect()
    }
}

impl Clone for Field {
    fn clone(&self) -> Self {
        Self {
            id: ElementId::new(),
            name: self.name.clone(),
            field_type: self.field_type.clone(),
            function: Arc::clone(&self.function),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Field: {} ({})", self.name, self.field_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::math::{points_from_rows, EPSILON};

    fn my_field() -> Field {
        Field::new("My Field", "The Type of My Field")
    }

    #[test]
    fn test_name() {
        let mut field = my_field();
        assert_eq!(field.name(), "My Field");
        field.set_name("Another name for My Field");
        assert_eq!(field.name(), "Another name for My Field");
    }

    #[test]
    fn test_type() {
        let mut field = my_field();
        assert_eq!(field.field_type(), "The Type of My Field");
        field.set_field_type("Another type for My Field");
        assert_eq!(field.field_type(), "Another type for My Field");
    }

    #[test]
    fn test_elements_not_supported() {
        let mut field = my_field();

        let err = field
            .add_element(Field::new("My another Field", "The Type of My Field"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotSupported);

        let err = field.remove_element(ElementId::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotSupported);
    }

    #[test]
    fn test_scalar_field_zero() {
        let field = my_field();
        let xyz = vec![Point3::new(1.0, 1.0, 1.0); 100];

        let result = field.scalar_field(&xyz);
        assert_eq!(result.len(), 100);
        assert!(result.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_vector_field_zero() {
        let field = my_field();
        let xyz = vec![Point3::new(1.0, 1.0, 1.0); 100];

        let result = field.vector_field(&xyz);
        assert_eq!(result.len(), 100);
        assert!(result.iter().all(|v| *v == Vector3::zeros()));
    }

    #[test]
    fn test_empty_points() {
        let field = my_field();
        assert!(field.scalar_field(&[]).is_empty());
        assert!(field.vector_field(&[]).is_empty());
    }

    #[test]
    fn test_uniform_field() {
        let field = Field::with_function(
            "E",
            "electric",
            UniformField::new(Vector3::new(0.0, 0.0, 2.0)),
        );
        let points = points_from_rows(&[[0.0, 0.0, 0.0], [1.0, 1.0, 3.0]]);

        assert_eq!(field.scalar_field(&points), vec![0.0, -6.0]);
        assert_eq!(field.vector_field(&points)[1], Vector3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn test_point_source_field() {
        let field = Field::with_function(
            "charge",
            "electrostatic",
            PointSourceField::new(Point3::new(1.0, 0.0, 0.0), 4.0),
        );
        let points = points_from_rows(&[[3.0, 0.0, 0.0], [1.0, -1.0, 0.0]]);

        let scalars = field.scalar_field(&points);
        assert!((scalars[0] - 2.0).abs() < EPSILON);
        assert!((scalars[1] - 4.0).abs() < EPSILON);

        let vectors = field.vector_field(&points);
        assert!((vectors[0] - Vector3::new(1.0, 0.0, 0.0)).norm() < EPSILON);
        assert!((vectors[1] - Vector3::new(0.0, -4.0, 0.0)).norm() < EPSILON);
    }

    #[test]
    fn test_replace_function() {
        let mut field = my_field();
        field.set_function(UniformField::new(Vector3::new(1.0, 0.0, 0.0)));
        let v = field.vector_field(&[Point3::origin()]);
        assert_eq!(v[0], Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_clone_is_new_element() {
        let field = Field::with_function(
            "E",
            "electric",
            UniformField::new(Vector3::new(0.0, 0.0, 2.0)),
        );
        let copy = field.clone();

        assert_ne!(copy.id(), field.id());
        assert_eq!(copy.name(), field.name());
        assert_eq!(copy.vector_field(&[Point3::origin()]), field.vector_field(&[Point3::origin()]));
    }

    #[test]
    fn test_display() {
        assert_eq!(my_field().to_string(), "Field: My Field (The Type of My Field)");
    }
}
