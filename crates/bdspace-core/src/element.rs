//! 元素定义
//!
//! 可以挂载到空间中的所有对象都是 [`Element`] 的一个变体。
//! 变体集合是封闭的：
//! - `Space`、`Figure`、`Curve` 是容器，可以拥有子元素
//! - `Field` 不是容器

use crate::coordinates::CoordinateSystem;
use crate::curve::Curve;
use crate::error::SpaceError;
use crate::field::Field;
use crate::figure::Figure;
use crate::space::Space;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ELEMENT_ID: AtomicU64 = AtomicU64::new(1);

/// 元素唯一标识符
///
/// 克隆元素会为整棵子树分配新的标识符：克隆体是独立的元素。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(u64);

impl ElementId {
    /// 分配新的标识符
    pub fn new() -> Self {
        Self(NEXT_ELEMENT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 元素类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    Space,
    Figure,
    Curve,
    Field,
}

impl ElementKind {
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Space => "Space",
            ElementKind::Figure => "Figure",
            ElementKind::Curve => "Curve",
            ElementKind::Field => "Field",
        }
    }

    /// 是否可以拥有子元素
    pub fn is_container(&self) -> bool {
        !matches!(self, ElementKind::Field)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 同名冲突处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OnCollision {
    /// 重命名为 `"<名称> <序号>"`
    #[default]
    Rename,
    /// 拒绝插入
    Reject,
    /// 原位替换同名元素
    Overwrite,
}

/// 元素枚举
#[derive(Debug, Clone)]
pub enum Element {
    Space(Space),
    Figure(Figure),
    Curve(Curve),
    Field(Field),
}

impl Element {
    pub fn id(&self) -> ElementId {
        match self {
            Element::Space(s) => s.id(),
            Element::Figure(f) => f.id(),
            Element::Curve(c) => c.id(),
            Element::Field(f) => f.id(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Element::Space(s) => s.name(),
            Element::Figure(f) => f.name(),
            Element::Curve(c) => c.name(),
            Element::Field(f) => f.name(),
        }
    }

    pub(crate) fn set_name(&mut self, name: String) {
        match self {
            Element::Space(s) => s.set_name(name),
            Element::Figure(f) => f.set_name(name),
            Element::Curve(c) => c.set_name(name),
            Element::Field(f) => f.set_name(name),
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Space(_) => ElementKind::Space,
            Element::Figure(_) => ElementKind::Figure,
            Element::Curve(_) => ElementKind::Curve,
            Element::Field(_) => ElementKind::Field,
        }
    }

    /// 元素自身的坐标系（场没有坐标系，在所属容器的坐标系中求值）
    pub fn coordinate_system(&self) -> Option<&CoordinateSystem> {
        self.as_space().map(Space::coordinate_system)
    }

    /// 容器视图
    pub fn as_space(&self) -> Option<&Space> {
        match self {
            Element::Space(s) => Some(s),
            Element::Figure(f) => Some(f.space()),
            Element::Curve(c) => Some(c.space()),
            Element::Field(_) => None,
        }
    }

    /// 可变容器视图
    pub fn as_space_mut(&mut self) -> Option<&mut Space> {
        match self {
            Element::Space(s) => Some(s),
            Element::Figure(f) => Some(f.space_mut()),
            Element::Curve(c) => Some(c.space_mut()),
            Element::Field(_) => None,
        }
    }

    pub fn as_field(&self) -> Option<&Field> {
        match self {
            Element::Field(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_figure(&self) -> Option<&Figure> {
        match self {
            Element::Figure(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_curve(&self) -> Option<&Curve> {
        match self {
            Element::Curve(c) => Some(c),
            _ => None,
        }
    }

    /// 添加子元素（仅容器变体支持）
    pub fn add_element<E: Into<Element>>(
        &mut self,
        element: E,
    ) -> Result<&mut Element, SpaceError> {
        let kind = self.kind();
        match self.as_space_mut() {
            Some(space) => space.add_element(element),
            None => Err(SpaceError::NotSupported {
                operation: "add_element",
                kind,
            }),
        }
    }

    /// 移除子元素（仅容器变体支持）
    pub fn remove_element(&mut self, id: ElementId) -> Result<Element, SpaceError> {
        let kind = self.kind();
        match self.as_space_mut() {
            Some(space) => space.remove_element(id),
            None => Err(SpaceError::NotSupported {
                operation: "remove_element",
                kind,
            }),
        }
    }

    /// 子元素列表（非容器为空）
    pub fn elements(&self) -> &[Element] {
        self.as_space().map(Space::elements).unwrap_or(&[])
    }

    /// 元素自身或其子树中是否包含指定标识符
    pub fn contains_id(&self, id: ElementId) -> bool {
        match self.as_space() {
            Some(space) => space.contains_id(id),
            None => self.id() == id,
        }
    }

}

impl From<Space> for Element {
    fn from(space: Space) -> Self {
        Element::Space(space)
    }
}

impl From<Figure> for Element {
    fn from(figure: Figure) -> Self {
        Element::Figure(figure)
    }
}

impl From<Curve> for Element {
    fn from(curve: Curve) -> Self {
        Element::Curve(curve)
    }
}

impl From<Field> for Element {
    fn from(field: Field) -> Self {
        Element::Field(field)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Space(s) => fmt::Display::fmt(s, f),
            Element::Figure(fig) => fmt::Display::fmt(fig, f),
            Element::Curve(c) => fmt::Display::fmt(c, f),
            Element::Field(field) => fmt::Display::fmt(field, f),
        }
    }
}
