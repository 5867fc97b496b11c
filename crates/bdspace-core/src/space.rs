//! 空间树
//!
//! `Space` 是带坐标系的命名容器：
//! - 按插入顺序保存子元素，子元素由父空间独占
//! - 同级元素名称唯一（默认策略下冲突时自动重命名）
//! - 子元素按值移入父空间，因此不会形成循环，也不会被两个父空间共享
//!
//! 子元素按其当前名称查找，因此不存在过期的名称索引。

use crate::coordinates::CoordinateSystem;
use crate::element::{Element, ElementId, OnCollision};
use crate::error::SpaceError;
use crate::math::{Point3, Vector3};
use std::fmt;
use tracing::debug;

/// 空间节点
///
/// 只有元素变体可以被添加：
///
/// ```compile_fail
/// use bdspace_core::prelude::*;
///
/// let mut space = Space::new("Solar System");
/// space.add_element("Any object except Space");
/// ```
///
/// 空间不能包含自身：
///
/// ```compile_fail
/// use bdspace_core::prelude::*;
///
/// let mut space = Space::new("Solar System");
/// space.add_element(space);
/// ```
///
/// 已挂载的后代元素只能以借用的形式取得，不能再次挂载：
///
/// ```compile_fail
/// use bdspace_core::prelude::*;
///
/// let mut solar_system = Space::new("Solar System");
/// let earth = solar_system.add_element(Space::new("Earth")).unwrap();
/// solar_system.add_element(*earth);
/// ```
///
/// 克隆会得到新的标识符，克隆体是一个独立的元素。
#[derive(Debug)]
pub struct Space {
    id: ElementId,
    name: String,
    coordinate_system: CoordinateSystem,
    elements: Vec<Element>,
}

impl Space {
    /// 使用默认坐标系创建空间
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_coordinate_system(name, CoordinateSystem::default())
    }

    /// 使用指定坐标系创建空间
    pub fn with_coordinate_system(
        name: impl Into<String>,
        coordinate_system: CoordinateSystem,
    ) -> Self {
        Self {
            id: ElementId::new(),
            name: name.into(),
            coordinate_system,
            elements: Vec::new(),
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 设置名称
    ///
    /// 已挂载的子空间应通过父空间的 [`Space::rename_element`] 改名，
    /// 直接改名不会检查同级冲突。
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn coordinate_system(&self) -> &CoordinateSystem {
        &self.coordinate_system
    }

    pub fn coordinate_system_mut(&mut self) -> &mut CoordinateSystem {
        &mut self.coordinate_system
    }

    pub fn set_coordinate_system(&mut self, coordinate_system: CoordinateSystem) {
        self.coordinate_system = coordinate_system;
    }

    // === 子元素管理 ===

    /// 添加子元素，同名时自动重命名
    ///
    /// 返回插入后的子元素，便于继续向其添加元素。
    pub fn add_element<E: Into<Element>>(
        &mut self,
        element: E,
    ) -> Result<&mut Element, SpaceError> {
        self.add_element_with(element, OnCollision::Rename)
    }

    /// 按指定的冲突策略添加子元素
    pub fn add_element_with<E: Into<Element>>(
        &mut self,
        element: E,
        policy: OnCollision,
    ) -> Result<&mut Element, SpaceError> {
        let mut element = element.into();

        if let Some(index) = self.position_by_name(element.name()) {
            match policy {
                OnCollision::Rename => {
                    let unique = self.unique_name(element.name(), None);
                    debug!(
                        "Renaming '{}' to '{}' in space '{}'",
                        element.name(),
                        unique,
                        self.name
                    );
                    element.set_name(unique);
                }
                OnCollision::Reject => {
                    return Err(SpaceError::NameCollision(element.name().to_string()));
                }
                OnCollision::Overwrite => {
                    debug!("Overwriting element '{}' in space '{}'", element.name(), self.name);
                    self.elements[index] = element;
                    return Ok(&mut self.elements[index]);
                }
            }
        }

        debug!("Added {} '{}' to space '{}'", element.kind(), element.name(), self.name);

        let index = self.elements.len();
        self.elements.push(element);
        Ok(&mut self.elements[index])
    }

    /// 移除并返回指定标识符的直接子元素
    ///
    /// 子元素不存在时返回 `NotFound`。参数必须是元素标识符：
    ///
    /// ```compile_fail
    /// use bdspace_core::prelude::*;
    ///
    /// let mut space = Space::new("Solar System");
    /// space.remove_element("Any object, not Space");
    /// ```
    pub fn remove_element(&mut self, id: ElementId) -> Result<Element, SpaceError> {
        let index = self
            .elements
            .iter()
            .position(|e| e.id() == id)
            .ok_or_else(|| SpaceError::NotFound(format!("{} in space '{}'", id, self.name)))?;

        let removed = self.elements.remove(index);
        debug!("Removed '{}' from space '{}'", removed.name(), self.name);
        Ok(removed)
    }

    /// 按名称移除直接子元素
    pub fn remove_element_by_name(&mut self, name: &str) -> Result<Element, SpaceError> {
        let index = self
            .position_by_name(name)
            .ok_or_else(|| SpaceError::NotFound(format!("'{}' in space '{}'", name, self.name)))?;

        let removed = self.elements.remove(index);
        debug!("Removed '{}' from space '{}'", removed.name(), self.name);
        Ok(removed)
    }

    /// 通过父空间重命名直接子元素，与其他同级元素冲突时自动加序号
    pub fn rename_element(
        &mut self,
        id: ElementId,
        name: impl Into<String>,
    ) -> Result<&mut Element, SpaceError> {
        let name = name.into();
        let index = self
            .elements
            .iter()
            .position(|e| e.id() == id)
            .ok_or_else(|| SpaceError::NotFound(format!("{} in space '{}'", id, self.name)))?;

        let clashes = self
            .elements
            .iter()
            .enumerate()
            .any(|(i, e)| i != index && e.name() == name);
        let final_name = if clashes {
            self.unique_name(&name, Some(index))
        } else {
            name
        };

        debug!(
            "Renamed '{}' to '{}' in space '{}'",
            self.elements[index].name(),
            final_name,
            self.name
        );
        self.elements[index].set_name(final_name);
        Ok(&mut self.elements[index])
    }

    /// 为基础名称生成同级唯一的名称
    ///
    /// 序号从已有同基础名称（`name` 或 `name <数字>`）的元素数量开始，
    /// 若仍被占用则递增。
    fn unique_name(&self, base: &str, skip: Option<usize>) -> String {
        let mut counter = self
            .sibling_names(skip)
            .filter(|name| shares_base_name(name, base))
            .count();
        loop {
            let candidate = format!("{} {}", base, counter);
            if !self.sibling_names(skip).any(|name| name == candidate) {
                return candidate;
            }
            counter += 1;
        }
    }

    fn sibling_names(&self, skip: Option<usize>) -> impl Iterator<Item = &str> + '_ {
        self.elements
            .iter()
            .enumerate()
            .filter(move |(i, _)| Some(*i) != skip)
            .map(|(_, e)| e.name())
    }

    fn position_by_name(&self, name: &str) -> Option<usize> {
        self.elements.iter().position(|e| e.name() == name)
    }

    // === 查询 ===

    /// 按插入顺序排列的直接子元素
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// 按名称获取直接子元素
    pub fn element(&self, name: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.name() == name)
    }

    pub fn element_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.name() == name)
    }

    /// 直接子元素名称（插入顺序）
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().map(Element::name)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// 空间自身或其子树中是否包含指定标识符
    pub fn contains_id(&self, id: ElementId) -> bool {
        self.id == id || self.elements.iter().any(|e| e.contains_id(id))
    }

    /// 先序遍历所有后代元素，`depth` 从1开始
    pub fn traverse<F: FnMut(usize, &Element)>(&self, f: &mut F) {
        self.traverse_from(1, f);
    }

    fn traverse_from<F: FnMut(usize, &Element)>(&self, depth: usize, f: &mut F) {
        for element in &self.elements {
            f(depth, element);
            if let Some(space) = element.as_space() {
                space.traverse_from(depth + 1, f);
            }
        }
    }

    /// 后代元素总数
    pub fn descendant_count(&self) -> usize {
        let mut count = 0;
        self.traverse(&mut |_, _| count += 1);
        count
    }

    /// 深度优先查找第一个同名后代元素
    pub fn find(&self, name: &str) -> Option<&Element> {
        for element in &self.elements {
            if element.name() == name {
                return Some(element);
            }
            if let Some(found) = element.as_space().and_then(|s| s.find(name)) {
                return Some(found);
            }
        }
        None
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Element> {
        for element in &mut self.elements {
            if element.name() == name {
                return Some(element);
            }
            if let Some(found) = element.as_space_mut().and_then(|s| s.find_mut(name)) {
                return Some(found);
            }
        }
        None
    }

    /// 按名称路径获取后代元素，例如 `["Earth", "Moon"]`
    pub fn element_at(&self, path: &[&str]) -> Option<&Element> {
        let (first, rest) = path.split_first()?;
        let element = self.element(first)?;
        if rest.is_empty() {
            Some(element)
        } else {
            element.as_space()?.element_at(rest)
        }
    }

    /// 沿路径收集坐标系（由外到内）
    ///
    /// 路径末端为场时，场在其容器的坐标系中求值，不贡献坐标系。
    fn frames_along(&self, path: &[&str]) -> Result<Vec<&CoordinateSystem>, SpaceError> {
        let mut frames = Vec::with_capacity(path.len());
        let mut current = self;

        for (i, name) in path.iter().enumerate() {
            let element = current
                .element(name)
                .ok_or_else(|| SpaceError::NotFound(path[..=i].join("/")))?;

            match element.as_space() {
                Some(space) => {
                    frames.push(space.coordinate_system());
                    current = space;
                }
                None if i + 1 == path.len() => {}
                None => {
                    return Err(SpaceError::NotSupported {
                        operation: "element_at",
                        kind: element.kind(),
                    })
                }
            }
        }

        Ok(frames)
    }

    /// 将路径所指元素坐标系中的点变换到本空间的局部坐标系
    pub fn to_outer_frame(
        &self,
        path: &[&str],
        points: &[Point3],
    ) -> Result<Vec<Point3>, SpaceError> {
        let frames = self.frames_along(path)?;
        Ok(frames
            .iter()
            .rev()
            .fold(points.to_vec(), |pts, cs| cs.to_parent(&pts)))
    }

    /// 将本空间局部坐标系中的点变换到路径所指元素的坐标系
    pub fn from_outer_frame(
        &self,
        path: &[&str],
        points: &[Point3],
    ) -> Result<Vec<Point3>, SpaceError> {
        let frames = self.frames_along(path)?;
        Ok(frames
            .iter()
            .fold(points.to_vec(), |pts, cs| cs.to_local(&pts)))
    }

    fn field_at(&self, path: &[&str]) -> Result<&crate::field::Field, SpaceError> {
        let element = self
            .element_at(path)
            .ok_or_else(|| SpaceError::NotFound(path.join("/")))?;
        element.as_field().ok_or(SpaceError::NotSupported {
            operation: "field evaluation",
            kind: element.kind(),
        })
    }

    /// 在本空间坐标系中的点上求路径所指场的标量值
    pub fn scalar_field_at(
        &self,
        path: &[&str],
        points: &[Point3],
    ) -> Result<Vec<f64>, SpaceError> {
        let field = self.field_at(path)?;
        let local = self.from_outer_frame(path, points)?;
        Ok(field.scalar_field(&local))
    }

    /// 在本空间坐标系中的点上求路径所指场的矢量值，结果表示在本空间坐标系中
    pub fn vector_field_at(
        &self,
        path: &[&str],
        points: &[Point3],
    ) -> Result<Vec<Vector3>, SpaceError> {
        let field = self.field_at(path)?;
        let local = self.from_outer_frame(path, points)?;

        let frames = self.frames_along(path)?;
        Ok(frames
            .iter()
            .rev()
            .fold(field.vector_field(&local), |vs, cs| cs.vectors_to_parent(&vs)))
    }

    /// 生成缩进的树形描述
    pub fn tree(&self) -> String {
        let mut out = format!("{} ({})\n", self.name, crate::element::ElementKind::Space);
        self.traverse(&mut |depth, element| {
            out.push_str(&"  ".repeat(depth));
            out.push_str(&format!("{} ({})\n", element.name(), element.kind()));
        });
        out
    }
}

impl Clone for Space {
    fn clone(&self) -> Self {
        Self {
            id: ElementId::new(),
            name: self.name.clone(),
            coordinate_system: self.coordinate_system.clone(),
            elements: self.elements.clone(),
        }
    }
}

/// `name` 是否等于 `base` 或形如 `base <数字>`
fn shares_base_name(name: &str, base: &str) -> bool {
    match name.strip_prefix(base) {
        Some("") => true,
        Some(rest) => rest
            .strip_prefix(' ')
            .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit())),
        None => false,
    }
}

impl fmt::Display for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Space: {} ({} elements), {}",
            self.name,
            self.elements.len(),
            self.coordinate_system
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementKind;
    use crate::error::ErrorKind;
    use crate::field::{Field, UniformField};
    use crate::math::EPSILON;
    use crate::coordinates::EulerConvention;
    use std::f64::consts::FRAC_PI_2;

    fn solar_system() -> Space {
        let mut solar_system = Space::new("Solar System");
        for planet in ["Mercury", "Venus", "Earth", "Mars"] {
            solar_system.add_element(Space::new(planet)).unwrap();
        }
        solar_system
    }

    #[test]
    fn test_add_elements_in_order() {
        let solar_system = solar_system();
        let names: Vec<_> = solar_system.names().collect();
        assert_eq!(names, vec!["Mercury", "Venus", "Earth", "Mars"]);
        assert_eq!(solar_system.len(), 4);
    }

    #[test]
    fn test_added_element_keeps_identity() {
        let mut space = Space::new("Solar System");
        let jupiter = Space::new("Jupiter");
        let id = jupiter.id();

        space.add_element(jupiter).unwrap();
        assert_eq!(space.element("Jupiter").unwrap().id(), id);
    }

    fn count_id(space: &Space, id: ElementId) -> usize {
        let mut count = 0;
        space.traverse(&mut |_, e| {
            if e.id() == id {
                count += 1;
            }
        });
        count
    }

    #[test]
    fn test_add_clone_of_self() {
        let mut solar_system = solar_system();
        let copy = solar_system.clone();
        assert_ne!(copy.id(), solar_system.id());

        let added = solar_system.add_element(copy).unwrap();
        assert_eq!(added.name(), "Solar System");
        assert_eq!(added.elements().len(), 4);
        assert_eq!(solar_system.len(), 5);
        assert_eq!(solar_system.descendant_count(), 9);
        assert!(!solar_system.contains_id(solar_system.id()));
    }

    #[test]
    fn test_add_clone_of_sibling() {
        let mut solar_system = solar_system();
        let mars = solar_system.element_mut("Mars").unwrap();
        mars.add_element(Space::new("Phobos")).unwrap();
        mars.add_element(Space::new("Deimos")).unwrap();

        let mars = solar_system.element("Mars").unwrap();
        let mars_id = mars.id();
        let phobos_id = mars.elements()[0].id();
        let copy = mars.clone();

        let earth = solar_system.element_mut("Earth").unwrap();
        let added = earth.add_element(copy).unwrap();
        assert_ne!(added.id(), mars_id);
        assert_eq!(added.elements().len(), 2);
        assert_ne!(added.elements()[0].id(), phobos_id);

        // 每个标识符在树中只出现一次
        assert_eq!(count_id(&solar_system, mars_id), 1);
        assert_eq!(count_id(&solar_system, phobos_id), 1);
        assert_eq!(solar_system.descendant_count(), 9);
        assert_eq!(solar_system.find("Mars").unwrap().id(), mars_id);
    }

    #[test]
    fn test_add_clone_of_nested_descendant() {
        let mut solar_system = solar_system();
        let earth = solar_system.element_mut("Earth").unwrap();
        let moon = earth.add_element(Space::new("Moon")).unwrap();
        moon.add_element(Space::new("Lunohod")).unwrap();

        let lunohod = solar_system.find("Lunohod").unwrap();
        let lunohod_id = lunohod.id();
        let copy = lunohod.clone();

        let added = solar_system.add_element(copy).unwrap();
        assert_eq!(added.name(), "Lunohod");
        assert_eq!(count_id(&solar_system, lunohod_id), 1);
        assert_eq!(solar_system.descendant_count(), 7);
    }

    #[test]
    fn test_add_same_name_subspaces() {
        let mut solar_system = solar_system();
        let mars = solar_system.element_mut("Mars").unwrap();

        let count = 105;
        let names: Vec<String> = (0..count)
            .map(|_| mars.add_element(Space::new("Phobos")).unwrap().name().to_string())
            .collect();
        assert_eq!(names[0], "Phobos");
        assert_eq!(names[1], "Phobos 1");
        assert_eq!(names[count - 1], format!("Phobos {}", count - 1));

        let phobos = mars.add_element(Space::new("Phobos")).unwrap();
        assert_eq!(phobos.name(), "Phobos 105");
        assert_eq!(mars.elements().len(), 106);
    }

    #[test]
    fn test_rename_skips_taken_suffix() {
        let mut space = Space::new("Mars");
        space.add_element(Space::new("Phobos")).unwrap();
        space.add_element(Space::new("Phobos 1")).unwrap();

        let added = space.add_element(Space::new("Phobos")).unwrap();
        assert_eq!(added.name(), "Phobos 2");

        // "Phobos 1" 被移除后，计数为2，"Phobos 2" 已占用
        space.remove_element_by_name("Phobos 1").unwrap();
        let added = space.add_element(Space::new("Phobos")).unwrap();
        assert_eq!(added.name(), "Phobos 3");
    }

    #[test]
    fn test_base_name_matching() {
        assert!(shares_base_name("Phobos", "Phobos"));
        assert!(shares_base_name("Phobos 12", "Phobos"));
        assert!(!shares_base_name("Phobos Prime", "Phobos"));
        assert!(!shares_base_name("Phobos ", "Phobos"));
        assert!(!shares_base_name("Deimos", "Phobos"));
    }

    #[test]
    fn test_reject_policy() {
        let mut solar_system = solar_system();
        let err = solar_system
            .add_element_with(Space::new("Earth"), OnCollision::Reject)
            .unwrap_err();
        assert_eq!(err, SpaceError::NameCollision("Earth".to_string()));
        assert_eq!(solar_system.len(), 4);
    }

    #[test]
    fn test_overwrite_policy_keeps_position() {
        let mut solar_system = solar_system();
        let replacement = Space::new("Venus");
        let id = replacement.id();

        solar_system
            .add_element_with(replacement, OnCollision::Overwrite)
            .unwrap();

        assert_eq!(solar_system.len(), 4);
        assert_eq!(solar_system.elements()[1].id(), id);
    }

    #[test]
    fn test_remove_element() {
        let mut solar_system = solar_system();
        let venus_id = solar_system.element("Venus").unwrap().id();

        let venus = solar_system.remove_element(venus_id).unwrap();
        assert_eq!(venus.name(), "Venus");
        assert!(solar_system.element("Venus").is_none());

        let err = solar_system.remove_element(venus_id).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_removed_element_can_move() {
        let mut solar_system = solar_system();
        let moon_id = solar_system
            .element_mut("Earth")
            .unwrap()
            .add_element(Space::new("Moon"))
            .unwrap()
            .id();

        let moon = solar_system
            .element_mut("Earth")
            .unwrap()
            .remove_element(moon_id)
            .unwrap();
        solar_system.element_mut("Mars").unwrap().add_element(moon).unwrap();

        assert!(solar_system.element_at(&["Mars", "Moon"]).is_some());
        assert!(solar_system.element_at(&["Earth", "Moon"]).is_none());
    }

    #[test]
    fn test_rename_element() {
        let mut solar_system = solar_system();
        let venus_id = solar_system.element("Venus").unwrap().id();

        let renamed = solar_system.rename_element(venus_id, "Earth").unwrap();
        assert_eq!(renamed.name(), "Earth 1");

        let renamed = solar_system.rename_element(venus_id, "Venus").unwrap();
        assert_eq!(renamed.name(), "Venus");
        assert!(solar_system.element("Venus").is_some());
    }

    #[test]
    fn test_tree_and_traverse() {
        let mut solar_system = solar_system();
        solar_system
            .element_mut("Earth")
            .unwrap()
            .add_element(Space::new("Moon"))
            .unwrap();

        let mut depths = Vec::new();
        solar_system.traverse(&mut |depth, e| depths.push((depth, e.name().to_string())));
        assert_eq!(depths[3], (2, "Moon".to_string()));

        let tree = solar_system.tree();
        assert!(tree.starts_with("Solar System (Space)"));
        assert!(tree.contains("    Moon (Space)"));
    }

    #[test]
    fn test_display() {
        let text = solar_system().to_string();
        assert!(text.starts_with("Space: Solar System (4 elements)"));
    }

    #[test]
    fn test_frames_along_path() {
        let mut root = Space::new("Root");
        let mut cs = CoordinateSystem::default();
        cs.set_origin(Point3::new(10.0, 0.0, 0.0));
        let outer = root
            .add_element(Space::with_coordinate_system("Outer", cs))
            .unwrap();

        let inner_cs = CoordinateSystem::new(
            Point3::new(0.0, 5.0, 0.0),
            [FRAC_PI_2, 0.0, 0.0],
            EulerConvention::Bunge,
        );
        outer
            .add_element(Space::with_coordinate_system("Inner", inner_cs))
            .unwrap();

        let local = [Point3::new(1.0, 0.0, 0.0)];
        let outer_pts = root.to_outer_frame(&["Outer", "Inner"], &local).unwrap();
        assert!((outer_pts[0] - Point3::new(10.0, 6.0, 0.0)).norm() < EPSILON);

        let back = root.from_outer_frame(&["Outer", "Inner"], &outer_pts).unwrap();
        assert!((back[0] - local[0]).norm() < EPSILON);

        let err = root.to_outer_frame(&["Outer", "Missing"], &local).unwrap_err();
        assert_eq!(err, SpaceError::NotFound("Outer/Missing".to_string()));
    }

    #[test]
    fn test_field_at_path() {
        let mut root = Space::new("Root");
        let cs = CoordinateSystem::new(
            Point3::new(1.0, 1.0, 1.0),
            [FRAC_PI_2, 0.0, 0.0],
            EulerConvention::Bunge,
        );
        let plate = root.add_element(Space::with_coordinate_system("Plate", cs)).unwrap();
        plate
            .add_element(Field::with_function(
                "E",
                "electric",
                UniformField::new(Vector3::new(1.0, 0.0, 0.0)),
            ))
            .unwrap();

        let points = [Point3::new(1.0, 1.0, 1.0), Point3::new(1.0, 2.0, 1.0)];

        // 局部x方向的场在外部坐标系中指向y
        let vectors = root.vector_field_at(&["Plate", "E"], &points).unwrap();
        assert_eq!(vectors.len(), 2);
        assert!((vectors[0] - Vector3::new(0.0, 1.0, 0.0)).norm() < EPSILON);

        // 外部 (1,2,1) 对应局部 (1,0,0)，势为 -1
        let scalars = root.scalar_field_at(&["Plate", "E"], &points).unwrap();
        assert!(scalars[0].abs() < EPSILON);
        assert!((scalars[1] + 1.0).abs() < EPSILON);

        let err = root.scalar_field_at(&["Plate"], &points).unwrap_err();
        assert_eq!(
            err,
            SpaceError::NotSupported {
                operation: "field evaluation",
                kind: ElementKind::Space,
            }
        );
    }
}
