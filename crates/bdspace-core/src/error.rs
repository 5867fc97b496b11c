//! 空间操作错误定义

use crate::element::ElementKind;
use thiserror::Error;

/// 错误分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 参数无效（未知约定、非法点阵、名称冲突）
    InvalidArgument,
    /// 该元素变体不支持此操作
    NotSupported,
    /// 目标元素不存在
    NotFound,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpaceError {
    #[error("Unknown Euler angles convention: {0}")]
    UnknownConvention(String),

    #[error("Invalid points array: {0}")]
    InvalidPoints(String),

    #[error("Element name already in use: {0}")]
    NameCollision(String),

    #[error("Operation '{operation}' is not supported by {kind} elements")]
    NotSupported {
        operation: &'static str,
        kind: ElementKind,
    },

    #[error("Element not found: {0}")]
    NotFound(String),
}

impl SpaceError {
    /// 获取错误分类
    pub fn kind(&self) -> ErrorKind {
        match self {
            SpaceError::UnknownConvention(_)
            | SpaceError::InvalidPoints(_)
            | SpaceError::NameCollision(_) => ErrorKind::InvalidArgument,
            SpaceError::NotSupported { .. } => ErrorKind::NotSupported,
            SpaceError::NotFound(_) => ErrorKind::NotFound,
        }
    }
}
