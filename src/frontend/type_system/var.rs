//! 推断变量定义
//!
//! 实现推断引擎中的变量：
//! - TypeVarId: 推断变量的索引句柄
//! - InferenceVariable: 变量本体（种类、来源节点、调试名）

use crate::frontend::ast::NodeId;
use std::fmt;

/// 推断变量句柄
///
/// 每个推断变量有一个唯一的索引，指向推断表中的变量区
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeVarId(u32);

impl TypeVarId {
    /// 创建新变量句柄
    pub fn new(index: u32) -> Self {
        TypeVarId(index)
    }

    /// 获取变量的索引
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TypeVarId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// 变量种类
///
/// 目前只产生类型变量；布尔变量为参数化谓词预留
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InferenceVariableKind {
    /// 类型变量
    Type,
    /// 布尔变量（预留）
    Bool,
}

impl fmt::Display for InferenceVariableKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            InferenceVariableKind::Type => write!(f, "type"),
            InferenceVariableKind::Bool => write!(f, "bool"),
        }
    }
}

/// 推断变量
///
/// 记录变量种类、诱发它的 AST 节点，以及嵌入源位置的调试名，
/// 例如 `internal_type_FOO_at_demo.xj:1:7-1:10`
#[derive(Debug, Clone)]
pub struct InferenceVariable {
    /// 变量种类
    pub kind: InferenceVariableKind,
    /// 诱发该变量的节点
    pub origin: NodeId,
    /// 调试名
    pub name: String,
}

impl InferenceVariable {
    /// 创建新推断变量
    pub fn new(kind: InferenceVariableKind, origin: NodeId, name: String) -> Self {
        Self { kind, origin, name }
    }
}

impl fmt::Display for InferenceVariable {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.kind)
    }
}
