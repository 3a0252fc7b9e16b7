//! 类型注解定义
//!
//! 注解是纯数据的类型描述，由模块的注解区拥有：
//! - AnnotationId: 注解句柄
//! - TypeAnnotation: 注解本体（形状 + 源位置）
//! - AnnotationKind: 注解形状（布尔、位向量、元组、数组、变量引用）

use super::var::TypeVarId;
use crate::frontend::ast::NodeId;
use crate::util::span::Span;
use std::fmt;

/// 位向量的符号性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signedness {
    /// 无符号
    Unsigned,
    /// 有符号
    Signed,
}

impl fmt::Display for Signedness {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Signedness::Unsigned => write!(f, "u"),
            Signedness::Signed => write!(f, "s"),
        }
    }
}

/// 注解句柄
///
/// 注解的同一性以句柄为准：自动字面量集合、形参注解共享都按句柄判定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnnotationId(u32);

impl AnnotationId {
    /// 创建新注解句柄
    pub fn new(index: u32) -> Self {
        AnnotationId(index)
    }

    /// 获取注解的索引
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for AnnotationId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "a{}", self.0)
    }
}

/// 注解形状
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationKind {
    /// 固定一比特的布尔类型，不参与加宽
    Bool,
    /// 位向量（符号性 + 宽度）
    Bits {
        /// 符号性
        signedness: Signedness,
        /// 宽度（比特数）
        width: u32,
    },
    /// 元组
    Tuple {
        /// 成员注解
        members: Vec<AnnotationId>,
    },
    /// 数组
    Array {
        /// 元素注解
        element: AnnotationId,
        /// 元素个数，指向一个 Number 节点
        count: NodeId,
        /// 带省略号时为真：个数是下界而非精确值
        count_is_min: bool,
    },
    /// 变量引用：该变量最终解析出的类型
    Variable(TypeVarId),
}

/// 类型注解
///
/// 创建后不可变；跨度用于诊断与内部变量命名
#[derive(Debug, Clone)]
pub struct TypeAnnotation {
    /// 注解形状
    pub kind: AnnotationKind,
    /// 源位置
    pub span: Span,
}

impl TypeAnnotation {
    /// 创建新注解
    pub fn new(kind: AnnotationKind, span: Span) -> Self {
        Self { kind, span }
    }
}
