//! 具体类型定义
//!
//! 解析阶段的输出词汇：不含变量引用、宽度全部确定的类型。
//! 单位类型表示为空元组 `()`

use super::annotation::Signedness;
use std::fmt;

/// 具体类型
///
/// 推断完成后每个相关节点对应的最终类型
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConcreteType {
    /// 布尔类型
    Bool,
    /// 位向量（符号性 + 宽度）
    Bits {
        /// 符号性
        signedness: Signedness,
        /// 宽度（比特数）
        width: u32,
    },
    /// 元组类型
    Tuple(Vec<ConcreteType>),
    /// 数组类型
    Array {
        /// 元素类型
        element: Box<ConcreteType>,
        /// 元素个数
        size: u32,
    },
}

impl ConcreteType {
    /// 单位类型（空元组）
    pub fn unit() -> Self {
        ConcreteType::Tuple(Vec::new())
    }

    /// 无符号位向量的便捷构造
    pub fn ubits(width: u32) -> Self {
        ConcreteType::Bits {
            signedness: Signedness::Unsigned,
            width,
        }
    }

    /// 有符号位向量的便捷构造
    pub fn sbits(width: u32) -> Self {
        ConcreteType::Bits {
            signedness: Signedness::Signed,
            width,
        }
    }

    /// 检查是否是位向量
    pub fn is_bits(&self) -> bool {
        matches!(self, ConcreteType::Bits { .. })
    }

    /// 检查是否是单位类型
    pub fn is_unit(&self) -> bool {
        matches!(self, ConcreteType::Tuple(members) if members.is_empty())
    }

    /// 获取类型名称
    pub fn type_name(&self) -> String {
        match self {
            ConcreteType::Bool => "bool".to_string(),
            ConcreteType::Bits { signedness, width } => format!("{}{}", signedness, width),
            ConcreteType::Tuple(members) => {
                format!(
                    "({})",
                    members
                        .iter()
                        .map(|t| t.type_name())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            }
            ConcreteType::Array { element, size } => {
                format!("{}[{}]", element.type_name(), size)
            }
        }
    }
}

impl fmt::Display for ConcreteType {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}
