//! 类型系统子模块
//!
//! 将类型词汇拆分为多个子模块：
//! - var: 推断变量定义
//! - annotation: 类型注解（推断期的类型描述）
//! - concrete: 具体类型（推断结果）

pub mod annotation;
pub mod concrete;
pub mod var;

// 重新导出主要类型
pub use annotation::{AnnotationId, AnnotationKind, Signedness, TypeAnnotation};
pub use concrete::ConcreteType;
pub use var::{InferenceVariable, InferenceVariableKind, TypeVarId};
