//! 类型检查器模块
//!
//! 实现 XuanJi 语言的模块内类型推断，三段式：
//! - 填表：单趟遍历，按节点种类记录归属变量与类型注解
//! - 解析：变量合一、声明回灌、调用点复查
//! - 定形：冻结为节点到具体类型的不可变映射
//!
//! 全程「首错即停」：任一阶段失败返回首个错误，成功时模块内每个
//! 携带类型事实的节点都有且仅有一个具体类型

// 导入错误处理
pub mod errors;

// 导入推断表
pub mod table;

// 导入填表器
pub mod populate;

// 导入解析器
pub mod resolve;

// 导入测试模块
#[cfg(test)]
mod tests;

pub use errors::{
    Diagnostic, ErrorCategory, ErrorFormatter, Severity, TypeError, TypeResult, Warning,
    WarningCollector,
};
pub use table::InferenceTable;

use crate::frontend::ast::{Module, NodeId};
use crate::frontend::type_system::concrete::ConcreteType;
use crate::util::options::CheckOptions;
use crate::util::span::FileTable;
use indexmap::IndexMap;
use tracing::{debug, trace};

/// 类型检查结果
///
/// 模块内每个携带类型事实的节点到其具体类型的映射，迭代顺序即
/// 节点区顺序；命名规范警告随结果一并带出
#[derive(Debug, Clone, Default)]
pub struct TypeInfo {
    module_name: String,
    types: IndexMap<NodeId, ConcreteType>,
    warnings: Vec<Warning>,
}

impl TypeInfo {
    /// 查询节点的具体类型
    pub fn type_of(&self, node: NodeId) -> Option<&ConcreteType> {
        self.types.get(&node)
    }

    /// 模块名
    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    /// 已定型节点个数
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// 按节点区顺序迭代全部定型节点
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &ConcreteType)> {
        self.types.iter().map(|(node, ty)| (*node, ty))
    }

    /// 检查过程中收集的警告
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }
}

/// 检查模块
///
/// 推断期合成的注解与个数字面量会追加进模块区，故取 `&mut`
pub fn check_module(
    module: &mut Module,
    files: &FileTable,
) -> Result<TypeInfo, TypeError> {
    check_module_with_options(module, files, &CheckOptions::default())
}

/// 检查模块（带选项）
pub fn check_module_with_options(
    module: &mut Module,
    files: &FileTable,
    options: &CheckOptions,
) -> Result<TypeInfo, TypeError> {
    debug!("type checking module `{}`", module.name());
    let mut table = InferenceTable::new();
    let mut warnings = WarningCollector::new();
    let auto_literals =
        populate::populate_table(module, &mut table, files, options, &mut warnings)?;
    if options.trace_table {
        trace!("inference table for `{}`:\n{}", module.name(), table.dump(module));
    }
    let types = resolve::resolve_table(module, &table, &auto_literals)?;
    debug!(
        "module `{}` checked: {} typed nodes, {} warnings",
        module.name(),
        types.len(),
        warnings.warning_count()
    );
    Ok(TypeInfo {
        module_name: module.name().to_string(),
        types,
        warnings: warnings.into_warnings(),
    })
}
