//! 推断表
//!
//! 推断表拥有全部推断变量，并以节点为键保存两张事实表：
//! 节点的「归属变量」与节点的「类型注解」。表只做原子的
//! 定义/设置/查询，从不求解、从不合一；解析由独立阶段完成。

use super::errors::{TypeError, TypeResult};
use crate::frontend::ast::{Module, NodeId};
use crate::frontend::type_system::annotation::AnnotationId;
use crate::frontend::type_system::var::{InferenceVariable, InferenceVariableKind, TypeVarId};
use crate::util::span::Span;
use indexmap::IndexMap;

/// 推断表
///
/// 迭代顺序是确定的：与填表顺序一致（插入序）
#[derive(Debug, Default)]
pub struct InferenceTable {
    /// 变量区
    variables: Vec<InferenceVariable>,
    /// 节点 -> 归属变量
    type_variable_of: IndexMap<NodeId, TypeVarId>,
    /// 节点 -> 类型注解
    annotation_of: IndexMap<NodeId, AnnotationId>,
}

impl InferenceTable {
    /// 创建空表
    pub fn new() -> Self {
        Self {
            variables: Vec::new(),
            type_variable_of: IndexMap::new(),
            annotation_of: IndexMap::new(),
        }
    }

    /// 定义一个内部推断变量
    ///
    /// 变量按创建顺序获得稠密索引；`name` 是嵌入源位置的调试名
    pub fn define_internal_variable(
        &mut self,
        kind: InferenceVariableKind,
        origin: NodeId,
        name: String,
    ) -> TypeVarId {
        let id = TypeVarId::new(self.variables.len() as u32);
        self.variables.push(InferenceVariable::new(kind, origin, name));
        id
    }

    /// 把变量指派给节点
    ///
    /// 同一节点被二次指派说明填表器有缺陷，按内部错误报告
    pub fn set_type_variable(
        &mut self,
        node: NodeId,
        var: TypeVarId,
        span: Span,
    ) -> TypeResult<()> {
        if let Some(existing) = self.type_variable_of.get(&node) {
            return Err(TypeError::internal(
                format!(
                    "node {} already has type variable {}, refusing to assign {}",
                    node, existing, var
                ),
                span,
            ));
        }
        self.type_variable_of.insert(node, var);
        Ok(())
    }

    /// 记录节点的类型注解（后写覆盖前写）
    pub fn set_type_annotation(
        &mut self,
        node: NodeId,
        annotation: AnnotationId,
    ) {
        self.annotation_of.insert(node, annotation);
    }

    /// 查询节点的归属变量
    pub fn type_variable(&self, node: NodeId) -> Option<TypeVarId> {
        self.type_variable_of.get(&node).copied()
    }

    /// 查询节点的类型注解
    pub fn annotation(&self, node: NodeId) -> Option<AnnotationId> {
        self.annotation_of.get(&node).copied()
    }

    /// 查询变量本体
    pub fn variable(&self, var: TypeVarId) -> &InferenceVariable {
        &self.variables[var.index()]
    }

    /// 变量数量
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// 按创建顺序迭代变量
    pub fn variables(&self) -> impl Iterator<Item = (TypeVarId, &InferenceVariable)> {
        self.variables
            .iter()
            .enumerate()
            .map(|(i, v)| (TypeVarId::new(i as u32), v))
    }

    /// 按填表顺序迭代「节点 -> 变量」事实
    pub fn node_variables(&self) -> impl Iterator<Item = (NodeId, TypeVarId)> + '_ {
        self.type_variable_of.iter().map(|(n, v)| (*n, *v))
    }

    /// 按填表顺序迭代「节点 -> 注解」事实
    pub fn node_annotations(&self) -> impl Iterator<Item = (NodeId, AnnotationId)> + '_ {
        self.annotation_of.iter().map(|(n, a)| (*n, *a))
    }

    /// 渲染整张表（调试用）
    ///
    /// 每个持有事实的节点一行，按节点创建顺序排列
    pub fn dump(&self, module: &Module) -> String {
        let mut out = String::new();
        out.push_str("node | variable | annotation\n");
        for id in module.node_ids() {
            let var = self.type_variable(id);
            let anno = self.annotation(id);
            if var.is_none() && anno.is_none() {
                continue;
            }
            let var_text = var
                .map(|v| self.variable(v).name.clone())
                .unwrap_or_else(|| "-".to_string());
            let anno_text = anno
                .map(|a| module.annotation_to_string(a))
                .unwrap_or_else(|| "-".to_string());
            out.push_str(&format!(
                "{} ({}) | {} | {}\n",
                id,
                module.node(id).kind.kind_name(),
                var_text,
                anno_text
            ));
        }
        out
    }
}
