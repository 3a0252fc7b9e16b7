//! 填表器
//!
//! 单趟递归遍历模块 AST，按节点种类把「归属变量」与「类型注解」
//! 写入推断表。填表器以 `&mut` 独占推断表（单写者由借用检查器
//! 保证），推断期新建的注解与个数字面量追加进模块区。
//! 第一个错误即中止；命名规范问题作为警告收集，不影响结果。

use super::errors::{TypeError, TypeResult, Warning, WarningCollector};
use super::table::InferenceTable;
use crate::frontend::ast::{parse_number, BinopKind, Module, NodeId, NodeKind, NumberKind};
use crate::frontend::type_system::annotation::{AnnotationId, Signedness};
use crate::frontend::type_system::var::InferenceVariableKind;
use crate::util::options::CheckOptions;
use crate::util::span::{FileTable, Span};
use hashbrown::HashSet;
use once_cell::sync::Lazy;
use tracing::debug;

/// 自动字面量集合
///
/// 填表阶段为无注解数字字面量合成的「最小形状」注解句柄；
/// 解析阶段只允许这些注解参与加宽协商
pub type AutoLiteralSet = HashSet<AnnotationId>;

/// 要求两操作数与结果同型的运算符
static SAME_TYPE_BINOPS: Lazy<HashSet<BinopKind>> = Lazy::new(|| {
    [
        BinopKind::Add,
        BinopKind::Sub,
        BinopKind::Mul,
        BinopKind::Div,
        BinopKind::Mod,
        BinopKind::BitAnd,
        BinopKind::BitOr,
        BinopKind::BitXor,
    ]
    .into_iter()
    .collect()
});

/// 字面量的最小可表示形状
///
/// 非负值取无符号最小宽度，负值取二进制补码的有符号最小宽度；
/// 零占一比特
pub(crate) fn min_shape_for(value: i128) -> (Signedness, u32) {
    if value >= 0 {
        let width = (128 - value.leading_zeros()).max(1);
        (Signedness::Unsigned, width)
    } else {
        let width = 128 - value.leading_ones() + 1;
        (Signedness::Signed, width)
    }
}

/// 填充推断表
///
/// 按源顺序访问每个顶层成员；返回自动字面量集合
pub fn populate_table(
    module: &mut Module,
    table: &mut InferenceTable,
    files: &FileTable,
    options: &CheckOptions,
    warnings: &mut WarningCollector,
) -> TypeResult<AutoLiteralSet> {
    debug!(
        "populating inference table for module `{}` ({} nodes)",
        module.name(),
        module.node_count()
    );
    let top = module.top().to_vec();
    let mut visitor = PopulateVisitor {
        module,
        table,
        files,
        warnings,
        warn_naming: options.warn_naming,
        auto_literals: HashSet::new(),
    };
    for member in top {
        visitor.visit(member)?;
    }
    let auto_literals = visitor.auto_literals;
    debug!(
        "populated {} variables, {} auto literals",
        table.variable_count(),
        auto_literals.len()
    );
    Ok(auto_literals)
}

/// 填表访问器
struct PopulateVisitor<'a> {
    module: &'a mut Module,
    table: &'a mut InferenceTable,
    files: &'a FileTable,
    warnings: &'a mut WarningCollector,
    warn_naming: bool,
    auto_literals: AutoLiteralSet,
}

impl<'a> PopulateVisitor<'a> {
    /// 生成嵌入源位置的内部变量调试名
    fn variable_name(
        &self,
        prefix: &str,
        span: Span,
    ) -> String {
        format!("internal_type_{}_at_{}", prefix, span.display_with(self.files))
    }

    /// 按节点种类分发
    fn visit(
        &mut self,
        id: NodeId,
    ) -> TypeResult<()> {
        let kind = self.module.node(id).kind.clone();
        match kind {
            NodeKind::ConstantDef {
                name_def,
                type_annotation,
                value,
            } => self.handle_definition(id, name_def, type_annotation, value, true),
            NodeKind::Let {
                name_def,
                type_annotation,
                rhs,
            } => self.handle_definition(id, name_def, type_annotation, rhs, false),
            NodeKind::NameRef { name_def, .. } => self.handle_name_ref(id, name_def),
            NodeKind::Number {
                text,
                kind,
                type_annotation,
            } => self.handle_number(id, &text, kind, type_annotation),
            NodeKind::Binop { kind, lhs, rhs } => self.handle_binop(id, kind, lhs, rhs),
            NodeKind::TupleLiteral { members } => self.handle_tuple(id, &members),
            NodeKind::ArrayLiteral {
                members,
                has_ellipsis,
            } => self.handle_array(id, &members, has_ellipsis),
            NodeKind::Function {
                name_def,
                return_type,
                body,
                ..
            } => self.handle_function(id, name_def, return_type, body),
            NodeKind::StatementBlock {
                statements,
                trailing_semi,
            } => self.handle_statement_block(id, &statements, trailing_semi),
            NodeKind::Invocation { callee, args } => self.handle_invocation(id, callee, &args),
            NodeKind::Param {
                name_def,
                type_annotation,
            } => self.handle_param(id, name_def, type_annotation),
            // 其余种类：不施加任何事实，按源顺序递归子节点
            NodeKind::NameDef { .. } | NodeKind::ColonRef { .. } => self.default_handler(id),
        }
    }

    /// 默认处理：只递归子节点
    fn default_handler(
        &mut self,
        id: NodeId,
    ) -> TypeResult<()> {
        let children = self.module.node(id).kind.children();
        for child in children {
            self.visit(child)?;
        }
        Ok(())
    }

    /// 常量定义与 let 绑定
    ///
    /// 定义节点、名字节点、值节点共享同一个变量，三者必然解析出
    /// 同一类型；显式注解记在名字节点上
    fn handle_definition(
        &mut self,
        id: NodeId,
        name_def: NodeId,
        type_annotation: Option<AnnotationId>,
        value: NodeId,
        is_constant: bool,
    ) -> TypeResult<()> {
        let span = self.module.span_of(id);
        let ident = self
            .module
            .identifier_of(name_def)
            .unwrap_or("binding")
            .to_string();
        if is_constant && self.warn_naming && ident.chars().any(|c| c.is_ascii_lowercase()) {
            self.warnings.add_warning(Warning::ConstantNaming {
                name: ident.clone(),
                span: self.module.span_of(name_def),
            });
        }
        let var = self.table.define_internal_variable(
            InferenceVariableKind::Type,
            id,
            self.variable_name(&ident, span),
        );
        self.table.set_type_variable(id, var, span)?;
        self.table
            .set_type_variable(name_def, var, self.module.span_of(name_def))?;
        self.table
            .set_type_variable(value, var, self.module.span_of(value))?;
        if let Some(annotation) = type_annotation {
            self.table.set_type_annotation(name_def, annotation);
        }
        self.visit(value)
    }

    /// 名字引用：从定义处传播
    ///
    /// 定义有变量则引用得到变量引用注解；定义只有注解则共享同一
    /// 注解句柄；两者皆无则引用留空，由使用处决定。传播从不指派
    /// 变量
    fn handle_name_ref(
        &mut self,
        id: NodeId,
        name_def: NodeId,
    ) -> TypeResult<()> {
        let span = self.module.span_of(id);
        if let Some(var) = self.table.type_variable(name_def) {
            let annotation = self.module.make_variable_annotation(var, span);
            self.table.set_type_annotation(id, annotation);
        } else if let Some(annotation) = self.table.annotation(name_def) {
            self.table.set_type_annotation(id, annotation);
        }
        Ok(())
    }

    /// 数字与布尔字面量
    ///
    /// 显式注解原样记录；布尔字面量固定一比特且不参与加宽；
    /// 其余合成最小形状注解并计入自动字面量集合
    fn handle_number(
        &mut self,
        id: NodeId,
        text: &str,
        kind: NumberKind,
        type_annotation: Option<AnnotationId>,
    ) -> TypeResult<()> {
        let span = self.module.span_of(id);
        if let Some(annotation) = type_annotation {
            self.table.set_type_annotation(id, annotation);
            return Ok(());
        }
        match kind {
            NumberKind::Bool => {
                let annotation = self.module.make_bool_annotation(span);
                self.table.set_type_annotation(id, annotation);
            }
            NumberKind::Other => {
                let value = parse_number(text).ok_or_else(|| TypeError::InvalidLiteral {
                    text: text.to_string(),
                    span,
                })?;
                let (signedness, width) = min_shape_for(value);
                let annotation = self.module.make_bits_annotation(signedness, width, span);
                self.table.set_type_annotation(id, annotation);
                self.auto_literals.insert(annotation);
            }
        }
        Ok(())
    }

    /// 二元运算
    ///
    /// 前置条件：父节点已为本节点指派变量。同型运算符把该变量
    /// 原样指派给两个操作数；其余运算符尚未支持
    fn handle_binop(
        &mut self,
        id: NodeId,
        kind: BinopKind,
        lhs: NodeId,
        rhs: NodeId,
    ) -> TypeResult<()> {
        let span = self.module.span_of(id);
        let var = self.table.type_variable(id).ok_or_else(|| {
            TypeError::internal(
                format!(
                    "binary operation `{}` visited without a governing type variable",
                    kind.symbol()
                ),
                span,
            )
        })?;
        if !SAME_TYPE_BINOPS.contains(&kind) {
            return Err(TypeError::not_supported(
                format!("binary operator `{}` in type inference", kind.symbol()),
                span,
            ));
        }
        self.table
            .set_type_variable(lhs, var, self.module.span_of(lhs))?;
        self.table
            .set_type_variable(rhs, var, self.module.span_of(rhs))?;
        self.visit(lhs)?;
        self.visit(rhs)
    }

    /// 元组字面量
    ///
    /// 每个成员各得一个新变量；元组注解是这些变量引用的组合，
    /// 成员之间互不影响
    fn handle_tuple(
        &mut self,
        id: NodeId,
        members: &[NodeId],
    ) -> TypeResult<()> {
        let span = self.module.span_of(id);
        let mut member_annotations = Vec::with_capacity(members.len());
        for member in members {
            let member_span = self.module.span_of(*member);
            let var = self.table.define_internal_variable(
                InferenceVariableKind::Type,
                *member,
                self.variable_name("expr", member_span),
            );
            self.table.set_type_variable(*member, var, member_span)?;
            member_annotations.push(self.module.make_variable_annotation(var, member_span));
        }
        let annotation = self.module.make_tuple_annotation(member_annotations, span);
        self.table.set_type_annotation(id, annotation);
        for member in members {
            self.visit(*member)?;
        }
        Ok(())
    }

    /// 数组字面量
    ///
    /// 空数组带省略号是错误；空数组不带省略号留空；否则全部成员
    /// 共享一个元素变量，注解为「元素 × 个数」，带省略号时个数是
    /// 下界。个数以合成的数字节点表示
    fn handle_array(
        &mut self,
        id: NodeId,
        members: &[NodeId],
        has_ellipsis: bool,
    ) -> TypeResult<()> {
        let span = self.module.span_of(id);
        if members.is_empty() {
            if has_ellipsis {
                return Err(TypeError::EllipsisOnEmptyArray { span });
            }
            return Ok(());
        }
        let element_var = self.table.define_internal_variable(
            InferenceVariableKind::Type,
            id,
            self.variable_name("array_element", span),
        );
        for member in members {
            self.table
                .set_type_variable(*member, element_var, self.module.span_of(*member))?;
        }
        let element_annotation = self.module.make_variable_annotation(element_var, span);
        let count_node = self.module.make_number(&members.len().to_string(), span);
        let annotation =
            self.module
                .make_array_annotation(element_annotation, count_node, has_ellipsis, span);
        self.table.set_type_annotation(id, annotation);
        for member in members {
            self.visit(*member)?;
        }
        Ok(())
    }

    /// 函数定义
    ///
    /// 函数节点与函数体共享一个变量，使函数体的推导类型与声明的
    /// 返回类型合一；无返回注解时默认单位元组。参数化函数照常填表，
    /// 限制在调用点实施
    fn handle_function(
        &mut self,
        id: NodeId,
        name_def: NodeId,
        return_type: Option<AnnotationId>,
        body: NodeId,
    ) -> TypeResult<()> {
        let span = self.module.span_of(id);
        let ident = self
            .module
            .identifier_of(name_def)
            .unwrap_or("function")
            .to_string();
        if self.warn_naming && ident.chars().any(|c| c.is_ascii_uppercase()) {
            self.warnings.add_warning(Warning::FunctionNaming {
                name: ident.clone(),
                span: self.module.span_of(name_def),
            });
        }
        let var = self.table.define_internal_variable(
            InferenceVariableKind::Type,
            id,
            self.variable_name(&ident, span),
        );
        self.table.set_type_variable(id, var, span)?;
        self.table
            .set_type_variable(body, var, self.module.span_of(body))?;
        let return_annotation =
            return_type.unwrap_or_else(|| self.module.make_unit_annotation(span));
        self.table.set_type_annotation(id, return_annotation);
        self.default_handler(id)
    }

    /// 函数参数
    ///
    /// 参数节点与其名字节点都记下声明注解，函数体内对参数的引用
    /// 由此取得类型
    fn handle_param(
        &mut self,
        id: NodeId,
        name_def: NodeId,
        type_annotation: AnnotationId,
    ) -> TypeResult<()> {
        self.table.set_type_annotation(id, type_annotation);
        self.table.set_type_annotation(name_def, type_annotation);
        Ok(())
    }

    /// 语句块
    ///
    /// 最后一条语句是不带分号的裸表达式时，它继承块的变量、成为块
    /// 的值；否则块的值是单位元组
    fn handle_statement_block(
        &mut self,
        id: NodeId,
        statements: &[NodeId],
        trailing_semi: bool,
    ) -> TypeResult<()> {
        let bare_value = !trailing_semi
            && statements
                .last()
                .is_some_and(|last| self.module.node(*last).kind.is_expr());
        if bare_value {
            if let Some(var) = self.table.type_variable(id) {
                if let Some(last) = statements.last().copied() {
                    self.table
                        .set_type_variable(last, var, self.module.span_of(last))?;
                }
            }
        } else {
            let span = self.module.span_of(id);
            let unit = self.module.make_unit_annotation(span);
            self.table.set_type_annotation(id, unit);
        }
        for statement in statements {
            self.visit(*statement)?;
        }
        Ok(())
    }

    /// 函数调用
    ///
    /// 被调用者必须解析为本模块内非参数化的函数定义；实参个数必须
    /// 精确匹配。调用节点记下返回类型注解；每个实参各得一个新变量
    /// 并记下形参的声明注解（与函数签名共享同一句柄），再递归实参
    /// 表达式。实参表达式自身的规则可能覆盖这条注解（后写覆盖），
    /// 解析阶段会独立复查实参与形参
    fn handle_invocation(
        &mut self,
        id: NodeId,
        callee: NodeId,
        args: &[NodeId],
    ) -> TypeResult<()> {
        let span = self.module.span_of(id);
        let function = match self.module.node(callee).kind.clone() {
            NodeKind::NameRef {
                identifier,
                name_def,
            } => {
                let definer = match &self.module.node(name_def).kind {
                    NodeKind::NameDef { definer, .. } => *definer,
                    _ => None,
                };
                match definer {
                    Some(def)
                        if matches!(
                            self.module.node(def).kind,
                            NodeKind::Function { .. }
                        ) =>
                    {
                        def
                    }
                    _ => {
                        return Err(TypeError::CalleeNotFunction {
                            callee: identifier,
                            span,
                        })
                    }
                }
            }
            _ => {
                return Err(TypeError::not_supported(
                    "invoking functions outside the current module",
                    span,
                ))
            }
        };
        let (params, return_type, is_parametric) = match &self.module.node(function).kind {
            NodeKind::Function {
                params,
                return_type,
                is_parametric,
                ..
            } => (params.clone(), *return_type, *is_parametric),
            _ => {
                return Err(TypeError::internal(
                    "callee resolution produced a non-function node",
                    span,
                ))
            }
        };
        if is_parametric {
            return Err(TypeError::not_supported("parametric functions", span));
        }
        if params.len() != args.len() {
            return Err(TypeError::arity_mismatch(params.len(), args.len(), span));
        }
        let return_annotation =
            return_type.unwrap_or_else(|| self.module.make_unit_annotation(span));
        self.table.set_type_annotation(id, return_annotation);
        for (param, arg) in params.iter().zip(args.iter()) {
            let (formal_name_def, formal_annotation) = match &self.module.node(*param).kind {
                NodeKind::Param {
                    name_def,
                    type_annotation,
                } => (*name_def, *type_annotation),
                _ => {
                    return Err(TypeError::internal(
                        "function parameter list contains a non-param node",
                        span,
                    ))
                }
            };
            let formal_name = self
                .module
                .identifier_of(formal_name_def)
                .unwrap_or("arg")
                .to_string();
            let arg_span = self.module.span_of(*arg);
            let var = self.table.define_internal_variable(
                InferenceVariableKind::Type,
                *arg,
                self.variable_name(&format!("actual_arg_{}", formal_name), arg_span),
            );
            self.table.set_type_variable(*arg, var, arg_span)?;
            self.table.set_type_annotation(*arg, formal_annotation);
            self.visit(*arg)?;
        }
        Ok(())
    }
}
