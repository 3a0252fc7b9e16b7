//! 解析器
//!
//! 把填好的推断表化为逐节点的具体类型。解析按变量创建顺序进行，
//! 父变量先于成员变量解析，声明类型得以在成员映射前回灌到成员
//! 变量；随后对每个调用点把实参与形参独立合一；最后按节点区顺序
//! 产出节点到具体类型的映射。任一步失败立即返回首个错误。

use super::errors::{TypeError, TypeResult};
use super::populate::AutoLiteralSet;
use super::table::InferenceTable;
use crate::frontend::ast::{parse_number, Module, NodeId, NodeKind};
use crate::frontend::type_system::annotation::{AnnotationId, AnnotationKind, Signedness};
use crate::frontend::type_system::concrete::ConcreteType;
use crate::frontend::type_system::var::TypeVarId;
use crate::util::span::Span;
use hashbrown::{HashMap, HashSet};
use indexmap::IndexMap;
use tracing::debug;

/// 解析中间形态
///
/// 与具体类型同构，另携带两种「尚可协商」信息：位型叶子是否来自
/// 自动字面量（可加宽），数组个数是否只是下界（可加长）
#[derive(Debug, Clone, PartialEq, Eq)]
enum Deduced {
    Bool,
    Bits {
        signedness: Signedness,
        width: u32,
        negotiable: bool,
    },
    Tuple(Vec<Deduced>),
    Array {
        element: Box<Deduced>,
        count: u32,
        count_is_min: bool,
    },
}

/// 解析推断表
///
/// 返回按节点区顺序排列的「节点到具体类型」映射；没有任何类型
/// 事实的节点（纯声明性节点）不在映射中
pub fn resolve_table(
    module: &Module,
    table: &InferenceTable,
    auto_literals: &AutoLiteralSet,
) -> TypeResult<IndexMap<NodeId, ConcreteType>> {
    debug!(
        "resolving {} variables for module `{}`",
        table.variable_count(),
        module.name()
    );
    let mut resolver = Resolver::new(module, table, auto_literals);
    resolver.resolve_all_variables()?;
    resolver.recheck_invocations()?;
    let types = resolver.map_nodes()?;
    debug!("resolved {} typed nodes", types.len());
    Ok(types)
}

/// 解析器状态
struct Resolver<'a> {
    module: &'a Module,
    table: &'a InferenceTable,
    auto_literals: &'a AutoLiteralSet,
    /// 每个变量归属的节点，按指派顺序
    governed: HashMap<TypeVarId, Vec<NodeId>>,
    /// 已解析变量的备忘
    memo: HashMap<TypeVarId, Deduced>,
    /// 解析中的变量，用于检出自指
    in_progress: HashSet<TypeVarId>,
}

impl<'a> Resolver<'a> {
    fn new(
        module: &'a Module,
        table: &'a InferenceTable,
        auto_literals: &'a AutoLiteralSet,
    ) -> Self {
        let mut governed: HashMap<TypeVarId, Vec<NodeId>> = HashMap::new();
        for (node, var) in table.node_variables() {
            governed.entry(var).or_default().push(node);
        }
        Resolver {
            module,
            table,
            auto_literals,
            governed,
            memo: HashMap::new(),
            in_progress: HashSet::new(),
        }
    }

    /// 按创建顺序解析全部变量
    fn resolve_all_variables(&mut self) -> TypeResult<()> {
        let vars: Vec<TypeVarId> = self.table.variables().map(|(var, _)| var).collect();
        for var in vars {
            self.resolve_variable(var)?;
        }
        Ok(())
    }

    /// 解析单个变量
    ///
    /// 收集变量归属节点上的全部注解，按记录顺序依次求值并合一；
    /// 零条事实报无法推断，解析途中再次进入报自指
    fn resolve_variable(
        &mut self,
        var: TypeVarId,
    ) -> TypeResult<Deduced> {
        if let Some(deduced) = self.memo.get(&var) {
            return Ok(deduced.clone());
        }
        let origin = self.table.variable(var).origin;
        let origin_span = self.module.span_of(origin);
        if !self.in_progress.insert(var) {
            return Err(TypeError::RecursiveType {
                name: self.variable_display_name(var),
                span: origin_span,
            });
        }
        let nodes = self.governed.get(&var).cloned().unwrap_or_default();
        let mut result: Option<Deduced> = None;
        for node in nodes {
            let Some(annotation) = self.table.annotation(node) else {
                continue;
            };
            let fact_span = self.module.annotation(annotation).span;
            let deduced = self.evaluate(annotation)?;
            result = Some(match result {
                None => deduced,
                Some(previous) => unify(&previous, &deduced, fact_span)?,
            });
        }
        self.in_progress.remove(&var);
        let deduced = result.ok_or_else(|| TypeError::cannot_infer(
            self.variable_display_name(var),
            origin_span,
        ))?;
        self.refine_variable(var, &deduced, origin_span)?;
        match self.memo.get(&var) {
            Some(refined) => Ok(refined.clone()),
            None => Ok(deduced),
        }
    }

    /// 求值注解
    ///
    /// 位型叶子是否可协商取决于注解是否在自动字面量集合中；
    /// 变量引用递归解析
    fn evaluate(
        &mut self,
        id: AnnotationId,
    ) -> TypeResult<Deduced> {
        let annotation = self.module.annotation(id);
        let span = annotation.span;
        match annotation.kind.clone() {
            AnnotationKind::Bool => Ok(Deduced::Bool),
            AnnotationKind::Bits { signedness, width } => Ok(Deduced::Bits {
                signedness,
                width,
                negotiable: self.auto_literals.contains(&id),
            }),
            AnnotationKind::Tuple { members } => {
                let mut deduced = Vec::with_capacity(members.len());
                for member in members {
                    deduced.push(self.evaluate(member)?);
                }
                Ok(Deduced::Tuple(deduced))
            }
            AnnotationKind::Array {
                element,
                count,
                count_is_min,
            } => {
                let element = self.evaluate(element)?;
                let count = self.array_count(count, span)?;
                Ok(Deduced::Array {
                    element: Box::new(element),
                    count,
                    count_is_min,
                })
            }
            AnnotationKind::Variable(var) => self.resolve_variable(var),
        }
    }

    /// 读取数组个数
    ///
    /// 个数必须是数字字面量节点
    fn array_count(
        &self,
        count: NodeId,
        span: Span,
    ) -> TypeResult<u32> {
        match &self.module.node(count).kind {
            NodeKind::Number { text, .. } => {
                let value = parse_number(text).ok_or_else(|| TypeError::InvalidLiteral {
                    text: text.clone(),
                    span,
                })?;
                u32::try_from(value).map_err(|_| TypeError::InferenceError {
                    message: format!("array size `{}` is out of range", text),
                    span,
                })
            }
            _ => Err(TypeError::not_supported("non-literal array sizes", span)),
        }
    }

    /// 细化变量
    ///
    /// 把一份新事实并入变量备忘；若备忘确有变化，则通过归属节点的
    /// 结构注解继续回灌成员变量。到达定点即停
    fn refine_variable(
        &mut self,
        var: TypeVarId,
        piece: &Deduced,
        span: Span,
    ) -> TypeResult<()> {
        let refined = match self.memo.get(&var) {
            Some(old) => {
                let refined = unify(old, piece, span)?;
                if refined == *old {
                    return Ok(());
                }
                refined
            }
            None => piece.clone(),
        };
        self.memo.insert(var, refined.clone());
        let nodes = self.governed.get(&var).cloned().unwrap_or_default();
        for node in nodes {
            if let Some(annotation) = self.table.annotation(node) {
                self.impose(&refined, annotation, span)?;
            }
        }
        Ok(())
    }

    /// 沿注解结构回灌
    ///
    /// 注解中的变量引用收下对应位置的细化结果；具体叶子无可回灌
    fn impose(
        &mut self,
        piece: &Deduced,
        annotation: AnnotationId,
        span: Span,
    ) -> TypeResult<()> {
        match (piece, self.module.annotation(annotation).kind.clone()) {
            (_, AnnotationKind::Variable(var)) => self.refine_variable(var, piece, span),
            (Deduced::Tuple(pieces), AnnotationKind::Tuple { members }) => {
                if pieces.len() != members.len() {
                    return Err(TypeError::internal(
                        "tuple shape diverged during refinement",
                        span,
                    ));
                }
                let pieces = pieces.clone();
                for (piece, member) in pieces.iter().zip(members) {
                    self.impose(piece, member, span)?;
                }
                Ok(())
            }
            (Deduced::Array { element, .. }, AnnotationKind::Array { element: member, .. }) => {
                let element = element.clone();
                self.impose(&element, member, span)
            }
            _ => Ok(()),
        }
    }

    /// 复查调用点
    ///
    /// 填表阶段对实参节点的注解后写覆盖，形参约束可能被实参自身的
    /// 注解顶掉；这里把每个实参的解析结果与形参声明重新合一，并把
    /// 结果细化回实参变量
    fn recheck_invocations(&mut self) -> TypeResult<()> {
        for id in self.module.node_ids() {
            let (callee, args) = match &self.module.node(id).kind {
                NodeKind::Invocation { callee, args } => (*callee, args.clone()),
                _ => continue,
            };
            let span = self.module.span_of(id);
            let function = match &self.module.node(callee).kind {
                NodeKind::NameRef { name_def, .. } => match &self.module.node(*name_def).kind {
                    NodeKind::NameDef {
                        definer: Some(definer),
                        ..
                    } => *definer,
                    _ => {
                        return Err(TypeError::internal(
                            "invocation callee lost its definition",
                            span,
                        ))
                    }
                },
                _ => {
                    return Err(TypeError::internal(
                        "invocation callee is not a name reference",
                        span,
                    ))
                }
            };
            let params = match &self.module.node(function).kind {
                NodeKind::Function { params, .. } => params.clone(),
                _ => {
                    return Err(TypeError::internal(
                        "invocation callee is not a function",
                        span,
                    ))
                }
            };
            for (param, arg) in params.iter().zip(args.iter()) {
                let formal_annotation = match &self.module.node(*param).kind {
                    NodeKind::Param {
                        type_annotation, ..
                    } => *type_annotation,
                    _ => {
                        return Err(TypeError::internal(
                            "function parameter list contains a non-param node",
                            span,
                        ))
                    }
                };
                let Some(arg_var) = self.table.type_variable(*arg) else {
                    continue;
                };
                let arg_span = self.module.span_of(*arg);
                let formal = self.evaluate(formal_annotation)?;
                let actual = self.resolve_variable(arg_var)?;
                let refined = unify(&formal, &actual, arg_span)?;
                self.refine_variable(arg_var, &refined, arg_span)?;
            }
        }
        Ok(())
    }

    /// 产出节点映射
    ///
    /// 按节点区顺序：带变量的节点取变量的解析结果，只带注解的节点
    /// 求值注解；两者皆无的节点不入映射
    fn map_nodes(&mut self) -> TypeResult<IndexMap<NodeId, ConcreteType>> {
        let mut types = IndexMap::new();
        for id in self.module.node_ids() {
            let span = self.module.span_of(id);
            if let Some(var) = self.table.type_variable(id) {
                let deduced = self.resolve_variable(var)?;
                types.insert(id, finalize(&deduced, span)?);
            } else if let Some(annotation) = self.table.annotation(id) {
                let deduced = self.evaluate(annotation)?;
                types.insert(id, finalize(&deduced, span)?);
            }
        }
        Ok(types)
    }

    /// 变量的报错用名
    ///
    /// 源于具名定义的变量用源码标识符，匿名中间变量用调试名
    fn variable_display_name(&self, var: TypeVarId) -> String {
        let info = self.table.variable(var);
        let named_def = match &self.module.node(info.origin).kind {
            NodeKind::ConstantDef { name_def, .. }
            | NodeKind::Let { name_def, .. }
            | NodeKind::Function { name_def, .. } => Some(*name_def),
            _ => None,
        };
        named_def
            .and_then(|def| self.module.identifier_of(def))
            .map(str::to_string)
            .unwrap_or_else(|| info.name.clone())
    }
}

/// 合一两份推断结果
///
/// 两边都已定形时必须完全相等；一边可协商时按加宽规则向定形一边
/// 靠拢；两边皆可协商时合并成仍可协商的最小公共形状。数组个数区分
/// 精确与下界
fn unify(
    expected: &Deduced,
    found: &Deduced,
    span: Span,
) -> TypeResult<Deduced> {
    match (expected, found) {
        (Deduced::Bool, Deduced::Bool) => Ok(Deduced::Bool),
        (
            Deduced::Bits {
                signedness: expected_sign,
                width: expected_width,
                negotiable: expected_negotiable,
            },
            Deduced::Bits {
                signedness: found_sign,
                width: found_width,
                negotiable: found_negotiable,
            },
        ) => match (*expected_negotiable, *found_negotiable) {
            (false, false) => {
                if expected_sign == found_sign && expected_width == found_width {
                    Ok(expected.clone())
                } else {
                    Err(mismatch(expected, found, span))
                }
            }
            (false, true) => {
                if fits(*found_sign, *found_width, *expected_sign, *expected_width) {
                    Ok(expected.clone())
                } else {
                    Err(mismatch(expected, found, span))
                }
            }
            (true, false) => {
                if fits(*expected_sign, *expected_width, *found_sign, *found_width) {
                    Ok(found.clone())
                } else {
                    Err(mismatch(expected, found, span))
                }
            }
            (true, true) => {
                let signedness = if *expected_sign == Signedness::Signed
                    || *found_sign == Signedness::Signed
                {
                    Signedness::Signed
                } else {
                    Signedness::Unsigned
                };
                let adjusted = |sign: Signedness, width: u32| {
                    if sign == Signedness::Unsigned && signedness == Signedness::Signed {
                        width + 1
                    } else {
                        width
                    }
                };
                Ok(Deduced::Bits {
                    signedness,
                    width: adjusted(*expected_sign, *expected_width)
                        .max(adjusted(*found_sign, *found_width)),
                    negotiable: true,
                })
            }
        },
        (Deduced::Tuple(expected_members), Deduced::Tuple(found_members)) => {
            if expected_members.len() != found_members.len() {
                return Err(mismatch(expected, found, span));
            }
            let mut members = Vec::with_capacity(expected_members.len());
            for (a, b) in expected_members.iter().zip(found_members.iter()) {
                members.push(unify(a, b, span)?);
            }
            Ok(Deduced::Tuple(members))
        }
        (
            Deduced::Array {
                element: expected_element,
                count: expected_count,
                count_is_min: expected_min,
            },
            Deduced::Array {
                element: found_element,
                count: found_count,
                count_is_min: found_min,
            },
        ) => {
            let element = unify(expected_element, found_element, span)?;
            let (count, count_is_min) = match (*expected_min, *found_min) {
                (false, false) if expected_count == found_count => (*expected_count, false),
                (false, true) if found_count <= expected_count => (*expected_count, false),
                (true, false) if expected_count <= found_count => (*found_count, false),
                (true, true) => ((*expected_count).max(*found_count), true),
                _ => return Err(mismatch(expected, found, span)),
            };
            Ok(Deduced::Array {
                element: Box::new(element),
                count,
                count_is_min,
            })
        }
        _ => Err(mismatch(expected, found, span)),
    }
}

/// 可协商位型能否放进定形位型
fn fits(
    auto_sign: Signedness,
    auto_width: u32,
    sign: Signedness,
    width: u32,
) -> bool {
    match (auto_sign, sign) {
        (Signedness::Unsigned, Signedness::Unsigned) => width >= auto_width,
        // 无符号值放进有符号槽需要额外一位符号位
        (Signedness::Unsigned, Signedness::Signed) => width > auto_width,
        (Signedness::Signed, Signedness::Unsigned) => false,
        (Signedness::Signed, Signedness::Signed) => width >= auto_width,
    }
}

fn mismatch(
    expected: &Deduced,
    found: &Deduced,
    span: Span,
) -> TypeError {
    TypeError::type_mismatch(deduced_name(expected), deduced_name(found), span)
}

/// 渲染推断结果，与具体类型的渲染同款
fn deduced_name(deduced: &Deduced) -> String {
    match deduced {
        Deduced::Bool => "bool".to_string(),
        Deduced::Bits {
            signedness, width, ..
        } => format!("{}{}", signedness, width),
        Deduced::Tuple(members) => format!(
            "({})",
            members
                .iter()
                .map(deduced_name)
                .collect::<Vec<_>>()
                .join(", ")
        ),
        Deduced::Array {
            element,
            count,
            count_is_min,
        } => format!(
            "{}[{}{}]",
            deduced_name(element),
            count,
            if *count_is_min { "..." } else { "" }
        ),
    }
}

/// 定形
///
/// 仍可协商的位型坍缩为其最小形状；个数仍是下界的数组无从定形
fn finalize(
    deduced: &Deduced,
    span: Span,
) -> TypeResult<ConcreteType> {
    match deduced {
        Deduced::Bool => Ok(ConcreteType::Bool),
        Deduced::Bits {
            signedness, width, ..
        } => Ok(ConcreteType::Bits {
            signedness: *signedness,
            width: *width,
        }),
        Deduced::Tuple(members) => {
            let mut concrete = Vec::with_capacity(members.len());
            for member in members {
                concrete.push(finalize(member, span)?);
            }
            Ok(ConcreteType::Tuple(concrete))
        }
        Deduced::Array {
            element,
            count,
            count_is_min,
        } => {
            if *count_is_min {
                return Err(TypeError::InferenceError {
                    message: "cannot determine the size of an array with an ellipsis (`...`) \
                              from context"
                        .to_string(),
                    span,
                });
            }
            Ok(ConcreteType::Array {
                element: Box::new(finalize(element, span)?),
                size: *count,
            })
        }
    }
}
