//! AST module arena
//!
//! A `Module` owns every AST node and every type annotation of one source
//! module, addressed by dense `NodeId` / `AnnotationId` indices. The
//! parser (or a test) grows the arenas through the `make_*` builders;
//! later stages only read nodes, while inference may append annotations
//! and synthesized count literals.

pub mod node;

#[cfg(test)]
mod tests;

pub use node::{AstNode, BinopKind, NodeId, NodeKind, NumberKind};

use crate::frontend::type_system::annotation::{AnnotationId, AnnotationKind, Signedness, TypeAnnotation};
use crate::frontend::type_system::var::TypeVarId;
use crate::util::span::{FileId, Span};

/// Parse a number literal's source text
///
/// Accepts optional leading `-`, `_` digit separators, and `0x`/`0b`
/// radix prefixes. Returns `None` for malformed text or values outside
/// the `i128` range.
pub fn parse_number(text: &str) -> Option<i128> {
    let trimmed = text.trim();
    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    if body.is_empty() {
        return None;
    }
    let body = body.replace('_', "");
    let magnitude = if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        i128::from_str_radix(hex, 16).ok()?
    } else if let Some(bin) = body.strip_prefix("0b").or_else(|| body.strip_prefix("0B")) {
        i128::from_str_radix(bin, 2).ok()?
    } else {
        body.parse::<i128>().ok()?
    };
    Some(if negative { -magnitude } else { magnitude })
}

/// One source module: node arena, annotation arena, top-level members
#[derive(Debug, Clone)]
pub struct Module {
    name: String,
    file: FileId,
    nodes: Vec<AstNode>,
    annotations: Vec<TypeAnnotation>,
    top: Vec<NodeId>,
}

impl Module {
    /// Create an empty module
    pub fn new(name: &str, file: FileId) -> Self {
        Self {
            name: name.to_string(),
            file,
            nodes: Vec::new(),
            annotations: Vec::new(),
            top: Vec::new(),
        }
    }

    /// Module name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owning file
    pub fn file(&self) -> FileId {
        self.file
    }

    /// Top-level members in source order
    pub fn top(&self) -> &[NodeId] {
        &self.top
    }

    /// Look up a node
    pub fn node(&self, id: NodeId) -> &AstNode {
        &self.nodes[id.index()]
    }

    /// Span of a node
    pub fn span_of(&self, id: NodeId) -> Span {
        self.nodes[id.index()].span
    }

    /// Number of nodes in the arena
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// All node ids in creation order
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len() as u32).map(NodeId::new)
    }

    /// Look up an annotation
    pub fn annotation(&self, id: AnnotationId) -> &TypeAnnotation {
        &self.annotations[id.index()]
    }

    /// Number of annotations in the arena
    pub fn annotation_count(&self) -> usize {
        self.annotations.len()
    }

    /// Identifier of a `NameDef` node
    pub fn identifier_of(&self, name_def: NodeId) -> Option<&str> {
        match &self.nodes[name_def.index()].kind {
            NodeKind::NameDef { identifier, .. } => Some(identifier),
            _ => None,
        }
    }

    /// Render an annotation as source-like text
    pub fn annotation_to_string(&self, id: AnnotationId) -> String {
        match &self.annotations[id.index()].kind {
            AnnotationKind::Bool => "bool".to_string(),
            AnnotationKind::Bits { signedness, width } => format!("{}{}", signedness, width),
            AnnotationKind::Tuple { members } => format!(
                "({})",
                members
                    .iter()
                    .map(|m| self.annotation_to_string(*m))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            AnnotationKind::Array {
                element,
                count,
                count_is_min,
            } => {
                let count_text = match &self.nodes[count.index()].kind {
                    NodeKind::Number { text, .. } => text.clone(),
                    other => other.kind_name().to_string(),
                };
                let suffix = if *count_is_min { "..." } else { "" };
                format!(
                    "{}[{}{}]",
                    self.annotation_to_string(*element),
                    count_text,
                    suffix
                )
            }
            AnnotationKind::Variable(var) => format!("{}", var),
        }
    }

    /// Append a node to the arena
    pub fn add_node(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(AstNode::new(kind, span));
        id
    }

    /// Append an annotation to the arena
    pub fn make_annotation(&mut self, kind: AnnotationKind, span: Span) -> AnnotationId {
        let id = AnnotationId::new(self.annotations.len() as u32);
        self.annotations.push(TypeAnnotation::new(kind, span));
        id
    }

    // ---- annotation builders ----

    /// `bool`
    pub fn make_bool_annotation(&mut self, span: Span) -> AnnotationId {
        self.make_annotation(AnnotationKind::Bool, span)
    }

    /// `uN` / `sN`
    pub fn make_bits_annotation(
        &mut self,
        signedness: Signedness,
        width: u32,
        span: Span,
    ) -> AnnotationId {
        self.make_annotation(AnnotationKind::Bits { signedness, width }, span)
    }

    /// `(T0, T1, …)`
    pub fn make_tuple_annotation(
        &mut self,
        members: Vec<AnnotationId>,
        span: Span,
    ) -> AnnotationId {
        self.make_annotation(AnnotationKind::Tuple { members }, span)
    }

    /// The unit type `()`
    pub fn make_unit_annotation(&mut self, span: Span) -> AnnotationId {
        self.make_annotation(AnnotationKind::Tuple { members: Vec::new() }, span)
    }

    /// `T[count]`, optionally "at least count" when the source used `...`
    pub fn make_array_annotation(
        &mut self,
        element: AnnotationId,
        count: NodeId,
        count_is_min: bool,
        span: Span,
    ) -> AnnotationId {
        self.make_annotation(
            AnnotationKind::Array {
                element,
                count,
                count_is_min,
            },
            span,
        )
    }

    /// "whatever this inference variable resolves to"
    pub fn make_variable_annotation(&mut self, var: TypeVarId, span: Span) -> AnnotationId {
        self.make_annotation(AnnotationKind::Variable(var), span)
    }

    // ---- node builders ----

    /// Defining occurrence of a name; `definer` is patched by the
    /// definition builders
    pub fn make_name_def(&mut self, identifier: &str, span: Span) -> NodeId {
        self.add_node(
            NodeKind::NameDef {
                identifier: identifier.to_string(),
                definer: None,
            },
            span,
        )
    }

    /// Reference to a previously created `NameDef`
    pub fn make_name_ref(&mut self, name_def: NodeId, span: Span) -> NodeId {
        let identifier = match &self.nodes[name_def.index()].kind {
            NodeKind::NameDef { identifier, .. } => identifier.clone(),
            other => other.kind_name().to_string(),
        };
        self.add_node(NodeKind::NameRef { identifier, name_def }, span)
    }

    /// Module-qualified reference `subject::attr`
    pub fn make_colon_ref(&mut self, subject: &str, attr: &str, span: Span) -> NodeId {
        self.add_node(
            NodeKind::ColonRef {
                subject: subject.to_string(),
                attr: attr.to_string(),
            },
            span,
        )
    }

    /// Unannotated number literal
    pub fn make_number(&mut self, text: &str, span: Span) -> NodeId {
        self.add_node(
            NodeKind::Number {
                text: text.to_string(),
                kind: NumberKind::Other,
                type_annotation: None,
            },
            span,
        )
    }

    /// Number literal with an explicit type, e.g. `u32:4`
    pub fn make_number_with_type(
        &mut self,
        text: &str,
        type_annotation: AnnotationId,
        span: Span,
    ) -> NodeId {
        self.add_node(
            NodeKind::Number {
                text: text.to_string(),
                kind: NumberKind::Other,
                type_annotation: Some(type_annotation),
            },
            span,
        )
    }

    /// `true` / `false`
    pub fn make_bool_literal(&mut self, value: bool, span: Span) -> NodeId {
        self.add_node(
            NodeKind::Number {
                text: if value { "true" } else { "false" }.to_string(),
                kind: NumberKind::Bool,
                type_annotation: None,
            },
            span,
        )
    }

    /// Binary operation
    pub fn make_binop(&mut self, kind: BinopKind, lhs: NodeId, rhs: NodeId, span: Span) -> NodeId {
        self.add_node(NodeKind::Binop { kind, lhs, rhs }, span)
    }

    /// Tuple literal
    pub fn make_tuple(&mut self, members: Vec<NodeId>, span: Span) -> NodeId {
        self.add_node(NodeKind::TupleLiteral { members }, span)
    }

    /// Array literal, `has_ellipsis` when the source ends with `...`
    pub fn make_array(&mut self, members: Vec<NodeId>, has_ellipsis: bool, span: Span) -> NodeId {
        self.add_node(
            NodeKind::ArrayLiteral {
                members,
                has_ellipsis,
            },
            span,
        )
    }

    /// Module-level constant definition; appended to the module top
    pub fn make_constant_def(
        &mut self,
        name_def: NodeId,
        type_annotation: Option<AnnotationId>,
        value: NodeId,
        span: Span,
    ) -> NodeId {
        let id = self.add_node(
            NodeKind::ConstantDef {
                name_def,
                type_annotation,
                value,
            },
            span,
        );
        self.set_definer(name_def, id);
        self.top.push(id);
        id
    }

    /// Local `let` binding
    pub fn make_let(
        &mut self,
        name_def: NodeId,
        type_annotation: Option<AnnotationId>,
        rhs: NodeId,
        span: Span,
    ) -> NodeId {
        let id = self.add_node(
            NodeKind::Let {
                name_def,
                type_annotation,
                rhs,
            },
            span,
        );
        self.set_definer(name_def, id);
        id
    }

    /// Formal parameter
    pub fn make_param(
        &mut self,
        name_def: NodeId,
        type_annotation: AnnotationId,
        span: Span,
    ) -> NodeId {
        let id = self.add_node(
            NodeKind::Param {
                name_def,
                type_annotation,
            },
            span,
        );
        self.set_definer(name_def, id);
        id
    }

    /// Function definition; appended to the module top
    pub fn make_function(
        &mut self,
        name_def: NodeId,
        params: Vec<NodeId>,
        return_type: Option<AnnotationId>,
        body: NodeId,
        is_parametric: bool,
        span: Span,
    ) -> NodeId {
        let id = self.add_node(
            NodeKind::Function {
                name_def,
                params,
                return_type,
                body,
                is_parametric,
            },
            span,
        );
        self.set_definer(name_def, id);
        self.top.push(id);
        id
    }

    /// Statement block
    pub fn make_statement_block(
        &mut self,
        statements: Vec<NodeId>,
        trailing_semi: bool,
        span: Span,
    ) -> NodeId {
        self.add_node(
            NodeKind::StatementBlock {
                statements,
                trailing_semi,
            },
            span,
        )
    }

    /// Function call
    pub fn make_invocation(&mut self, callee: NodeId, args: Vec<NodeId>, span: Span) -> NodeId {
        self.add_node(NodeKind::Invocation { callee, args }, span)
    }

    fn set_definer(&mut self, name_def: NodeId, definer: NodeId) {
        if let NodeKind::NameDef {
            definer: slot, ..
        } = &mut self.nodes[name_def.index()].kind
        {
            *slot = Some(definer);
        }
    }
}
