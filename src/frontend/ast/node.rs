//! Abstract Syntax Tree node types
//!
//! Nodes live in a `Module` arena and reference each other through
//! `NodeId` indices; there is no `Box` linkage and no parent pointer.

use crate::frontend::type_system::annotation::AnnotationId;
use crate::util::span::Span;
use smallvec::SmallVec;
use std::fmt;

/// Arena index of an AST node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// Create a node id from a raw index
    pub fn new(index: u32) -> Self {
        NodeId(index)
    }

    /// Get the arena index
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Binary operator kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinopKind {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl BinopKind {
    /// Source symbol of the operator
    pub fn symbol(&self) -> &'static str {
        match self {
            BinopKind::Add => "+",
            BinopKind::Sub => "-",
            BinopKind::Mul => "*",
            BinopKind::Div => "/",
            BinopKind::Mod => "%",
            BinopKind::BitAnd => "&",
            BinopKind::BitOr => "|",
            BinopKind::BitXor => "^",
            BinopKind::Shl => "<<",
            BinopKind::Shr => ">>",
            BinopKind::Eq => "==",
            BinopKind::Ne => "!=",
            BinopKind::Lt => "<",
            BinopKind::Le => "<=",
            BinopKind::Gt => ">",
            BinopKind::Ge => ">=",
        }
    }
}

impl fmt::Display for BinopKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Number literal kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberKind {
    /// `true` / `false`
    Bool,
    /// Any numeric literal (decimal, `0x`, `0b`)
    Other,
}

/// AST node kind (closed set)
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Module-level constant definition: `const NAME: T = value;`
    ConstantDef {
        name_def: NodeId,
        type_annotation: Option<AnnotationId>,
        value: NodeId,
    },
    /// Local binding: `let name: T = rhs;`
    Let {
        name_def: NodeId,
        type_annotation: Option<AnnotationId>,
        rhs: NodeId,
    },
    /// Defining occurrence of a name
    NameDef {
        identifier: String,
        /// Node that defines this name (constant def, let, function)
        definer: Option<NodeId>,
    },
    /// Use of a locally defined name
    NameRef {
        identifier: String,
        name_def: NodeId,
    },
    /// Module-qualified reference: `mod::attr`
    ColonRef { subject: String, attr: String },
    /// Number or boolean literal; `text` keeps the source spelling
    Number {
        text: String,
        kind: NumberKind,
        type_annotation: Option<AnnotationId>,
    },
    /// Binary operation
    Binop {
        kind: BinopKind,
        lhs: NodeId,
        rhs: NodeId,
    },
    /// Tuple literal: `(a, b, c)`
    TupleLiteral { members: Vec<NodeId> },
    /// Array literal: `[a, b]` or `[a, ...]`
    ArrayLiteral {
        members: Vec<NodeId>,
        has_ellipsis: bool,
    },
    /// Function definition
    Function {
        name_def: NodeId,
        params: Vec<NodeId>,
        return_type: Option<AnnotationId>,
        body: NodeId,
        is_parametric: bool,
    },
    /// Formal parameter: `name: T`
    Param {
        name_def: NodeId,
        type_annotation: AnnotationId,
    },
    /// Brace-enclosed statement list; the final statement is the block's
    /// value when `trailing_semi` is false
    StatementBlock {
        statements: Vec<NodeId>,
        trailing_semi: bool,
    },
    /// Function call
    Invocation { callee: NodeId, args: Vec<NodeId> },
}

impl NodeKind {
    /// Child node ids in source order
    ///
    /// A `NameRef` does not own its `NameDef`; reference edges are not
    /// traversal edges. Annotation operands (array size counts) are not
    /// children either.
    pub fn children(&self) -> SmallVec<[NodeId; 4]> {
        let mut out = SmallVec::new();
        match self {
            NodeKind::ConstantDef { name_def, value, .. } => {
                out.push(*name_def);
                out.push(*value);
            }
            NodeKind::Let { name_def, rhs, .. } => {
                out.push(*name_def);
                out.push(*rhs);
            }
            NodeKind::NameDef { .. } => {}
            NodeKind::NameRef { .. } => {}
            NodeKind::ColonRef { .. } => {}
            NodeKind::Number { .. } => {}
            NodeKind::Binop { lhs, rhs, .. } => {
                out.push(*lhs);
                out.push(*rhs);
            }
            NodeKind::TupleLiteral { members } => out.extend(members.iter().copied()),
            NodeKind::ArrayLiteral { members, .. } => out.extend(members.iter().copied()),
            NodeKind::Function {
                name_def,
                params,
                body,
                ..
            } => {
                out.push(*name_def);
                out.extend(params.iter().copied());
                out.push(*body);
            }
            NodeKind::Param { name_def, .. } => out.push(*name_def),
            NodeKind::StatementBlock { statements, .. } => {
                out.extend(statements.iter().copied())
            }
            NodeKind::Invocation { callee, args } => {
                out.push(*callee);
                out.extend(args.iter().copied());
            }
        }
        out
    }

    /// Whether the node is an expression (can be a block's value)
    pub fn is_expr(&self) -> bool {
        matches!(
            self,
            NodeKind::NameRef { .. }
                | NodeKind::ColonRef { .. }
                | NodeKind::Number { .. }
                | NodeKind::Binop { .. }
                | NodeKind::TupleLiteral { .. }
                | NodeKind::ArrayLiteral { .. }
                | NodeKind::StatementBlock { .. }
                | NodeKind::Invocation { .. }
        )
    }

    /// Short kind name for diagnostics and debug names
    pub fn kind_name(&self) -> &'static str {
        match self {
            NodeKind::ConstantDef { .. } => "constant-def",
            NodeKind::Let { .. } => "let",
            NodeKind::NameDef { .. } => "name-def",
            NodeKind::NameRef { .. } => "name-ref",
            NodeKind::ColonRef { .. } => "colon-ref",
            NodeKind::Number { .. } => "number",
            NodeKind::Binop { .. } => "binop",
            NodeKind::TupleLiteral { .. } => "tuple",
            NodeKind::ArrayLiteral { .. } => "array",
            NodeKind::Function { .. } => "function",
            NodeKind::Param { .. } => "param",
            NodeKind::StatementBlock { .. } => "block",
            NodeKind::Invocation { .. } => "invocation",
        }
    }
}

/// An AST node: kind plus source span
#[derive(Debug, Clone)]
pub struct AstNode {
    /// Node kind
    pub kind: NodeKind,
    /// Source span
    pub span: Span,
}

impl AstNode {
    /// Create a new node
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Self { kind, span }
    }
}
