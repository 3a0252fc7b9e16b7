//! AST arena unit tests

use crate::frontend::ast::{parse_number, BinopKind, Module, NodeId, NodeKind};
use crate::frontend::type_system::annotation::Signedness;
use crate::util::span::{FileId, Span};

fn m() -> Module {
    Module::new("test", FileId::NONE)
}

/// 测试节点区按创建顺序分配稠密索引
#[test]
fn test_arena_ids_are_dense() {
    let mut module = m();
    let a = module.make_number("1", Span::dummy());
    let b = module.make_number("2", Span::dummy());
    let c = module.make_binop(BinopKind::Add, a, b, Span::dummy());
    assert_eq!(a.index(), 0);
    assert_eq!(b.index(), 1);
    assert_eq!(c.index(), 2);
    assert_eq!(module.node_count(), 3);
    let collected: Vec<NodeId> = module.node_ids().collect();
    assert_eq!(collected, vec![a, b, c], "iteration should be creation order");
}

/// 测试定义构造器回填 definer
#[test]
fn test_definition_builders_patch_definer() {
    let mut module = m();
    let name = module.make_name_def("FOO", Span::dummy());
    let value = module.make_number("4", Span::dummy());
    let def = module.make_constant_def(name, None, value, Span::dummy());
    match &module.node(name).kind {
        NodeKind::NameDef { definer, .. } => {
            assert_eq!(*definer, Some(def), "constant def should set definer");
        }
        other => panic!("expected NameDef, got {:?}", other),
    }
    assert_eq!(module.top(), &[def], "constant def should be a top member");
}

/// 测试引用不作为遍历边，子节点按源顺序排列
#[test]
fn test_children_exclude_reference_edges() {
    let mut module = m();
    let name = module.make_name_def("A", Span::dummy());
    let value = module.make_number("1", Span::dummy());
    let def = module.make_constant_def(name, None, value, Span::dummy());
    let reference = module.make_name_ref(name, Span::dummy());

    let def_children = module.node(def).kind.children();
    assert_eq!(def_children.as_slice(), &[name, value]);
    assert!(
        module.node(reference).kind.children().is_empty(),
        "a name ref must not own its def"
    );
}

/// 测试函数节点的子节点覆盖名字、形参与函数体
#[test]
fn test_function_children_order() {
    let mut module = m();
    let fn_name = module.make_name_def("f", Span::dummy());
    let p_name = module.make_name_def("a", Span::dummy());
    let p_ty = module.make_bits_annotation(Signedness::Unsigned, 8, Span::dummy());
    let param = module.make_param(p_name, p_ty, Span::dummy());
    let body = module.make_statement_block(Vec::new(), false, Span::dummy());
    let func = module.make_function(fn_name, vec![param], None, body, false, Span::dummy());

    let children = module.node(func).kind.children();
    assert_eq!(children.as_slice(), &[fn_name, param, body]);
}

/// 测试字面量文本解析：进制前缀、下划线、负号
#[test]
fn test_parse_number_radixes() {
    assert_eq!(parse_number("4"), Some(4));
    assert_eq!(parse_number("-2"), Some(-2));
    assert_eq!(parse_number("0xff"), Some(255));
    assert_eq!(parse_number("0b101"), Some(5));
    assert_eq!(parse_number("1_000"), Some(1000));
    assert_eq!(parse_number("-0x10"), Some(-16));
    assert_eq!(parse_number(""), None);
    assert_eq!(parse_number("-"), None);
    assert_eq!(parse_number("zz"), None);
    assert_eq!(
        parse_number("0xffffffffffffffffffffffffffffffff"),
        None,
        "values beyond i128 should be rejected"
    );
}

/// 测试名字引用复制定义处的标识符
#[test]
fn test_name_ref_copies_identifier() {
    let mut module = m();
    let name = module.make_name_def("BAR", Span::dummy());
    let reference = module.make_name_ref(name, Span::dummy());
    match &module.node(reference).kind {
        NodeKind::NameRef { identifier, name_def } => {
            assert_eq!(identifier, "BAR");
            assert_eq!(*name_def, name);
        }
        other => panic!("expected NameRef, got {:?}", other),
    }
}
