//! 推断表测试

use crate::frontend::ast::Module;
use crate::frontend::type_system::{InferenceVariableKind, Signedness};
use crate::frontend::typecheck::table::InferenceTable;
use crate::frontend::typecheck::{ErrorCategory, TypeError};
use crate::util::span::{FileTable, Span};

fn demo_module() -> Module {
    let mut files = FileTable::new();
    let file = files.intern("table.xj");
    Module::new("table", file)
}

/// 测试变量定义与指派
#[test]
fn test_define_and_assign_variable() {
    let mut module = demo_module();
    let span = Span::dummy();
    let node = module.make_name_def("FOO", span);

    let mut table = InferenceTable::new();
    let var = table.define_internal_variable(
        InferenceVariableKind::Type,
        node,
        "internal_type_FOO_at_table.xj:1:1-1:4".to_string(),
    );
    table.set_type_variable(node, var, span).unwrap();

    assert_eq!(table.type_variable(node), Some(var));
    assert_eq!(table.variable_count(), 1);
    assert_eq!(table.variable(var).origin, node);
    assert!(
        table.variable(var).name.contains("FOO"),
        "debug name should embed the identifier"
    );
}

/// 测试变量重复指派是内部错误
#[test]
fn test_variable_reassignment_is_internal_error() {
    let mut module = demo_module();
    let span = Span::dummy();
    let node = module.make_name_def("FOO", span);

    let mut table = InferenceTable::new();
    let first = table.define_internal_variable(InferenceVariableKind::Type, node, "a".to_string());
    let second = table.define_internal_variable(InferenceVariableKind::Type, node, "b".to_string());
    table.set_type_variable(node, first, span).unwrap();

    let err = table.set_type_variable(node, second, span).unwrap_err();
    assert!(matches!(err, TypeError::Internal { .. }));
    assert_eq!(err.category(), ErrorCategory::Internal);
}

/// 测试注解后写覆盖
#[test]
fn test_annotation_last_write_wins() {
    let mut module = demo_module();
    let span = Span::dummy();
    let node = module.make_number("1", span);
    let first = module.make_bits_annotation(Signedness::Unsigned, 8, span);
    let second = module.make_bits_annotation(Signedness::Unsigned, 1, span);

    let mut table = InferenceTable::new();
    table.set_type_annotation(node, first);
    table.set_type_annotation(node, second);

    assert_eq!(table.annotation(node), Some(second));
}

/// 测试迭代顺序等于记录顺序
#[test]
fn test_iteration_follows_insertion_order() {
    let mut module = demo_module();
    let span = Span::dummy();
    let a = module.make_name_def("A", span);
    let b = module.make_name_def("B", span);
    let c = module.make_name_def("C", span);

    let mut table = InferenceTable::new();
    // 故意不按节点区顺序记录
    for node in [c, a, b] {
        let var =
            table.define_internal_variable(InferenceVariableKind::Type, node, node.to_string());
        table.set_type_variable(node, var, span).unwrap();
    }

    let order: Vec<_> = table.node_variables().map(|(node, _)| node).collect();
    assert_eq!(order, vec![c, a, b], "iteration should follow insertion");
}

/// 测试推断表转储包含变量与注解
#[test]
fn test_dump_lists_facts() {
    let mut module = demo_module();
    let span = Span::dummy();
    let node = module.make_number("5", span);
    let anno = module.make_bits_annotation(Signedness::Unsigned, 32, span);

    let mut table = InferenceTable::new();
    let var = table.define_internal_variable(
        InferenceVariableKind::Type,
        node,
        "internal_type_expr_at_table.xj:1:1-1:2".to_string(),
    );
    table.set_type_variable(node, var, span).unwrap();
    table.set_type_annotation(node, anno);

    let dump = table.dump(&module);
    assert!(dump.contains("internal_type_expr_at_"), "dump: {}", dump);
    assert!(dump.contains("u32"), "dump: {}", dump);
}
