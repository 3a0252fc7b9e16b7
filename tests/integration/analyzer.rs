//! Analyzer integration tests
//!
//! Drive the full inference pipeline through the public API.

use xuanji::frontend::ast::{BinopKind, Module};
use xuanji::frontend::type_system::{ConcreteType, Signedness};
use xuanji::frontend::typecheck::ErrorCategory;
use xuanji::util::options::CheckOptions;
use xuanji::util::span::{Position, Span};
use xuanji::Analyzer;

fn span_in(file: xuanji::util::span::FileId) -> Span {
    Span::new(file, Position::new(1, 1), Position::new(1, 5))
}

#[test]
fn test_analyzer_checks_simple_module() {
    let mut analyzer = Analyzer::new();
    let file = analyzer.add_file("demo.xj");
    let span = span_in(file);

    let mut module = Module::new("demo", file);
    let name = module.make_name_def("WIDTH", span);
    let value = module.make_number("4", span);
    let anno = module.make_bits_annotation(Signedness::Unsigned, 32, span);
    let def = module.make_constant_def(name, Some(anno), value, span);

    let info = analyzer.check(&mut module).unwrap();
    assert_eq!(info.module_name(), "demo");
    assert_eq!(info.type_of(def), Some(&ConcreteType::ubits(32)));
    assert_eq!(info.type_of(value), Some(&ConcreteType::ubits(32)));
}

#[test]
fn test_analyzer_reports_first_error() {
    let mut analyzer = Analyzer::new();
    let file = analyzer.add_file("demo.xj");
    let span = span_in(file);

    let mut module = Module::new("demo", file);
    let name = module.make_name_def("NARROW", span);
    let value = module.make_number("300", span);
    let anno = module.make_bits_annotation(Signedness::Unsigned, 4, span);
    module.make_constant_def(name, Some(anno), value, span);

    let err = analyzer.check(&mut module).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Inference);
    let rendered = analyzer.format_error(&err);
    assert!(rendered.contains("Type mismatch"), "{}", rendered);
    assert!(rendered.contains("demo.xj:"), "{}", rendered);
}

#[test]
fn test_analyzer_shares_file_table_across_modules() {
    let mut analyzer = Analyzer::new();
    let file_a = analyzer.add_file("a.xj");
    let file_b = analyzer.add_file("b.xj");

    let mut good = Module::new("a", file_a);
    let span_a = span_in(file_a);
    let g_name = good.make_name_def("G", span_a);
    let g_value = good.make_number("1", span_a);
    good.make_constant_def(g_name, None, g_value, span_a);
    assert!(analyzer.check(&mut good).is_ok());

    let mut bad = Module::new("b", file_b);
    let span_b = span_in(file_b);
    let b_name = bad.make_name_def("B", span_b);
    let b_value = bad.make_number("9", span_b);
    let anno = bad.make_bits_annotation(Signedness::Unsigned, 2, span_b);
    bad.make_constant_def(b_name, Some(anno), b_value, span_b);

    let err = analyzer.check(&mut bad).unwrap_err();
    let rendered = analyzer.format_error(&err);
    assert!(rendered.contains("b.xj:"), "{}", rendered);
}

#[test]
fn test_check_with_options_disables_warnings() {
    let mut analyzer = Analyzer::new();
    let file = analyzer.add_file("demo.xj");
    let span = span_in(file);

    let mut module = Module::new("demo", file);
    let name = module.make_name_def("lower", span);
    let value = module.make_number("1", span);
    module.make_constant_def(name, None, value, span);

    let options = CheckOptions {
        warn_naming: false,
        ..CheckOptions::default()
    };
    let info = analyzer.check_with_options(&mut module, &options).unwrap();
    assert!(info.warnings().is_empty());
}

#[test]
fn test_full_pipeline_function_call() {
    let mut analyzer = Analyzer::new();
    let file = analyzer.add_file("demo.xj");
    let span = span_in(file);

    // fn double(x: u16) -> u16 { x + x }; const D = double(7);
    let mut module = Module::new("demo", file);
    let u16_anno = module.make_bits_annotation(Signedness::Unsigned, 16, span);
    let x_name = module.make_name_def("x", span);
    let x_param = module.make_param(x_name, u16_anno, span);
    let lhs = module.make_name_ref(x_name, span);
    let rhs = module.make_name_ref(x_name, span);
    let sum = module.make_binop(BinopKind::Add, lhs, rhs, span);
    let body = module.make_statement_block(vec![sum], false, span);
    let f_name = module.make_name_def("double", span);
    module.make_function(f_name, vec![x_param], Some(u16_anno), body, false, span);

    let callee = module.make_name_ref(f_name, span);
    let arg = module.make_number("7", span);
    let call = module.make_invocation(callee, vec![arg], span);
    let d_name = module.make_name_def("D", span);
    let d_def = module.make_constant_def(d_name, None, call, span);

    let info = analyzer.check(&mut module).unwrap();
    assert_eq!(info.type_of(arg), Some(&ConcreteType::ubits(16)));
    assert_eq!(info.type_of(call), Some(&ConcreteType::ubits(16)));
    assert_eq!(info.type_of(d_def), Some(&ConcreteType::ubits(16)));
    assert_eq!(info.len(), info.iter().count());
}

#[test]
fn test_version_constants() {
    assert!(!xuanji::VERSION.is_empty());
    assert!(xuanji::NAME.contains("XuanJi"));
}
