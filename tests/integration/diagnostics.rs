//! Diagnostic rendering integration tests
//!
//! Message texts and diagnostic codes are part of the public contract;
//! embedders match on them.

use xuanji::frontend::typecheck::{
    Diagnostic, ErrorCategory, ErrorFormatter, Severity, TypeError, Warning,
};
use xuanji::util::span::{FileTable, Position, Span};

fn sample_span() -> (FileTable, Span) {
    let mut files = FileTable::new();
    let file = files.intern("diag.xj");
    let span = Span::new(file, Position::new(2, 7), Position::new(2, 10));
    (files, span)
}

#[test]
fn test_error_messages_are_stable() {
    let (_, span) = sample_span();
    let cases: Vec<(TypeError, &str)> = vec![
        (
            TypeError::type_mismatch("u4", "u9", span),
            "Type mismatch: expected `u4`, found `u9`",
        ),
        (
            TypeError::arity_mismatch(2, 1, span),
            "Expected 2 argument(s) but got 1",
        ),
        (
            TypeError::CalleeNotFunction {
                callee: "WIDTH".to_string(),
                span,
            },
            "Invocation callee `WIDTH` is not a function",
        ),
        (
            TypeError::EllipsisOnEmptyArray { span },
            "Array cannot have an ellipsis (`...`) without an element to repeat",
        ),
        (
            TypeError::InvalidLiteral {
                text: "0xZZ".to_string(),
                span,
            },
            "Invalid number literal `0xZZ`",
        ),
        (
            TypeError::cannot_infer("A", span),
            "Could not infer a type for `A`",
        ),
        (
            TypeError::RecursiveType {
                name: "X".to_string(),
                span,
            },
            "Type of `X` depends on itself",
        ),
        (
            TypeError::not_supported("parametric functions", span),
            "Not yet supported: parametric functions",
        ),
    ];
    for (error, expected) in cases {
        assert_eq!(error.to_string(), expected);
    }
}

#[test]
fn test_error_categories() {
    let (_, span) = sample_span();
    assert_eq!(
        TypeError::type_mismatch("u4", "u9", span).category(),
        ErrorCategory::Inference
    );
    assert_eq!(
        TypeError::arity_mismatch(2, 1, span).category(),
        ErrorCategory::ArgCount
    );
    assert_eq!(
        TypeError::not_supported("arrays", span).category(),
        ErrorCategory::NotSupported
    );
    assert_eq!(
        TypeError::internal("table corrupt", span).category(),
        ErrorCategory::Internal
    );
}

#[test]
fn test_formatter_verbose_appends_location() {
    let (files, span) = sample_span();
    let error = TypeError::type_mismatch("u4", "u9", span);

    let verbose = ErrorFormatter::new(&files, true).format_error(&error);
    assert_eq!(
        verbose,
        "Type mismatch: expected `u4`, found `u9` at diag.xj:2:7-2:10"
    );

    let terse = ErrorFormatter::new(&files, false).format_error(&error);
    assert_eq!(terse, "Type mismatch: expected `u4`, found `u9`");
}

#[test]
fn test_formatter_renders_warnings() {
    let (files, span) = sample_span();
    let warning = Warning::ConstantNaming {
        name: "width".to_string(),
        span,
    };

    let rendered = ErrorFormatter::new(&files, false).format_warning(&warning);
    assert_eq!(
        rendered,
        "warning: Constant name `width` should be SCREAMING_SNAKE_CASE"
    );

    let all = ErrorFormatter::new(&files, false).format_warnings(&[warning]);
    assert_eq!(all.len(), 1);
}

#[test]
fn test_diagnostic_from_error() {
    let (_, span) = sample_span();
    let diagnostic = Diagnostic::from(TypeError::type_mismatch("u4", "u9", span));
    assert_eq!(diagnostic.severity, Severity::Error);
    assert_eq!(diagnostic.code, "E0001");
    assert!(diagnostic.message.contains("expected `u4`"));

    let diagnostic = Diagnostic::from(TypeError::arity_mismatch(2, 1, span));
    assert_eq!(diagnostic.code, "E0002");

    let diagnostic = Diagnostic::from(TypeError::internal("bad table", span));
    assert_eq!(diagnostic.code, "E0010");
}

#[test]
fn test_diagnostic_from_warning() {
    let (_, span) = sample_span();
    let warning = Warning::FunctionNaming {
        name: "MixedCase".to_string(),
        span,
    };
    let diagnostic = Diagnostic::from(&warning);
    assert_eq!(diagnostic.severity, Severity::Warning);
    assert_eq!(diagnostic.code, "W0002");
    assert!(diagnostic.message.contains("MixedCase"));
}
