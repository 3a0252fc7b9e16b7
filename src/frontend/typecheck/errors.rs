//! 错误收集和报告
//!
//! 定义类型推断过程中的所有错误与警告类型

use crate::util::span::{FileTable, Span};
use thiserror::Error;

/// 错误类别
///
/// 对外 API 的一部分：调用方按类别区分「类型错误」「参数个数错误」
/// 「尚未支持」与「内部不变量被破坏」
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 类型推断错误
    Inference,
    /// 实参个数不匹配
    ArgCount,
    /// 功能被识别但尚未支持
    NotSupported,
    /// 推断器内部不变量被破坏
    Internal,
}

/// 类型错误
///
/// 推断在第一个错误处停止，错误不做批量累积
#[derive(Debug, Error, Clone)]
pub enum TypeError {
    /// 类型不匹配错误
    #[error("Type mismatch: expected `{expected}`, found `{found}`")]
    TypeMismatch {
        expected: String,
        found: String,
        span: Span,
    },

    /// 实参个数不匹配错误
    #[error("Expected {expected} argument(s) but got {found}")]
    ArityMismatch {
        expected: usize,
        found: usize,
        span: Span,
    },

    /// 被调用者不是函数
    #[error("Invocation callee `{callee}` is not a function")]
    CalleeNotFunction { callee: String, span: Span },

    /// 空数组带省略号
    #[error("Array cannot have an ellipsis (`...`) without an element to repeat")]
    EllipsisOnEmptyArray { span: Span },

    /// 字面量文本非法或超出可表示范围
    #[error("Invalid number literal `{text}`")]
    InvalidLiteral { text: String, span: Span },

    /// 无法为目标推断出类型
    #[error("Could not infer a type for `{target}`")]
    CannotInfer { target: String, span: Span },

    /// 类型定义依赖自身
    #[error("Type of `{name}` depends on itself")]
    RecursiveType { name: String, span: Span },

    /// 类型推断错误（其余情形）
    #[error("Inference error: {message}")]
    InferenceError { message: String, span: Span },

    /// 功能被识别但尚未支持
    #[error("Not yet supported: {feature}")]
    NotSupported { feature: String, span: Span },

    /// 推断器内部错误（填表阶段的不变量被破坏）
    #[error("Internal inference error: {message}")]
    Internal { message: String, span: Span },
}

impl TypeError {
    /// 获取错误的位置
    pub fn span(&self) -> Span {
        match self {
            TypeError::TypeMismatch { span, .. } => *span,
            TypeError::ArityMismatch { span, .. } => *span,
            TypeError::CalleeNotFunction { span, .. } => *span,
            TypeError::EllipsisOnEmptyArray { span } => *span,
            TypeError::InvalidLiteral { span, .. } => *span,
            TypeError::CannotInfer { span, .. } => *span,
            TypeError::RecursiveType { span, .. } => *span,
            TypeError::InferenceError { span, .. } => *span,
            TypeError::NotSupported { span, .. } => *span,
            TypeError::Internal { span, .. } => *span,
        }
    }

    /// 获取错误类别
    pub fn category(&self) -> ErrorCategory {
        match self {
            TypeError::TypeMismatch { .. } => ErrorCategory::Inference,
            TypeError::ArityMismatch { .. } => ErrorCategory::ArgCount,
            TypeError::CalleeNotFunction { .. } => ErrorCategory::Inference,
            TypeError::EllipsisOnEmptyArray { .. } => ErrorCategory::Inference,
            TypeError::InvalidLiteral { .. } => ErrorCategory::Inference,
            TypeError::CannotInfer { .. } => ErrorCategory::Inference,
            TypeError::RecursiveType { .. } => ErrorCategory::Inference,
            TypeError::InferenceError { .. } => ErrorCategory::Inference,
            TypeError::NotSupported { .. } => ErrorCategory::NotSupported,
            TypeError::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// 创建类型不匹配错误
    pub fn type_mismatch(
        expected: impl Into<String>,
        found: impl Into<String>,
        span: Span,
    ) -> Self {
        TypeError::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
            span,
        }
    }

    /// 创建实参个数不匹配错误
    pub fn arity_mismatch(
        expected: usize,
        found: usize,
        span: Span,
    ) -> Self {
        TypeError::ArityMismatch {
            expected,
            found,
            span,
        }
    }

    /// 创建尚未支持错误
    pub fn not_supported(
        feature: impl Into<String>,
        span: Span,
    ) -> Self {
        TypeError::NotSupported {
            feature: feature.into(),
            span,
        }
    }

    /// 创建无法推断错误
    pub fn cannot_infer(
        target: impl Into<String>,
        span: Span,
    ) -> Self {
        TypeError::CannotInfer {
            target: target.into(),
            span,
        }
    }

    /// 创建内部错误
    pub fn internal(
        message: impl Into<String>,
        span: Span,
    ) -> Self {
        TypeError::Internal {
            message: message.into(),
            span,
        }
    }
}

/// 类型推断结果
pub type TypeResult<T> = Result<T, TypeError>;

/// 警告
///
/// 警告不会中止推断
#[derive(Debug, Error, Clone)]
pub enum Warning {
    /// 常量命名不符合 SCREAMING_SNAKE_CASE
    #[error("Constant name `{name}` should be SCREAMING_SNAKE_CASE")]
    ConstantNaming { name: String, span: Span },

    /// 函数命名不符合 snake_case
    #[error("Function name `{name}` should be snake_case")]
    FunctionNaming { name: String, span: Span },
}

impl Warning {
    /// 获取警告的位置
    pub fn span(&self) -> Span {
        match self {
            Warning::ConstantNaming { span, .. } => *span,
            Warning::FunctionNaming { span, .. } => *span,
        }
    }
}

/// 警告收集器
///
/// 错误走 `Result` 即停，警告在此累积
#[derive(Debug, Default)]
pub struct WarningCollector {
    /// 警告列表
    warnings: Vec<Warning>,
}

impl WarningCollector {
    /// 创建新的警告收集器
    pub fn new() -> Self {
        WarningCollector {
            warnings: Vec::new(),
        }
    }

    /// 添加警告
    pub fn add_warning(
        &mut self,
        warning: Warning,
    ) {
        self.warnings.push(warning);
    }

    /// 检查是否有警告
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// 获取警告数量
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// 获取所有警告
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// 消耗收集器，获取所有警告
    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }

    /// 清空所有警告
    pub fn clear(&mut self) {
        self.warnings.clear();
    }
}

/// 诊断信息
///
/// 面向嵌入方（驱动器、语言服务）的统一诊断载体
#[derive(Debug)]
pub struct Diagnostic {
    /// 严重程度
    pub severity: Severity,
    /// 错误代码
    pub code: String,
    /// 消息
    pub message: String,
    /// 位置
    pub span: Span,
}

impl Diagnostic {
    /// 创建错误诊断
    pub fn error(
        code: String,
        message: String,
        span: Span,
    ) -> Self {
        Diagnostic {
            severity: Severity::Error,
            code,
            message,
            span,
        }
    }

    /// 创建警告诊断
    pub fn warning(
        code: String,
        message: String,
        span: Span,
    ) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            code,
            message,
            span,
        }
    }
}

/// 诊断严重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

/// 从错误生成诊断
impl From<TypeError> for Diagnostic {
    fn from(error: TypeError) -> Self {
        let span = error.span();
        match &error {
            TypeError::TypeMismatch { .. } => {
                Diagnostic::error("E0001".to_string(), format!("{}", error), span)
            },
            TypeError::ArityMismatch { .. } => {
                Diagnostic::error("E0002".to_string(), format!("{}", error), span)
            },
            TypeError::CalleeNotFunction { .. } => {
                Diagnostic::error("E0003".to_string(), format!("{}", error), span)
            },
            TypeError::EllipsisOnEmptyArray { .. } => {
                Diagnostic::error("E0004".to_string(), format!("{}", error), span)
            },
            TypeError::InvalidLiteral { .. } => {
                Diagnostic::error("E0005".to_string(), format!("{}", error), span)
            },
            TypeError::CannotInfer { .. } => {
                Diagnostic::error("E0006".to_string(), format!("{}", error), span)
            },
            TypeError::RecursiveType { .. } => {
                Diagnostic::error("E0007".to_string(), format!("{}", error), span)
            },
            TypeError::InferenceError { .. } => {
                Diagnostic::error("E0008".to_string(), format!("{}", error), span)
            },
            TypeError::NotSupported { .. } => {
                Diagnostic::error("E0009".to_string(), format!("{}", error), span)
            },
            TypeError::Internal { .. } => {
                Diagnostic::error("E0010".to_string(), format!("{}", error), span)
            },
        }
    }
}

/// 从警告生成诊断
impl From<&Warning> for Diagnostic {
    fn from(warning: &Warning) -> Self {
        let span = warning.span();
        match warning {
            Warning::ConstantNaming { .. } => {
                Diagnostic::warning("W0001".to_string(), format!("{}", warning), span)
            },
            Warning::FunctionNaming { .. } => {
                Diagnostic::warning("W0002".to_string(), format!("{}", warning), span)
            },
        }
    }
}

/// 错误格式化器
///
/// 借助文件表把跨度渲染成 `path:line:col` 形式
#[derive(Debug)]
pub struct ErrorFormatter<'a> {
    /// 文件表
    files: &'a FileTable,
    /// 是否显示位置信息
    verbose: bool,
}

impl<'a> ErrorFormatter<'a> {
    /// 创建新的错误格式化器
    pub fn new(
        files: &'a FileTable,
        verbose: bool,
    ) -> Self {
        ErrorFormatter { files, verbose }
    }

    /// 格式化单个错误
    pub fn format_error(
        &self,
        error: &TypeError,
    ) -> String {
        if self.verbose {
            format!("{} at {}", error, error.span().display_with(self.files))
        } else {
            format!("{}", error)
        }
    }

    /// 格式化单个警告
    pub fn format_warning(
        &self,
        warning: &Warning,
    ) -> String {
        if self.verbose {
            format!(
                "warning: {} at {}",
                warning,
                warning.span().display_with(self.files)
            )
        } else {
            format!("warning: {}", warning)
        }
    }

    /// 格式化所有警告
    pub fn format_warnings(
        &self,
        warnings: &[Warning],
    ) -> Vec<String> {
        warnings.iter().map(|w| self.format_warning(w)).collect()
    }
}
