//! 类型检查器测试模块

mod table;
