//! # i18n-extract
//!
//! 从 Vue/TS 源码中提取中文文案、就地改写为运行时翻译调用，
//! 并把 key → 文案 累积到可持久化的翻译字典里。
//!
//! ## 模块组织
//!
//! - `core` - 错误类型与批次编排
//! - `keygen` - 翻译 key 生成
//! - `matchers` - 文案定位与排除规则（template 正则级联 / script AST 遍历）
//! - `rewriter` - 基于字节偏移的区间重写
//! - `dictionary` - 翻译字典的加载、合并与持久化
//! - `parsers` - Vue 单文件组件切分
//! - `pipeline` - 按文件驱动整套流程的文档管线

pub mod core;
pub mod dictionary;
pub mod keygen;
pub mod matchers;
pub mod parsers;
pub mod pipeline;
pub mod rewriter;

// 常用项在根上重导出
pub use crate::core::{run_batch, BatchSummary, ExtractError, ExtractOptions, ExtractResult};
pub use crate::dictionary::TranslationDictionary;
pub use crate::keygen::generate_key;
pub use crate::parsers::{parse_sfc, SourceDocument};
pub use crate::pipeline::{process_script, process_vue};
pub use crate::rewriter::{apply_replacements, Replacement};
