//! # 解析器模块
//!
//! 把输入文件切分成匹配器可以处理的区域：
//!
//! - `sfc` - Vue 单文件组件切分（template / script 区域及其字节偏移）
//!
//! 嵌入脚本的语法解析交给 swc，见 `crate::matchers::script`。

pub mod sfc;

pub use sfc::{parse_sfc, Region, SourceDocument};
