//! # 匹配器模块
//!
//! 定位可提取的文案并排除不应翻译的位置：
//!
//! - `markup` - 基于正则级联的 template 侧匹配与改写
//! - `script` - 基于 swc AST 遍历的 script 侧匹配
//!
//! 两侧共用同一个判定标准：文本中是否出现 CJK 统一表意文字。

pub mod markup;
pub mod script;

pub use markup::MarkupMatcher;
pub use script::ScriptMatcher;

/// 判断文本是否包含需要翻译的字符
///
/// 唯一标准：出现 CJK 统一表意文字区（U+4E00..=U+9FFF）内的码点。
pub fn contains_cjk(text: &str) -> bool {
    text.chars().any(|c| ('\u{4e00}'..='\u{9fff}').contains(&c))
}

/// 判断偏移 `pos` 是否落在 HTML 注释块内
///
/// 对当前缓冲区做文本扫描即可：级联每一级都在自己那版字符串上调用。
pub(crate) fn in_html_comment(buffer: &str, pos: usize) -> bool {
    match buffer[..pos].rfind("<!--") {
        Some(open) => !buffer[open..pos].contains("-->"),
        None => false,
    }
}
