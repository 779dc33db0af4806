//! 区间重写模块
//!
//! 把一次检测得到的若干替换按原始偏移应用到文本缓冲区上

/// 单条替换：半开区间 `[start, end)` 的字节偏移加替换文本
///
/// 偏移相对于本次检测所扫描的那一版缓冲区，缓冲区一旦变化偏移即失效。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

/// 将同一轮检测产出的替换集合应用到缓冲区
///
/// 按起始偏移从后往前替换，前面的偏移不会被后面的伸缩影响。
/// 前置条件：区间互不重叠（由匹配规则的顺序和幂等守卫保证，此处不检查）。
pub fn apply_replacements(buffer: &str, mut edits: Vec<Replacement>) -> String {
    edits.sort_by(|a, b| b.start.cmp(&a.start));

    let mut result = buffer.to_string();
    for edit in edits {
        result = format!("{}{}{}", &result[..edit.start], edit.text, &result[edit.end..]);
    }
    result
}
