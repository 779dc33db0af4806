//! template 侧匹配与改写
//!
//! 对 template 区域执行一个有序的正则级联：每一级都在上一级输出的
//! 字符串上做一次完整扫描，偏移因此始终相对当前缓冲区有效，代价是
//! 每一级都必须通过幂等守卫跳过已经包裹成 `$t(...)` 的内容。
//!
//! 级联顺序：
//! 1. 普通属性中的中文字面量 → `:attr="$t('key')"`
//! 2. 带插值的属性值 → `:attr="$t('key', [表达式...])"`，占位符按序编号
//! 3. 绑定/事件属性值里的引号字面量 → 逐个替换为 `$t('key')`
//! 4. 插值块内部的引号字面量 → 原位替换为 `$t('key')`
//! 5. 文字与插值混排的正文 → 折叠为单个 `{{ $t("key", [表达式...]) }}`
//! 6. 残余的标签间中文正文 → 整体替换为 `{{ $t("key") }}`

use std::path::Path;
use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::dictionary::TranslationDictionary;
use crate::keygen::generate_key;
use crate::matchers::{contains_cjk, in_html_comment};

fn builtin_regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("内置正则表达式无效")
}

/// 普通属性：`\s name="值"`；动态绑定和事件属性（`:`/`@` 前缀）
/// 因名字首字符不在字符类内而天然不命中
fn static_attr_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| builtin_regex(r#"(\s)([a-zA-Z][a-zA-Z0-9-]*)=(?:"([^"]*)"|'([^']*)')"#))
}

/// 绑定/事件属性：`:x`、`@x`、`v-bind:x`、`v-on:x` 及其他 `v-*` 指令
fn bound_attr_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        builtin_regex(r#"(\s)((?:[:@]|v-)[a-zA-Z][a-zA-Z0-9:._-]*)=(?:"([^"]*)"|'([^']*)')"#)
    })
}

fn interpolation_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| builtin_regex(r"(?s)\{\{(.*?)\}\}"))
}

/// 标签边界之间的一段正文
///
/// 区域首尾也是边界：紧贴 `<template>` 开闭标签的正文没有自己的
/// `>`/`<` 包裹，靠 `^`/`$` 锚命中，替换时按实际捕获到的边界回填。
fn body_segment_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| builtin_regex(r"(>|^)([^<]*)(<|$)"))
}

fn single_quoted_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| builtin_regex(r"'([^']*)'"))
}

fn double_quoted_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| builtin_regex(r#""([^"]*)""#))
}

/// 把一段含插值的文本拆成占位符文本和表达式列表
///
/// `共{{count}}条` → (`共{0}条`, `["count"]`)；不含插值时返回 None。
fn split_interpolations(segment: &str) -> Option<(String, Vec<String>)> {
    let mut text = String::new();
    let mut exprs: Vec<String> = Vec::new();
    let mut cursor = 0;

    for caps in interpolation_regex().captures_iter(segment) {
        if let (Some(whole), Some(expr)) = (caps.get(0), caps.get(1)) {
            text.push_str(&segment[cursor..whole.start()]);
            text.push('{');
            text.push_str(&exprs.len().to_string());
            text.push('}');
            exprs.push(expr.as_str().trim().to_string());
            cursor = whole.end();
        }
    }

    if exprs.is_empty() {
        return None;
    }
    text.push_str(&segment[cursor..]);
    Some((text, exprs))
}

fn match_start(caps: &Captures) -> usize {
    caps.get(0).map(|m| m.start()).unwrap_or(0)
}

fn whole_match(caps: &Captures) -> String {
    caps.get(0).map(|m| m.as_str()).unwrap_or_default().to_string()
}

/// template 侧匹配器
///
/// 持有文件路径（决定 key 前缀）和整个批次共享的字典。
pub struct MarkupMatcher<'a> {
    file_path: &'a Path,
    dict: &'a mut TranslationDictionary,
}

impl<'a> MarkupMatcher<'a> {
    pub fn new(file_path: &'a Path, dict: &'a mut TranslationDictionary) -> Self {
        Self { file_path, dict }
    }

    /// 对 template 区域跑完整个级联，返回改写后的字符串
    pub fn rewrite(&mut self, template: &str) -> String {
        let buf = self.rewrite_static_attrs(template);
        let buf = self.rewrite_template_attrs(&buf);
        let buf = self.rewrite_bound_attr_literals(&buf);
        let buf = self.rewrite_interpolation_literals(&buf);
        let buf = self.rewrite_mixed_body(&buf);
        self.rewrite_bare_body(&buf)
    }

    /// 生成 key 并登记到字典
    fn claim(&mut self, text: &str) -> String {
        let key = generate_key(text, self.file_path);
        self.dict.insert(key.clone(), text.to_string());
        key
    }

    /// 级联第 1 级：普通属性中的中文字面量
    fn rewrite_static_attrs(&mut self, buf: &str) -> String {
        static_attr_regex()
            .replace_all(buf, |caps: &Captures| {
                let space = &caps[1];
                let name = &caps[2];
                let value = caps
                    .get(3)
                    .or_else(|| caps.get(4))
                    .map(|m| m.as_str())
                    .unwrap_or("");

                // v-* 指令值是表达式，留给第 3 级；带插值的值留给第 2 级
                if name.starts_with("v-")
                    || !contains_cjk(value)
                    || value.contains("{{")
                    || value.contains("$t(")
                    || in_html_comment(buf, match_start(caps))
                {
                    return whole_match(caps);
                }

                let key = self.claim(value);
                format!("{}:{}=\"$t('{}')\"", space, name, key)
            })
            .into_owned()
    }

    /// 级联第 2 级：插值模板属性值
    fn rewrite_template_attrs(&mut self, buf: &str) -> String {
        static_attr_regex()
            .replace_all(buf, |caps: &Captures| {
                let space = &caps[1];
                let name = &caps[2];
                let value = caps
                    .get(3)
                    .or_else(|| caps.get(4))
                    .map(|m| m.as_str())
                    .unwrap_or("");

                if name.starts_with("v-")
                    || !value.contains("{{")
                    || value.contains("$t(")
                    || in_html_comment(buf, match_start(caps))
                {
                    return whole_match(caps);
                }
                let Some((text, exprs)) = split_interpolations(value) else {
                    return whole_match(caps);
                };
                if !contains_cjk(&text) {
                    return whole_match(caps);
                }

                let key = self.claim(&text);
                format!("{}:{}=\"$t('{}', [{}])\"", space, name, key, exprs.join(", "))
            })
            .into_owned()
    }

    /// 级联第 3 级：绑定/事件属性值里的引号字面量
    fn rewrite_bound_attr_literals(&mut self, buf: &str) -> String {
        bound_attr_regex()
            .replace_all(buf, |caps: &Captures| {
                let space = &caps[1];
                let name = &caps[2];
                let (value, outer_quote) = match (caps.get(3), caps.get(4)) {
                    (Some(v), _) => (v.as_str(), '"'),
                    (None, Some(v)) => (v.as_str(), '\''),
                    (None, None) => return whole_match(caps),
                };

                if !contains_cjk(value) || in_html_comment(buf, match_start(caps)) {
                    return whole_match(caps);
                }

                // 外层引号决定内层字面量用哪种引号
                let (inner, quote) = if outer_quote == '"' {
                    (single_quoted_regex(), '\'')
                } else {
                    (double_quoted_regex(), '"')
                };
                let rewritten = self.rewrite_quoted_literals(inner, quote, value);
                if rewritten == value {
                    return whole_match(caps);
                }
                format!("{}{}={}{}{}", space, name, outer_quote, rewritten, outer_quote)
            })
            .into_owned()
    }

    /// 级联第 4 级：插值块内部的引号字面量
    fn rewrite_interpolation_literals(&mut self, buf: &str) -> String {
        interpolation_regex()
            .replace_all(buf, |caps: &Captures| {
                let expr = &caps[1];
                if !contains_cjk(expr) || in_html_comment(buf, match_start(caps)) {
                    return whole_match(caps);
                }

                let rewritten = self.rewrite_quoted_literals(single_quoted_regex(), '\'', expr);
                let rewritten =
                    self.rewrite_quoted_literals(double_quoted_regex(), '"', &rewritten);

                let mut out = String::from("{{");
                out.push_str(&rewritten);
                out.push_str("}}");
                out
            })
            .into_owned()
    }

    /// 级联第 5 级：文字与插值混排的正文
    fn rewrite_mixed_body(&mut self, buf: &str) -> String {
        body_segment_regex()
            .replace_all(buf, |caps: &Captures| {
                let open = &caps[1];
                let segment = &caps[2];
                let close = &caps[3];
                if !segment.contains("{{")
                    || segment.contains("$t(")
                    || in_html_comment(buf, match_start(caps))
                {
                    return whole_match(caps);
                }
                let Some((text, exprs)) = split_interpolations(segment) else {
                    return whole_match(caps);
                };
                if !contains_cjk(&text) {
                    return whole_match(caps);
                }

                let lead = &segment[..segment.len() - segment.trim_start().len()];
                let trail = &segment[segment.trim_end().len()..];
                let key = self.claim(text.trim());
                format!(
                    "{}{}{{{{ $t(\"{}\", [{}]) }}}}{}{}",
                    open,
                    lead,
                    key,
                    exprs.join(", "),
                    trail,
                    close
                )
            })
            .into_owned()
    }

    /// 级联第 6 级：残余的标签间中文正文
    fn rewrite_bare_body(&mut self, buf: &str) -> String {
        body_segment_regex()
            .replace_all(buf, |caps: &Captures| {
                let open = &caps[1];
                let segment = &caps[2];
                let close = &caps[3];
                if segment.contains("{{")
                    || segment.contains("$t(")
                    || !contains_cjk(segment)
                    || in_html_comment(buf, match_start(caps))
                {
                    return whole_match(caps);
                }

                let lead = &segment[..segment.len() - segment.trim_start().len()];
                let trail = &segment[segment.trim_end().len()..];
                let key = self.claim(segment.trim());
                format!("{}{}{{{{ $t(\"{}\") }}}}{}{}", open, lead, key, trail, close)
            })
            .into_owned()
    }

    /// 把表达式文本里的中文引号字面量逐个替换为 `$t(...)`
    ///
    /// 含花括号的字面量视为对象/模板片段，跳过；紧跟在 `$t(` 之后的
    /// 字面量是上一轮的产物，跳过以保证幂等。
    fn rewrite_quoted_literals(&mut self, re: &Regex, quote: char, expr: &str) -> String {
        re.replace_all(expr, |caps: &Captures| {
            let literal = &caps[1];
            if !contains_cjk(literal) || literal.contains('{') || literal.contains('}') {
                return whole_match(caps);
            }
            if expr[..match_start(caps)].ends_with("$t(") {
                return whole_match(caps);
            }
            let key = self.claim(literal);
            format!("$t({}{}{})", quote, key, quote)
        })
        .into_owned()
    }
}
