//! 文档管线模块
//!
//! 按文件驱动匹配、key 生成和区间重写，产出最终文件内容。
//! 两条管线：Vue 单文件组件走 template + script 复合管线，
//! 纯 TS/JS 文件走 script 专用管线。

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::core::ExtractResult;
use crate::dictionary::TranslationDictionary;
use crate::matchers::{MarkupMatcher, ScriptMatcher};
use crate::parsers::SourceDocument;
use crate::rewriter::{apply_replacements, Replacement};

const I18N_IMPORT: &str = "import { useI18n } from \"vue-i18n\";";
const I18N_ACCESSOR: &str = "const { t } = useI18n();";

fn import_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^import\s[^\n]*$").expect("内置正则表达式无效"))
}

/// 复合管线：处理一个 Vue 单文件组件
///
/// 返回 `Some(新内容)` 表示需要回写；`None` 表示文件原样保留，
/// 调用方不应打开它写入。
pub fn process_vue(
    doc: &SourceDocument,
    dict: &mut TranslationDictionary,
) -> ExtractResult<Option<String>> {
    let mut region_edits: Vec<Replacement> = Vec::new();

    if let Some(template) = &doc.template {
        let rewritten = MarkupMatcher::new(&doc.path, dict).rewrite(&template.content);
        if rewritten != template.content {
            region_edits.push(Replacement {
                start: template.start,
                end: template.end,
                text: rewritten,
            });
        }
    }

    if let Some(script) = &doc.script {
        let edits = ScriptMatcher::new(&doc.path, dict).collect(&script.content)?;
        if !edits.is_empty() {
            let rewritten = apply_replacements(&script.content, edits);
            region_edits.push(Replacement {
                start: script.start,
                end: script.end,
                text: inject_i18n_accessor(&rewritten),
            });
        }
    }

    if region_edits.is_empty() {
        debug!(path = %doc.path.display(), "未发现可提取文案，保持原样");
        return Ok(None);
    }
    // 区域互不重叠，按偏移从后往前拼回整个文件
    Ok(Some(apply_replacements(&doc.content, region_edits)))
}

/// script 专用管线：处理一个纯 TS/JS 文件
pub fn process_script(
    path: &Path,
    content: &str,
    dict: &mut TranslationDictionary,
) -> ExtractResult<Option<String>> {
    let edits = ScriptMatcher::new(path, dict).collect(content)?;
    if edits.is_empty() {
        debug!(path = %path.display(), "未发现可提取文案，保持原样");
        return Ok(None);
    }
    let rewritten = apply_replacements(content, edits);
    Ok(Some(inject_i18n_accessor(&rewritten)))
}

/// 注入翻译函数访问器
///
/// 在最后一条顶层 import 之后插入 vue-i18n 的引入和 `t` 的初始化，
/// 没有 import 时插在最前面。每个文件至多注入一次：检测靠
/// `useI18n` / `vue-i18n` 子串——这是刻意的快速路径，带别名或
/// 换行的既有引入不会被识别，可能导致重复注入（记录在案的取舍）。
pub fn inject_i18n_accessor(script: &str) -> String {
    if script.contains("useI18n") || script.contains("vue-i18n") {
        return script.to_string();
    }

    match import_line_regex().find_iter(script).last() {
        Some(last_import) => {
            let at = last_import.end();
            format!(
                "{}\n{}\n{}{}",
                &script[..at],
                I18N_IMPORT,
                I18N_ACCESSOR,
                &script[at..]
            )
        }
        None => format!("{}\n{}\n{}", I18N_IMPORT, I18N_ACCESSOR, script),
    }
}
