//! Vue 单文件组件切分
//!
//! 把 `.vue` 文件拆成 template 区域和至多一个 script 区域，
//! 每个区域记录在原文件中的字节范围，供重写完成后按偏移拼回整个文件。

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

/// 文件内的一个子区域
#[derive(Debug, Clone)]
pub struct Region {
    /// 区域内容（不含包裹标签）
    pub content: String,
    /// 区域在原文件中的起始字节偏移
    pub start: usize,
    /// 区域在原文件中的结束字节偏移
    pub end: usize,
}

/// 一个待处理的源文件
///
/// 每个输入文件创建一次，重写提交后即丢弃。
#[derive(Debug)]
pub struct SourceDocument {
    pub path: PathBuf,
    /// 原始文件内容，处理期间保持不变
    pub content: String,
    pub template: Option<Region>,
    pub script: Option<Region>,
}

fn builtin_regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("内置正则表达式无效")
}

fn template_block_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // 贪婪匹配到最后一个 </template>，嵌套的 <template #slot> 不会提前截断
    RE.get_or_init(|| builtin_regex(r"(?s)<template[^>]*>(.*)</template>"))
}

fn script_block_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // 惰性匹配到第一个 </script>，<script> 与 <script setup> 同等对待
    RE.get_or_init(|| builtin_regex(r"(?s)<script[^>]*>(.*?)</script>"))
}

/// 切分一个 Vue 单文件组件
pub fn parse_sfc(path: &Path, content: String) -> SourceDocument {
    // 脚本字符串里出现 "</template>" 字样会把贪婪匹配拖进脚本区，
    // 所以 template 先在第一个 <script 之前的范围内找；
    // 那里找不到（比如 script 写在前面）再退回全文
    let bound = content.find("<script").unwrap_or(content.len());
    let template = template_block_regex()
        .captures(&content[..bound])
        .or_else(|| template_block_regex().captures(&content))
        .and_then(|caps| {
            caps.get(1).map(|m| Region {
                content: m.as_str().to_string(),
                start: m.start(),
                end: m.end(),
            })
        });

    let script = script_block_regex().captures(&content).and_then(|caps| {
        caps.get(1).map(|m| Region {
            content: m.as_str().to_string(),
            start: m.start(),
            end: m.end(),
        })
    });

    SourceDocument {
        path: path.to_path_buf(),
        content,
        template,
        script,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const SAMPLE: &str = "<template>\n  <div>你好</div>\n</template>\n\n<script setup lang=\"ts\">\nconst msg = \"你好\";\n</script>\n";

    #[test]
    fn splits_template_and_script_regions() {
        let doc = parse_sfc(&PathBuf::from("sample.vue"), SAMPLE.to_string());

        let template = doc.template.expect("template region");
        assert_eq!(template.content, "\n  <div>你好</div>\n");

        let script = doc.script.expect("script region");
        assert_eq!(script.content, "\nconst msg = \"你好\";\n");
    }

    #[test]
    fn region_offsets_index_into_original_content() {
        let doc = parse_sfc(&PathBuf::from("sample.vue"), SAMPLE.to_string());

        for region in [doc.template.as_ref(), doc.script.as_ref()].into_iter().flatten() {
            assert_eq!(&doc.content[region.start..region.end], region.content);
        }
    }

    #[test]
    fn template_match_is_greedy_across_nested_templates() {
        let content = "<template>\n  <template #header>标题</template>\n</template>\n";
        let doc = parse_sfc(&PathBuf::from("nested.vue"), content.to_string());
        let template = doc.template.expect("template region");
        assert!(template.content.contains("#header"));
        assert!(template.content.trim_end().ends_with("</template>"));
    }

    #[test]
    fn script_strings_mentioning_template_tags_do_not_extend_the_region() {
        let content =
            "<template><p>文字</p></template>\n<script>\nconst s = \"</template>\";\n</script>\n";
        let doc = parse_sfc(&PathBuf::from("tricky.vue"), content.to_string());

        let template = doc.template.expect("template region");
        assert_eq!(template.content, "<p>文字</p>");

        let script = doc.script.expect("script region");
        assert!(script.start >= template.end, "regions must not overlap");
    }

    #[test]
    fn script_before_template_still_finds_the_template() {
        let content = "<script>\nconst n = 1;\n</script>\n<template><p>文字</p></template>\n";
        let doc = parse_sfc(&PathBuf::from("reversed.vue"), content.to_string());
        let template = doc.template.expect("template region");
        assert_eq!(template.content, "<p>文字</p>");
    }

    #[test]
    fn script_only_or_template_only_files_are_partial() {
        let doc = parse_sfc(
            &PathBuf::from("plain.vue"),
            "<template><p>文字</p></template>".to_string(),
        );
        assert!(doc.template.is_some());
        assert!(doc.script.is_none());
    }
}
