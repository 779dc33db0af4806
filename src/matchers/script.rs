//! script 侧匹配器
//!
//! 用 swc 把脚本解析成 AST，遍历字符串字面量和模板字面量两类节点，
//! 产出一组基于节点字节偏移的替换。偏移相对脚本区域缓冲区，
//! 由 `crate::rewriter` 从后往前一次性应用。

use std::path::Path;

use swc_common::sync::Lrc;
use swc_common::{FileName, SourceMap, Span, Spanned};
use swc_ecma_ast::{CallExpr, Callee, Expr, Lit, MemberProp, Str, TaggedTpl, Tpl};
use swc_ecma_parser::{lexer::Lexer, Parser, StringInput, Syntax, TsSyntax};
use swc_ecma_visit::{Visit, VisitWith};

use crate::core::{ExtractError, ExtractResult};
use crate::dictionary::TranslationDictionary;
use crate::keygen::generate_key;
use crate::matchers::contains_cjk;
use crate::rewriter::Replacement;

/// script 侧匹配器
///
/// 注释里的文本不需要显式排除：swc 的 AST 节点不可能落在注释内。
pub struct ScriptMatcher<'a> {
    file_path: &'a Path,
    dict: &'a mut TranslationDictionary,
}

impl<'a> ScriptMatcher<'a> {
    pub fn new(file_path: &'a Path, dict: &'a mut TranslationDictionary) -> Self {
        Self { file_path, dict }
    }

    /// 解析脚本并收集全部替换
    ///
    /// 解析失败会中止整个批次，没有局部恢复。
    pub fn collect(&mut self, source: &str) -> ExtractResult<Vec<Replacement>> {
        let cm: Lrc<SourceMap> = Default::default();
        let fm = cm.new_source_file(FileName::Anon.into(), source.to_string());

        let lexer = Lexer::new(
            Syntax::Typescript(TsSyntax::default()),
            Default::default(),
            StringInput::from(&*fm),
            None,
        );
        let mut parser = Parser::new_from(lexer);
        let module = parser.parse_module().map_err(|e| ExtractError::ScriptParse {
            path: self.file_path.display().to_string(),
            message: format!("{:?}", e),
        })?;

        let mut visitor = LiteralVisitor {
            base: fm.start_pos.0 as usize,
            source,
            file_path: self.file_path,
            dict: self.dict,
            edits: Vec::new(),
        };
        module.visit_with(&mut visitor);
        Ok(visitor.edits)
    }
}

struct LiteralVisitor<'a> {
    /// 源文件在 SourceMap 中的起始位置，节点 span 减去它才是缓冲区偏移
    base: usize,
    source: &'a str,
    file_path: &'a Path,
    dict: &'a mut TranslationDictionary,
    edits: Vec<Replacement>,
}

impl LiteralVisitor<'_> {
    fn span_range(&self, span: Span) -> (usize, usize) {
        (
            span.lo.0 as usize - self.base,
            span.hi.0 as usize - self.base,
        )
    }

    fn claim(&mut self, text: &str) -> String {
        let key = generate_key(text, self.file_path);
        self.dict.insert(key.clone(), text.to_string());
        key
    }

    /// 为模板插值表达式取参数名
    ///
    /// 标识符用自身名字，成员访问用末段属性名，其余表达式按序号命名。
    fn arg_name(expr: &Expr, index: usize) -> String {
        match expr {
            Expr::Ident(ident) => ident.sym.to_string(),
            Expr::Member(member) => match &member.prop {
                MemberProp::Ident(prop) => prop.sym.to_string(),
                _ => format!("value{}", index),
            },
            _ => format!("value{}", index),
        }
    }
}

/// 判断是否为日志调用：二段式成员访问 `console.log`
fn is_logging_call(call: &CallExpr) -> bool {
    let Callee::Expr(callee) = &call.callee else {
        return false;
    };
    let Expr::Member(member) = &**callee else {
        return false;
    };
    let Expr::Ident(obj) = &*member.obj else {
        return false;
    };
    let MemberProp::Ident(prop) = &member.prop else {
        return false;
    };
    &*obj.sym == "console" && &*prop.sym == "log"
}

/// 判断是否已经是翻译调用 `t(...)` / `$t(...)`
fn is_translation_call(call: &CallExpr) -> bool {
    let Callee::Expr(callee) = &call.callee else {
        return false;
    };
    let Expr::Ident(ident) = &**callee else {
        return false;
    };
    matches!(&*ident.sym, "t" | "$t")
}

impl Visit for LiteralVisitor<'_> {
    fn visit_call_expr(&mut self, call: &CallExpr) {
        // 幂等守卫：上一轮产出的翻译调用整棵子树跳过
        if is_translation_call(call) {
            return;
        }
        if is_logging_call(call) {
            // 日志调用的直接字符串/模板参数不提取，其余参数照常下钻
            for arg in &call.args {
                if !matches!(&*arg.expr, Expr::Lit(Lit::Str(_)) | Expr::Tpl(_)) {
                    arg.visit_with(self);
                }
            }
            return;
        }
        call.visit_children_with(self);
    }

    fn visit_tagged_tpl(&mut self, node: &TaggedTpl) {
        // 标签模板的字面片段属于宿主 DSL（如 styled.css`...`），整段替换
        // 会把标签和注入的调用粘在一起，所以不提取；
        // 标签自身和插值表达式里仍可能有可提取文案，照常下钻
        node.tag.visit_with(self);
        for expr in &node.tpl.exprs {
            expr.visit_with(self);
        }
    }

    fn visit_str(&mut self, node: &Str) {
        if !contains_cjk(&node.value) {
            return;
        }
        let key = self.claim(&node.value);
        let (start, end) = self.span_range(node.span);
        self.edits.push(Replacement {
            start,
            end,
            text: format!("t(\"{}\")", key),
        });
    }

    fn visit_tpl(&mut self, node: &Tpl) {
        if node.exprs.is_empty() {
            // 无插值模板按普通字符串处理
            if let Some(quasi) = node.quasis.first() {
                let text = quasi
                    .cooked
                    .as_ref()
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| quasi.raw.to_string());
                if contains_cjk(&text) {
                    let key = self.claim(&text);
                    let (start, end) = self.span_range(node.span);
                    self.edits.push(Replacement {
                        start,
                        end,
                        text: format!("t(\"{}\")", key),
                    });
                }
            }
            return;
        }

        // 重建占位符文本：静态片段原样保留，每个插值换成命名占位符
        let mut text = String::new();
        let mut args: Vec<(String, String)> = Vec::new();
        for (i, quasi) in node.quasis.iter().enumerate() {
            match &quasi.cooked {
                Some(cooked) => text.push_str(cooked),
                None => text.push_str(&quasi.raw),
            }
            if let Some(expr) = node.exprs.get(i) {
                let name = Self::arg_name(expr, i);
                let (start, end) = self.span_range(expr.span());
                text.push('{');
                text.push_str(&name);
                text.push('}');
                // 调用、索引等复杂表达式直接回切原始源码
                args.push((name, self.source[start..end].to_string()));
            }
        }

        if !contains_cjk(&text) {
            // 文本本身不含中文时插值表达式里可能还有，继续下钻
            node.visit_children_with(self);
            return;
        }

        let key = self.claim(&text);
        let rendered = args
            .iter()
            .map(|(name, value)| format!("{}: {}", name, value))
            .collect::<Vec<_>>()
            .join(", ");
        let (start, end) = self.span_range(node.span);
        self.edits.push(Replacement {
            start,
            end,
            text: format!("t(\"{}\", {{ {} }})", key, rendered),
        });
        // 整个模板已被替换，不再下钻以免产生重叠区间
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewriter::apply_replacements;
    use std::path::PathBuf;

    fn run(path: &str, source: &str) -> (String, TranslationDictionary) {
        let path = PathBuf::from(path);
        let mut dict = TranslationDictionary::new();
        let edits = ScriptMatcher::new(&path, &mut dict)
            .collect(source)
            .expect("parse should succeed");
        (apply_replacements(source, edits), dict)
    }

    #[test]
    fn string_literal_becomes_translation_call() {
        let (out, dict) = run("file.ts", "const msg = \"你好世界\";\n");
        assert_eq!(out, "const msg = t(\"file_65396e\");\n");
        assert_eq!(dict.get("file_65396e"), Some("你好世界"));
    }

    #[test]
    fn console_log_arguments_are_excluded() {
        let source = "console.log(\"日志信息\");\n";
        let (out, dict) = run("file.ts", source);
        assert_eq!(out, source);
        assert!(dict.is_empty());
    }

    #[test]
    fn literal_next_to_logging_call_is_still_rewritten() {
        let source = "console.log(\"日志信息\");\nconst msg = \"你好世界\";\n";
        let (out, dict) = run("file.ts", source);
        assert!(out.contains("console.log(\"日志信息\")"));
        assert!(out.contains("const msg = t(\"file_65396e\")"));
        assert_eq!(dict.len(), 1);
    }

    #[test]
    fn only_console_log_counts_as_logging() {
        let (out, dict) = run("file.ts", "console.warn(\"警告文案\");\n");
        assert!(out.contains("console.warn(t(\""));
        assert_eq!(dict.len(), 1);
    }

    #[test]
    fn template_literal_uses_named_arguments() {
        let (out, dict) = run("file.ts", "const s = `你好，${user.name}`;\n");
        assert_eq!(out, "const s = t(\"file_ca2ccc\", { name: user.name });\n");
        assert_eq!(dict.get("file_ca2ccc"), Some("你好，{name}"));
    }

    #[test]
    fn complex_template_expressions_fall_back_to_indexed_names() {
        let (out, dict) = run("file.ts", "const s = `共${fmt(n)}条`;\n");
        assert!(out.contains("t(\""));
        assert!(out.contains("{ value0: fmt(n) }"));
        let key = generate_key("共{value0}条", &PathBuf::from("file.ts"));
        assert_eq!(dict.get(&key), Some("共{value0}条"));
    }

    #[test]
    fn template_without_cjk_text_still_descends_into_expressions() {
        let (out, dict) = run("file.ts", "const s = `${flag ? \"是\" : \"否\"}ok`;\n");
        assert!(out.contains("t(\""));
        assert_eq!(dict.len(), 2);
        assert!(dict.get(&generate_key("是", &PathBuf::from("file.ts"))).is_some());
    }

    #[test]
    fn tagged_template_quasis_are_left_alone() {
        let source = "const s = styled.css`颜色: red`;\n";
        let (out, dict) = run("file.ts", source);
        assert_eq!(out, source);
        assert!(dict.is_empty());
    }

    #[test]
    fn tagged_template_interpolations_still_descend() {
        let source = "const s = styled.css`color: ${flag ? \"红\" : \"蓝\"}`;\n";
        let (out, dict) = run("file.ts", source);
        assert!(out.contains("styled.css`color: ${flag ? t(\""));
        assert_eq!(dict.len(), 2);
    }

    #[test]
    fn already_wrapped_calls_are_skipped() {
        let source = "const a = t(\"x_123456\");\nconst b = $t(\"y_abcdef\");\n";
        let (out, dict) = run("file.ts", source);
        assert_eq!(out, source);
        assert!(dict.is_empty());
    }

    #[test]
    fn sources_without_cjk_are_untouched() {
        let source = "const greeting = \"hello world\";\n";
        let (out, dict) = run("file.ts", source);
        assert_eq!(out, source);
        assert!(dict.is_empty());
    }

    #[test]
    fn parse_failure_is_propagated() {
        let path = PathBuf::from("broken.ts");
        let mut dict = TranslationDictionary::new();
        let result = ScriptMatcher::new(&path, &mut dict).collect(")))");
        assert!(result.is_err());
    }
}
