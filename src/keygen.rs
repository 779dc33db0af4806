//! 翻译 key 生成模块
//!
//! 为每段可提取文案派生稳定、可读的字典 key

use std::path::Path;

/// 根据文案内容和文件路径生成翻译 key
///
/// key 形如 `<prefix>_<hash>`：
/// - `prefix` 取文件名（不含扩展名）；文件名为 `index` 时改用父目录名
/// - `hash` 取文案 md5 摘要的前 6 位十六进制
///
/// 纯函数：相同的 (文案, 路径) 永远得到相同的 key，
/// 同一文件内重复出现的相同文案因此天然去重。
pub fn generate_key(text: &str, file_path: &Path) -> String {
    let stem = file_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unnamed");

    // index 是通用占位名，换用父目录名才有语义
    let prefix = if stem == "index" {
        file_path
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .unwrap_or(stem)
    } else {
        stem
    };

    let digest = format!("{:x}", md5::compute(text.as_bytes()));
    format!("{}_{}", prefix, &digest[..6])
}
