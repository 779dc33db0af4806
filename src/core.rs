//! 核心模块：错误类型、批次配置与批次编排
//!
//! 一次批次 = 加载字典 → 顺序处理每个文件 → 一次性保存字典。
//! 处理是单线程同步的，任何文件上的失败都会中止整个批次；
//! 已写回的文件不回滚，修复问题后重跑（管线幂等）即是恢复手段。

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::dictionary::TranslationDictionary;
use crate::parsers::parse_sfc;
use crate::pipeline::{process_script, process_vue};

/// 提取过程中可能发生的错误
#[derive(Error, Debug)]
pub enum ExtractError {
    /// 文件读写错误
    #[error("文件读写失败 {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 脚本语法解析错误
    #[error("脚本解析失败 {path}: {message}")]
    ScriptParse { path: String, message: String },

    /// 字典文件内容无效或序列化失败
    #[error("翻译字典无效 {path}: {source}")]
    Dictionary {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// 源路径不存在
    #[error("源路径不存在: {0}")]
    SourceNotFound(String),
}

pub type ExtractResult<T> = Result<T, ExtractError>;

/// 批次配置（与 CLI 参数解耦）
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// 要处理的文件或目录
    pub source: PathBuf,
    /// 翻译字典的输出路径
    pub output: PathBuf,
}

/// 批次处理结果统计
#[derive(Debug, Default, Clone)]
pub struct BatchSummary {
    /// 进入管线的文件数（不含扩展名不识别而跳过的）
    pub files_seen: usize,
    /// 实际被改写回盘的文件数
    pub files_rewritten: usize,
    /// 批次结束时字典条目总数
    pub dictionary_size: usize,
}

/// 识别的文件类型决定走哪条管线
enum FileKind {
    /// `.vue`：template + script 复合管线
    Vue,
    /// `.ts` / `.js`：script 专用管线
    Script,
}

impl FileKind {
    fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("vue") => Some(FileKind::Vue),
            Some("ts") | Some("js") => Some(FileKind::Script),
            _ => None,
        }
    }
}

/// 展开源参数得到有序的文件列表
///
/// 目录递归遍历并按路径排序，保证批次顺序可复现；
/// 单个文件原样返回。顺序决定 key 的先到先得。
fn collect_source_files(source: &Path) -> Vec<PathBuf> {
    if source.is_file() {
        return vec![source.to_path_buf()];
    }

    let mut files: Vec<PathBuf> = WalkDir::new(source)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    files
}

/// 执行一次完整批次
pub fn run_batch(options: &ExtractOptions) -> ExtractResult<BatchSummary> {
    if !options.source.exists() {
        return Err(ExtractError::SourceNotFound(
            options.source.display().to_string(),
        ));
    }

    let mut dict = TranslationDictionary::load(&options.output)?;
    let mut summary = BatchSummary::default();

    for path in collect_source_files(&options.source) {
        let Some(kind) = FileKind::from_path(&path) else {
            debug!(path = %path.display(), "扩展名不识别，跳过");
            continue;
        };
        summary.files_seen += 1;

        let content = fs::read_to_string(&path).map_err(|source| ExtractError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let rewritten = match kind {
            FileKind::Vue => {
                let doc = parse_sfc(&path, content);
                process_vue(&doc, &mut dict)?
            }
            FileKind::Script => process_script(&path, &content, &mut dict)?,
        };

        // 写回不是事务性的：每个文件处理完立即落盘，后续失败不回滚
        if let Some(new_content) = rewritten {
            fs::write(&path, new_content).map_err(|source| ExtractError::Io {
                path: path.display().to_string(),
                source,
            })?;
            summary.files_rewritten += 1;
            info!(path = %path.display(), "文件已改写");
        }
    }

    dict.save(&options.output)?;
    summary.dictionary_size = dict.len();
    info!(
        files = summary.files_seen,
        rewritten = summary.files_rewritten,
        entries = summary.dictionary_size,
        "批次处理完成"
    );
    Ok(summary)
}
