//! 翻译字典模块
//!
//! 维护 key → 原始文案的映射，跨批次持久化为 JSON 文件

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::{ExtractError, ExtractResult};

/// 翻译字典
///
/// 整个批次共享一份，批次开始时从持久化文件加载，
/// 处理过程中累积写入，批次结束时一次性保存。
/// 底层使用 `BTreeMap` 保证序列化输出按 key 排序。
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranslationDictionary {
    entries: BTreeMap<String, String>,
}

impl TranslationDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从持久化文件加载字典
    ///
    /// 文件不存在视为空字典；内容不是合法 JSON 则整个批次失败。
    pub fn load(path: &Path) -> ExtractResult<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "字典文件不存在，从空字典开始");
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path).map_err(|source| ExtractError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let entries: BTreeMap<String, String> =
            serde_json::from_str(&raw).map_err(|source| ExtractError::Dictionary {
                path: path.display().to_string(),
                source,
            })?;

        debug!(path = %path.display(), entries = entries.len(), "已加载历史字典");
        Ok(Self { entries })
    }

    /// 合并一批已有条目，先写入者保留
    pub fn merge(&mut self, existing: BTreeMap<String, String>) {
        for (key, text) in existing {
            self.insert(key, text);
        }
    }

    /// 写入一个条目
    ///
    /// 相同 (key, 文案) 重复写入是幂等的；同一 key 带着不同文案再次写入时
    /// 保留先写入的值并告警——这是记录在案的容忍行为，不做静默纠正。
    pub fn insert(&mut self, key: String, text: String) {
        if let Some(existing) = self.entries.get(&key) {
            if existing != &text {
                warn!(%key, kept = %existing, dropped = %text, "翻译 key 冲突，保留先写入的文案");
            }
            return;
        }
        self.entries.insert(key, text);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 序列化为按 key 排序的 pretty JSON
    pub fn serialize(&self) -> ExtractResult<String> {
        serde_json::to_string_pretty(&self.entries).map_err(|source| ExtractError::Dictionary {
            path: String::from("<memory>"),
            source,
        })
    }

    /// 批次结束时一次性写盘
    pub fn save(&self, path: &Path) -> ExtractResult<()> {
        let serialized = self.serialize()?;
        fs::write(path, serialized).map_err(|source| ExtractError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}
