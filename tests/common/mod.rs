// 集成测试公共模块
//
// 提供临时项目目录和测试夹具

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// 一个临时的待处理项目目录
pub struct TestProject {
    dir: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp project dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn dictionary_path(&self) -> PathBuf {
        self.root().join("translations.json")
    }

    /// 写入一个源文件，自动创建中间目录
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(&path, content).expect("write fixture file");
        path
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.root().join(relative)).expect("read fixture file")
    }

    pub fn read_dictionary(&self) -> serde_json::Value {
        let raw = fs::read_to_string(self.dictionary_path()).expect("read dictionary");
        serde_json::from_str(&raw).expect("dictionary must be valid JSON")
    }
}

pub const GREETING_VUE: &str = "<template>\n  <div>你好</div>\n</template>\n";

pub const MIXED_TS: &str =
    "console.log(\"日志信息\");\nconst msg = \"你好世界\";\n";
