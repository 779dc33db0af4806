//! i18n-extract 命令行入口
//!
//! 解析参数、初始化日志，然后把整个批次交给库侧的 `run_batch`。

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use i18n_extract::{run_batch, ExtractOptions};

#[derive(Parser)]
#[command(
    name = "i18n-extract",
    version,
    about = "提取源码中的中文文案并改写为 i18n 调用"
)]
struct Cli {
    /// 要处理的文件或目录路径
    source: PathBuf,

    /// 输出的翻译 JSON 文件路径
    #[arg(short, long, default_value = "translations.json")]
    output: PathBuf,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let options = ExtractOptions {
        source: cli.source,
        output: cli.output,
    };

    match run_batch(&options) {
        Ok(summary) => {
            println!(
                "处理完成！共处理 {} 个文件，改写 {} 个，翻译已保存到 {}（{} 条）",
                summary.files_seen,
                summary.files_rewritten,
                options.output.display(),
                summary.dictionary_size
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("处理过程中发生错误: {}", err);
            ExitCode::FAILURE
        }
    }
}
