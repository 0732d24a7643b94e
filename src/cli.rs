use crate::config::AppConfig;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "utterance-finder",
    about = "语音样本语料查找、音素查看与播放",
    version
)]
pub struct Cli {
    /// 配置文件，默认位于用户配置目录
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// 语料元数据（JSON lines），覆盖配置文件
    #[arg(short, long)]
    pub metadata: Option<PathBuf>,

    /// 音频目录，文件名为 `<id>.<扩展名>`
    #[arg(short, long)]
    pub audio_dir: Option<PathBuf>,

    /// 跳过格式错误的行而不是中止加载
    #[arg(long)]
    pub lenient: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// 输出语料报告
    Report,

    /// 查找与文本最接近的样本
    Match {
        query: String,

        /// 列出得分最高的 N 个候选
        #[arg(long)]
        top: Option<usize>,
    },

    /// 查看样本音素
    Analyze { id: String },

    /// 显示统计
    Stats,
}

impl Cli {
    /// 命令行参数覆盖配置文件
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(metadata) = &self.metadata {
            config.corpus.metadata_path = metadata.clone();
        }
        if let Some(audio_dir) = &self.audio_dir {
            config.corpus.audio_dir = audio_dir.clone();
        }
        if self.lenient {
            config.corpus.lenient = true;
        }
    }
}
