use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// 语料加载失败
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("读取语料 {path} 失败: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("读取语料失败: {0}")]
    Read(#[source] io::Error),
    #[error("第 {line} 行记录格式错误: {reason}")]
    Malformed { line: usize, reason: String },
    #[error("第 {line} 行样本 ID 重复: {id}")]
    DuplicateId { line: usize, id: String },
    #[error("语料中没有任何记录")]
    Empty,
}

/// 在空语料上执行匹配或统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("语料为空")]
pub struct EmptyCorpus;

/// 配置读写失败
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("读取配置 {path} 失败: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("解析配置 {path} 失败: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("序列化配置失败: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("写入配置 {path} 失败: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// 播放失败
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("未找到样本: {0}")]
    UnknownSample(String),
    #[error("启动 {program} 失败: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("{program} 异常退出: {status}")]
    ExitStatus { program: String, status: String },
    #[error("转码后的音频无法读取: {0}")]
    InvalidWav(#[from] hound::Error),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    EmptyCorpus(#[from] EmptyCorpus),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Playback(#[from] PlaybackError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
