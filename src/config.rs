use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 应用配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub corpus: CorpusConfig,
    #[serde(default)]
    pub matching: MatchConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusConfig {
    /// 元数据文件（JSON lines）
    #[serde(default = "default_metadata_path")]
    pub metadata_path: PathBuf,
    /// 音频目录，文件名为 `<id>.<扩展名>`
    #[serde(default = "default_audio_dir")]
    pub audio_dir: PathBuf,
    /// 跳过格式错误的行而不是中止加载
    #[serde(default)]
    pub lenient: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// 最佳候选得分必须严格大于该值才会返回
    #[serde(default = "default_acceptance_threshold")]
    pub acceptance_threshold: f64,
    /// 词重叠加分权重
    #[serde(default = "default_bonus_weight")]
    pub bonus_weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// 音频文件扩展名
    #[serde(default = "default_audio_extension")]
    pub audio_extension: String,
    /// 转码程序
    #[serde(default = "default_transcoder")]
    pub transcoder: String,
    /// 播放程序
    #[serde(default = "default_player")]
    pub player: String,
    /// 转码输出的临时 WAV 文件
    #[serde(default = "default_temp_wav")]
    pub temp_wav: PathBuf,
    /// 无音频文件时按顺序尝试的语音合成程序
    #[serde(default = "default_tts_engines")]
    pub tts_engines: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,
    #[serde(default = "default_list_limit")]
    pub list_limit: usize,
    #[serde(default = "default_phoneme_preview")]
    pub phoneme_preview: usize,
    /// 报告中展示的样本数
    #[serde(default = "default_report_examples")]
    pub report_examples: usize,
}

fn default_metadata_path() -> PathBuf {
    PathBuf::from("metadata_data.json")
}
fn default_audio_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_acceptance_threshold() -> f64 {
    0.3
}
fn default_bonus_weight() -> f64 {
    0.3
}
fn default_audio_extension() -> String {
    "caf".to_string()
}
fn default_transcoder() -> String {
    "ffmpeg".to_string()
}
fn default_player() -> String {
    "ffplay".to_string()
}
fn default_temp_wav() -> PathBuf {
    std::env::temp_dir().join("utterance-finder.wav")
}
fn default_tts_engines() -> Vec<String> {
    vec!["espeak".to_string(), "say".to_string()]
}
fn default_search_limit() -> usize {
    10
}
fn default_list_limit() -> usize {
    15
}
fn default_phoneme_preview() -> usize {
    10
}
fn default_report_examples() -> usize {
    5
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            metadata_path: default_metadata_path(),
            audio_dir: default_audio_dir(),
            lenient: false,
        }
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            acceptance_threshold: default_acceptance_threshold(),
            bonus_weight: default_bonus_weight(),
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            audio_extension: default_audio_extension(),
            transcoder: default_transcoder(),
            player: default_player(),
            temp_wav: default_temp_wav(),
            tts_engines: default_tts_engines(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            search_limit: default_search_limit(),
            list_limit: default_list_limit(),
            phoneme_preview: default_phoneme_preview(),
            report_examples: default_report_examples(),
        }
    }
}

/// 获取配置文件路径
pub fn config_path() -> PathBuf {
    let config_dir = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("utterance-finder");
    config_dir.join("config.toml")
}

/// 加载配置，文件不存在则创建默认配置
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    if path.exists() {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    } else {
        let config = AppConfig::default();
        save_config(path, &config)?;
        log::info!("已创建默认配置: {}", path.display());
        Ok(config)
    }
}

/// 保存配置到文件
pub fn save_config(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    let write_err = |source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content).map_err(write_err)?;
    Ok(())
}
