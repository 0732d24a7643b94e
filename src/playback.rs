use crate::config::PlaybackConfig;
use crate::error::PlaybackError;
use crate::record::Record;
use std::ffi::OsStr;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// 播放方式
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackPlan {
    /// 播放录音文件
    Asset(PathBuf),
    /// 无录音文件，合成文本
    Synthesize(String),
}

/// 播放结果
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackOutcome {
    Played(WavInfo),
    Synthesized { engine: String },
    /// 没有可用的语音合成程序
    Unavailable,
}

/// WAV 头信息
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WavInfo {
    pub channels: u16,
    pub sample_rate: u32,
    pub duration_seconds: f64,
}

/// 样本播放能力
pub trait Playback {
    fn plan(&self, record: &Record) -> PlaybackPlan;
    /// 按 `plan` 给出的方式播放
    fn play(&self, plan: &PlaybackPlan) -> Result<PlaybackOutcome, PlaybackError>;
}

/// 通过外部程序转码、播放和合成
pub struct ExternalPlayer {
    config: PlaybackConfig,
    audio_dir: PathBuf,
}

impl ExternalPlayer {
    pub fn new(config: PlaybackConfig, audio_dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            audio_dir: audio_dir.into(),
        }
    }

    fn play_asset(&self, asset: &Path) -> Result<WavInfo, PlaybackError> {
        let wav = &self.config.temp_wav;
        let played = run(
            &self.config.transcoder,
            &[OsStr::new("-i"), asset.as_os_str(), OsStr::new("-y"), wav.as_os_str()],
        )
        .and_then(|()| read_wav_header(wav))
        .and_then(|info| {
            log::info!(
                "播放 {}：{} 声道，{} Hz，{:.2}s",
                asset.display(),
                info.channels,
                info.sample_rate,
                info.duration_seconds
            );
            run(
                &self.config.player,
                &[OsStr::new("-nodisp"), OsStr::new("-autoexit"), wav.as_os_str()],
            )?;
            Ok(info)
        });
        match std::fs::remove_file(wav) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => log::warn!("清理临时文件 {} 失败: {e}", wav.display()),
        }
        played
    }

    fn synthesize(&self, text: &str) -> Result<PlaybackOutcome, PlaybackError> {
        for engine in &self.config.tts_engines {
            match Command::new(engine).arg(text).status() {
                Ok(status) if status.success() => {
                    return Ok(PlaybackOutcome::Synthesized {
                        engine: engine.clone(),
                    })
                }
                Ok(status) => {
                    return Err(PlaybackError::ExitStatus {
                        program: engine.clone(),
                        status: status.to_string(),
                    })
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    log::debug!("语音合成程序 {engine} 不可用");
                }
                Err(source) => {
                    return Err(PlaybackError::Spawn {
                        program: engine.clone(),
                        source,
                    })
                }
            }
        }
        log::warn!("没有可用的语音合成程序");
        Ok(PlaybackOutcome::Unavailable)
    }
}

impl Playback for ExternalPlayer {
    fn plan(&self, record: &Record) -> PlaybackPlan {
        let asset = self
            .audio_dir
            .join(format!("{}.{}", record.id, self.config.audio_extension));
        if asset.is_file() {
            PlaybackPlan::Asset(asset)
        } else {
            PlaybackPlan::Synthesize(record.text.clone())
        }
    }

    fn play(&self, plan: &PlaybackPlan) -> Result<PlaybackOutcome, PlaybackError> {
        match plan {
            PlaybackPlan::Asset(asset) => self.play_asset(asset).map(PlaybackOutcome::Played),
            PlaybackPlan::Synthesize(text) => {
                log::info!("没有音频文件，改用语音合成: {text}");
                self.synthesize(text)
            }
        }
    }
}

/// 读取 WAV 头，计算时长
pub fn read_wav_header(path: &Path) -> Result<WavInfo, PlaybackError> {
    let reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    Ok(WavInfo {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        duration_seconds: reader.duration() as f64 / spec.sample_rate as f64,
    })
}

fn run(program: &str, args: &[&OsStr]) -> Result<(), PlaybackError> {
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| PlaybackError::Spawn {
            program: program.to_string(),
            source,
        })?;
    if !output.status.success() {
        return Err(PlaybackError::ExitStatus {
            program: program.to_string(),
            status: output.status.to_string(),
        });
    }
    Ok(())
}
