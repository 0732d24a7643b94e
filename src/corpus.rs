use crate::error::LoadError;
use crate::record::Record;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// 加载模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMode {
    /// 任一行格式错误即中止加载
    #[default]
    Strict,
    /// 跳过格式错误的行，并在报告中列出
    Lenient,
}

impl LoadMode {
    pub fn from_lenient(lenient: bool) -> Self {
        if lenient {
            LoadMode::Lenient
        } else {
            LoadMode::Strict
        }
    }
}

/// 被跳过的行
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedLine {
    pub line: usize,
    pub reason: String,
}

/// 加载结果汇总
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: Vec<SkippedLine>,
}

/// 只读语料快照：记录按文件顺序保存，另建 ID → 下标索引
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    records: Vec<Record>,
    by_id: HashMap<String, usize>,
}

impl Corpus {
    /// 由内存中的记录构建语料，行号按下标从 1 计
    pub fn from_records(records: Vec<Record>) -> Result<Self, LoadError> {
        let mut corpus = Corpus::default();
        for (idx, record) in records.into_iter().enumerate() {
            let line = idx + 1;
            record
                .validate()
                .map_err(|reason| LoadError::Malformed { line, reason })?;
            corpus.push(line, record)?;
        }
        Ok(corpus)
    }

    /// 从 JSON lines 文件加载语料
    pub fn load(path: impl AsRef<Path>, mode: LoadMode) -> Result<(Self, LoadReport), LoadError> {
        let path = path.as_ref();
        log::info!("加载语料: {}", path.display());
        let file = File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let (corpus, report) = Self::from_reader(BufReader::new(file), mode).map_err(|e| match e {
            LoadError::Read(source) => LoadError::Io {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        log::info!(
            "已加载 {} 条样本，跳过 {} 行",
            report.loaded,
            report.skipped.len()
        );
        Ok((corpus, report))
    }

    /// 从任意行读取器加载语料，空行忽略
    pub fn from_reader<R: BufRead>(reader: R, mode: LoadMode) -> Result<(Self, LoadReport), LoadError> {
        let mut corpus = Corpus::default();
        let mut report = LoadReport::default();

        for (idx, raw) in reader.split(b'\n').enumerate() {
            let line_no = idx + 1;
            let mut raw = raw.map_err(LoadError::Read)?;
            if raw.last() == Some(&b'\r') {
                raw.pop();
            }

            let parsed = decode_line(line_no, raw).and_then(|line| {
                if line.trim().is_empty() {
                    return Ok(());
                }
                let record = parse_line(line_no, &line)?;
                corpus.push(line_no, record)
            });
            match (parsed, mode) {
                (Ok(()), _) => {}
                (Err(e), LoadMode::Strict) => return Err(e),
                (Err(e), LoadMode::Lenient) => {
                    log::warn!("跳过第 {line_no} 行: {e}");
                    report.skipped.push(SkippedLine {
                        line: line_no,
                        reason: e.to_string(),
                    });
                }
            }
        }

        if corpus.is_empty() {
            return Err(LoadError::Empty);
        }
        report.loaded = corpus.len();
        Ok((corpus, report))
    }

    fn push(&mut self, line: usize, record: Record) -> Result<(), LoadError> {
        if self.by_id.contains_key(&record.id) {
            return Err(LoadError::DuplicateId {
                line,
                id: record.id,
            });
        }
        self.by_id.insert(record.id.clone(), self.records.len());
        self.records.push(record);
        Ok(())
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 按 ID 取记录（区分大小写）
    pub fn get(&self, id: &str) -> Option<&Record> {
        self.by_id.get(id).map(|&idx| &self.records[idx])
    }
}

fn decode_line(line: usize, raw: Vec<u8>) -> Result<String, LoadError> {
    String::from_utf8(raw).map_err(|e| LoadError::Malformed {
        line,
        reason: format!("不是有效的 UTF-8: {e}"),
    })
}

fn parse_line(line: usize, raw: &str) -> Result<Record, LoadError> {
    let record: Record = serde_json::from_str(raw).map_err(|e| LoadError::Malformed {
        line,
        reason: e.to_string(),
    })?;
    record
        .validate()
        .map_err(|reason| LoadError::Malformed { line, reason })?;
    Ok(record)
}
