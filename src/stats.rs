use crate::corpus::Corpus;
use crate::error::EmptyCorpus;
use std::collections::BTreeMap;

/// 语料整体统计
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusStats {
    pub total_samples: usize,
    /// 去重并排序的分类名
    pub categories: Vec<String>,
    pub avg_duration: f64,
    pub total_duration: f64,
}

/// 单个分类的统计
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryStats {
    pub category: String,
    pub samples: usize,
    pub total_duration: f64,
    pub avg_duration: f64,
}

pub fn stats(corpus: &Corpus) -> Result<CorpusStats, EmptyCorpus> {
    if corpus.is_empty() {
        return Err(EmptyCorpus);
    }
    let breakdown = category_breakdown(corpus);
    let total_duration: f64 = corpus.records().iter().map(|r| r.duration_seconds).sum();
    Ok(CorpusStats {
        total_samples: corpus.len(),
        categories: breakdown.into_iter().map(|c| c.category).collect(),
        avg_duration: total_duration / corpus.len() as f64,
        total_duration,
    })
}

/// 按分类名排序的分类统计
pub fn category_breakdown(corpus: &Corpus) -> Vec<CategoryStats> {
    let mut groups: BTreeMap<&str, (usize, f64)> = BTreeMap::new();
    for record in corpus.records() {
        let entry = groups.entry(record.category.as_str()).or_default();
        entry.0 += 1;
        entry.1 += record.duration_seconds;
    }
    groups
        .into_iter()
        .map(|(category, (samples, total_duration))| CategoryStats {
            category: category.to_string(),
            samples,
            total_duration,
            avg_duration: total_duration / samples as f64,
        })
        .collect()
}

/// 生成语料报告文本
pub fn render_report(corpus: &Corpus, examples: usize) -> Result<String, EmptyCorpus> {
    let overview = stats(corpus)?;
    let rule = "=".repeat(60);
    let thin = "-".repeat(60);
    let mut lines = vec![
        format!("{rule}\n语料报告\n{rule}"),
        format!("样本总数: {}", overview.total_samples),
        format!("分类数: {}", overview.categories.len()),
        format!("平均时长: {:.2}s", overview.avg_duration),
        format!("总时长: {:.2}s", overview.total_duration),
        format!("分类: {}", overview.categories.join(", ")),
        format!("\n{thin}\n分类明细\n{thin}"),
    ];
    for cat in category_breakdown(corpus) {
        lines.push(format!("\n{}:", cat.category.to_uppercase()));
        lines.push(format!("  样本数: {}", cat.samples));
        lines.push(format!("  总时长: {:.2}s", cat.total_duration));
        lines.push(format!("  平均时长: {:.2}s", cat.avg_duration));
    }

    lines.push(format!("\n{thin}\n样本示例（前 {examples} 条）\n{thin}"));
    for (i, record) in corpus.records().iter().take(examples).enumerate() {
        let preview: String = record.phoneme_sequence.chars().take(80).collect();
        lines.push(format!("\n{}. {} ({})", i + 1, record.id, record.category));
        lines.push(format!("   文本: {}", record.text));
        lines.push(format!("   时长: {}s", record.duration_seconds));
        lines.push(format!("   音素: {preview}..."));
    }

    Ok(lines.join("\n"))
}
