use crate::config::MatchConfig;
use crate::corpus::Corpus;
use crate::error::EmptyCorpus;
use crate::record::Record;
use crate::similarity::{normalize, ratio, word_overlap};

/// 打分后的候选
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredRecord<'a> {
    pub record: &'a Record,
    pub score: f64,
}

/// 语料匹配器，借用一份只读语料
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'a> {
    corpus: &'a Corpus,
    config: MatchConfig,
}

impl<'a> Matcher<'a> {
    pub fn new(corpus: &'a Corpus, config: MatchConfig) -> Self {
        Self { corpus, config }
    }

    /// 按 ID 精确查找（区分大小写）
    pub fn find_by_id(&self, id: &str) -> Option<&'a Record> {
        self.corpus.get(id)
    }

    /// 文本包含查询串的记录（不区分大小写），空查询返回全部
    pub fn search(&self, query: &str) -> Vec<&'a Record> {
        let query = query.to_lowercase();
        self.corpus
            .records()
            .iter()
            .filter(|r| r.text.to_lowercase().contains(&query))
            .collect()
    }

    /// 分类完全相等的记录（区分大小写）
    pub fn filter_by_category(&self, category: &str) -> Vec<&'a Record> {
        self.corpus
            .records()
            .iter()
            .filter(|r| r.category == category)
            .collect()
    }

    /// 查询与一条候选文本的得分：字符相似度 + 词重叠加分，两者都应已规范化
    pub fn score(&self, query: &str, text: &str) -> f64 {
        ratio(query, text) + word_overlap(query, text) * self.config.bonus_weight
    }

    /// 最接近的记录；规范化后完全相等者优先，否则取得分最高且超过阈值者
    pub fn best_match(&self, query: &str) -> Result<Option<&'a Record>, EmptyCorpus> {
        if self.corpus.is_empty() {
            return Err(EmptyCorpus);
        }
        let query = normalize(query);

        let candidates: Vec<(&'a Record, String)> = self
            .corpus
            .records()
            .iter()
            .map(|r| (r, normalize(&r.text)))
            .filter(|(_, text)| !text.is_empty())
            .collect();

        if let Some((record, _)) = candidates.iter().find(|(_, text)| *text == query) {
            return Ok(Some(*record));
        }

        let mut best: Option<ScoredRecord<'a>> = None;
        for &(record, ref text) in &candidates {
            let score = self.score(&query, text);
            if best.map_or(true, |b| score > b.score) {
                best = Some(ScoredRecord { record, score });
            }
        }

        Ok(best
            .filter(|b| b.score > self.config.acceptance_threshold)
            .map(|b| {
                log::debug!("最佳匹配 {}，得分 {:.3}", b.record.id, b.score);
                b.record
            }))
    }

    /// 按得分降序排列的前 `limit` 个候选，同分按语料顺序
    pub fn rank(&self, query: &str, limit: usize) -> Result<Vec<ScoredRecord<'a>>, EmptyCorpus> {
        if self.corpus.is_empty() {
            return Err(EmptyCorpus);
        }
        let query = normalize(query);
        let mut scored: Vec<ScoredRecord<'a>> = self
            .corpus
            .records()
            .iter()
            .filter_map(|record| {
                let text = normalize(&record.text);
                (!text.is_empty()).then(|| ScoredRecord {
                    record,
                    score: self.score(&query, &text),
                })
            })
            .collect();
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(limit);
        Ok(scored)
    }
}
