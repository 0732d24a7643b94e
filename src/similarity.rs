//! 字符级相似度与词重叠度。
//!
//! `ratio` 采用 Ratcliff/Obershelp 的最长公共块递归：先取两串间最长的连续公共块
//! （长度相同时取在 `a` 中最靠前、其次在 `b` 中最靠前者），再分别对左右剩余部分
//! 重复该过程。相似度为 `2 * M / T`，`M` 为所有块长度之和，`T` 为两串长度之和。
//! 按 Unicode 标量值（`char`）比较。

use std::collections::{HashMap, HashSet};

/// 一个公共块：`a[a..a+size] == b[b..b+size]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub a: usize,
    pub b: usize,
    pub size: usize,
}

/// 匹配前的规范化：转小写并去掉首尾空白
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// 两串的字符相似度，范围 [0, 1]；两串皆空时为 1
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matched: usize = matching_blocks(&a, &b).iter().map(|blk| blk.size).sum();
    2.0 * matched as f64 / total as f64
}

/// 所有公共块，按在 `a` 中的位置排序
pub fn matching_blocks(a: &[char], b: &[char]) -> Vec<Block> {
    let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, &c) in b.iter().enumerate() {
        b2j.entry(c).or_default().push(j);
    }

    let mut blocks = Vec::new();
    let mut queue = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let blk = longest_match(a, &b2j, alo, ahi, blo, bhi);
        if blk.size == 0 {
            continue;
        }
        if alo < blk.a && blo < blk.b {
            queue.push((alo, blk.a, blo, blk.b));
        }
        if blk.a + blk.size < ahi && blk.b + blk.size < bhi {
            queue.push((blk.a + blk.size, ahi, blk.b + blk.size, bhi));
        }
        blocks.push(blk);
    }
    blocks.sort_by_key(|blk| (blk.a, blk.b));
    blocks
}

/// `a[alo..ahi]` 与 `b[blo..bhi]` 间最长的连续公共块
fn longest_match(
    a: &[char],
    b2j: &HashMap<char, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> Block {
    let mut best = Block {
        a: alo,
        b: blo,
        size: 0,
    };
    // j2len[j]: 以 a[i-1] 和 b[j] 结尾的公共块长度
    let mut j2len: HashMap<usize, usize> = HashMap::new();
    for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut next: HashMap<usize, usize> = HashMap::new();
        if let Some(positions) = b2j.get(c) {
            for &j in positions {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let k = j
                    .checked_sub(1)
                    .and_then(|prev| j2len.get(&prev))
                    .copied()
                    .unwrap_or(0)
                    + 1;
                next.insert(j, k);
                if k > best.size {
                    best = Block {
                        a: i + 1 - k,
                        b: j + 1 - k,
                        size: k,
                    };
                }
            }
        }
        j2len = next;
    }
    best
}

/// 查询词在候选文本中出现的比例（按空白切分后的集合计算），查询无词时为 0
pub fn word_overlap(query: &str, text: &str) -> f64 {
    let query_words: HashSet<&str> = query.split_whitespace().collect();
    if query_words.is_empty() {
        return 0.0;
    }
    let text_words: HashSet<&str> = text.split_whitespace().collect();
    let shared = query_words.intersection(&text_words).count();
    shared as f64 / query_words.len() as f64
}
