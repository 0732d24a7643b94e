//! 随机语料上的匹配、过滤与统计性质测试。

use proptest::prelude::*;
use utterance_finder_lib::similarity::{normalize, ratio, word_overlap};
use utterance_finder_lib::{stats, Corpus, MatchConfig, Matcher, Record};

fn word_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z]{1,6}").unwrap()
}

fn text_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(word_strategy(), 1..5).prop_map(|words| words.join(" "))
}

fn category_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "Greetings".to_string(),
        "greetings".to_string(),
        "weather".to_string(),
        "Alarms".to_string(),
    ])
}

fn corpus_strategy() -> impl Strategy<Value = Vec<Record>> {
    prop::collection::vec((text_strategy(), category_strategy(), 0.0f64..30.0), 1..8).prop_map(
        |rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (text, category, duration))| Record {
                    id: format!("r{i}"),
                    text,
                    category,
                    duration_seconds: duration,
                    phoneme_sequence: String::new(),
                    transcription: String::new(),
                })
                .collect()
        },
    )
}

proptest! {
    #[test]
    fn best_match_is_deterministic(records in corpus_strategy(), query in text_strategy()) {
        let corpus = Corpus::from_records(records).unwrap();
        let matcher = Matcher::new(&corpus, MatchConfig::default());
        let first = matcher.best_match(&query).unwrap().map(|r| r.id.clone());
        let second = matcher.best_match(&query).unwrap().map(|r| r.id.clone());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn exact_text_always_wins(
        records in corpus_strategy(),
        pick in any::<prop::sample::Index>(),
        upper in any::<bool>(),
    ) {
        let target = records[pick.index(records.len())].text.clone();
        let query = if upper {
            format!("  {}  ", target.to_uppercase())
        } else {
            format!("\t{target}")
        };
        let corpus = Corpus::from_records(records).unwrap();
        let matcher = Matcher::new(&corpus, MatchConfig::default());
        let found = matcher.best_match(&query).unwrap().unwrap();
        prop_assert_eq!(normalize(&found.text), normalize(&query));
        let first_with_text = corpus
            .records()
            .iter()
            .find(|r| normalize(&r.text) == normalize(&query))
            .unwrap();
        prop_assert_eq!(&found.id, &first_with_text.id);
    }

    #[test]
    fn ratio_is_bounded(a in text_strategy(), b in text_strategy()) {
        let r = ratio(&a, &b);
        prop_assert!((0.0..=1.0).contains(&r));
    }

    #[test]
    fn score_is_ratio_plus_weighted_overlap(query in text_strategy(), text in text_strategy()) {
        let corpus = Corpus::default();
        let matcher = Matcher::new(&corpus, MatchConfig::default());
        let expected = ratio(&query, &text) + 0.3 * word_overlap(&query, &text);
        prop_assert!((matcher.score(&query, &text) - expected).abs() < 1e-12);
    }

    #[test]
    fn adding_a_query_word_to_the_text_never_lowers_overlap(
        query in text_strategy(),
        text in text_strategy(),
        pick in any::<prop::sample::Index>(),
    ) {
        let words: Vec<&str> = query.split_whitespace().collect();
        let extra = words[pick.index(words.len())];
        let widened = format!("{text} {extra}");
        prop_assert!(word_overlap(&query, &widened) >= word_overlap(&query, &text));
    }

    #[test]
    fn category_filter_is_exact(records in corpus_strategy(), category in category_strategy()) {
        let corpus = Corpus::from_records(records).unwrap();
        let matcher = Matcher::new(&corpus, MatchConfig::default());
        let filtered = matcher.filter_by_category(&category);
        prop_assert!(filtered.iter().all(|r| r.category == category));
        let expected = corpus.records().iter().filter(|r| r.category == category).count();
        prop_assert_eq!(filtered.len(), expected);
    }

    #[test]
    fn stats_invariants_hold(records in corpus_strategy()) {
        let corpus = Corpus::from_records(records).unwrap();
        let s = stats(&corpus).unwrap();
        prop_assert_eq!(s.total_samples, corpus.len());
        prop_assert!((s.avg_duration - s.total_duration / s.total_samples as f64).abs() < 1e-9);
        let mut deduped = s.categories.clone();
        deduped.dedup();
        prop_assert_eq!(&deduped, &s.categories);
        prop_assert!(s.categories.windows(2).all(|w| w[0] < w[1]));
    }
}
