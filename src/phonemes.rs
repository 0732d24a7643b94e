use crate::corpus::Corpus;

/// 音素序列分隔符
pub const PHONEME_DELIMITER: &str = " # ";

/// 单个样本的音素视图
#[derive(Debug, Clone, PartialEq)]
pub struct PhonemeAnalysis {
    pub text: String,
    pub phoneme_count: usize,
    pub phonemes: Vec<String>,
    pub raw_sequence: String,
    pub transcription: String,
}

/// 拆分样本的音素序列，样本不存在返回 None
pub fn analyze(corpus: &Corpus, id: &str) -> Option<PhonemeAnalysis> {
    let record = corpus.get(id)?;
    let phonemes: Vec<String> = record
        .phoneme_sequence
        .split(PHONEME_DELIMITER)
        .map(str::to_string)
        .collect();
    Some(PhonemeAnalysis {
        text: record.text.clone(),
        phoneme_count: phonemes.len(),
        phonemes,
        raw_sequence: record.phoneme_sequence.clone(),
        transcription: record.transcription.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;

    fn corpus_with(sequence: &str) -> Corpus {
        Corpus::from_records(vec![Record {
            id: "u1".to_string(),
            text: "hello".to_string(),
            category: "greeting".to_string(),
            duration_seconds: 0.4,
            phoneme_sequence: sequence.to_string(),
            transcription: "HH AH L OW".to_string(),
        }])
        .unwrap()
    }

    #[test]
    fn splits_on_padded_hash() {
        let corpus = corpus_with("hh ah # l # ow");
        let analysis = analyze(&corpus, "u1").unwrap();
        assert_eq!(analysis.phonemes, ["hh ah", "l", "ow"]);
        assert_eq!(analysis.phoneme_count, 3);
        assert_eq!(analysis.raw_sequence, "hh ah # l # ow");
        assert_eq!(analysis.transcription, "HH AH L OW");
        assert_eq!(analysis.text, "hello");
    }

    #[test]
    fn unpadded_hash_is_not_a_delimiter() {
        let corpus = corpus_with("a#b");
        assert_eq!(analyze(&corpus, "u1").unwrap().phonemes, ["a#b"]);
    }

    #[test]
    fn empty_sequence_has_one_empty_token() {
        let corpus = corpus_with("");
        let analysis = analyze(&corpus, "u1").unwrap();
        assert_eq!(analysis.phoneme_count, 1);
        assert_eq!(analysis.phonemes, [""]);
    }

    #[test]
    fn unknown_id_is_none() {
        assert!(analyze(&corpus_with("a"), "nope").is_none());
    }
}
