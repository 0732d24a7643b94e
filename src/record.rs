use serde::{Deserialize, Serialize};

/// 语料中的一条语音样本
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// 样本 ID，同时是音频文件名
    #[serde(rename = "utterance_name")]
    pub id: String,
    /// 参考文本
    #[serde(rename = "words")]
    pub text: String,
    /// 分类（脚本标题）
    #[serde(rename = "script_title")]
    pub category: String,
    /// 预估时长（秒）
    #[serde(rename = "sentence_estimated_duration")]
    pub duration_seconds: f64,
    /// 音素序列，以 " # " 分隔
    #[serde(rename = "phone_sequence")]
    pub phoneme_sequence: String,
    pub transcription: String,
}

impl Record {
    /// 校验记录本身的不变量，返回错误原因
    pub fn validate(&self) -> Result<(), String> {
        if self.id.is_empty() {
            return Err("utterance_name 为空".to_string());
        }
        if self.text.trim().is_empty() {
            return Err("words 为空".to_string());
        }
        if !self.duration_seconds.is_finite() || self.duration_seconds < 0.0 {
            return Err(format!("时长无效: {}", self.duration_seconds));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Record {
        Record {
            id: "u1".to_string(),
            text: "good morning".to_string(),
            category: "greeting".to_string(),
            duration_seconds: 1.2,
            phoneme_sequence: "g # uh # d".to_string(),
            transcription: "good morning".to_string(),
        }
    }

    #[test]
    fn deserializes_serialized_field_names() {
        let line = r#"{"utterance_name":"u1","words":"good morning","script_title":"greeting","sentence_estimated_duration":1.2,"phone_sequence":"g # uh # d","transcription":"good morning"}"#;
        let record: Record = serde_json::from_str(line).unwrap();
        assert_eq!(record, sample());
    }

    #[test]
    fn rejects_blank_text_and_negative_duration() {
        let mut blank = sample();
        blank.text = "   ".to_string();
        assert!(blank.validate().is_err());

        let mut negative = sample();
        negative.duration_seconds = -0.5;
        assert!(negative.validate().is_err());

        assert!(sample().validate().is_ok());
    }
}
