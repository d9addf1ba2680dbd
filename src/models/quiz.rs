use serde::{Deserialize, Serialize};

/// 单道题目
///
/// 从 LLM 返回后不再修改。字段名与 LLM 的 JSON 格式对应关系：
/// `question_content → content`、`answer → correct_answer`、`comment → explanation`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "question_content")]
    pub content: String,
    #[serde(default, deserialize_with = "deserialize_options")]
    pub options: Vec<String>,
    #[serde(rename = "answer")]
    pub correct_answer: String,
    #[serde(rename = "comment", default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Question {
    pub fn new(content: impl Into<String>, options: &[&str], correct_answer: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            options: options.iter().map(|o| o.to_string()).collect(),
            correct_answer: correct_answer.into(),
            explanation: None,
        }
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }
}

/// 一份测验
///
/// `question_count` 是生成请求时声明的题目数量，不一定等于 `questions.len()`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "QuizPayload")]
pub struct Quiz {
    pub title: String,
    pub question_count: u32,
    pub questions: Vec<Question>,
}

impl Quiz {
    pub fn new(title: impl Into<String>, question_count: u32, questions: Vec<Question>) -> Self {
        Self {
            title: title.into(),
            question_count,
            questions,
        }
    }
}

/// 测验成绩
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizSummary {
    pub title: String,
    pub score: u32,
    /// 声明的题目数量（`question_count`）
    pub total_questions: u32,
}

/// LLM 返回的原始 JSON 结构
///
/// `title` 和 `questions` 必须存在，否则不是测验
#[derive(Debug, Deserialize)]
struct QuizPayload {
    title: String,
    #[serde(default, deserialize_with = "deserialize_count")]
    questions_no: Option<u32>,
    questions: Vec<Question>,
}

impl From<QuizPayload> for Quiz {
    fn from(payload: QuizPayload) -> Self {
        let question_count = payload
            .questions_no
            .unwrap_or(payload.questions.len() as u32);
        Self {
            title: payload.title,
            question_count,
            questions: payload.questions,
        }
    }
}

// options 可能缺失或为 null
fn deserialize_options<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

// questions_no 可能是数字，也可能是数字字符串
fn deserialize_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Visitor;
    use std::fmt;

    struct CountVisitor;

    impl<'de> Visitor<'de> for CountVisitor {
        type Value = Option<u32>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a non-negative integer or a numeric string")
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            u32::try_from(value)
                .map(Some)
                .map_err(|_| E::custom(format!("questions_no 过大: {}", value)))
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            u32::try_from(value)
                .map(Some)
                .map_err(|_| E::custom(format!("questions_no 不合法: {}", value)))
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            if value.fract() == 0.0 && value >= 0.0 && value <= u32::MAX as f64 {
                Ok(Some(value as u32))
            } else {
                Err(E::custom(format!("questions_no 不合法: {}", value)))
            }
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            value
                .trim()
                .parse::<u32>()
                .map(Some)
                .map_err(|_| E::custom(format!("questions_no 不合法: {}", value)))
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(None)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(None)
        }
    }

    deserializer.deserialize_any(CountVisitor)
}
