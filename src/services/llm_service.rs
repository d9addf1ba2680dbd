//! LLM 服务 - 业务能力层
//!
//! 只负责"根据文本生成测验"能力，不关心会话流程
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use regex::Regex;
use tracing::{debug, warn};

use crate::config::{is_valid_api_key, Config};
use crate::error::ServiceError;
use crate::models::Quiz;
use crate::utils::truncate_text;

const SYSTEM_PROMPT: &str = "You are a helpful study assistant. Respond in JSON format with a quiz based on the supplied information. Follow the provided JSON structure for your response.";

/// 测验生成能力
///
/// 宿主程序只依赖这个 trait，测试中可以替换成假实现
#[async_trait]
pub trait QuizGenerator: Send + Sync {
    async fn generate_quiz(
        &self,
        source_text: &str,
        question_count: u32,
    ) -> Result<Quiz, ServiceError>;
}

/// LLM 服务
///
/// 职责：
/// - 构建测验 prompt
/// - 调用 chat completion 接口
/// - 把返回的 JSON 解析为 `Quiz`
/// - 失败时不重试，直接返回错误
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
    temperature: f32,
    max_tokens: u32,
}

impl LlmService {
    /// 创建新的 LLM 服务
    pub fn new(config: &Config, api_key: &str) -> Result<Self, ServiceError> {
        if !is_valid_api_key(api_key) {
            return Err(ServiceError::InvalidApiKey);
        }

        // 配置 OpenAI 客户端（兼容 OpenAI API 的服务）
        let openai_config = OpenAIConfig::new()
            .with_api_key(api_key.trim())
            .with_api_base(&config.llm_api_base_url);

        Ok(Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
            temperature: config.llm_temperature,
            max_tokens: config.llm_max_tokens,
        })
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// 通用的 LLM 调用函数
    ///
    /// # 参数
    /// - `user_message`: 用户消息内容
    /// - `system_message`: 系统消息（可选）
    ///
    /// # 返回
    /// 返回 LLM 的响应内容（字符串）
    pub async fn send_to_llm(
        &self,
        user_message: &str,
        system_message: Option<&str>,
    ) -> Result<String, ServiceError> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", user_message.len());

        let mut messages = Vec::new();

        if let Some(sys_msg) = system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg)
                .build()
                .map_err(|e| ServiceError::api_failed(&self.model_name, e))?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()
            .map_err(|e| ServiceError::api_failed(&self.model_name, e))?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .build()
            .map_err(|e| ServiceError::api_failed(&self.model_name, e))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            ServiceError::api_failed(&self.model_name, e)
        })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| ServiceError::EmptyContent {
                model: self.model_name.clone(),
            })?;

        Ok(content.trim().to_string())
    }
}

#[async_trait]
impl QuizGenerator for LlmService {
    async fn generate_quiz(
        &self,
        source_text: &str,
        question_count: u32,
    ) -> Result<Quiz, ServiceError> {
        debug!(
            "开始生成测验，题目数量: {}, 文本长度: {} 字符",
            question_count,
            source_text.chars().count()
        );

        let prompt = build_quiz_prompt(source_text, question_count);
        let response = self.send_to_llm(&prompt, Some(SYSTEM_PROMPT)).await?;

        parse_quiz_response(&response).map_err(|e| {
            warn!("无法解析 LLM 响应: '{}'", truncate_text(&response, 200));
            e
        })
    }
}

/// 构建生成测验的 prompt
pub fn build_quiz_prompt(source_text: &str, question_count: u32) -> String {
    format!(
        r#"Given this text: {}, create a quiz in the following JSON format:

{{
"title": "Quiz Title",
"questions_no": {},
"question_type": "mcq",
"questions": [
    {{
    "question_content": "Question 1 goes here",
    "options": [
        "Option A",
        "Option B",
        "Option C",
        "Option D"
    ],
    "answer": "Correct answer",
    "comment": "Explanation for the correct answer (optional)"
    }},
    // ... More questions (structure repeated)
]
}}
"#,
        source_text, question_count
    )
}

/// 解析 LLM 返回的测验 JSON
///
/// 模型有时会把 JSON 包在 Markdown 代码块里，先取出其中的对象再解析
pub fn parse_quiz_response(content: &str) -> Result<Quiz, ServiceError> {
    let json = extract_json_object(content)?;
    serde_json::from_str(json).map_err(ServiceError::malformed)
}

fn extract_json_object(content: &str) -> Result<&str, ServiceError> {
    let fence = Regex::new(r"(?s)```(?:json)?\s*(\{.*\})\s*```").map_err(ServiceError::malformed)?;
    if let Some(body) = fence.captures(content).and_then(|c| c.get(1)) {
        return Ok(body.as_str());
    }

    match (content.find('{'), content.rfind('}')) {
        (Some(start), Some(end)) if start < end => Ok(&content[start..=end]),
        _ => Err(ServiceError::malformed("响应中没有 JSON 对象")),
    }
}
