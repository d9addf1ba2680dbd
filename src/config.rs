use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{AppError, AppResult, ConfigError};

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "pdf_doc_quiz.toml";

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    pub llm_temperature: f32,
    pub llm_max_tokens: u32,
    // --- 测验配置 ---
    /// 从 PDF 生成测验时的默认题目数量
    pub default_question_count: u32,
    /// 单次测验允许的最大题目数量
    pub max_question_count: u32,
    /// 存放 API Key 的文件
    pub api_key_file: String,
    /// 终端渲染页面时的行宽
    pub render_width: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 测验成绩记录文件
    pub results_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o".to_string(),
            llm_temperature: 0.5,
            llm_max_tokens: 4096,
            default_question_count: 10,
            max_question_count: 10,
            api_key_file: "apikey.txt".to_string(),
            render_width: 80,
            verbose_logging: false,
            results_log_file: "quiz_results.txt".to_string(),
        }
    }
}

impl Config {
    /// 默认值 ← TOML 文件（若存在）← 环境变量
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        let base = if path.exists() {
            info!("📄 读取配置文件: {}", path.display());
            Self::from_toml_file(path)?
        } else {
            debug!("配置文件 {} 不存在，使用默认配置", path.display());
            Self::default()
        };
        Ok(base.with_env_overrides())
    }

    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::io(path.display().to_string(), e))?;
        Self::from_toml_str(&content, &path.display().to_string())
    }

    pub fn from_toml_str(content: &str, origin: &str) -> AppResult<Self> {
        toml::from_str(content).map_err(|source| {
            ConfigError::TomlParseFailed {
                path: origin.to_string(),
                source,
            }
            .into()
        })
    }

    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    fn with_env_overrides(self) -> Self {
        let base = self;
        Self {
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(base.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(base.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(base.llm_model_name),
            llm_temperature: std::env::var("LLM_TEMPERATURE").ok().and_then(|v| v.parse().ok()).unwrap_or(base.llm_temperature),
            llm_max_tokens: std::env::var("LLM_MAX_TOKENS").ok().and_then(|v| v.parse().ok()).unwrap_or(base.llm_max_tokens),
            default_question_count: std::env::var("DEFAULT_QUESTION_COUNT").ok().and_then(|v| v.parse().ok()).unwrap_or(base.default_question_count),
            max_question_count: std::env::var("MAX_QUESTION_COUNT").ok().and_then(|v| v.parse().ok()).unwrap_or(base.max_question_count),
            api_key_file: std::env::var("API_KEY_FILE").unwrap_or(base.api_key_file),
            render_width: std::env::var("RENDER_WIDTH").ok().and_then(|v| v.parse().ok()).unwrap_or(base.render_width),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(base.verbose_logging),
            results_log_file: std::env::var("RESULTS_LOG_FILE").unwrap_or(base.results_log_file),
        }
    }

    /// 检查题目数量是否在 [1, max_question_count] 内
    pub fn validate_question_count(&self, requested: u32) -> Result<u32, ConfigError> {
        if requested == 0 || requested > self.max_question_count {
            return Err(ConfigError::InvalidQuestionCount {
                requested,
                max: self.max_question_count,
            });
        }
        Ok(requested)
    }

    /// 按 配置/环境变量 → key 文件 的顺序查找 API Key
    ///
    /// 都找不到时返回 `None`，由调用方决定是否交互式询问
    pub fn resolve_api_key(&self) -> Option<String> {
        if is_valid_api_key(&self.llm_api_key) {
            return Some(self.llm_api_key.trim().to_string());
        }

        match std::fs::read_to_string(&self.api_key_file) {
            Ok(content) if is_valid_api_key(&content) => {
                debug!("从 {} 读取 API Key", self.api_key_file);
                Some(content.trim().to_string())
            }
            Ok(_) => None,
            Err(e) => {
                debug!("无法读取 {}: {}", self.api_key_file, e);
                None
            }
        }
    }
}

/// API Key 去除空白后非空即视为有效
pub fn is_valid_api_key(key: &str) -> bool {
    !key.trim().is_empty()
}
