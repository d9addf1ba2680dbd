use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 文档相关错误
    #[error("文档错误: {0}")]
    Document(#[from] DocumentError),
    /// 全文提取错误
    #[error("文本提取错误: {0}")]
    Extraction(#[from] ExtractionError),
    /// 测验会话错误
    #[error("会话错误: {0}")]
    Session(#[from] SessionError),
    /// LLM 服务错误
    #[error("LLM错误: {0}")]
    Service(#[from] ServiceError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 没有可用于出题的文本（未加载文档、文档无文字或主题为空）
    #[error("没有可用于生成测验的文本")]
    NoSourceText,
    /// 文件读写错误
    #[error("文件错误 ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 文档相关错误
#[derive(Debug, Error)]
pub enum DocumentError {
    /// 不是 PDF 文件
    #[error("不是有效的 PDF 文件")]
    InvalidFileType,
    /// 解析失败
    #[error("PDF 解析失败: {message}")]
    Parse { message: String },
    /// 尚未加载文档
    #[error("尚未加载文档")]
    NotLoaded,
    /// 页码超出范围
    #[error("页码 {page} 超出范围 [1, {page_count}]")]
    PageAccess { page: u32, page_count: u32 },
    /// 渲染失败
    #[error("第 {page} 页渲染失败: {message}")]
    Render { page: u32, message: String },
    /// 单页文本读取失败
    #[error("第 {page} 页文本读取失败: {message}")]
    TextExtraction { page: u32, message: String },
}

/// 全文提取错误（不返回部分结果）
#[derive(Debug, Error)]
#[error("第 {page} 页提取失败，已放弃整份文档: {source}")]
pub struct ExtractionError {
    pub page: u32,
    #[source]
    pub source: DocumentError,
}

/// 测验会话错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// 未选择选项
    #[error("请选择一个选项")]
    NoSelection,
    /// 当前状态不允许该操作
    #[error("当前状态 {state} 下不能执行 {operation}")]
    InvalidTransition {
        operation: &'static str,
        state: &'static str,
    },
}

/// LLM 服务错误
#[derive(Debug, Error)]
pub enum ServiceError {
    /// API Key 无效
    #[error("API Key 无效或缺失")]
    InvalidApiKey,
    /// API 调用失败
    #[error("LLM API调用失败 (模型: {model}): {source}")]
    ApiCallFailed {
        model: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 返回内容为空
    #[error("LLM返回内容为空 (模型: {model})")]
    EmptyContent { model: String },
    /// 返回的 JSON 不符合测验格式
    #[error("无法解析测验 JSON: {message}")]
    MalformedPayload { message: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 未找到 API Key
    #[error("未找到 API Key（配置、环境变量 LLM_API_KEY 或 {key_file} 均为空）")]
    ApiKeyMissing { key_file: String },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 题目数量不合法
    #[error("题目数量 {requested} 不合法，应在 [1, {max}] 之间")]
    InvalidQuestionCount { requested: u32, max: u32 },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件读取错误
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }
}

impl DocumentError {
    pub fn parse(message: impl std::fmt::Display) -> Self {
        DocumentError::Parse {
            message: message.to_string(),
        }
    }

    pub fn render(page: u32, message: impl std::fmt::Display) -> Self {
        DocumentError::Render {
            page,
            message: message.to_string(),
        }
    }
}

impl ServiceError {
    /// 创建LLM API调用错误
    pub fn api_failed(
        model: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ServiceError::ApiCallFailed {
            model: model.into(),
            source: Box::new(source),
        }
    }

    pub fn malformed(message: impl std::fmt::Display) -> Self {
        ServiceError::MalformedPayload {
            message: message.to_string(),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
