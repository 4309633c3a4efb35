//! 错误定义模块

use thiserror::Error;

/// MRCS系统统一错误类型
#[derive(Error, Debug)]
pub enum MrcsError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("模型工件未找到: {0}")]
    ArtifactNotFound(String),

    #[error("模型工件加载失败: {0}")]
    ArtifactLoad(String),

    #[error("预测失败: {0}")]
    Prediction(String),

    #[error("验证错误: {0}")]
    Validation(String),

    #[error("网络错误: {0}")]
    Network(#[from] std::io::Error),

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("系统内部错误: {0}")]
    Internal(String),
}

/// MRCS系统统一结果类型
pub type Result<T> = std::result::Result<T, MrcsError>;
