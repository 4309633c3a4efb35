//! 配置管理
//!
//! 配置文件 + MRCS 前缀环境变量 + 内置默认值三层合并，启动时一次性校验。
//! 运行期间没有任何配置变更，不提供热更新。

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use mrcs_model::{DEFAULT_ENCODER_PATH, DEFAULT_MODEL_PATH};

/// 系统完整配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MrcsConfig {
    /// 服务器配置
    pub server: ServerConfig,
    /// 工件配置
    pub artifacts: ArtifactConfig,
    /// 日志配置
    pub logging: LoggingConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 监听主机
    pub host: String,
    /// 监听端口
    pub port: u16,
}

/// 工件配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    /// 流水线工件路径
    pub model_path: String,
    /// 标签解码器工件路径
    pub encoder_path: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            model_path: DEFAULT_MODEL_PATH.to_string(),
            encoder_path: DEFAULT_ENCODER_PATH.to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl MrcsConfig {
    /// 加载配置
    ///
    /// 可选配置文件在前，MRCS__ 前缀环境变量覆盖在后，未给出的项用默认值
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path));
        }

        let settings = builder
            .add_source(
                Environment::with_prefix("MRCS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("无法构建配置")?;

        let config: MrcsConfig = settings
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// 校验配置
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            bail!("服务器端口不能为 0");
        }
        if self.server.host.trim().is_empty() {
            bail!("监听主机不能为空");
        }
        if self.artifacts.model_path.trim().is_empty() {
            bail!("流水线工件路径不能为空");
        }
        if self.artifacts.encoder_path.trim().is_empty() {
            bail!("标签解码器工件路径不能为空");
        }
        Ok(())
    }
}
