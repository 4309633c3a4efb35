//! 模型工件文件访问
//!
//! 从磁盘读取序列化的推理流水线与标签解码器，做完整性校验并反序列化。
//! 文件缺失与内容损坏是两类不同的失败，都会中止初始化。

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use tracing::debug;

use mrcs_core::{MrcsError, Result};

/// 默认的流水线工件路径
pub const DEFAULT_MODEL_PATH: &str = "artifacts/maternal_risk_model.json";

/// 默认的标签解码器工件路径
pub const DEFAULT_ENCODER_PATH: &str = "artifacts/risk_label_encoder.json";

/// 工件文件路径配置
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub model_path: PathBuf,
    pub encoder_path: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            encoder_path: PathBuf::from(DEFAULT_ENCODER_PATH),
        }
    }
}

impl ArtifactPaths {
    pub fn new(model_path: impl Into<PathBuf>, encoder_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            encoder_path: encoder_path.into(),
        }
    }

    /// 检查两个工件文件是否都存在
    ///
    /// 任一缺失即返回 `ArtifactNotFound`，调用方必须中止初始化
    pub fn ensure_exists(&self) -> Result<()> {
        for path in [&self.model_path, &self.encoder_path] {
            if !path.exists() {
                return Err(MrcsError::ArtifactNotFound(path.display().to_string()));
            }
        }
        Ok(())
    }
}

/// 读取工件字节并做完整性校验
pub(crate) fn read_artifact_bytes(path: &Path) -> Result<Vec<u8>> {
    if !path.exists() {
        return Err(MrcsError::ArtifactNotFound(path.display().to_string()));
    }

    let bytes = std::fs::read(path)
        .map_err(|e| MrcsError::ArtifactLoad(format!("{}: {}", path.display(), e)))?;

    let digest = hex_digest(&bytes);
    debug!("工件 {} SHA-256: {}", path.display(), digest);
    verify_sidecar(path, &digest)?;

    Ok(bytes)
}

/// 反序列化 JSON 工件，任何解析失败都视为工件损坏
pub(crate) fn parse_artifact<T: DeserializeOwned>(path: &Path, bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes)
        .map_err(|e| MrcsError::ArtifactLoad(format!("{}: {}", path.display(), e)))
}

fn hex_digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// 与 `.sha256` 伴随文件核对摘要
///
/// 伴随文件不存在时跳过；存在但不匹配即视为工件损坏
fn verify_sidecar(path: &Path, digest: &str) -> Result<()> {
    let mut sidecar = path.as_os_str().to_os_string();
    sidecar.push(".sha256");
    let sidecar = PathBuf::from(sidecar);
    if !sidecar.exists() {
        return Ok(());
    }

    let recorded = std::fs::read_to_string(&sidecar)
        .map_err(|e| MrcsError::ArtifactLoad(format!("{}: {}", sidecar.display(), e)))?;
    let recorded = recorded.split_whitespace().next().unwrap_or("").to_lowercase();

    if recorded != digest {
        return Err(MrcsError::ArtifactLoad(format!(
            "{} 校验和不匹配, 记录值 {}, 实际值 {}",
            path.display(),
            recorded,
            digest
        )));
    }
    Ok(())
}
