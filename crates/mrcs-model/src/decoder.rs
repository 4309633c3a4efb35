//! 标签解码器
//!
//! 把分类器输出的编码类别还原为人类可读的风险等级名称

use serde::{Deserialize, Serialize};

use mrcs_core::{MrcsError, Result};

use crate::pipeline::SUPPORTED_FORMAT_VERSION;

/// 标签解码器工件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelDecoder {
    pub format_version: u32,
    classes: Vec<String>,
}

impl LabelDecoder {
    pub fn new(classes: Vec<String>) -> Self {
        Self {
            format_version: SUPPORTED_FORMAT_VERSION,
            classes,
        }
    }

    /// 加载期校验
    pub fn validate(&self) -> Result<()> {
        if self.format_version != SUPPORTED_FORMAT_VERSION {
            return Err(MrcsError::ArtifactLoad(format!(
                "不支持的解码器格式版本: {} (支持 {})",
                self.format_version, SUPPORTED_FORMAT_VERSION
            )));
        }
        if self.classes.is_empty() {
            return Err(MrcsError::ArtifactLoad(
                "标签解码器没有任何类别".to_string(),
            ));
        }
        Ok(())
    }

    /// 将编码类别还原为风险等级标签
    pub fn decode(&self, class_index: usize) -> Result<&str> {
        self.classes
            .get(class_index)
            .map(|label| label.as_str())
            .ok_or_else(|| {
                MrcsError::Prediction(format!("类别编码超出标签范围: {}", class_index))
            })
    }

    /// 已知的全部风险等级标签
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn contains(&self, label: &str) -> bool {
        self.classes.iter().any(|c| c == label)
    }
}
