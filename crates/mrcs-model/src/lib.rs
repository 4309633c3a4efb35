//! # MRCS Model
//!
//! 推理适配层：负责模型工件的加载与缓存、输入整形、推理调用和标签解码。
//! 实质性的计算（特征标准化、独热编码、提升树分类）全部来自外部训练导出的
//! 工件，本模块只做求值，不重建任何训练过程。

pub mod artifact;
pub mod decoder;
pub mod pipeline;
pub mod predict;
pub mod registry;

#[cfg(test)]
pub(crate) mod fixtures;

pub use artifact::{ArtifactPaths, DEFAULT_ENCODER_PATH, DEFAULT_MODEL_PATH};
pub use decoder::LabelDecoder;
pub use pipeline::{FeatureRow, Pipeline, RiskPipeline};
pub use predict::{predict, INPUT_HINT};
pub use registry::{global, ArtifactRegistry, LoadedArtifacts};
