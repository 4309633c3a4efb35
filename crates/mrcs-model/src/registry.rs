//! 工件注册表
//!
//! 进程级只读缓存：流水线与标签解码器在首次使用时一次性加载，
//! 成功后在进程生命周期内共享，不再显式释放。加载后的工件不可变，
//! 并发读取无需加锁。

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use chrono::{DateTime, Utc};
use tracing::info;

use mrcs_core::{models::columns, MrcsError, Result};

use crate::artifact::{self, ArtifactPaths};
use crate::decoder::LabelDecoder;
use crate::pipeline::{Pipeline, RiskPipeline};

/// 已加载的工件对
#[derive(Debug, Clone)]
pub struct LoadedArtifacts {
    pub pipeline: RiskPipeline,
    pub decoder: LabelDecoder,
    pub loaded_at: DateTime<Utc>,
}

impl LoadedArtifacts {
    /// 独占加载两个工件并完成全部加载期校验
    ///
    /// 两个文件都存在才开始读取，任一校验失败整体失败，不做部分加载
    pub fn load(paths: &ArtifactPaths) -> Result<Self> {
        paths.ensure_exists()?;

        let model_bytes = artifact::read_artifact_bytes(&paths.model_path)?;
        let pipeline: RiskPipeline = artifact::parse_artifact(&paths.model_path, &model_bytes)?;
        pipeline.validate(&columns::ALL)?;

        let encoder_bytes = artifact::read_artifact_bytes(&paths.encoder_path)?;
        let decoder: LabelDecoder =
            artifact::parse_artifact(&paths.encoder_path, &encoder_bytes)?;
        decoder.validate()?;

        if decoder.classes().len() != pipeline.classifier.n_classes {
            return Err(MrcsError::ArtifactLoad(format!(
                "解码器类别数 {} 与分类器类别数 {} 不一致",
                decoder.classes().len(),
                pipeline.classifier.n_classes
            )));
        }

        // 特征自省仅用于诊断输出，推理按名取列，不依赖该顺序
        info!(
            "模型 {} 加载完成, 期望特征列: {:?}",
            pipeline.model_name,
            pipeline.expected_columns()
        );

        Ok(Self {
            pipeline,
            decoder,
            loaded_at: Utc::now(),
        })
    }
}

/// 一次性初始化的工件缓存
///
/// 服务进程使用 [`global`] 返回的进程级实例；测试可以各自实例化
#[derive(Debug, Default)]
pub struct ArtifactRegistry {
    cell: OnceLock<Arc<LoadedArtifacts>>,
    disk_loads: AtomicUsize,
}

impl ArtifactRegistry {
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
            disk_loads: AtomicUsize::new(0),
        }
    }

    /// 获取缓存的工件，未加载时按给定路径加载一次
    ///
    /// 缓存命中时不再访问磁盘；并发竞争下以最先写入的结果为准
    pub fn get_or_load(&self, paths: &ArtifactPaths) -> Result<Arc<LoadedArtifacts>> {
        if let Some(loaded) = self.cell.get() {
            return Ok(loaded.clone());
        }

        let loaded = Arc::new(LoadedArtifacts::load(paths)?);
        self.disk_loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.cell.get_or_init(|| loaded).clone())
    }

    /// 实际从磁盘加载成功的次数
    pub fn disk_load_count(&self) -> usize {
        self.disk_loads.load(Ordering::SeqCst)
    }

    /// 已缓存的工件（若尚未加载则为 None）
    pub fn loaded(&self) -> Option<Arc<LoadedArtifacts>> {
        self.cell.get().cloned()
    }
}

static GLOBAL_REGISTRY: ArtifactRegistry = ArtifactRegistry::new();

/// 进程级全局注册表
pub fn global() -> &'static ArtifactRegistry {
    &GLOBAL_REGISTRY
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use mrcs_core::MrcsError;

    #[test]
    fn test_load_from_disk() {
        let dir = fixtures::temp_dir();
        let paths = fixtures::write_artifacts(&dir);

        let loaded = LoadedArtifacts::load(&paths).unwrap();
        assert_eq!(loaded.pipeline.model_name, "maternal_risk_xgb_best_overall");
        assert_eq!(loaded.decoder.classes().len(), 3);
    }

    #[test]
    fn test_missing_model_file() {
        let dir = fixtures::temp_dir();
        let paths = fixtures::write_artifacts(&dir);
        std::fs::remove_file(&paths.model_path).unwrap();

        let err = LoadedArtifacts::load(&paths).unwrap_err();
        assert!(matches!(err, MrcsError::ArtifactNotFound(_)));
    }

    #[test]
    fn test_missing_encoder_file() {
        let dir = fixtures::temp_dir();
        let paths = fixtures::write_artifacts(&dir);
        std::fs::remove_file(&paths.encoder_path).unwrap();

        let err = LoadedArtifacts::load(&paths).unwrap_err();
        assert!(matches!(err, MrcsError::ArtifactNotFound(_)));
    }

    #[test]
    fn test_corrupt_model_file() {
        let dir = fixtures::temp_dir();
        let paths = fixtures::write_artifacts(&dir);
        std::fs::write(&paths.model_path, b"{ definitely broken").unwrap();

        let err = LoadedArtifacts::load(&paths).unwrap_err();
        assert!(matches!(err, MrcsError::ArtifactLoad(_)));
    }

    #[test]
    fn test_schema_mismatch_fails_at_load() {
        let dir = fixtures::temp_dir();
        let paths = fixtures::write_artifacts(&dir);

        // 把一个输入列改成流水线不认识的名字
        let mut pipeline = fixtures::risk_pipeline();
        pipeline.preprocessor.numeric[0].column = "maternal_age".to_string();
        std::fs::write(
            &paths.model_path,
            serde_json::to_vec_pretty(&pipeline).unwrap(),
        )
        .unwrap();

        let err = LoadedArtifacts::load(&paths).unwrap_err();
        assert!(matches!(err, MrcsError::ArtifactLoad(_)));
    }

    #[test]
    fn test_class_count_mismatch_fails_at_load() {
        let dir = fixtures::temp_dir();
        let paths = fixtures::write_artifacts(&dir);

        let decoder = LabelDecoder::new(vec!["Only".to_string()]);
        std::fs::write(
            &paths.encoder_path,
            serde_json::to_vec_pretty(&decoder).unwrap(),
        )
        .unwrap();

        let err = LoadedArtifacts::load(&paths).unwrap_err();
        assert!(matches!(err, MrcsError::ArtifactLoad(_)));
    }

    #[test]
    fn test_registry_caches_single_disk_load() {
        let dir = fixtures::temp_dir();
        let paths = fixtures::write_artifacts(&dir);

        let registry = ArtifactRegistry::new();
        let first = registry.get_or_load(&paths).unwrap();
        let second = registry.get_or_load(&paths).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.disk_load_count(), 1);

        // 缓存命中后即使文件被删掉也不再访问磁盘
        std::fs::remove_file(&paths.model_path).unwrap();
        assert!(registry.get_or_load(&paths).is_ok());
        assert_eq!(registry.disk_load_count(), 1);
    }

    #[test]
    fn test_registry_failure_leaves_cache_empty() {
        let dir = fixtures::temp_dir();
        let paths = ArtifactPaths::new(dir.join("missing.json"), dir.join("missing2.json"));

        let registry = ArtifactRegistry::new();
        assert!(registry.get_or_load(&paths).is_err());
        assert!(registry.loaded().is_none());
        assert_eq!(registry.disk_load_count(), 0);

        // 失败后补齐工件可以再次尝试加载
        let paths = fixtures::write_artifacts(&dir);
        assert!(registry.get_or_load(&paths).is_ok());
        assert_eq!(registry.disk_load_count(), 1);
    }

    #[test]
    fn test_load_repository_demo_artifacts() {
        // 仓库内随附的演示工件必须始终可加载
        let paths = ArtifactPaths::new(
            concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/../../artifacts/maternal_risk_model.json"
            ),
            concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/../../artifacts/risk_label_encoder.json"
            ),
        );

        let loaded = LoadedArtifacts::load(&paths).unwrap();
        assert_eq!(loaded.pipeline.classifier.n_classes, 3);
    }
}
