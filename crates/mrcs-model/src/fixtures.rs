//! 测试夹具
//!
//! 与 `artifacts/` 下随仓库发布的演示工件保持相同的拟合参数，
//! 录制断言（固定输入对应的标签）以这里的数值为准。

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use mrcs_core::{NutritionalStatus, PatientRecord};

use crate::artifact::ArtifactPaths;
use crate::decoder::LabelDecoder;
use crate::pipeline::{
    CategoricalSpec, NumericSpec, Preprocessor, RiskPipeline, Tree, TreeEnsemble, TreeNode,
    SUPPORTED_FORMAT_VERSION,
};

fn split(feature: usize, threshold: f64, left: usize, right: usize) -> TreeNode {
    TreeNode::Split {
        feature,
        threshold,
        left,
        right,
    }
}

fn leaf(value: f64) -> TreeNode {
    TreeNode::Leaf { value }
}

/// 与演示工件一致的流水线夹具
///
/// 特征顺序: age, systolic_bp, diastolic_bp, gravida, hemoglobin,
/// 然后是 nutritional_status 的独热展开（类别按字典序）。
pub fn risk_pipeline() -> RiskPipeline {
    RiskPipeline {
        format_version: SUPPORTED_FORMAT_VERSION,
        model_name: "maternal_risk_xgb_best_overall".to_string(),
        trained_at: "2026-07-15T09:30:00Z".parse::<DateTime<Utc>>().ok(),
        preprocessor: Preprocessor {
            numeric: vec![
                NumericSpec {
                    column: "age".to_string(),
                    mean: 29.4,
                    std: 6.1,
                },
                NumericSpec {
                    column: "systolic_bp".to_string(),
                    mean: 117.8,
                    std: 15.3,
                },
                NumericSpec {
                    column: "diastolic_bp".to_string(),
                    mean: 77.2,
                    std: 10.8,
                },
                NumericSpec {
                    column: "gravida".to_string(),
                    mean: 2.3,
                    std: 1.4,
                },
                NumericSpec {
                    column: "hemoglobin".to_string(),
                    mean: 11.6,
                    std: 1.7,
                },
            ],
            categorical: vec![CategoricalSpec {
                column: "nutritional_status".to_string(),
                categories: vec![
                    "Normal".to_string(),
                    "Obese".to_string(),
                    "Overweight".to_string(),
                    "Severely Underweight".to_string(),
                    "Underweight".to_string(),
                ],
            }],
        },
        classifier: TreeEnsemble {
            n_classes: 3,
            base_margin: vec![0.5, 0.5, 0.5],
            trees: vec![
                // 类别 0: High Risk
                Tree {
                    class_index: 0,
                    nodes: vec![
                        split(1, 1.30, 1, 2),
                        split(4, -1.40, 3, 4),
                        leaf(1.10),
                        leaf(0.90),
                        leaf(-0.35),
                    ],
                },
                Tree {
                    class_index: 0,
                    nodes: vec![
                        split(2, 1.25, 1, 2),
                        split(8, 0.5, 3, 4),
                        leaf(0.95),
                        leaf(-0.30),
                        leaf(0.85),
                    ],
                },
                Tree {
                    class_index: 0,
                    nodes: vec![
                        split(0, 1.45, 1, 2),
                        leaf(-0.25),
                        split(3, 0.9, 3, 4),
                        leaf(0.40),
                        leaf(0.80),
                    ],
                },
                // 类别 1: Low Risk
                Tree {
                    class_index: 1,
                    nodes: vec![
                        split(1, 0.85, 1, 2),
                        split(4, -0.90, 3, 4),
                        leaf(-0.55),
                        leaf(-0.20),
                        leaf(0.75),
                    ],
                },
                Tree {
                    class_index: 1,
                    nodes: vec![
                        split(2, 0.95, 1, 2),
                        split(5, 0.5, 3, 4),
                        leaf(-0.45),
                        leaf(0.10),
                        leaf(0.65),
                    ],
                },
                Tree {
                    class_index: 1,
                    nodes: vec![split(0, 1.20, 1, 2), leaf(0.35), leaf(-0.40)],
                },
                // 类别 2: Mid Risk
                Tree {
                    class_index: 2,
                    nodes: vec![
                        split(1, 0.60, 1, 2),
                        leaf(-0.15),
                        split(1, 1.35, 3, 4),
                        leaf(0.70),
                        leaf(-0.20),
                    ],
                },
                Tree {
                    class_index: 2,
                    nodes: vec![
                        split(4, -0.60, 1, 2),
                        split(4, -1.50, 3, 4),
                        leaf(-0.25),
                        leaf(-0.10),
                        leaf(0.60),
                    ],
                },
                Tree {
                    class_index: 2,
                    nodes: vec![
                        split(9, 0.5, 1, 2),
                        split(7, 0.5, 3, 4),
                        leaf(0.45),
                        leaf(-0.05),
                        leaf(0.30),
                    ],
                },
            ],
        },
    }
}

/// 与演示工件一致的解码器夹具（类别按字典序，对应编码 0/1/2）
pub fn label_decoder() -> LabelDecoder {
    LabelDecoder::new(vec![
        "High Risk".to_string(),
        "Low Risk".to_string(),
        "Mid Risk".to_string(),
    ])
}

/// 录制断言用的基准输入
pub fn sample_record() -> PatientRecord {
    PatientRecord {
        age: 28,
        systolic_bp: 120,
        diastolic_bp: 80,
        gravida: 1,
        hemoglobin: 12.0,
        nutritional_status: NutritionalStatus::Normal,
    }
}

/// 每次调用返回一个全新的测试临时目录
pub fn temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("mrcs-test-{}", Uuid::new_v4().simple()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// 把夹具工件写入临时目录并返回对应路径
pub fn write_artifacts(dir: &PathBuf) -> ArtifactPaths {
    let paths = ArtifactPaths::new(dir.join("model.json"), dir.join("encoder.json"));
    std::fs::write(
        &paths.model_path,
        serde_json::to_vec_pretty(&risk_pipeline()).unwrap(),
    )
    .unwrap();
    std::fs::write(
        &paths.encoder_path,
        serde_json::to_vec_pretty(&label_decoder()).unwrap(),
    )
    .unwrap();
    paths
}
