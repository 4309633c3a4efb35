//! 预测操作
//!
//! 将一条患者记录整形为流水线期望的命名单行输入，调用推理并解码标签。
//! 单次、同步、由用户动作触发；任何失败只影响本次请求，不影响进程。

use chrono::Utc;
use tracing::info;

use mrcs_core::{models::columns, utils, PatientRecord, Prediction, Result};

use crate::pipeline::{FeatureRow, Pipeline};
use crate::registry::LoadedArtifacts;

/// 预测失败时附带的通用提示
pub const INPUT_HINT: &str = "请确认所有输入值均有效";

/// 由患者记录构造流水线的命名单行输入
///
/// 六个字段到列名的映射是显式固定的，列齐不齐由流水线在取值时核对
pub fn feature_row(record: &PatientRecord) -> FeatureRow {
    let mut row = FeatureRow::new();
    row.set_number(columns::AGE, f64::from(record.age));
    row.set_number(columns::SYSTOLIC_BP, f64::from(record.systolic_bp));
    row.set_number(columns::DIASTOLIC_BP, f64::from(record.diastolic_bp));
    row.set_number(columns::GRAVIDA, f64::from(record.gravida));
    row.set_number(columns::HEMOGLOBIN, record.hemoglobin);
    row.set_category(
        columns::NUTRITIONAL_STATUS,
        record.nutritional_status.as_str(),
    );
    row
}

/// 单次同步预测：记录 → 特征行 → 推理 → 标签
pub fn predict(artifacts: &LoadedArtifacts, record: &PatientRecord) -> Result<Prediction> {
    let row = feature_row(record);
    let class_index = artifacts.pipeline.predict(&row)?;
    let risk_level = artifacts.decoder.decode(class_index)?;

    let prediction = Prediction {
        prediction_id: utils::generate_prediction_id(),
        risk_level: risk_level.to_string(),
        class_index,
        predicted_at: Utc::now(),
    };
    info!(
        "预测完成: {} -> {} (类别 {})",
        prediction.prediction_id, prediction.risk_level, prediction.class_index
    );
    Ok(prediction)
}
