//! HTTP处理器

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use mrcs_core::{MrcsError, NutritionalStatus, PatientRecord};
use mrcs_model::{Pipeline, INPUT_HINT};

use crate::server::AppState;

/// API错误响应包装
///
/// 把统一错误类型映射为带JSON错误体的HTTP响应
pub struct ApiError(MrcsError);

impl From<MrcsError> for ApiError {
    fn from(err: MrcsError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, hint) = match &self.0 {
            MrcsError::Validation(_) => (StatusCode::BAD_REQUEST, None),
            MrcsError::Prediction(_) => (StatusCode::UNPROCESSABLE_ENTITY, Some(INPUT_HINT)),
            MrcsError::ArtifactNotFound(_) | MrcsError::ArtifactLoad(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, None)
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, None),
        };

        let mut body = json!({
            "error": true,
            "message": self.0.to_string(),
            "status": status.as_u16()
        });
        if let Some(hint) = hint {
            body["hint"] = json!(hint);
        }

        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

/// 预测请求体：六个临床测量值
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub age: u16,
    pub systolic_bp: u16,
    pub diastolic_bp: u16,
    pub gravida: u16,
    pub hemoglobin: f64,
    pub nutritional_status: NutritionalStatus,
}

impl PredictRequest {
    fn into_record(self) -> PatientRecord {
        PatientRecord {
            age: self.age,
            systolic_bp: self.systolic_bp,
            diastolic_bp: self.diastolic_bp,
            gravida: self.gravida,
            hemoglobin: self.hemoglobin,
            nutritional_status: self.nutritional_status,
        }
    }
}

/// 风险分类处理器
pub async fn predict(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> ApiResult<impl IntoResponse> {
    let record = request.into_record();
    record.validate()?;

    let prediction = mrcs_model::predict(&state.artifacts, &record).map_err(|e| {
        warn!("预测请求失败: {}", e);
        e
    })?;

    info!(
        "Prediction {} served: {}",
        prediction.prediction_id, prediction.risk_level
    );

    Ok(Json(json!({
        "prediction_id": prediction.prediction_id,
        "risk_level": prediction.risk_level,
        "class_index": prediction.class_index,
        "predicted_at": prediction.predicted_at.to_rfc3339()
    })))
}

/// 模型信息处理器
pub async fn model_info(State(state): State<AppState>) -> impl IntoResponse {
    let artifacts = &state.artifacts;
    Json(json!({
        "model_name": artifacts.pipeline.model_name,
        "trained_at": artifacts.pipeline.trained_at,
        "expected_columns": artifacts.pipeline.expected_columns(),
        "classes": artifacts.decoder.classes(),
        "loaded_at": artifacts.loaded_at.to_rfc3339()
    }))
}

/// 健康检查处理器
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "artifacts_loaded": true,
        "model_name": state.artifacts.pipeline.model_name,
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": "0.1.0"
    }))
}
