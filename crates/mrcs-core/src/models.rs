//! 核心数据模型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{MrcsError, Result};

/// 预测输入的固定列名
///
/// 流水线按名选择列，这里是全系统唯一的列名来源
pub mod columns {
    pub const AGE: &str = "age";
    pub const SYSTOLIC_BP: &str = "systolic_bp";
    pub const DIASTOLIC_BP: &str = "diastolic_bp";
    pub const GRAVIDA: &str = "gravida";
    pub const HEMOGLOBIN: &str = "hemoglobin";
    pub const NUTRITIONAL_STATUS: &str = "nutritional_status";

    /// 全部六个输入列
    pub const ALL: [&str; 6] = [
        AGE,
        SYSTOLIC_BP,
        DIASTOLIC_BP,
        GRAVIDA,
        HEMOGLOBIN,
        NUTRITIONAL_STATUS,
    ];
}

/// 营养状况枚举
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum NutritionalStatus {
    Normal,
    Underweight,
    Overweight,
    Obese,
    #[serde(rename = "Severely Underweight")]
    SeverelyUnderweight,
}

impl NutritionalStatus {
    /// 工件中类别列使用的字符串表示
    pub fn as_str(&self) -> &'static str {
        match self {
            NutritionalStatus::Normal => "Normal",
            NutritionalStatus::Underweight => "Underweight",
            NutritionalStatus::Overweight => "Overweight",
            NutritionalStatus::Obese => "Obese",
            NutritionalStatus::SeverelyUnderweight => "Severely Underweight",
        }
    }

    /// 全部合法取值
    pub fn all() -> Vec<NutritionalStatus> {
        vec![
            NutritionalStatus::Normal,
            NutritionalStatus::Underweight,
            NutritionalStatus::Overweight,
            NutritionalStatus::Obese,
            NutritionalStatus::SeverelyUnderweight,
        ]
    }
}

/// 患者单次预测输入记录
///
/// 仅在一次预测调用期间存在，不做任何持久化
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientRecord {
    pub age: u16,                              // 孕妇年龄（岁）
    pub systolic_bp: u16,                      // 收缩压 (mmHg)
    pub diastolic_bp: u16,                     // 舒张压 (mmHg)
    pub gravida: u16,                          // 妊娠次数
    pub hemoglobin: f64,                       // 血红蛋白 (g/dL)
    pub nutritional_status: NutritionalStatus, // 营养状况
}

impl PatientRecord {
    /// 校验六个字段均在临床允许范围内
    ///
    /// 与表单控件的限制保持一致，推理前必须通过
    pub fn validate(&self) -> Result<()> {
        if !(15..=50).contains(&self.age) {
            return Err(MrcsError::Validation(format!(
                "年龄超出范围 (15-50): {}",
                self.age
            )));
        }
        if !(70..=180).contains(&self.systolic_bp) {
            return Err(MrcsError::Validation(format!(
                "收缩压超出范围 (70-180): {}",
                self.systolic_bp
            )));
        }
        if !(40..=120).contains(&self.diastolic_bp) {
            return Err(MrcsError::Validation(format!(
                "舒张压超出范围 (40-120): {}",
                self.diastolic_bp
            )));
        }
        if !(1..=10).contains(&self.gravida) {
            return Err(MrcsError::Validation(format!(
                "妊娠次数超出范围 (1-10): {}",
                self.gravida
            )));
        }
        if !(5.0..=19.0).contains(&self.hemoglobin) {
            return Err(MrcsError::Validation(format!(
                "血红蛋白超出范围 (5.0-19.0): {}",
                self.hemoglobin
            )));
        }
        Ok(())
    }
}

/// 单次预测结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub prediction_id: String,         // 预测记录标识符
    pub risk_level: String,            // 解码后的风险等级标签
    pub class_index: usize,            // 模型输出的编码类别
    pub predicted_at: DateTime<Utc>,
}
