//! 推理流水线
//!
//! 外部训练导出的流水线工件：拟合的预处理器（数值标准化 + 类别独热编码）
//! 加上梯度提升树分类器。本模块只对拟合状态求值，列选择一律按名进行，
//! 与调用方提供的列顺序无关。

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mrcs_core::{MrcsError, Result};

/// 支持的工件格式版本
pub const SUPPORTED_FORMAT_VERSION: u32 = 1;

/// 单行命名特征输入
///
/// 流水线按列名取值；期望的列缺失即报预测错误，绝不默默补默认值
#[derive(Debug, Clone, Default)]
pub struct FeatureRow {
    values: BTreeMap<String, FeatureValue>,
}

/// 特征值：数值或类别
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    Number(f64),
    Category(String),
}

impl FeatureRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_number(&mut self, column: &str, value: f64) {
        self.values.insert(column.to_string(), FeatureValue::Number(value));
    }

    pub fn set_category(&mut self, column: &str, value: &str) {
        self.values
            .insert(column.to_string(), FeatureValue::Category(value.to_string()));
    }

    fn number(&self, column: &str) -> Result<f64> {
        match self.values.get(column) {
            Some(FeatureValue::Number(v)) => Ok(*v),
            Some(FeatureValue::Category(_)) => Err(MrcsError::Prediction(format!(
                "列 {} 期望数值, 实际为类别",
                column
            ))),
            None => Err(MrcsError::Prediction(format!("输入缺少必需列: {}", column))),
        }
    }

    fn category(&self, column: &str) -> Result<&str> {
        match self.values.get(column) {
            Some(FeatureValue::Category(v)) => Ok(v.as_str()),
            Some(FeatureValue::Number(_)) => Err(MrcsError::Prediction(format!(
                "列 {} 期望类别, 实际为数值",
                column
            ))),
            None => Err(MrcsError::Prediction(format!("输入缺少必需列: {}", column))),
        }
    }
}

/// 数值列的拟合标准化参数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericSpec {
    pub column: String,
    pub mean: f64,
    pub std: f64,
}

/// 类别列的拟合独热编码参数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoricalSpec {
    pub column: String,
    pub categories: Vec<String>,
}

/// 拟合的预处理器
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preprocessor {
    pub numeric: Vec<NumericSpec>,
    pub categorical: Vec<CategoricalSpec>,
}

impl Preprocessor {
    /// 原始输入列名（数值列在前，类别列在后）
    pub fn input_columns(&self) -> Vec<&str> {
        self.numeric
            .iter()
            .map(|s| s.column.as_str())
            .chain(self.categorical.iter().map(|s| s.column.as_str()))
            .collect()
    }

    /// 展开后的全部特征列名，含独热展开列
    ///
    /// 仅用于诊断与模型信息接口，推理本身不依赖该顺序信息
    pub fn expanded_columns(&self) -> Vec<String> {
        let mut columns: Vec<String> =
            self.numeric.iter().map(|s| s.column.clone()).collect();
        for spec in &self.categorical {
            for category in &spec.categories {
                columns.push(format!("{}_{}", spec.column, category));
            }
        }
        columns
    }

    /// 将单行命名输入变换为定长特征向量
    pub fn transform(&self, row: &FeatureRow) -> Result<Vec<f64>> {
        let mut features = Vec::with_capacity(self.feature_count());

        for spec in &self.numeric {
            let value = row.number(&spec.column)?;
            features.push((value - spec.mean) / spec.std);
        }

        for spec in &self.categorical {
            let value = row.category(&spec.column)?;
            let hit = spec.categories.iter().position(|c| c == value).ok_or_else(|| {
                MrcsError::Prediction(format!("列 {} 出现未知类别: {}", spec.column, value))
            })?;
            for index in 0..spec.categories.len() {
                features.push(if index == hit { 1.0 } else { 0.0 });
            }
        }

        Ok(features)
    }

    /// 变换后的特征向量长度
    pub fn feature_count(&self) -> usize {
        self.numeric.len()
            + self
                .categorical
                .iter()
                .map(|s| s.categories.len())
                .sum::<usize>()
    }

    fn validate(&self) -> Result<()> {
        for spec in &self.numeric {
            if spec.std <= 0.0 || !spec.std.is_finite() || !spec.mean.is_finite() {
                return Err(MrcsError::ArtifactLoad(format!(
                    "数值列 {} 的标准化参数无效 (mean={}, std={})",
                    spec.column, spec.mean, spec.std
                )));
            }
        }
        for spec in &self.categorical {
            if spec.categories.is_empty() {
                return Err(MrcsError::ArtifactLoad(format!(
                    "类别列 {} 没有任何类别",
                    spec.column
                )));
            }
            let unique: HashSet<&str> = spec.categories.iter().map(|c| c.as_str()).collect();
            if unique.len() != spec.categories.len() {
                return Err(MrcsError::ArtifactLoad(format!(
                    "类别列 {} 存在重复类别",
                    spec.column
                )));
            }
        }
        Ok(())
    }
}

/// 决策树节点：内部分裂节点或叶子
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

/// 单棵回归树
///
/// 叶子值累加到 `class_index` 对应类别的边际得分
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    pub class_index: usize,
    pub nodes: Vec<TreeNode>,
}

impl Tree {
    fn score(&self, features: &[f64]) -> Result<f64> {
        let mut index = 0usize;
        loop {
            match self.nodes.get(index) {
                Some(TreeNode::Leaf { value }) => return Ok(*value),
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let value = features.get(*feature).ok_or_else(|| {
                        MrcsError::Prediction(format!("特征索引越界: {}", feature))
                    })?;
                    index = if *value < *threshold { *left } else { *right };
                }
                None => {
                    return Err(MrcsError::Prediction(format!("树节点索引越界: {}", index)))
                }
            }
        }
    }

    fn validate(&self, tree_index: usize, n_features: usize, n_classes: usize) -> Result<()> {
        if self.class_index >= n_classes {
            return Err(MrcsError::ArtifactLoad(format!(
                "第 {} 棵树的类别编码越界: {}",
                tree_index, self.class_index
            )));
        }
        if self.nodes.is_empty() {
            return Err(MrcsError::ArtifactLoad(format!(
                "第 {} 棵树没有任何节点",
                tree_index
            )));
        }
        for (node_index, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } = node
            {
                if *feature >= n_features {
                    return Err(MrcsError::ArtifactLoad(format!(
                        "第 {} 棵树节点 {} 的特征索引越界: {}",
                        tree_index, node_index, feature
                    )));
                }
                if !threshold.is_finite() {
                    return Err(MrcsError::ArtifactLoad(format!(
                        "第 {} 棵树节点 {} 的阈值无效",
                        tree_index, node_index
                    )));
                }
                // 子节点索引必须指向后方，保证遍历必然终止于叶子
                if *left <= node_index || *right <= node_index {
                    return Err(MrcsError::ArtifactLoad(format!(
                        "第 {} 棵树节点 {} 的子节点索引无效",
                        tree_index, node_index
                    )));
                }
                if *left >= self.nodes.len() || *right >= self.nodes.len() {
                    return Err(MrcsError::ArtifactLoad(format!(
                        "第 {} 棵树节点 {} 的子节点索引越界",
                        tree_index, node_index
                    )));
                }
            }
        }
        Ok(())
    }
}

/// 梯度提升树分类器（外部训练完成的拟合状态）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEnsemble {
    pub n_classes: usize,
    pub base_margin: Vec<f64>,
    pub trees: Vec<Tree>,
}

impl TreeEnsemble {
    /// 累加各类别边际得分并返回得分最高的类别编码
    fn predict_class(&self, features: &[f64]) -> Result<usize> {
        let mut margins = self.base_margin.clone();
        for tree in &self.trees {
            let leaf = tree.score(features)?;
            let margin = margins.get_mut(tree.class_index).ok_or_else(|| {
                MrcsError::Prediction(format!("树的类别编码越界: {}", tree.class_index))
            })?;
            *margin += leaf;
        }

        margins
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(index, _)| index)
            .ok_or_else(|| MrcsError::Prediction("分类器没有任何类别".to_string()))
    }

    fn validate(&self, n_features: usize) -> Result<()> {
        if self.n_classes == 0 {
            return Err(MrcsError::ArtifactLoad("分类器类别数为 0".to_string()));
        }
        if self.base_margin.len() != self.n_classes {
            return Err(MrcsError::ArtifactLoad(format!(
                "基准边际长度 {} 与类别数 {} 不一致",
                self.base_margin.len(),
                self.n_classes
            )));
        }
        for (tree_index, tree) in self.trees.iter().enumerate() {
            tree.validate(tree_index, n_features, self.n_classes)?;
        }
        Ok(())
    }
}

/// 推理接口：对单行命名输入返回编码类别
///
/// 具体的已训练对象作为注入依赖实现该接口，调用方不感知其内部变换组合
pub trait Pipeline {
    fn predict(&self, row: &FeatureRow) -> Result<usize>;
    fn expected_columns(&self) -> Vec<String>;
}

/// 风险分类流水线工件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskPipeline {
    pub format_version: u32,
    pub model_name: String,
    pub trained_at: Option<DateTime<Utc>>,
    pub preprocessor: Preprocessor,
    pub classifier: TreeEnsemble,
}

impl RiskPipeline {
    /// 加载期结构校验与列模式核对
    ///
    /// 工件声明的输入列必须与既知的记录字段完全一致。任何出入（缺列、
    /// 多列、重复列）都在加载期报错，绝不以空列方式静默容忍。
    pub fn validate(&self, expected_input_columns: &[&str]) -> Result<()> {
        if self.format_version != SUPPORTED_FORMAT_VERSION {
            return Err(MrcsError::ArtifactLoad(format!(
                "不支持的工件格式版本: {} (支持 {})",
                self.format_version, SUPPORTED_FORMAT_VERSION
            )));
        }

        self.preprocessor.validate()?;

        let declared = self.preprocessor.input_columns();
        let declared_set: HashSet<&str> = declared.iter().copied().collect();
        if declared_set.len() != declared.len() {
            return Err(MrcsError::ArtifactLoad("工件声明了重复的输入列".to_string()));
        }

        let expected_set: HashSet<&str> = expected_input_columns.iter().copied().collect();
        let missing: Vec<&str> = expected_set.difference(&declared_set).copied().collect();
        if !missing.is_empty() {
            return Err(MrcsError::ArtifactLoad(format!(
                "工件缺少输入列: {}",
                missing.join(", ")
            )));
        }
        let extra: Vec<&str> = declared_set.difference(&expected_set).copied().collect();
        if !extra.is_empty() {
            return Err(MrcsError::ArtifactLoad(format!(
                "工件声明了未知输入列: {}",
                extra.join(", ")
            )));
        }

        self.classifier.validate(self.preprocessor.feature_count())
    }
}

impl Pipeline for RiskPipeline {
    fn predict(&self, row: &FeatureRow) -> Result<usize> {
        let features = self.preprocessor.transform(row)?;
        self.classifier.predict_class(&features)
    }

    fn expected_columns(&self) -> Vec<String> {
        self.preprocessor.expanded_columns()
    }
}
