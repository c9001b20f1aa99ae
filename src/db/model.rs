use log::warn;
use serde::Serialize;
use serde_json::Value;

use crate::attributes::{Attributes, parse_attributes};
use crate::similarity::flatten_vector;

/// 动物记录
#[derive(Debug, Clone, Serialize)]
pub struct AnimalRecord {
    /// 动物 ID
    pub id: i64,
    /// 名称
    pub name: String,
    /// 栖息地描述
    pub habitat: String,
    /// 趣味知识
    pub facts: String,
    /// 描述属性
    pub attributes: Attributes,
    /// 上传图片的保存路径
    pub image_path: Option<String>,
    /// 图片特征向量，仅用于匹配，不对外输出
    #[serde(skip)]
    pub feature_vector: Option<Vec<f32>>,
}

/// 待插入的动物记录
#[derive(Debug, Clone, Default)]
pub struct NewAnimal {
    pub name: String,
    pub habitat: String,
    pub facts: String,
    pub attributes: Attributes,
    pub image_path: Option<String>,
    pub feature_vector: Option<Vec<f32>>,
}

/// `animals` 表中的原始行
#[derive(Debug, sqlx::FromRow)]
pub struct AnimalRow {
    pub id: i64,
    pub name: String,
    pub habitat: Option<String>,
    pub facts: Option<String>,
    pub attributes: Option<String>,
    pub image_path: Option<String>,
    pub feature_vector: Option<String>,
}

impl From<AnimalRow> for AnimalRecord {
    fn from(row: AnimalRow) -> Self {
        let attributes = match row.attributes.as_deref().map(serde_json::from_str::<Value>) {
            Some(Ok(value)) => parse_attributes(&value).unwrap_or_else(|e| {
                warn!("动物 {} 的属性无效，已忽略: {e}", row.id);
                Attributes::new()
            }),
            Some(Err(e)) => {
                warn!("动物 {} 的属性无法解析，已忽略: {e}", row.id);
                Attributes::new()
            }
            None => Attributes::new(),
        };

        // 无法解析的特征向量视为缺失，匹配时会被跳过
        let feature_vector = row
            .feature_vector
            .as_deref()
            .and_then(|s| serde_json::from_str::<Value>(s).ok())
            .and_then(|v| flatten_vector(&v));

        Self {
            id: row.id,
            name: row.name,
            habitat: row.habitat.unwrap_or_default(),
            facts: row.facts.unwrap_or_default(),
            attributes,
            image_path: row.image_path,
            feature_vector,
        }
    }
}
