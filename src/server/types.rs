use axum::body::Bytes;
use axum_typed_multipart::{FieldData, TryFromMultipart};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::db::AnimalRecord;

/// 图片识别请求
#[derive(TryFromMultipart)]
pub struct ClassifyImageRequest {
    pub image: Option<FieldData<Bytes>>,
}

/// 图片识别表单（用于API文档）
#[derive(Debug, ToSchema)]
#[allow(unused)]
pub struct ClassifyImageForm {
    /// 待识别的动物图片
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub image: String,
}

/// 属性识别请求
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ClassifyAttributesRequest {
    /// 属性表，可以是 JSON object，也可以是编码了 JSON object 的字符串
    #[serde(default)]
    #[schema(value_type = Object)]
    pub attributes: Value,
}

/// 添加动物请求
#[derive(TryFromMultipart)]
pub struct AddAnimalRequest {
    pub name: Option<String>,
    pub habitat: Option<String>,
    pub facts: Option<String>,
    pub attributes: Option<String>,
    pub image: Option<FieldData<Bytes>>,
}

/// 添加动物表单（用于API文档）
#[derive(Debug, ToSchema)]
#[allow(unused)]
pub struct AddAnimalForm {
    /// 动物名称
    pub name: String,
    /// 栖息地描述
    pub habitat: Option<String>,
    /// 趣味知识
    pub facts: Option<String>,
    /// JSON 编码的属性表，例如 `{"legs": 4, "diet": "herbivore"}`
    pub attributes: Option<String>,
    /// 动物图片
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub image: Option<String>,
}

/// 识别成功的响应
#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<&'static str>,
    pub match_score: f64,
    pub animal: AnimalRecord,
}

/// 图片没有可信匹配时的响应
#[derive(Debug, Serialize)]
pub struct NoMatchResponse {
    pub error: &'static str,
    pub message: &'static str,
    pub match_score: Option<f64>,
    pub suggestion: &'static str,
}

/// 添加动物成功的响应
#[derive(Debug, Serialize, ToSchema)]
pub struct AddAnimalResponse {
    pub message: &'static str,
    /// 新动物的 ID
    pub id: i64,
}
