use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::{Error, Result};

const NOT_AN_OBJECT: &str = "Attributes must be a JSON object or dict.";

/// 属性表，属性名 => 属性值
pub type Attributes = BTreeMap<String, AttributeValue>;

/// 单个属性值
///
/// 数值和字符串之外的值（`null`、数组、嵌套对象）原样保留，比较时按字符串处理
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Number(Number),
    Text(String),
    Other(Value),
}

impl AttributeValue {
    /// 尝试将属性值解释为数值，字符串会先去掉首尾空白再解析
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Other(_) => None,
        }
    }

    /// 用于字符串比较的规范形式
    pub fn normalized(&self) -> String {
        self.to_string().trim().to_lowercase()
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::Other(v) => write!(f, "{v}"),
        }
    }
}

impl From<i64> for AttributeValue {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl From<f64> for AttributeValue {
    fn from(n: f64) -> Self {
        match Number::from_f64(n) {
            Some(n) => Self::Number(n),
            None => Self::Text(n.to_string()),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// 规范化用户提交的属性
///
/// 接受 JSON object、`null` 或者一个编码了 JSON object 的字符串
pub fn parse_attributes(raw: &Value) -> Result<Attributes> {
    match raw {
        Value::Null => Ok(Attributes::new()),
        Value::Object(map) => from_object(map),
        Value::String(s) => parse_attributes_str(Some(s.as_str())),
        _ => Err(Error::InvalidAttributes(NOT_AN_OBJECT.to_string())),
    }
}

/// 规范化表单字段中的属性，字段缺失或为空时返回空表
pub fn parse_attributes_str(raw: Option<&str>) -> Result<Attributes> {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Ok(Attributes::new());
    }
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| Error::InvalidAttributes(format!("Invalid attributes JSON: {e}")))?;
    match value {
        Value::Object(map) => from_object(&map),
        _ => Err(Error::InvalidAttributes(NOT_AN_OBJECT.to_string())),
    }
}

fn from_object(map: &Map<String, Value>) -> Result<Attributes> {
    Ok(map.iter().map(|(key, value)| (key.clone(), AttributeValue::from(value))).collect())
}

impl From<&Value> for AttributeValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Number(n) => Self::Number(n.clone()),
            Value::String(s) => Self::Text(s.clone()),
            // 布尔值只参与字符串比较，`true` 不会与数值 1 匹配
            Value::Bool(b) => Self::Text(b.to_string()),
            other => Self::Other(other.clone()),
        }
    }
}
