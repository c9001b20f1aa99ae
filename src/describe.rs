//! 通过外部生成式模型补全动物的栖息地和趣味知识

use anyhow::{Context, Result, anyhow};
use futures::future::BoxFuture;
use log::debug;
use serde::Deserialize;
use serde_json::json;

const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// 动物描述
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Description {
    #[serde(default)]
    pub habitat: String,
    #[serde(default)]
    pub facts: String,
}

/// 根据动物名称生成描述的能力
pub trait DescriptionProvider: Send + Sync {
    fn describe<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Description>>;
}

/// Gemini 文本生成接口
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            endpoint: GEMINI_ENDPOINT.to_string(),
        }
    }

    /// 替换接口地址，用于代理或私有部署，对应 `--gemini-endpoint`
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/{}:generateContent", self.endpoint, self.model);
        let response: GenerateResponse = self
            .http
            .post(url)
            .query(&[("key", &self.api_key)])
            .json(&json!({ "contents": [{ "parts": [{ "text": prompt }] }] }))
            .send()
            .await
            .context("Gemini Text API error")?
            .error_for_status()
            .context("Gemini Text API error")?
            .json()
            .await
            .context("Gemini Text API 返回了无法解析的内容")?;

        response
            .candidates
            .into_iter()
            .flat_map(|c| c.content.parts)
            .find_map(|p| p.text)
            .ok_or_else(|| anyhow!("Gemini Text API 没有返回文本"))
    }
}

impl DescriptionProvider for GeminiClient {
    fn describe<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Description>> {
        Box::pin(async move {
            let prompt = format!(
                "Give a short, student-friendly description of the typical habitat and 3-5 fun facts \
                 about the animal '{name}'. Respond in JSON with two keys: habitat (1-2 sentences) \
                 and facts (single paragraph)."
            );
            let text = self.generate(&prompt).await?;
            debug!("Gemini 返回: {text}");
            Ok(parse_description(name, &text))
        })
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

/// 尽力解析模型返回的描述
///
/// 优先按 `{"habitat": ..., "facts": ...}` 解析，缺失的部分使用默认栖息地和原始文本补齐
pub fn parse_description(name: &str, text: &str) -> Description {
    let text = text.trim();
    let mut description = Description::default();

    if text.contains("\"habitat\"") || text.contains("\"facts\"") {
        if let Ok(parsed) = serde_json::from_str::<Description>(strip_code_fence(text)) {
            description = parsed;
        }
    }

    if description.habitat.is_empty() {
        description.habitat = format!("The natural habitat of {name} varies across the world.");
    }
    if description.facts.is_empty() {
        description.facts = text.to_string();
    }

    description
}

/// 去掉 markdown 代码块包裹
fn strip_code_fence(text: &str) -> &str {
    let Some(inner) = text.strip_prefix("```") else {
        return text;
    };
    let inner = inner.trim_start_matches("json");
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
