use std::convert::Infallible;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use directories::ProjectDirs;

use crate::cli::*;
use crate::describe::{DescriptionProvider, GeminiClient};

#[derive(Parser, Debug, Clone)]
pub struct MatchOptions {
    /// 图片匹配的置信度阈值，相似度不低于该值才认为识别成功
    #[arg(long, value_name = "SCORE", default_value_t = 0.5)]
    pub threshold: f64,
}

#[derive(Parser, Debug, Clone)]
pub struct DescribeOptions {
    /// Gemini API key，设置后添加动物时会自动补全缺失的栖息地和趣味知识
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,
    /// Gemini 文本模型名称
    #[arg(long, value_name = "MODEL", default_value = "gemini-2.0-flash")]
    pub gemini_model: String,
    /// Gemini 接口地址，用于代理或私有部署
    #[arg(long, value_name = "URL")]
    pub gemini_endpoint: Option<String>,
}

impl DescribeOptions {
    /// 未配置 API key 时返回 `None`
    pub fn provider(&self) -> Option<Arc<dyn DescriptionProvider>> {
        let key = self.gemini_api_key.as_deref().filter(|k| !k.is_empty())?;
        let mut client = GeminiClient::new(key, self.gemini_model.clone());
        if let Some(endpoint) = &self.gemini_endpoint {
            client = client.with_endpoint(endpoint.trim_end_matches('/'));
        }
        Some(Arc::new(client))
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "faunara", version)]
pub struct Opts {
    #[command(subcommand)]
    pub subcmd: SubCommand,
    /// faunara 数据目录，存放数据库和上传的图片
    #[arg(short, long, global = true, default_value_t = ConfDir::default())]
    pub conf_dir: ConfDir,
}

#[derive(Subcommand, Debug, Clone)]
pub enum SubCommand {
    /// 启动 HTTP 服务
    Server(ServerCommand),
    /// 添加动物到数据库
    Add(AddCommand),
    /// 通过图片识别动物
    Identify(IdentifyCommand),
    /// 通过属性识别动物
    Classify(ClassifyCommand),
    /// 列出数据库中的所有动物
    List(ListCommand),
}

#[derive(ValueEnum, Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    Json,
    #[default]
    Table,
}

#[derive(Debug, Clone)]
pub struct ConfDir {
    path: PathBuf,
}

impl ConfDir {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    /// 返回数据库文件的路径
    pub fn database(&self) -> PathBuf {
        self.path.join("faunara.db")
    }

    /// 返回上传图片的保存目录
    pub fn uploads(&self) -> PathBuf {
        self.path.join("uploads")
    }
}

impl Default for ConfDir {
    fn default() -> Self {
        let path = ProjectDirs::from("", "faunara", "faunara")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));
        Self { path }
    }
}

impl fmt::Display for ConfDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

impl FromStr for ConfDir {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}
