use clap::Parser;
use log::{error, info};
use prometheus::{BasicAuthentication, labels};
use tokio::net::TcpListener;
use tokio::task::spawn_blocking;
use tokio::time::{Duration, sleep};

use crate::cli::SubCommandExtend;
use crate::config::{DescribeOptions, MatchOptions};
use crate::{CatalogBuilder, Opts, server};

#[derive(Parser, Debug, Clone)]
pub struct ServerCommand {
    #[command(flatten)]
    pub matching: MatchOptions,
    #[command(flatten)]
    pub describe: DescribeOptions,
    /// 监听地址
    #[arg(long, default_value = "127.0.0.1:8000")]
    pub addr: String,
    /// 请求体大小上限，单位为 MiB
    #[arg(long, value_name = "MIB", default_value_t = 10)]
    pub body_limit: usize,
    /// prometheus 主动推送地址
    #[arg(long, value_name = "URL")]
    pub prometheus_push: Option<String>,
    /// 自定义 instance 标签值
    #[arg(long, value_name = "NAME")]
    pub prometheus_instance: Option<String>,
    /// prometheus 认证信息，格式为 username:password
    #[arg(long, value_name = "AUTH")]
    pub prometheus_auth: Option<String>,
}

impl ServerCommand {
    fn prometheus_auth(&self) -> anyhow::Result<Option<(String, String)>> {
        self.prometheus_auth
            .as_deref()
            .map(|s| {
                let (username, password) = s
                    .split_once(':')
                    .ok_or_else(|| anyhow::anyhow!("prometheus 认证信息格式应为 username:password"))?;
                Ok((username.to_string(), password.to_string()))
            })
            .transpose()
    }
}

impl SubCommandExtend for ServerCommand {
    async fn run(&self, opts: &Opts) -> anyhow::Result<()> {
        let catalog = CatalogBuilder::new(opts.conf_dir.clone())
            .default_features()
            .describer(self.describe.provider())
            .open()
            .await?;
        info!("数据库中共有 {} 种动物", catalog.count().await?);

        // 创建应用状态
        let state = server::AppState::new(catalog, self.matching.threshold, self.body_limit * 1024 * 1024);

        // 创建应用
        let app = server::create_app(state);

        if let Some(url) = self.prometheus_push.clone() {
            let instance = self.prometheus_instance.clone().unwrap_or_else(|| self.addr.clone());
            let auth = self.prometheus_auth()?;
            tokio::spawn(async move {
                loop {
                    let metric_families = prometheus::gather();
                    let url = url.clone();
                    let instance = instance.clone();
                    let auth = auth.clone();
                    let r = spawn_blocking(move || {
                        prometheus::push_metrics(
                            "faunara",
                            labels! {
                                "instance".to_string() => instance,
                            },
                            &url,
                            metric_families,
                            auth.map(|(username, password)| BasicAuthentication {
                                username,
                                password,
                            }),
                        )
                    })
                    .await;
                    match r {
                        Ok(Err(e)) => error!("推送指标失败: {e}"),
                        Err(e) => error!("推送任务异常退出: {e}"),
                        Ok(Ok(())) => {}
                    }
                    sleep(Duration::from_secs(30)).await;
                }
            });
        }

        // 启动服务器
        info!("服务器启动：http://{}", &self.addr);
        let listener = TcpListener::bind(&self.addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}
