use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::info;

use crate::cli::{SubCommandExtend, print_match};
use crate::config::{MatchOptions, Opts, OutputFormat};
use crate::{CatalogBuilder, feature};

#[derive(Parser, Debug, Clone)]
pub struct IdentifyCommand {
    #[command(flatten)]
    pub matching: MatchOptions,
    /// 被识别的图片路径
    pub image: PathBuf,
    /// 输出格式
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    pub output_format: OutputFormat,
}

impl SubCommandExtend for IdentifyCommand {
    async fn run(&self, opts: &Opts) -> anyhow::Result<()> {
        let image = tokio::fs::read(&self.image)
            .await
            .with_context(|| format!("无法读取图片: {}", self.image.display()))?;

        let catalog = CatalogBuilder::new(opts.conf_dir.clone())
            .features(feature::default_provider()?)
            .open()
            .await?;

        match catalog.identify_image(image).await? {
            Some(best) if best.score >= self.matching.threshold => {
                print_match(&best, self.output_format)
            }
            Some(best) => {
                info!("最佳匹配 {} 的得分 {:.4} 低于阈值", best.animal.name, best.score);
                anyhow::bail!("No similar animal found in database")
            }
            None => anyhow::bail!("No similar animal found in database"),
        }
    }
}
