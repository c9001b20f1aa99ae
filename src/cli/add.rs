use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use crate::attributes::parse_attributes_str;
use crate::catalog::{AddAnimal, UploadedImage};
use crate::cli::SubCommandExtend;
use crate::config::{DescribeOptions, Opts};
use crate::{CatalogBuilder, feature};

#[derive(Parser, Debug, Clone)]
pub struct AddCommand {
    #[command(flatten)]
    pub describe: DescribeOptions,
    /// 动物名称
    pub name: String,
    /// 栖息地描述
    #[arg(long, default_value_t = String::new())]
    pub habitat: String,
    /// 趣味知识
    #[arg(long, default_value_t = String::new())]
    pub facts: String,
    /// JSON 格式的属性表，例如 '{"legs": 4, "diet": "herbivore"}'
    #[arg(short, long, value_name = "JSON")]
    pub attributes: Option<String>,
    /// 动物图片路径
    #[arg(short, long, value_name = "PATH")]
    pub image: Option<PathBuf>,
}

impl SubCommandExtend for AddCommand {
    async fn run(&self, opts: &Opts) -> anyhow::Result<()> {
        let attributes = parse_attributes_str(self.attributes.as_deref())?;

        let image = match &self.image {
            Some(path) => {
                let contents = tokio::fs::read(path)
                    .await
                    .with_context(|| format!("无法读取图片: {}", path.display()))?;
                let file_name = path.file_name().map(|name| name.to_string_lossy().into_owned());
                Some(UploadedImage { file_name, contents })
            }
            None => None,
        };

        // 只有附带图片时才需要特征提取器
        let mut builder =
            CatalogBuilder::new(opts.conf_dir.clone()).describer(self.describe.provider());
        if image.is_some() {
            builder = builder.features(feature::default_provider()?);
        }
        let catalog = builder.open().await?;

        let id = catalog
            .add_animal(AddAnimal {
                name: self.name.clone(),
                habitat: self.habitat.clone(),
                facts: self.facts.clone(),
                attributes,
                image,
            })
            .await?;

        println!("{id}");
        Ok(())
    }
}
