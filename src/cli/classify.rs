use clap::Parser;

use crate::CatalogBuilder;
use crate::attributes::parse_attributes_str;
use crate::cli::{SubCommandExtend, print_match};
use crate::config::{Opts, OutputFormat};

#[derive(Parser, Debug, Clone)]
pub struct ClassifyCommand {
    /// JSON 格式的属性表，例如 '{"legs": 4, "diet": "herbivore"}'
    pub attributes: String,
    /// 输出格式
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    pub output_format: OutputFormat,
}

impl SubCommandExtend for ClassifyCommand {
    async fn run(&self, opts: &Opts) -> anyhow::Result<()> {
        let query = parse_attributes_str(Some(self.attributes.as_str()))?;
        let catalog = CatalogBuilder::new(opts.conf_dir.clone()).open().await?;
        let best = catalog.classify_attributes(&query).await?;
        print_match(&best, self.output_format)
    }
}
