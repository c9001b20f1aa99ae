use clap::Parser;

use crate::CatalogBuilder;
use crate::cli::SubCommandExtend;
use crate::config::{Opts, OutputFormat};

#[derive(Parser, Debug, Clone)]
pub struct ListCommand {
    /// 输出格式
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    pub output_format: OutputFormat,
}

impl SubCommandExtend for ListCommand {
    async fn run(&self, opts: &Opts) -> anyhow::Result<()> {
        let catalog = CatalogBuilder::new(opts.conf_dir.clone()).open().await?;
        let animals = catalog.animals().await?;

        match self.output_format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&animals)?),
            OutputFormat::Table => {
                for animal in &animals {
                    let image = if animal.feature_vector.is_some() { "image" } else { "-" };
                    println!("{}\t{}\t{}", animal.id, animal.name, image);
                }
            }
        }
        Ok(())
    }
}
