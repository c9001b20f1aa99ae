mod add;
mod classify;
mod identify;
mod list;
pub mod server;

pub use add::*;
pub use classify::*;
pub use identify::*;
pub use list::*;
pub use server::*;

use crate::catalog::BestMatch;
use crate::config::{Opts, OutputFormat};

pub trait SubCommandExtend {
    fn run(&self, opts: &Opts) -> impl std::future::Future<Output = anyhow::Result<()>> + Send;
}

fn print_match(best: &BestMatch, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "match_score": best.score,
                "animal": best.animal,
            });
            println!("{}", serde_json::to_string_pretty(&output)?)
        }
        OutputFormat::Table => {
            println!("{:.4}\t{}\t{}", best.score, best.animal.id, best.animal.name);
        }
    }
    Ok(())
}
