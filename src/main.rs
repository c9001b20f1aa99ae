use clap::Parser;
use faunara::Opts;
use faunara::cli::SubCommandExtend;
use faunara::config::SubCommand;

#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let opts = Opts::parse();

    match &opts.subcmd {
        SubCommand::Server(config) => config.run(&opts).await,
        SubCommand::Add(config) => config.run(&opts).await,
        SubCommand::Identify(config) => config.run(&opts).await,
        SubCommand::Classify(config) => config.run(&opts).await,
        SubCommand::List(config) => config.run(&opts).await,
    }
}
