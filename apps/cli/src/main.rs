mod cli;
mod logging;

use std::io::Write;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use cli::{Cli, Command, ResolutionArgs};
use logging::init_tracing;
use tickerlens_resolver::{ResolverConfig, TickerResolver};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = ResolverConfig::from_env()?;
    let resolver = TickerResolver::from_config(&config)?;

    match cli.command {
        Command::Resolve(args) => run(&resolver, args.queries, &args.resolution).await,
        Command::Batch(args) => {
            let mut queries = Vec::new();
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Some(line) = lines.next_line().await? {
                if !line.trim().is_empty() {
                    queries.push(line);
                }
            }
            tracing::info!("Read {} queries from stdin", queries.len());
            run(&resolver, queries, &args).await
        }
    }
}

async fn run(resolver: &TickerResolver, queries: Vec<String>, args: &ResolutionArgs) -> anyhow::Result<()> {
    let options = args.options();
    let mut stdout = std::io::stdout().lock();

    for query in &queries {
        let result = resolver.resolve(query, &options).await;
        writeln!(stdout, "{}", serde_json::to_string(&result)?)?;
    }

    if args.stats {
        writeln!(stdout, "{}", serde_json::to_string(&resolver.cache_stats())?)?;
    }

    Ok(())
}
