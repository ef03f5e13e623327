use clap::ArgMatches;
use commands::command_argument_builder;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use wavecrawl::{CrawlServer, ServerConfig};

mod commands;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = command_argument_builder().get_matches();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wavecrawl=info,wavecrawl_core=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config_from_matches(&matches);
    if !matches.get_flag("quiet") {
        println!(
            "wavecrawl {} on http://{} (fetch timeout {}s)",
            env!("CARGO_PKG_VERSION"),
            config.bind,
            config.timeout_secs
        );
    }

    let server = CrawlServer::new(&config)?;
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {:#}", e);
        return Err(e);
    }

    Ok(())
}

fn config_from_matches(matches: &ArgMatches) -> ServerConfig {
    let defaults = ServerConfig::default();
    ServerConfig {
        bind: matches
            .get_one::<std::net::SocketAddr>("bind")
            .copied()
            .unwrap_or(defaults.bind),
        timeout_secs: matches
            .get_one::<u64>("timeout")
            .copied()
            .unwrap_or(defaults.timeout_secs),
    }
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
