use anyhow::Result;
use devdocs_language_server::config::Config;
use devdocs_language_server::lsp::server::serve;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_args_and_env()?;

    // stdout carries the protocol; env_logger writes to stderr.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    serve(config).await
}
