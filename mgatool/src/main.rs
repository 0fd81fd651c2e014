use clap::Parser as _;
use mgatool::BaseArgs;
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

#[tokio::main]
pub async fn main() -> anyhow::Result<()> {
    // Events go to stderr so that stdout can carry the command's output.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = BaseArgs::parse();
    args.evaluate().await
}
