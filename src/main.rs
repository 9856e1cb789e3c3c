use vault_yield_client::config::ClientConfig;
use vault_yield_client::ClientContext;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = ClientConfig::from_env()?;
    let context = ClientContext::from_config(config);

    let result = context.run_session(|line| println!("{}", line)).await;
    context.shutdown();
    result?;
    Ok(())
}
