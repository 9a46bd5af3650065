use docserve::config::Config;
use docserve::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = Config::load()?;

    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_max_level(cfg.log_level.to_level()?)
        .init();

    println!(
        "To connect, try \"http://{}/{{path to retrieve}}\"",
        cfg.server.listen_addr
    );
    println!("Press Enter or Ctrl-C to shut down...");

    tokio::select! {
        res = server::listener::run(&cfg) => {
            res?;
        }

        _ = server::shutdown::operator_signal() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
