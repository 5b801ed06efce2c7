use std::net::SocketAddr;

use tokio::net::TcpListener;
use viewstorm_testserver::StatusPolicy;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let mut bind_addr: SocketAddr = "127.0.0.1:0".parse()?;
    let mut policy = StatusPolicy::default();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--bind" => {
                let addr = args.next().ok_or_else(|| {
                    anyhow::anyhow!("--bind requires an address, e.g. 127.0.0.1:0")
                })?;
                bind_addr = addr.parse()?;
            }
            "--policy" => {
                let raw = args.next().ok_or_else(|| {
                    anyhow::anyhow!("--policy requires a value, e.g. fixed:429")
                })?;
                policy = raw.parse().map_err(|err: String| anyhow::anyhow!(err))?;
            }
            "-h" | "--help" => {
                eprintln!(
                    "viewstorm-testserver\n\nUSAGE:\n  viewstorm-testserver [--bind 127.0.0.1:0] [--policy fixed:200|random:200,429|limit:N|hang]\n\nOUTPUT:\n  Prints HTTP_URL=<url> to stdout once ready."
                );
                return Ok(());
            }
            other => {
                return Err(anyhow::anyhow!("unknown argument: {other}"));
            }
        }
    }

    let listener = TcpListener::bind(bind_addr).await?;
    let addr = listener.local_addr()?;

    let stats = viewstorm_testserver::TestServerStats::default();
    let app = viewstorm_testserver::router(stats, policy);

    println!("HTTP_URL=http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    Ok(())
}
