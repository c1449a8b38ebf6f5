use anyhow::Result;
use tracing::error;

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(error) = payment_management::run().await {
        error!("Payment service exited with error: {:?}", error);
        std::process::exit(1);
    }
    Ok(())
}
