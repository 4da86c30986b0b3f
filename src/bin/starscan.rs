//! Starscan CLI tool
//!
//! Fetches a batch of astronomy images from the catalog API, downloads them
//! concurrently, and runs star detection over every saved image.

#[cfg(feature = "cli")]
use starscan::cli;

#[cfg(feature = "cli")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cli::main().await
}

#[cfg(not(feature = "cli"))]
fn main() {
    panic!("CLI feature not enabled. Please rebuild with --features cli");
}
