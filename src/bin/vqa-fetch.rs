//! vqa-fetch CLI tool
//!
//! Downloads an image question-answer dataset into local images and a
//! metadata CSV.

#[cfg(feature = "cli")]
use vqa_fetch::cli;

#[cfg(feature = "cli")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cli::main().await
}

#[cfg(not(feature = "cli"))]
fn main() {
    panic!("CLI feature not enabled. Please rebuild with --features cli");
}
