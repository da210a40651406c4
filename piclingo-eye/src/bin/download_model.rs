//! Pre-fetch a registered network into the model directory

use piclingo_core::config::RunConfig;
use piclingo_eye::error::VisionError;
use piclingo_eye::models::networks::registered_networks;
use piclingo_eye::models::{resolve_network, ModelManager, ModelSource};
use std::env;
use std::path::PathBuf;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), VisionError> {
    let args: Vec<String> = env::args().collect();
    let available = registered_networks().collect::<Vec<_>>().join(", ");

    if args.len() < 2 {
        eprintln!("Usage: download_model <network> [model_dir]");
        eprintln!("Available networks: {}", available);
        std::process::exit(1);
    }

    let network = match resolve_network(&args[1]) {
        Ok(spec) if matches!(spec.source, ModelSource::Download { .. }) => spec,
        _ => {
            eprintln!("Unknown network: {}", args[1]);
            eprintln!("Available networks: {}", available);
            std::process::exit(1);
        }
    };

    let model_dir = args
        .get(2)
        .map(PathBuf::from)
        .unwrap_or_else(|| RunConfig::default().model_dir);
    let manager = ModelManager::new(model_dir);

    println!("Downloading {}...", network.name);
    let path = manager.model_path(&network).await?;
    println!("{} downloaded to: {:?}", network.name, path);

    Ok(())
}
