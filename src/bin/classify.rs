//! classify - one-shot hand detection on a synthetic scene or image file

use anyhow::{anyhow, Result};
use clap::Parser;

use bisindo_detect::config::DEFAULT_LOG_FILTER;
use bisindo_detect::{
    open_source, FrameClassifier, FrameSource, SourceConfig, DEFAULT_BLOCK_SIZE,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// `stub://<scene>` (blank, background, face, hands, alternate) or a local image path.
    #[arg(long, default_value = "stub://hands")]
    source: String,
    /// Grid stride in pixels.
    #[arg(long, default_value_t = DEFAULT_BLOCK_SIZE)]
    block_size: u32,
    /// Frame width (image sources are downscaled to this width).
    #[arg(long, default_value_t = 640)]
    width: u32,
    /// Frame height for synthetic scenes.
    #[arg(long, default_value_t = 480)]
    height: u32,
    /// Number of frames to classify.
    #[arg(long, default_value_t = 1)]
    frames: u32,
    /// Seed for synthetic noise.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Print each result as a JSON line.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(DEFAULT_LOG_FILTER),
    )
    .init();

    let args = Args::parse();
    if args.block_size == 0 {
        return Err(anyhow!("block size must be >= 1"));
    }

    let mut source = open_source(SourceConfig {
        url: args.source.clone(),
        width: args.width,
        height: args.height,
        seed: args.seed,
    })?;
    source.connect()?;
    let classifier = FrameClassifier::new(args.block_size);

    for index in 0..args.frames {
        let frame = source.next_frame()?;
        let result = classifier.classify(&frame);
        if args.json {
            println!("{}", serde_json::to_string(&result)?);
            continue;
        }
        println!("frame {} ({}x{}):", index + 1, frame.width(), frame.height());
        println!("  digest: {}", hex::encode(&frame.digest()[..8]));
        println!("  verdict: {:?}", result.verdict);
        println!("  gesture: {}", result.gesture);
        println!("  confidence: {:.2}", result.confidence);
        println!("  fingers: {}", result.finger_count);
        println!(
            "  regions: samples={} skin={} hands={} (skin_ratio={:.3}, filtered_ratio={:.3})",
            result.samples,
            result.skin_regions,
            result.hand_regions,
            result.skin_ratio,
            result.filtered_ratio
        );
        if let Some(err) = &result.error {
            println!("  error: {}", err);
        }
    }
    Ok(())
}
