//! gesture_watch - polling hand detector
//!
//! This binary:
//! 1. Loads settings from BISINDO_CONFIG and BISINDO_* environment overrides
//! 2. Opens the configured frame source
//! 3. Classifies one frame per poll interval, never overlapping ticks
//! 4. Logs hand detections until Ctrl-C

use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bisindo_detect::config::{WatchConfig, DEFAULT_LOG_FILTER};
use bisindo_detect::{
    open_source, translate_interpretation, DetectionLoop, FrameSource, HeuristicBackend,
};

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(DEFAULT_LOG_FILTER),
    )
    .init();

    let cfg = WatchConfig::load()?;
    log::info!(
        "source={} {}x{} block_size={} poll={}ms",
        cfg.source.url,
        cfg.source.width,
        cfg.source.height,
        cfg.block_size,
        cfg.poll_interval.as_millis()
    );

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = Arc::clone(&stop);
        ctrlc::set_handler(move || stop.store(true, Ordering::SeqCst))?;
    }

    let source = open_source(cfg.source.clone())?;
    let backend = HeuristicBackend::new(cfg.classifier());
    let mut detection_loop =
        DetectionLoop::new(source, backend).with_content_floor(cfg.content_floor);
    detection_loop.start()?;

    let mut detections = 0u64;
    let stats = detection_loop.run(cfg.poll_interval, &stop, |result| {
        detections += 1;
        let label = translate_interpretation(result.gesture.label());
        log::info!(
            "detection #{}: {} conf={:.2} fingers={} hands={}",
            detections,
            label.text(),
            result.confidence,
            result.finger_count,
            result.hand_regions
        );
    });

    let source_stats = detection_loop.source().stats();
    println!("gesture_watch summary:");
    println!("  source: {}", source_stats.url);
    println!("  frames captured: {}", source_stats.frames_captured);
    println!("  ticks: {}", stats.ticks);
    println!("  hands detected: {}", stats.hands);
    println!("  no-content ticks: {}", stats.no_content);
    println!("  cache hits: {}", stats.cache_hits);
    println!("  failures: {}", stats.failures);
    Ok(())
}
