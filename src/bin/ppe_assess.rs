//! ppe_assess - PPE compliance report for one image's detections
//!
//! Reads the detector's JSON output, binds PPE items to persons, and prints a
//! per-person verdict plus the site compliance summary.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;

use ppe_sentinel::ingest::load_detections;
use ppe_sentinel::{render_text, ComplianceEngine, EngineConfig, MaskPolicy, Report};

#[path = "../ui.rs"]
mod ui;

#[derive(Parser, Debug)]
#[command(author, version, about = "Assess PPE compliance from detector output")]
struct Args {
    /// Detector output for one image (JSON).
    #[arg(long)]
    detections: PathBuf,
    /// Engine configuration file (.toml or .json).
    #[arg(long, env = "PPE_CONFIG")]
    config: Option<PathBuf>,
    /// Mask policy override (tri_state|negative_only).
    #[arg(long)]
    mask_policy: Option<String>,
    /// Minimum detection confidence override (0.0-1.0).
    #[arg(long)]
    min_confidence: Option<f32>,
    /// Report format (json|text).
    #[arg(long, default_value = "text")]
    format: String,
    /// Write the report here instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
    /// UI mode for stderr progress (auto|plain|pretty)
    #[arg(long, default_value = "auto", value_name = "MODE")]
    ui: String,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if args.format != "json" && args.format != "text" {
        return Err(anyhow!("--format must be json or text"));
    }
    let report_to_tty = args.output.is_none() && std::io::stdout().is_terminal();
    let ui = ui::Ui::new(
        ui::UiMode::parse(&args.ui),
        std::io::stderr().is_terminal(),
        report_to_tty,
    );

    let cfg = {
        let _stage = ui.stage("Load configuration");
        let mut cfg = EngineConfig::load_from(args.config.as_deref())?;
        if let Some(policy) = &args.mask_policy {
            cfg.mask_policy = policy.parse::<MaskPolicy>()?;
        }
        if let Some(min_confidence) = args.min_confidence {
            cfg.min_confidence = min_confidence;
        }
        cfg.validate()?;
        cfg
    };
    log::info!(
        "ruleset {} (mask_policy={}, head_band={}, overlap>{})",
        cfg.ruleset_hash(),
        cfg.mask_policy.as_str(),
        cfg.head_band_fraction,
        cfg.overlap_threshold
    );

    let input = {
        let _stage = ui.stage("Load detections");
        load_detections(&args.detections, cfg.min_confidence)?
    };
    if let Some(image) = input.image {
        log::info!("image {}x{}", image.width, image.height);
    }

    let engine = ComplianceEngine::new(cfg.clone());
    let evaluation = {
        let _stage = ui.stage("Evaluate compliance");
        engine.evaluate(&input.detections)
    };

    let rendered = if args.format == "json" {
        Report::new(&cfg, evaluation).to_json_pretty()?
    } else {
        render_text(&evaluation)
    };

    match &args.output {
        Some(path) => std::fs::write(path, rendered)
            .with_context(|| format!("writing report to {}", path.display()))?,
        None => print!("{rendered}"),
    }
    Ok(())
}
