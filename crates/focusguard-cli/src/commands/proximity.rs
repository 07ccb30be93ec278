use clap::Args;
use focusguard_core::Config;

#[derive(Args)]
pub struct ProximityArgs {
    /// Face bounding-box width in pixels; omit for "no face detected"
    pub width: Option<u32>,

    /// Override the frame width
    #[arg(long)]
    pub frame_width: Option<u32>,

    /// Override the cutoff width
    #[arg(long)]
    pub cutoff: Option<u32>,
}

pub fn run(args: ProximityArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let mut classifier = config.proximity_classifier();
    if let Some(v) = args.frame_width {
        classifier.frame_width = v;
    }
    if let Some(v) = args.cutoff {
        classifier.cutoff_width = v;
    }

    let label = classifier.classify(args.width);
    println!(
        "{}",
        serde_json::json!({
            "label": label,
            "effective_cutoff": classifier.effective_cutoff(),
        })
    );
    Ok(())
}
