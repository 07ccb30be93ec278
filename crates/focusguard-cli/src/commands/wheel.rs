use clap::Subcommand;
use focusguard_core::ChallengeWheel;

#[derive(Subcommand)]
pub enum WheelAction {
    /// Spin the challenge wheel once
    Spin {
        /// Seed for reproducible spins
        #[arg(long)]
        seed: Option<u64>,
    },
    /// List the challenges on the wheel
    List,
}

pub fn run(action: WheelAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        WheelAction::Spin { seed } => {
            let wheel = ChallengeWheel::with_seed(seed);
            println!("{}", serde_json::json!({ "challenge": wheel.spin() }));
        }
        WheelAction::List => {
            let wheel = ChallengeWheel::default();
            println!("{}", serde_json::to_string_pretty(wheel.challenges())?);
        }
    }
    Ok(())
}
