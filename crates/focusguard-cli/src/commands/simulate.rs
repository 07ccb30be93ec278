use clap::{Args, ValueEnum};
use focusguard_core::{ChallengeWheel, Config, FocusSession, InterventionChoice, InterventionOutcome};

#[derive(Args)]
pub struct SimulateArgs {
    /// Presence trace: '1' = face present, '0' = absent, 'x' = capture
    /// unavailable. Whitespace is ignored.
    pub trace: String,

    /// Override the distraction threshold in ticks
    #[arg(long)]
    pub rise_threshold: Option<u32>,

    /// Override the streak decay per present tick
    #[arg(long)]
    pub fall_rate: Option<u32>,

    /// Override the warning cue tick
    #[arg(long)]
    pub warning_cue_tick: Option<u32>,

    /// Override the session distraction quota
    #[arg(long)]
    pub quota: Option<u32>,

    /// Resolve a pending intervention at the end of the trace
    #[arg(long, value_enum)]
    pub resolve: Option<ResolveArg>,

    /// Seed for the challenge wheel (deterministic spin)
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ResolveArg {
    Break,
    Challenge,
}

impl From<ResolveArg> for InterventionChoice {
    fn from(arg: ResolveArg) -> Self {
        match arg {
            ResolveArg::Break => InterventionChoice::TakeBreak,
            ResolveArg::Challenge => InterventionChoice::AcceptChallenge,
        }
    }
}

pub fn run(args: SimulateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load()?;
    if let Some(v) = args.rise_threshold {
        config.tracker.rise_threshold = v;
    }
    if let Some(v) = args.fall_rate {
        config.tracker.fall_rate = v;
    }
    if let Some(v) = args.warning_cue_tick {
        config.tracker.warning_cue_tick = v;
    }
    if let Some(v) = args.quota {
        config.tracker.session_quota = v;
    }

    let mut session = FocusSession::new(config.session_config())?;
    log::debug!(
        "replaying {} trace characters (rise_threshold={}, quota={})",
        args.trace.len(),
        config.tracker.rise_threshold,
        config.tracker.session_quota
    );

    for ch in args.trace.chars() {
        match ch {
            '1' => {
                for event in session.presence_tick(true) {
                    println!("{}", serde_json::to_string_pretty(&event)?);
                }
            }
            '0' => {
                for event in session.presence_tick(false) {
                    println!("{}", serde_json::to_string_pretty(&event)?);
                }
            }
            'x' | 'X' => session.capture_unavailable(),
            c if c.is_whitespace() => {}
            other => {
                return Err(format!("invalid trace character '{other}' (expected 1/0/x)").into())
            }
        }
    }

    println!("{}", serde_json::to_string_pretty(&session.snapshot_event())?);

    if let Some(resolve) = args.resolve {
        let (outcome, event) = session.resolve_intervention(resolve.into())?;
        println!("{}", serde_json::to_string_pretty(&event)?);
        if outcome == InterventionOutcome::Challenge {
            let wheel = ChallengeWheel::with_seed(args.seed);
            println!(
                "{}",
                serde_json::json!({ "challenge": wheel.spin() })
            );
        }
    }

    Ok(())
}
