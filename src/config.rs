//! Runtime configuration, resolved once at startup and threaded explicitly.
//!
//! No global mutable state: a `RunConfig` is built in `main` and passed
//! down to whatever needs it.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayMode {
    /// Only the melody voice is routed through the tape delay; everything
    /// else bypasses it. This is the default (see spec §4.5, §9).
    MelodyOnly,
    /// The whole synth bus is routed through the delay.
    Global,
}

#[derive(Debug, Clone, Copy)]
pub struct RunConfig {
    pub delay_mode: DelayMode,
    pub verbose: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            delay_mode: DelayMode::MelodyOnly,
            verbose: false,
        }
    }
}

impl RunConfig {
    /// Reads `.env` (if present) then the process environment. The only
    /// variable this engine recognizes is `VERBOSE`; it never affects
    /// audio or pixel output (spec §6).
    pub fn from_env() -> Self {
        let _ = dotenv::dotenv();
        let verbose = std::env::var("VERBOSE")
            .map(|v| v == "1")
            .unwrap_or(false);
        RunConfig {
            delay_mode: DelayMode::MelodyOnly,
            verbose,
        }
    }

    pub fn init_logging(&self) {
        let level = if self.verbose { "info" } else { "warn" };
        let env = env_logger::Env::default().default_filter_or(level);
        let _ = env_logger::Builder::from_env(env)
            .target(env_logger::Target::Stderr)
            .try_init();
    }
}
