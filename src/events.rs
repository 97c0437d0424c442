use std::fmt::Display;
use std::io::Write;

use tracing_subscriber::{filter::{LevelFilter, Targets}, layer::SubscriberExt, util::SubscriberInitExt, Layer};

/// Type of event to trace.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, clap::ValueEnum)]
pub enum TraceEvent {
	/// Traces the pipelines produced from input lines.
	#[clap(name = "parse")]
	Parse,
	/// Traces process creation and the cd builtin.
	#[clap(name = "commands")]
	Commands,
	/// Traces forking and reaping of children.
	#[clap(name = "jobs")]
	Jobs,
}

impl TraceEvent {
	fn target(self) -> &'static str {
		match self {
			TraceEvent::Parse => "parse",
			TraceEvent::Commands => "commands",
			TraceEvent::Jobs => "jobs",
		}
	}
}

impl Display for TraceEvent {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.target())
	}
}

fn compose_filter(enabled: &[TraceEvent]) -> Targets {
	Targets::new()
		.with_default(LevelFilter::WARN)
		.with_targets(enabled.iter().map(|event| (event.target(), LevelFilter::DEBUG)))
}

/// Sends tracing output to stderr. Everything below WARN is dropped except
/// for the enabled event classes.
pub fn init(enabled: &[TraceEvent]) {
	let layer = tracing_subscriber::fmt::layer()
		.with_writer(std::io::stderr)
		.without_time()
		.with_target(true)
		.with_filter(compose_filter(enabled));

	if tracing_subscriber::registry().with(layer).try_init().is_err() {
		let _ = writeln!(std::io::stderr(), "msh: warning: failed to initialize tracing");
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tracing::Level;

	#[test]
	fn filter_enables_only_requested_targets() {
		let filter = compose_filter(&[TraceEvent::Jobs]);
		assert!(filter.would_enable("jobs", &Level::DEBUG));
		assert!(!filter.would_enable("parse", &Level::DEBUG));
		assert!(filter.would_enable("parse", &Level::WARN));
	}

	#[test]
	fn display_matches_target() {
		assert_eq!(TraceEvent::Commands.to_string(), "commands");
	}
}
