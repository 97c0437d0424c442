use clap::Parser;

use crate::events;

/// Parsed command-line arguments.
#[derive(Parser, Debug)]
#[clap(name = "msh", version, about = "A small line-oriented pipeline interpreter")]
pub struct CommandLineArgs {
	/// Execute the provided line and then exit.
	#[arg(short = 'c', value_name = "LINE")]
	pub command: Option<String>,

	/// Don't use line editing; read plain lines from stdin.
	#[clap(long = "no-editing")]
	pub no_editing: bool,

	/// Enable debug logging for classes of tracing events.
	#[clap(long = "log-enable", alias = "debug", value_name = "EVENT")]
	pub enabled_debug_events: Vec<events::TraceEvent>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults() {
		let args = CommandLineArgs::try_parse_from(["msh"]).unwrap();
		assert_eq!(args.command, None);
		assert!(!args.no_editing);
		assert!(args.enabled_debug_events.is_empty());
	}

	#[test]
	fn all_options() {
		let args = CommandLineArgs::try_parse_from([
			"msh", "-c", "ls | wc", "--no-editing", "--log-enable", "parse", "--log-enable", "jobs",
		]).unwrap();
		assert_eq!(args.command.as_deref(), Some("ls | wc"));
		assert!(args.no_editing);
		assert_eq!(args.enabled_debug_events, vec![events::TraceEvent::Parse, events::TraceEvent::Jobs]);
	}

	#[test]
	fn unknown_event_is_rejected() {
		assert!(CommandLineArgs::try_parse_from(["msh", "--log-enable", "bogus"]).is_err());
	}
}
