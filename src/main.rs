mod args;
mod builtin;
mod env;
mod eval;
mod events;
mod input;
mod job;
mod parser;
mod types;
mod validate;
#[cfg(test)]
mod test_support;

use std::io;

use clap::Parser;

use crate::args::CommandLineArgs;
use crate::env::ProcessEnvironment;
use crate::input::{EditorReader, LineReader, PlainReader};

fn run(reader: &mut dyn LineReader) {
	while let Some(line) = reader.read_line(&input::prompt()) {
		eval::eval(&line, &ProcessEnvironment);
	}
}

fn main() -> anyhow::Result<()> {
	let args = CommandLineArgs::parse();
	events::init(&args.enabled_debug_events);

	if let Some(ref line) = args.command {
		eval::eval(line, &ProcessEnvironment);
		return Ok(());
	}

	if args.no_editing {
		run(&mut PlainReader::new(io::stdin().lock()));
	} else {
		run(&mut EditorReader::new()?);
	}
	Ok(())
}
