use std::env;
use std::io::{self, Write};

use crate::eval::describe_io_error;

pub const CD: &str = "cd";

/// `cd DIR`. The validator guarantees exactly one argument.
pub fn builtin_cd(arguments: &[String]) -> u8 {
	let dir = &arguments[1];
	match env::set_current_dir(dir) {
		Ok(()) => {
			tracing::debug!(target: "commands", "changed directory to {}", dir);
			0
		},
		Err(e) => {
			let _ = writeln!(io::stderr(), "msh: {}: {}: {}", CD, dir, describe_io_error(&e));
			1
		},
	}
}

pub fn match_builtin(name: &str) -> Option<fn(&[String]) -> u8> {
	match name {
		CD => Some(builtin_cd),
		_ => None,
	}
}
