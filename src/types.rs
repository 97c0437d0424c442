use std::fmt;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum RedirectType { Input, Output }

impl RedirectType {
	pub fn marker(self) -> char {
		match self {
			RedirectType::Input => '<',
			RedirectType::Output => '>',
		}
	}
}

impl fmt::Display for RedirectType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match *self {
			RedirectType::Input => write!(f, "input"),
			RedirectType::Output => write!(f, "output"),
		}
	}
}

/// One program invocation. `arguments[0]` is the program (or builtin) name and
/// is always present.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Command {
	pub arguments: Vec<String>,
	pub input: Option<String>,
	pub output: Option<String>,
}

impl Command {
	pub fn name(&self) -> &str {
		&self.arguments[0]
	}

	pub fn is_redirected(&self) -> bool {
		self.input.is_some() || self.output.is_some()
	}
}

impl fmt::Display for Command {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.arguments.join(" "))?;
		if let Some(ref path) = self.input {
			write!(f, " {}{}", RedirectType::Input.marker(), path)?;
		}
		if let Some(ref path) = self.output {
			write!(f, " {}{}", RedirectType::Output.marker(), path)?;
		}
		Ok(())
	}
}

/// Commands connected left to right by pipes. Never empty.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Pipeline {
	pub commands: Vec<Command>,
}

impl fmt::Display for Pipeline {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (i, command) in self.commands.iter().enumerate() {
			if i != 0 {
				write!(f, " | ")?;
			}
			write!(f, "{}", command)?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn command(arguments: &[&str], input: Option<&str>, output: Option<&str>) -> Command {
		Command {
			arguments: arguments.iter().map(|s| s.to_string()).collect(),
			input: input.map(str::to_owned),
			output: output.map(str::to_owned),
		}
	}

	#[test]
	fn display_renders_surface_syntax() {
		let pipeline = Pipeline {
			commands: vec![
				command(&["cat"], Some("in.txt"), None),
				command(&["wc", "-l"], None, Some("out.txt")),
			],
		};
		assert_eq!(pipeline.to_string(), "cat <in.txt | wc -l >out.txt");
	}

	#[test]
	fn command_reports_redirection() {
		assert!(!command(&["ls"], None, None).is_redirected());
		assert!(command(&["ls"], None, Some("x")).is_redirected());
		assert_eq!(command(&["ls", "-l"], None, None).name(), "ls");
	}
}
