use thiserror::Error;

use crate::builtin;
use crate::types::Pipeline;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
	#[error("cannot redirect input of anything but the first command")]
	MisplacedInputRedirect,
	#[error("cannot redirect output of anything but the last command")]
	MisplacedOutputRedirect,
	#[error("{} must be the only command of the line", builtin::CD)]
	CdNotAlone,
	#[error("{} takes exactly one argument", builtin::CD)]
	CdArgumentCount,
	#[error("{} cannot have I/O redirections", builtin::CD)]
	CdRedirected,
}

fn check_redirections(pipeline: &Pipeline) -> Result<(), ValidationError> {
	let last = pipeline.commands.len() - 1;
	for (i, command) in pipeline.commands.iter().enumerate() {
		if i != 0 && command.input.is_some() {
			return Err(ValidationError::MisplacedInputRedirect);
		}
		if i != last && command.output.is_some() {
			return Err(ValidationError::MisplacedOutputRedirect);
		}
	}
	Ok(())
}

fn check_cd(pipeline: &Pipeline) -> Result<(), ValidationError> {
	for command in pipeline.commands.iter().filter(|c| c.name() == builtin::CD) {
		if pipeline.commands.len() != 1 {
			return Err(ValidationError::CdNotAlone);
		}
		if command.arguments.len() != 2 {
			return Err(ValidationError::CdArgumentCount);
		}
		if command.is_redirected() {
			return Err(ValidationError::CdRedirected);
		}
	}
	Ok(())
}

/// Checks the structural rules a pipeline must satisfy before anything is
/// spawned. Stops at the first violation.
pub fn validate(pipeline: &Pipeline) -> Result<(), ValidationError> {
	check_redirections(pipeline)?;
	check_cd(pipeline)
}
