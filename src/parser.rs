use thiserror::Error;

use crate::env::Environment;
use crate::types::*;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
	#[error("cannot have more than one {0} redirection")]
	DuplicateRedirect(RedirectType),
	#[error("no path specified for {0} redirection")]
	MissingRedirectTarget(RedirectType),
	#[error("empty command")]
	EmptyCommand,
}

pub type ParseResult<T> = Result<T, ParseError>;

struct Parser<'a, E: ?Sized> {
	line: &'a str,
	i: usize,
	env: &'a E,
}

impl<'a, E: Environment + ?Sized> Parser<'a, E> {
	fn proceed_while<F>(&mut self, f: F) where F: Fn(u8) -> bool {
		while let Some(c) = self.line.as_bytes().get(self.i) {
			if !f(*c) { break; }
			self.i += 1;
		}
	}

	fn is_whitespace(c: u8) -> bool {
		matches!(c, b' ' | b'\t' | b'\n' | b'\r')
	}

	fn is_letter(c: u8) -> bool {
		c != b'|' && !Self::is_whitespace(c)
	}

	fn skip_whitespaces(&mut self) {
		self.proceed_while(Self::is_whitespace);
	}

	// Stops only at ASCII bytes, so the slice is always on a char boundary.
	fn read_word(&mut self) -> &'a str {
		let orig = self.i;
		self.proceed_while(Self::is_letter);
		&self.line[orig .. self.i]
	}

	fn expand(&self, word: &str) -> String {
		match word.strip_prefix('$') {
			Some(name) => self.env.lookup(name).unwrap_or_default(),
			None => word.to_owned(),
		}
	}

	fn set_redirect(slot: &mut Option<String>, typ: RedirectType, target: &str) -> ParseResult<()> {
		if slot.is_some() {
			return Err(ParseError::DuplicateRedirect(typ));
		}
		if target.is_empty() {
			return Err(ParseError::MissingRedirectTarget(typ));
		}
		*slot = Some(target.to_owned());
		Ok(())
	}

	fn parse_command(&mut self) -> ParseResult<Command> {
		let mut arguments: Vec<String> = vec![];
		let mut input: Option<String> = None;
		let mut output: Option<String> = None;

		loop {
			self.skip_whitespaces();
			let word = self.read_word();
			if word.is_empty() {
				break;
			}
			let word = self.expand(word);
			if let Some(target) = word.strip_prefix('<') {
				Self::set_redirect(&mut input, RedirectType::Input, target)?;
			} else if let Some(target) = word.strip_prefix('>') {
				Self::set_redirect(&mut output, RedirectType::Output, target)?;
			} else {
				arguments.push(word);
			}
		}

		if arguments.is_empty() {
			return Err(ParseError::EmptyCommand);
		}
		Ok(Command { arguments, input, output })
	}

	fn parse_pipeline(&mut self) -> ParseResult<Option<Pipeline>> {
		self.skip_whitespaces();
		if self.i == self.line.len() {
			return Ok(None);
		}

		let mut commands: Vec<Command> = vec![];
		loop {
			commands.push(self.parse_command()?);
			match self.line.as_bytes().get(self.i) {
				Some(&b'|') => { self.i += 1; },
				_ => { break; },
			}
		}
		Ok(Some(Pipeline { commands }))
	}
}

/// Parses one input line. A blank line is `Ok(None)`; any error rejects the
/// whole line.
pub fn parse<E: Environment + ?Sized>(line: &str, env: &E) -> ParseResult<Option<Pipeline>> {
	let mut parser = Parser { line, i: 0, env };
	let pipeline = parser.parse_pipeline()?;
	if let Some(ref pipeline) = pipeline {
		tracing::debug!(target: "parse", "parsed: {}", pipeline);
	}
	Ok(pipeline)
}
