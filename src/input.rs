use std::env;
use std::io::{self, BufRead, Write};

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

const PROMPT_SUFFIX: &str = " $ ";
const NOT_UTF8: &str = "msh: input is not valid UTF-8";

/// The working directory followed by `" $ "`.
pub fn prompt() -> String {
	match env::current_dir() {
		Ok(dir) => format!("{}{}", dir.display(), PROMPT_SUFFIX),
		Err(_) => PROMPT_SUFFIX.trim_start().to_owned(),
	}
}

/// Source of input lines. `None` means end of input.
pub trait LineReader {
	fn read_line(&mut self, prompt: &str) -> Option<String>;
}

pub struct EditorReader {
	editor: DefaultEditor,
}

impl EditorReader {
	pub fn new() -> rustyline::Result<EditorReader> {
		Ok(EditorReader { editor: DefaultEditor::new()? })
	}
}

impl LineReader for EditorReader {
	fn read_line(&mut self, prompt: &str) -> Option<String> {
		match self.editor.readline(prompt) {
			Ok(line) => {
				if !line.trim().is_empty() {
					let _ = self.editor.add_history_entry(line.as_str());
				}
				Some(line)
			},
			// Ctrl-C abandons the line being edited.
			Err(ReadlineError::Interrupted) => Some(String::new()),
			Err(ReadlineError::Eof) => None,
			Err(ReadlineError::Io(ref e)) if e.kind() == io::ErrorKind::InvalidData => {
				let _ = writeln!(io::stderr(), "{}", NOT_UTF8);
				Some(String::new())
			},
			Err(err) => {
				let _ = writeln!(io::stderr(), "msh: cannot read input: {}", err);
				None
			},
		}
	}
}

/// Reads plain lines without editing or history. A line that is not valid
/// UTF-8 is reported and read as empty.
pub struct PlainReader<R> {
	input: R,
}

impl<R: BufRead> PlainReader<R> {
	pub fn new(input: R) -> PlainReader<R> {
		PlainReader { input }
	}
}

impl<R: BufRead> LineReader for PlainReader<R> {
	fn read_line(&mut self, prompt: &str) -> Option<String> {
		let mut stdout = io::stdout();
		let _ = write!(stdout, "{}", prompt);
		let _ = stdout.flush();
		let mut buf = Vec::new();
		match self.input.read_until(b'\n', &mut buf) {
			Ok(0) => {
				let _ = writeln!(stdout);
				None
			},
			Ok(_) => {
				if buf.ends_with(b"\n") {
					buf.pop();
					if buf.ends_with(b"\r") {
						buf.pop();
					}
				}
				match String::from_utf8(buf) {
					Ok(line) => Some(line),
					Err(_) => {
						let _ = writeln!(io::stderr(), "{}", NOT_UTF8);
						Some(String::new())
					},
				}
			},
			Err(e) => {
				let _ = writeln!(io::stderr(), "msh: cannot read input: {}", e);
				None
			},
		}
	}
}
