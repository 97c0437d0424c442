use crate::builtin;
use crate::env::Environment;
use crate::job::{self, JobBuilder};
use crate::parser;
use crate::types::Pipeline;
use crate::validate;

use std::ffi::{CString, NulError};
use std::ptr;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::os::fd::{AsRawFd, BorrowedFd, FromRawFd, IntoRawFd, OwnedFd, RawFd};
use nix::errno::Errno;
use nix::fcntl::{self, FcntlArg, FdFlag, OFlag};
use nix::unistd::{self, ForkResult};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExecError {
	#[error("{path}: {}", describe_io_error(.source))]
	Open {
		path: String,
		source: io::Error,
	},
	#[error("cannot create pipe: {}", .0.desc())]
	Pipe(#[source] Errno),
	#[error("cannot fork: {}", .0.desc())]
	Fork(#[source] Errno),
	#[error("argument contains a NUL byte")]
	Nul(#[from] NulError),
}

/// Human-readable reason for a failed system call, without the
/// "(os error N)" suffix std appends.
pub fn describe_io_error(e: &io::Error) -> String {
	match e.raw_os_error() {
		Some(code) => Errno::from_raw(code).desc().to_owned(),
		None => e.to_string(),
	}
}

/// Makes `target` refer to what `fd` refers to and closes `fd`'s own number.
/// `target` ends up inheritable across exec.
pub fn move_fd(fd: OwnedFd, target: RawFd) -> nix::Result<()> {
	if fd.as_raw_fd() == target {
		fcntl::fcntl(target, FcntlArg::F_SETFD(FdFlag::empty()))?;
		let _ = fd.into_raw_fd();
	} else {
		unistd::dup2(fd.as_raw_fd(), target)?;
		drop(fd);
	}
	Ok(())
}

fn redirect_stdio(stdin: Option<OwnedFd>, stdout: Option<OwnedFd>) -> nix::Result<()> {
	let mut stdout = stdout;
	// Moving stdin first would clobber a stdout target that sits on fd 0.
	if stdin.is_some() && stdout.as_ref().map(|fd| fd.as_raw_fd()) == Some(libc::STDIN_FILENO) {
		if let Some(fd) = stdout.take() {
			let moved = fcntl::fcntl(fd.as_raw_fd(), FcntlArg::F_DUPFD_CLOEXEC(libc::STDERR_FILENO + 1))?;
			drop(fd);
			stdout = Some(unsafe { OwnedFd::from_raw_fd(moved) });
		}
	}
	if let Some(fd) = stdin {
		move_fd(fd, libc::STDIN_FILENO)?;
	}
	if let Some(fd) = stdout {
		move_fd(fd, libc::STDOUT_FILENO)?;
	}
	Ok(())
}

// Runs in the forked child, so it writes straight to fd 2 and never allocates.
fn write_child_error(what: &[u8], reason: &str) {
	let stderr = unsafe { BorrowedFd::borrow_raw(libc::STDERR_FILENO) };
	for part in [what, b": ", reason.as_bytes(), b"\n"] {
		let _ = unistd::write(stderr, part);
	}
}

/// `argv_ptrs` is the null-terminated pointer array over `argv`, built
/// before the fork.
fn exec_command(argv: &[CString], argv_ptrs: &[*const libc::c_char],
                stdin: Option<OwnedFd>, stdout: Option<OwnedFd>) -> ! {
	if let Err(e) = redirect_stdio(stdin, stdout) {
		write_child_error(argv[0].as_bytes(), e.desc());
		unsafe{ libc::_exit(126) }
	}
	unsafe { libc::execvp(argv_ptrs[0], argv_ptrs.as_ptr()) };
	write_child_error(argv[0].as_bytes(), Errno::last().desc());
	unsafe{ libc::_exit(127) }
}

fn open_redirections(pipeline: &Pipeline) -> Result<(Option<File>, Option<File>), ExecError> {
	let commands = &pipeline.commands;
	let input = match commands[0].input {
		Some(ref path) => Some(File::open(path)
			.map_err(|source| ExecError::Open { path: path.clone(), source })?),
		None => None,
	};
	let output = match commands[commands.len() - 1].output {
		Some(ref path) => Some(OpenOptions::new().write(true).create(true).truncate(true).open(path)
			.map_err(|source| ExecError::Open { path: path.clone(), source })?),
		None => None,
	};
	Ok((input, output))
}

fn spawn_commands(argvs: &[Vec<CString>], input: Option<OwnedFd>, output: Option<OwnedFd>,
                  job_builder: &mut JobBuilder) -> Result<(), ExecError> {
	let last = argvs.len() - 1;
	let argv_ptrs: Vec<Vec<*const libc::c_char>> = argvs.iter()
		.map(|argv| argv.iter().map(|a| a.as_ptr()).chain(Some(ptr::null())).collect())
		.collect();
	let mut next_stdin = input;
	let mut output = output;
	for (i, argv) in argvs.iter().enumerate() {
		let stdin = next_stdin.take();
		let stdout = if i == last {
			output.take()
		} else {
			let (pipe_read, pipe_write) = unistd::pipe2(OFlag::O_CLOEXEC).map_err(ExecError::Pipe)?;
			next_stdin = Some(pipe_read);
			Some(pipe_write)
		};
		match unsafe { job_builder.push_fork() }.map_err(ExecError::Fork)? {
			ForkResult::Parent { child } => {
				tracing::debug!(target: "commands", "spawned {} as {}", argv[0].to_string_lossy(), child);
				drop(stdin);
				drop(stdout);
			},
			ForkResult::Child => exec_command(argv, &argv_ptrs[i], stdin, stdout),
		}
	}
	Ok(())
}

/// Launches a validated pipeline. On `Err` no child of this pipeline is
/// outstanding; on `Ok` the returned job must be waited for.
pub fn execute(pipeline: &Pipeline) -> Result<job::Job, ExecError> {
	let commands = &pipeline.commands;
	assert!(!commands.is_empty());

	if commands.len() == 1 {
		if let Some(func) = builtin::match_builtin(commands[0].name()) {
			func(&commands[0].arguments);
			return Ok(job::Job::default());
		}
	}

	let argvs = commands.iter()
		.map(|c| c.arguments.iter().map(|a| CString::new(a.as_bytes())).collect::<Result<Vec<_>, _>>())
		.collect::<Result<Vec<_>, _>>()?;
	let (input, output) = open_redirections(pipeline)?;

	let mut job_builder = JobBuilder::new(commands.len());
	let r = spawn_commands(&argvs, input.map(OwnedFd::from), output.map(OwnedFd::from), &mut job_builder);
	let job = job_builder.build();
	match r {
		Err(e) if job.is_empty() => Err(e),
		Err(e) => {
			let _ = writeln!(io::stderr(), "msh: {}", e);
			Ok(job)
		},
		Ok(()) => Ok(job),
	}
}

/// Parses, validates, runs and reaps one input line. Every failure is
/// reported on stderr and leaves the interpreter ready for the next line.
pub fn eval<E: Environment + ?Sized>(line: &str, env: &E) -> job::Job {
	let pipeline = match parser::parse(line, env) {
		Ok(Some(pipeline)) => pipeline,
		Ok(None) => return job::Job::default(),
		Err(e) => {
			let _ = writeln!(io::stderr(), "msh: parse error: {}", e);
			return job::Job::default();
		},
	};
	if let Err(e) = validate::validate(&pipeline) {
		let _ = writeln!(io::stderr(), "msh: {}", e);
		return job::Job::default();
	}
	match execute(&pipeline) {
		Ok(job) => job.wait(),
		Err(e) => {
			let _ = writeln!(io::stderr(), "msh: {}", e);
			job::Job::default()
		},
	}
}
