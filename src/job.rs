use std::io::{self, Write};

use nix::errno::Errno;
use nix::sys::wait::{self, WaitStatus};
use nix::unistd::{self, ForkResult, Pid};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Process {
	pub pid: Pid,
	pub status: WaitStatus,
}

/// The processes launched for one pipeline, in pipeline order.
#[derive(Debug, Default)]
pub struct Job {
	pub processes: Vec<Process>,
}

impl Job {
	pub fn is_empty(&self) -> bool {
		self.processes.is_empty()
	}

	/// Reaps every outstanding child and records the statuses of this job's
	/// processes.
	pub fn wait(mut self) -> Job {
		for reaped in wait_for_children() {
			match self.processes.iter_mut().find(|pr| pr.pid == reaped.pid) {
				Some(pr) => pr.status = reaped.status,
				None => tracing::warn!(target: "jobs", "reaped unrelated child {}", reaped.pid),
			}
		}
		self
	}
}

#[derive(Debug)]
pub struct JobBuilder {
	imp: Job,
}

impl JobBuilder {
	pub fn new(size_hint: usize) -> JobBuilder {
		JobBuilder {
			imp: Job { processes: Vec::with_capacity(size_hint) }
		}
	}

	/// Forks and records the child in the job.
	///
	/// # Safety
	///
	/// The child branch may only perform async-signal-safe operations before
	/// it execs or exits.
	pub unsafe fn push_fork(&mut self) -> nix::Result<ForkResult> {
		let r = unsafe { unistd::fork() }?;
		if let ForkResult::Parent { child } = r {
			tracing::debug!(target: "jobs", "forked {}", child);
			self.imp.processes.push(Process { pid: child, status: WaitStatus::StillAlive });
		}
		Ok(r)
	}

	pub fn build(self) -> Job {
		self.imp
	}
}

fn report(process: &Process) {
	let mut stderr = io::stderr();
	let _ = match process.status {
		WaitStatus::Exited(_, 0) => Ok(()),
		WaitStatus::Exited(pid, code) => writeln!(stderr, "process {} exited with status {}", pid, code),
		WaitStatus::Signaled(pid, sig, core) => writeln!(stderr, "process {} killed by signal {} ({}){}",
			pid, sig as i32, sig.as_str(), if core { " (core dumped)" } else { "" }),
		_ => Ok(()),
	};
}

/// Blocks until the interpreter has no children left, reporting every
/// abnormal termination on stderr.
pub fn wait_for_children() -> Vec<Process> {
	let mut reaped = vec![];
	loop {
		match wait::wait() {
			Ok(status) => {
				let Some(pid) = status.pid() else { continue };
				let process = Process { pid, status };
				tracing::debug!(target: "jobs", "reaped {:?}", status);
				report(&process);
				reaped.push(process);
			},
			Err(Errno::EINTR) => {},
			Err(Errno::ECHILD) => { break; },
			Err(e) => {
				let _ = writeln!(io::stderr(), "msh: wait: {}", e.desc());
				break;
			},
		}
	}
	reaped
}
