use nix::errno::Errno;
use nix::sys::wait::{self,WaitPidFlag,WaitStatus};
use nix::unistd::{self,ForkResult,Pid};

use crate::error::Error;

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum State { Running, Terminated }

pub trait WaitStatusExt {
	fn state(self) -> State;
	fn code(self) -> u8;
}

impl WaitStatusExt for WaitStatus {
	fn state(self) -> State {
		match self {
			WaitStatus::Exited(..) | WaitStatus::Signaled(..) => State::Terminated,
			_ => State::Running,
		}
	}
	fn code(self) -> u8 {
		match self {
			WaitStatus::Exited(_, code) => code as u8,
			WaitStatus::Signaled(_, sig, _) => (128 + sig as i32) as u8,
			_ => 0,
		}
	}
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Process {
	pub pid: Pid,
	pub status: WaitStatus,
}

impl Process {
	/// Collects the child's status if it changed. `block` waits for termination.
	fn update(&mut self, block: bool) -> Result<(), Error> {
		let flags = if block { None } else { Some(WaitPidFlag::WNOHANG) };
		while self.status.state() == State::Running {
			match wait::waitpid(self.pid, flags) {
				Ok(WaitStatus::StillAlive) => { break; },
				Ok(status) => { self.status = status; },
				Err(Errno::EINTR) => {},
				Err(e) => { return Err(Error::Nix(e)); },
			}
		}
		Ok(())
	}
}

/// The processes spawned for one pipeline, in stage order.
#[derive(Debug)]
pub struct Job {
	pub processes: Vec<Process>,
	pub is_background: bool,
}

impl Job {
	pub fn state(&self) -> State {
		self.processes.iter().map(|pr| pr.status.state()).min().unwrap_or(State::Terminated)
	}

	/// Status of the last stage, which is what the pipeline reports.
	pub fn code(&self) -> u8 {
		self.processes.last().map_or(0, |pr| pr.status.code())
	}

	/// Blocks until every process of the job has terminated.
	pub fn wait(&mut self) -> Result<u8, Error> {
		let mut result = Ok(());
		for pr in &mut self.processes {
			if let Err(e) = pr.update(true) {
				result = Err(e);
			}
		}
		result.map(|_| self.code())
	}

	/// Non-blocking status refresh of every process still running.
	pub fn poll(&mut self) -> Result<State, Error> {
		for pr in &mut self.processes {
			pr.update(false)?;
		}
		Ok(self.state())
	}
}

#[derive(Debug)]
pub struct JobBuilder {
	imp: Job,
}

impl JobBuilder {
	pub fn new(size_hint: usize, is_background: bool) -> JobBuilder {
		JobBuilder {
			imp: Job { processes: Vec::with_capacity(size_hint), is_background }
		}
	}

	/// Forks and, in the parent, records the child as part of this job.
	pub fn push_fork(&mut self) -> Result<ForkResult, Error> {
		// SAFETY: the shell is single-threaded; the child only rewires
		// descriptors before exec or _exit.
		let r = unsafe { unistd::fork() }.map_err(Error::Fork)?;
		if let ForkResult::Parent { child } = r {
			self.imp.processes.push(Process { pid: child, status: WaitStatus::StillAlive });
		}
		Ok(r)
	}

	pub fn is_empty(&self) -> bool {
		self.imp.processes.is_empty()
	}

	pub fn build(self) -> Job {
		self.imp
	}
}

/// Background jobs that have not been reaped yet.
#[derive(Debug, Default)]
pub struct JobSet {
	jobs: Vec<Job>,
}

impl JobSet {
	pub fn new() -> JobSet {
		JobSet::default()
	}

	pub fn push(&mut self, job: Job) {
		self.jobs.push(job);
	}

	pub fn is_empty(&self) -> bool {
		self.jobs.is_empty()
	}

	/// Collects every background job that has fully terminated and returns
	/// them. A job whose status cannot be queried any more is dropped too.
	pub fn reap(&mut self) -> Vec<Job> {
		let mut done = vec![];
		let mut i = 0;
		while i < self.jobs.len() {
			match self.jobs[i].poll() {
				Ok(State::Running) => { i += 1; },
				Ok(State::Terminated) | Err(_) => { done.push(self.jobs.remove(i)); },
			}
		}
		done
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use nix::sys::signal::Signal;
	use std::{thread,time};

	fn spawn_exiting(builder: &mut JobBuilder, code: i32) {
		match builder.push_fork().unwrap() {
			ForkResult::Child => unsafe { libc::_exit(code) },
			ForkResult::Parent { .. } => {},
		}
	}

	#[test]
	fn status_codes() {
		let pid = Pid::from_raw(1);
		assert_eq!(WaitStatus::Exited(pid, 3).code(), 3);
		assert_eq!(WaitStatus::Signaled(pid, Signal::SIGKILL, false).code(), 137);
		assert_eq!(WaitStatus::StillAlive.state(), State::Running);
		assert_eq!(WaitStatus::Exited(pid, 0).state(), State::Terminated);
	}

	#[test]
	fn foreground_wait_reports_last_stage() {
		let mut builder = JobBuilder::new(2, false);
		spawn_exiting(&mut builder, 1);
		spawn_exiting(&mut builder, 4);
		let mut job = builder.build();
		assert_eq!(job.state(), State::Running);
		assert_eq!(job.wait().unwrap(), 4);
		assert_eq!(job.state(), State::Terminated);
	}

	#[test]
	fn background_jobs_get_reaped() {
		let mut builder = JobBuilder::new(1, true);
		spawn_exiting(&mut builder, 0);
		let mut set = JobSet::new();
		set.push(builder.build());
		let mut reaped = vec![];
		for _ in 0 .. 100 {
			reaped.extend(set.reap());
			if set.is_empty() { break; }
			thread::sleep(time::Duration::from_millis(20));
		}
		assert!(set.is_empty());
		assert_eq!(reaped.len(), 1);
		assert_eq!(reaped[0].code(), 0);
	}
}
