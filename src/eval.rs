use std::io::{self,Write};
use std::os::unix::io::OwnedFd;

use nix::sys::signal::{self,SigHandler,Signal};
use nix::unistd::{self,ForkResult,Pid};

use crate::builtin::{self,Outcome};
use crate::error::{self,Error,bytes_lossy};
use crate::global;
use crate::job::{self,WaitStatusExt};
use crate::redirect;
use crate::search;
use crate::types::{Command,Pipeline};

/// Replacement stdin/stdout for one stage. `None` keeps the inherited stream.
struct Bindings {
	stdin: Option<OwnedFd>,
	stdout: Option<OwnedFd>,
}

fn do_exec_command(command: &Command, bindings: Bindings) -> Result<u8, Error> {
	// Rust runtimes start with SIGPIPE ignored and exec keeps that disposition.
	let _ = unsafe { signal::signal(Signal::SIGPIPE, SigHandler::SigDfl) }?;
	if let Some(fd) = bindings.stdin {
		redirect::bind(fd, libc::STDIN_FILENO)?;
	}
	if let Some(fd) = bindings.stdout {
		redirect::bind(fd, libc::STDOUT_FILENO)?;
	}
	// pipe wiring first, so an explicit redirect wins for its stream
	if let Some(ref r) = command.redirect {
		redirect::apply(r)?;
	}
	match search::exec(&command.argv())? {}
}

fn exec_command(command: &Command, bindings: Bindings) -> ! {
	let r = do_exec_command(command, bindings);
	let s = r.unwrap_or_else(|e| {
		error::report(&e);
		e.status()
	});
	let _ = io::stdout().flush();
	unsafe { libc::_exit(s as libc::c_int) }
}

fn trace_spawn(state: &global::State, pid: Pid, command: &Command) {
	if state.config.trace {
		let argv: Vec<String> = command.argv().iter().map(|w| bytes_lossy(w)).collect();
		error::report_msg(format_args!("+ [{}] {}", pid, argv.join(" ")));
	}
}

/// Forks one child per stage, joining neighbours with a pipe. The shell keeps
/// no pipe end once the stage that needs it has been forked.
fn spawn_commands(state: &global::State, pipeline: &Pipeline, job_builder: &mut job::JobBuilder) -> Result<(), Error> {
	let last = pipeline.commands.len() - 1;
	let mut stdin: Option<OwnedFd> = None;
	for (i, command) in pipeline.commands.iter().enumerate() {
		let (next_stdin, stdout) = if i < last {
			let (pipe_read, pipe_write) = unistd::pipe().map_err(Error::Pipe)?;
			(Some(pipe_read), Some(pipe_write))
		} else {
			(None, None)
		};
		match job_builder.push_fork()? {
			ForkResult::Parent { child } => {
				trace_spawn(state, child, command);
				drop(stdout);
				drop(stdin);
				stdin = next_stdin;
			},
			ForkResult::Child => {
				drop(next_stdin);
				exec_command(command, Bindings { stdin, stdout });
			},
		}
	}
	Ok(())
}

pub enum EvalResult {
	Done(u8),
	Background,
	Exit(u8),
}

pub fn eval(state: &mut global::State, pipeline: &Pipeline) -> EvalResult {
	let commands = &pipeline.commands;
	assert!(!commands.is_empty());

	// A builtin in the first stage always runs in the shell itself; whatever
	// operators follow it on the line are ignored.
	if let Some(func) = builtin::match_builtin(commands[0].name) {
		return match func(state, &commands[0].arguments) {
			Outcome::Status(s) => EvalResult::Done(s),
			Outcome::Exit(s) => EvalResult::Exit(s),
		};
	}

	// children must not inherit unflushed prompt bytes
	let _ = io::stdout().flush();
	let mut job_builder = job::JobBuilder::new(commands.len(), pipeline.is_background);
	if let Err(e) = spawn_commands(state, pipeline, &mut job_builder) {
		error::report(&e);
	}
	if job_builder.is_empty() {
		return EvalResult::Done(126);
	}

	let mut job = job_builder.build();
	if job.is_background {
		state.job_set.push(job);
		return EvalResult::Background;
	}
	match job.wait() {
		Ok(s) => EvalResult::Done(s),
		Err(e) => {
			error::report(&e);
			EvalResult::Done(job.code())
		},
	}
}

/// Collects background jobs that have terminated since the last call.
pub fn reap_background(state: &mut global::State) {
	if state.job_set.is_empty() {
		return;
	}
	for job in state.job_set.reap() {
		if state.config.trace {
			for pr in &job.processes {
				error::report_msg(format_args!("[{}] done, status {}", pr.pid, pr.status.code()));
			}
		}
	}
}
