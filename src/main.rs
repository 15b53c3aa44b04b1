mod builtin;
mod config;
mod error;
mod eval;
mod global;
mod job;
mod parser;
mod redirect;
mod search;
mod types;

use std::io;
use std::process;
use io::Write;
use io::BufRead;

use eval::EvalResult;

fn main() {
	let mut state = global::State::new(config::Config::from_env());
	let mut stdout = io::stdout();
	let stdin = io::stdin();
	let mut stdin_locked = stdin.lock();
	loop {
		eval::reap_background(&mut state);
		let _ = stdout.write_all(&state.config.prompt);
		let _ = stdout.flush();
		let mut line: Vec<u8> = vec![];
		match stdin_locked.read_until(b'\n', &mut line) {
			Ok(0) | Err(_) => process::exit(1),
			Ok(_) => {},
		}
		let pipeline = match parser::parse(&line) {
			Ok(types::Line::Empty) => { continue; },
			Ok(types::Line::Pipeline(p)) => p,
			Err(e) => {
				error::report_msg(format_args!("syntax error: {}", e));
				state.last_status = 2;
				continue;
			},
		};
		state.last_status = match eval::eval(&mut state, &pipeline) {
			EvalResult::Done(s) => s,
			EvalResult::Background => 0,
			EvalResult::Exit(s) => process::exit(s as i32),
		};
		if state.config.trace {
			error::report_msg(format_args!("status {}", state.last_status));
		}
	}
}
