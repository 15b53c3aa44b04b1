use std::env;
use std::io::{self,Write};
use std::os::unix::ffi::OsStrExt;

use nix::unistd;

use crate::error::bytes_lossy;
use crate::global;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Outcome {
	Status(u8),
	Exit(u8),
}

pub type Builtin = fn(&mut global::State, &[&[u8]]) -> Outcome;

pub fn builtin_exit(_: &mut global::State, _: &[&[u8]]) -> Outcome {
	Outcome::Exit(0)
}

pub fn builtin_cd(_: &mut global::State, args: &[&[u8]]) -> Outcome {
	let home = env::var_os("HOME");
	let dir: &[u8] = match (args.first(), &home) {
		(Some(&dir), _) => dir,
		(None, Some(home)) => home.as_bytes(),
		(None, None) => {
			let _ = writeln!(io::stderr(), "cd: HOME not set");
			return Outcome::Status(1);
		},
	};
	match unistd::chdir(dir) {
		Ok(()) => Outcome::Status(0),
		Err(e) => {
			let _ = writeln!(io::stderr(), "cd: {}: {}", bytes_lossy(dir), e.desc());
			Outcome::Status(1)
		},
	}
}

pub fn match_builtin(name: &[u8]) -> Option<Builtin> {
	match name {
		b"cd" => Some(builtin_cd),
		b"exit" => Some(builtin_exit),
		_ => None,
	}
}
