use std::ffi::OsStr;
use std::fs;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::io::{AsRawFd,IntoRawFd,OwnedFd,RawFd};

use nix::unistd;

use crate::error::{Error,bytes_lossy};
use crate::types::{Redirect,RedirectType};

fn open(redirect: &Redirect) -> Result<fs::File, Error> {
	let mut oopt = fs::OpenOptions::new();
	let _ = match redirect.typ {
		RedirectType::Input => oopt.read(true),
		RedirectType::Output => oopt.write(true).create(true).truncate(true),
	};
	oopt.open(OsStr::from_bytes(redirect.target))
		.map_err(|e| Error::Redirect { target: bytes_lossy(redirect.target), source: e })
}

/// Points descriptor `to` at `fd` and closes `fd`. Must only run in a forked
/// child; the shell's own table is never rewritten.
pub fn bind(fd: OwnedFd, to: RawFd) -> Result<(), Error> {
	if fd.as_raw_fd() == to {
		// already in place, closing it would undo the binding
		let _ = fd.into_raw_fd();
		return Ok(());
	}
	unistd::dup2(fd.as_raw_fd(), to)?;
	drop(fd);
	Ok(())
}

/// Opens the redirect target and binds it over stdin or stdout.
pub fn apply(redirect: &Redirect) -> Result<(), Error> {
	let file = open(redirect)?;
	bind(OwnedFd::from(file), redirect.typ.fd())
}
