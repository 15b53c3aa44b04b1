use std::{error,ffi,fmt,io};
use std::io::Write;

#[derive(Debug)]
pub enum Error {
	Fork(nix::Error),
	Pipe(nix::Error),
	Redirect { target: String, source: io::Error },
	NotFound(String),
	Exec { name: String, source: nix::Error },
	Nix(nix::Error),
	Io(io::Error),
	Nul(ffi::NulError),
}

impl Error {
	/// Terminal status of a child that failed with this error.
	pub fn status(&self) -> u8 {
		match *self {
			Error::NotFound(..) => 127,
			Error::Exec { source: nix::errno::Errno::ENOENT, .. } => 127,
			Error::Exec { .. } => 126,
			Error::Redirect { .. } => 1,
			_ => 126,
		}
	}
}

impl From<nix::Error> for Error {
	fn from(e: nix::Error) -> Error {
		Error::Nix(e)
	}
}
impl From<io::Error> for Error {
	fn from(e: io::Error) -> Error {
		Error::Io(e)
	}
}
impl From<ffi::NulError> for Error {
	fn from(e: ffi::NulError) -> Error {
		Error::Nul(e)
	}
}
impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match *self {
			Error::Fork(ref e) => write!(f, "fork failed: {}", e.desc()),
			Error::Pipe(ref e) => write!(f, "pipe failed: {}", e.desc()),
			Error::Redirect { ref target, ref source } => write!(f, "{}: {}", target, source),
			Error::NotFound(ref name) => write!(f, "{}: command not found", name),
			Error::Exec { ref name, ref source } => write!(f, "{}: {}", name, source.desc()),
			Error::Nix(ref e) => write!(f, "{}", e.desc()),
			Error::Io(ref e) => write!(f, "{}", e),
			Error::Nul(ref e) => write!(f, "nul char in argument: {}", e),
		}
	}
}
impl error::Error for Error {
	fn source(&self) -> Option<&(dyn error::Error + 'static)> {
		match *self {
			Error::Fork(ref e) | Error::Pipe(ref e) | Error::Nix(ref e) => Some(e),
			Error::Exec { ref source, .. } => Some(source),
			Error::Redirect { ref source, .. } => Some(source),
			Error::Io(ref e) => Some(e),
			Error::Nul(ref e) => Some(e),
			Error::NotFound(..) => None,
		}
	}
}

/// Writes a diagnostic line to stderr. Failures tied to a word the user typed
/// start with that word; the rest carry the shell name.
pub fn report(e: &Error) {
	let mut stderr = io::stderr();
	let _ = match *e {
		Error::NotFound(..) | Error::Exec { .. } | Error::Redirect { .. } => writeln!(stderr, "{}", e),
		_ => writeln!(stderr, "minish: {}", e),
	};
	let _ = stderr.flush();
}

pub fn report_msg(msg: fmt::Arguments) {
	let mut stderr = io::stderr();
	let _ = writeln!(stderr, "minish: {}", msg);
	let _ = stderr.flush();
}

pub fn bytes_lossy(b: &[u8]) -> String {
	String::from_utf8_lossy(b).into_owned()
}
