use std::convert::Infallible;
use std::ffi::{CString,OsStr,OsString};
use std::os::unix::ffi::{OsStrExt,OsStringExt};
use std::path::{Path,PathBuf};
use std::{env,fs};

use nix::unistd::{self,AccessFlags};

use crate::error::{Error,bytes_lossy};

const PATH_KEY: &str = "PATH";

fn is_executable(path: &Path) -> bool {
	fs::metadata(path).map_or(false, |m| m.is_file())
		&& unistd::access(path, AccessFlags::X_OK).is_ok()
}

/// First entry of `search_path` holding an executable regular file called
/// `name`. An empty entry stands for the current directory.
pub fn lookup(name: &[u8], search_path: Option<&OsStr>) -> Option<PathBuf> {
	let search_path = search_path?;
	let name = OsStr::from_bytes(name);
	env::split_paths(search_path)
		.map(|dir| if dir.as_os_str().is_empty() { PathBuf::from(".") } else { dir })
		.map(|dir| dir.join(name))
		.find(|candidate| is_executable(candidate))
}

fn resolve(name: &[u8]) -> Result<CString, Error> {
	if name.contains(&b'/') {
		return Ok(CString::new(name)?);
	}
	let search_path = env::var_os(PATH_KEY);
	match lookup(name, search_path.as_deref()) {
		Some(path) => Ok(CString::new(path.into_os_string().into_vec())?),
		None => Err(Error::NotFound(bytes_lossy(name))),
	}
}

fn environ() -> Result<Vec<CString>, Error> {
	env::vars_os()
		.map(|(mut k, v)| {
			k.push(OsString::from("="));
			k.push(v);
			CString::new(k.into_vec()).map_err(Error::from)
		})
		.collect()
}

/// Replaces the current process image with `argv[0]`. Only returns on failure.
pub fn exec(argv: &[&[u8]]) -> Result<Infallible, Error> {
	let name = match argv.first() {
		Some(&name) => name,
		None => { return Err(Error::NotFound(String::new())); },
	};
	let external = resolve(name)?;
	let args = argv.iter().map(|&s| CString::new(s)).collect::<Result<Vec<_>, _>>()?;
	let envp = environ()?;
	unistd::execve(&external, &args, &envp)
		.map_err(|e| Error::Exec { name: bytes_lossy(name), source: e })
}
