use std::env;
use std::ffi::OsString;
use std::os::unix::ffi::OsStringExt;

const PROMPT_KEY: &str = "PS1";
const TRACE_KEY: &str = "MINISH_TRACE";
const DEFAULT_PROMPT: &[u8] = b"$ ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
	pub prompt: Vec<u8>,
	pub trace: bool,
}

impl Config {
	pub fn from_env() -> Config {
		Config::from_vars(env::var_os(PROMPT_KEY), env::var_os(TRACE_KEY))
	}

	fn from_vars(prompt: Option<OsString>, trace: Option<OsString>) -> Config {
		Config {
			prompt: prompt.map_or_else(|| DEFAULT_PROMPT.to_vec(), |p| p.into_vec()),
			trace: trace.map_or(false, |t| !t.is_empty()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults() {
		let c = Config::from_vars(None, None);
		assert_eq!(c.prompt, b"$ ");
		assert!(!c.trace);
	}

	#[test]
	fn prompt_from_ps1() {
		let c = Config::from_vars(Some("ish> ".into()), None);
		assert_eq!(c.prompt, b"ish> ");
		let c = Config::from_vars(Some("".into()), None);
		assert!(c.prompt.is_empty());
	}

	#[test]
	fn trace_needs_a_value() {
		assert!(!Config::from_vars(None, Some("".into())).trace);
		assert!(Config::from_vars(None, Some("1".into())).trace);
	}
}
