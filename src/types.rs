#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum RedirectType { Input, Output }

impl RedirectType {
	pub fn fd(self) -> i32 {
		match self {
			RedirectType::Input => libc::STDIN_FILENO,
			RedirectType::Output => libc::STDOUT_FILENO,
		}
	}
}

#[derive(Debug, PartialEq, Eq)]
pub struct Redirect<'a> {
	pub target: &'a [u8],
	pub typ: RedirectType,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Command<'a> {
	pub name: &'a [u8],
	pub arguments: Vec<&'a [u8]>,
	pub redirect: Option<Redirect<'a>>,
}

impl<'a> Command<'a> {
	/// argv as handed to the executable: the name followed by the arguments.
	pub fn argv(&self) -> Vec<&'a [u8]> {
		let mut argv = Vec::with_capacity(self.arguments.len() + 1);
		argv.push(self.name);
		argv.extend(self.arguments.iter().cloned());
		argv
	}
}

#[derive(Debug, PartialEq, Eq)]
pub struct Pipeline<'a> {
	pub commands: Vec<Command<'a>>,
	pub is_background: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Line<'a> {
	Empty,
	Pipeline(Pipeline<'a>),
}
