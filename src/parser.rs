use crate::types::*;

pub type ParseResult<T> = Result<T, String>;

struct Tokenizer<'a> {
	line: &'a [u8],
	i: usize,
}

impl<'a> Tokenizer<'a> {
	fn proceed_while<F>(&mut self, f: F) where F: Fn(u8) -> bool {
		while let Some(c) = self.line.get(self.i) {
			if !f(*c) { break; }
			self.i += 1;
		}
	}

	fn is_whitespace(c: u8) -> bool {
		matches!(c, b' ' | b'\t' | b'\n' | b'\r')
	}

	fn skip_whitespaces(&mut self) {
		self.proceed_while(Tokenizer::is_whitespace);
	}

	fn read_word(&mut self) -> &'a [u8] {
		let orig = self.i;
		self.proceed_while(|c| !Tokenizer::is_whitespace(c));
		&self.line[orig .. self.i]
	}
}

impl<'a> Iterator for Tokenizer<'a> {
	type Item = &'a [u8];

	fn next(&mut self) -> Option<&'a [u8]> {
		self.skip_whitespaces();
		let word = self.read_word();
		if word.is_empty() { None } else { Some(word) }
	}
}

fn redirect_type(token: &[u8]) -> Option<RedirectType> {
	match token {
		b"<" => Some(RedirectType::Input),
		b">" => Some(RedirectType::Output),
		_ => None,
	}
}

fn parse_command<'a>(tokens: &[&'a [u8]]) -> ParseResult<Command<'a>> {
	let operator = tokens.iter().enumerate().find_map(|(i, t)| redirect_type(t).map(|typ| (i, typ)));
	let (words, redirect) = match operator {
		None => (tokens, None),
		Some((op, typ)) => {
			let target = match tokens.get(op + 1) {
				Some(&t) if redirect_type(t).is_none() => t,
				_ => { return Err("missing redirect target".to_string()); },
			};
			if tokens[op + 2 ..].iter().any(|t| redirect_type(t).is_some()) {
				return Err("only one redirection per command".to_string());
			}
			(&tokens[.. op], Some(Redirect { target, typ }))
		},
	};

	let (&name, arguments) = match words.split_first() {
		Some(split) => split,
		None => { return Err("empty command".to_string()); },
	};
	Ok(Command { name, arguments: arguments.to_vec(), redirect })
}

fn parse_pipeline<'a>(mut tokens: &[&'a [u8]]) -> ParseResult<Pipeline<'a>> {
	let mut is_background = false;
	if let Some((&last, rest)) = tokens.split_last() {
		if last == b"&" {
			is_background = true;
			tokens = rest;
		}
	}

	let commands = tokens.split(|&t| t == b"|")
		.map(parse_command)
		.collect::<ParseResult<Vec<_>>>()?;
	Ok(Pipeline { commands, is_background })
}

pub fn parse(line: &[u8]) -> ParseResult<Line<'_>> {
	let tokens: Vec<&[u8]> = Tokenizer { line, i: 0 }.collect();
	if tokens.is_empty() {
		return Ok(Line::Empty);
	}
	parse_pipeline(&tokens).map(Line::Pipeline)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn argv(command: &Command) -> Vec<String> {
		command.argv().iter().map(|w| String::from_utf8_lossy(w).into_owned()).collect()
	}

	fn pipeline(line: &[u8]) -> Pipeline<'_> {
		match parse(line) {
			Ok(Line::Pipeline(p)) => p,
			other => panic!("expected pipeline, got {:?}", other),
		}
	}

	#[test]
	fn blank_lines_are_empty() {
		assert_eq!(parse(b"").unwrap(), Line::Empty);
		assert_eq!(parse(b"  \t \n").unwrap(), Line::Empty);
	}

	#[test]
	fn plain_command() {
		let p = pipeline(b"ls  -l\t/tmp\n");
		assert!(!p.is_background);
		assert_eq!(p.commands.len(), 1);
		assert_eq!(argv(&p.commands[0]), vec!["ls", "-l", "/tmp"]);
		assert_eq!(p.commands[0].redirect, None);
	}

	#[test]
	fn trailing_ampersand_is_background() {
		let p = pipeline(b"sleep 5 &\n");
		assert!(p.is_background);
		assert_eq!(argv(&p.commands[0]), vec!["sleep", "5"]);
	}

	#[test]
	fn inner_ampersand_is_an_argument() {
		let p = pipeline(b"echo & done");
		assert!(!p.is_background);
		assert_eq!(argv(&p.commands[0]), vec!["echo", "&", "done"]);
	}

	#[test]
	fn output_redirect_truncates_argv() {
		let p = pipeline(b"echo hi > out.txt &");
		assert!(p.is_background);
		let c = &p.commands[0];
		assert_eq!(argv(&c), vec!["echo", "hi"]);
		assert_eq!(c.redirect, Some(Redirect { target: b"out.txt", typ: RedirectType::Output }));
	}

	#[test]
	fn input_redirect() {
		let p = pipeline(b"wc -l < in.txt");
		let c = &p.commands[0];
		assert_eq!(argv(&c), vec!["wc", "-l"]);
		assert_eq!(c.redirect, Some(Redirect { target: b"in.txt", typ: RedirectType::Input }));
	}

	#[test]
	fn tokens_after_target_are_dropped() {
		let p = pipeline(b"echo hi > out.txt ignored");
		assert_eq!(argv(&p.commands[0]), vec!["echo", "hi"]);
	}

	#[test]
	fn pipeline_stages() {
		let p = pipeline(b"cat f | grep x | wc -l > n");
		assert_eq!(p.commands.len(), 3);
		assert_eq!(argv(&p.commands[0]), vec!["cat", "f"]);
		assert_eq!(argv(&p.commands[1]), vec!["grep", "x"]);
		assert_eq!(p.commands[2].redirect.as_ref().map(|r| r.target), Some(&b"n"[..]));
	}

	#[test]
	fn operators_must_be_whole_tokens() {
		let p = pipeline(b"echo a|b >x");
		assert_eq!(p.commands.len(), 1);
		assert_eq!(argv(&p.commands[0]), vec!["echo", "a|b", ">x"]);
	}

	#[test]
	fn syntax_errors() {
		assert_eq!(parse(b"echo hi |"), Err("empty command".to_string()));
		assert_eq!(parse(b"| cat"), Err("empty command".to_string()));
		assert_eq!(parse(b"&"), Err("empty command".to_string()));
		assert_eq!(parse(b"> out"), Err("empty command".to_string()));
		assert_eq!(parse(b"echo >"), Err("missing redirect target".to_string()));
		assert_eq!(parse(b"cat < > out"), Err("missing redirect target".to_string()));
		assert_eq!(parse(b"cat < in > out"), Err("only one redirection per command".to_string()));
	}
}
