//! Word segmentation for prose and identifiers.
//!
//! At each position the first matching alternative wins:
//!
//! 1. an uppercase letter followed by lowercase letters (`Variable`)
//! 2. a run of lowercase letters (`my`)
//! 3. an uppercase run that stops before a capitalized word (`HTML` in `HTMLParser`)
//! 4. a bare uppercase run (`ID`, `CONST`)
//!
//! Anything that is neither an uppercase nor a lowercase letter separates
//! tokens and is never part of one, so `myHTMLParser` yields `my`, `HTML`,
//! `Parser` and `CONST_NAME` yields `CONST`, `NAME`. Offsets are byte offsets
//! into the UTF-8 input.

/// A word-shaped slice of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
	pub word: &'a str,
	pub start: usize,
	pub end: usize,
}

impl Token<'_> {
	/// Byte range of the token in the scanned text.
	pub fn range(&self) -> std::ops::Range<usize> {
		self.start..self.end
	}
}

/// Lazily tokenizes `text`.
///
/// Each call starts a fresh scan; nothing is shared between calls.
pub fn tokenize(text: &str) -> Tokens<'_> {
	Tokens { text, pos: 0 }
}

/// Returns the token touching byte `offset`, preferring the one that ends there.
///
/// A cursor sitting right after a word still addresses that word.
pub fn token_at(text: &str, offset: usize) -> Option<Token<'_>> {
	tokenize(text)
		.take_while(|token| token.start <= offset)
		.find(|token| offset <= token.end)
}

/// Iterator returned by [`tokenize`].
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
	text: &'a str,
	pos: usize,
}

impl<'a> Iterator for Tokens<'a> {
	type Item = Token<'a>;

	fn next(&mut self) -> Option<Token<'a>> {
		let Some((offset, first)) = self.text[self.pos..].char_indices().find(|&(_, c)| is_word_char(c)) else {
			self.pos = self.text.len();
			return None;
		};

		let start = self.pos + offset;
		let end = if first.is_lowercase() {
			run_end(self.text, start, char::is_lowercase)
		} else {
			let after_first = start + first.len_utf8();
			let lower_end = run_end(self.text, after_first, char::is_lowercase);
			if lower_end > after_first {
				lower_end
			} else {
				acronym_end(self.text, start)
			}
		};

		self.pos = end;
		Some(Token {
			word: &self.text[start..end],
			start,
			end,
		})
	}
}

fn is_word_char(c: char) -> bool {
	c.is_uppercase() || c.is_lowercase()
}

/// Byte offset where the run of `pred` characters starting at `from` ends.
fn run_end(text: &str, from: usize, pred: fn(char) -> bool) -> usize {
	text[from..]
		.char_indices()
		.find(|&(_, c)| !pred(c))
		.map_or(text.len(), |(i, _)| from + i)
}

/// End of an uppercase run starting at `start`.
///
/// When the run is immediately followed by a lowercase letter its last
/// capital begins the next (capitalized) word and is left out.
fn acronym_end(text: &str, start: usize) -> usize {
	let upper_end = run_end(text, start, char::is_uppercase);
	let followed_by_lower = text[upper_end..].chars().next().is_some_and(char::is_lowercase);
	if !followed_by_lower {
		return upper_end;
	}
	match text[..upper_end].char_indices().next_back() {
		Some((last, _)) if last > start => last,
		_ => upper_end,
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	fn words(text: &str) -> Vec<&str> {
		tokenize(text).map(|t| t.word).collect()
	}

	#[test]
	fn camel_case_with_acronym() {
		assert_eq!(words("myHTMLParser"), vec!["my", "HTML", "Parser"]);
	}

	#[test]
	fn screaming_snake_case() {
		assert_eq!(words("CONST_NAME"), vec!["CONST", "NAME"]);
	}

	#[test]
	fn empty_input() {
		assert_eq!(tokenize("").next(), None);
	}

	#[test]
	fn restartable_and_deterministic() {
		let text = "let parseURLQuery = getID(42);";
		let first: Vec<_> = tokenize(text).collect();
		let second: Vec<_> = tokenize(text).collect();
		assert_eq!(first, second);
		assert_eq!(words(text), vec!["let", "parse", "URL", "Query", "get", "ID"]);
	}

	#[test]
	fn offsets_cover_the_word() {
		let tokens: Vec<_> = tokenize("  Hello, wrld!").collect();
		assert_eq!(
			tokens,
			vec![
				Token {
					word: "Hello",
					start: 2,
					end: 7
				},
				Token {
					word: "wrld",
					start: 9,
					end: 13
				},
			]
		);
	}

	#[test]
	fn digits_and_punctuation_split_words() {
		assert_eq!(words("utf8encode v2.0-beta"), vec!["utf", "encode", "v", "beta"]);
	}

	#[test]
	fn single_capital_before_lowercase_is_a_word() {
		assert_eq!(words("IDs"), vec!["I", "Ds"]);
		assert_eq!(words("A"), vec!["A"]);
		assert_eq!(words("aB"), vec!["a", "B"]);
	}

	#[test]
	fn non_ascii_letters() {
		assert_eq!(words("naïveÜber straße"), vec!["naïve", "Über", "straße"]);
		let tokens: Vec<_> = tokenize("é x").collect();
		assert_eq!(tokens[0].range(), 0..2);
		assert_eq!(tokens[1].range(), 3..4);
	}

	#[test]
	fn token_at_cursor() {
		let text = "fix teh bug";
		assert_eq!(token_at(text, 5).map(|t| t.word), Some("teh"));
		assert_eq!(token_at(text, 4).map(|t| t.word), Some("teh"));
		assert_eq!(token_at(text, 7).map(|t| t.word), Some("teh"));
		assert_eq!(token_at(text, 3).map(|t| t.word), Some("fix"));
		assert_eq!(token_at("a  b", 2), None);
		assert_eq!(token_at("", 0), None);
	}
}
