use clap::Parser;

use super::*;

#[test]
fn parse_check_with_dictionary() {
	let cli = Cli::try_parse_from(["ortho", "check", "--dictionary", "en.dic", "--affix", "en.aff", "a.md", "b.txt"]).unwrap();
	let Command::Check(args) = cli.command else {
		panic!("expected check");
	};
	assert_eq!(args.dictionary, Some(PathBuf::from("en.dic")));
	assert_eq!(args.affix, Some(PathBuf::from("en.aff")));
	assert_eq!(args.paths, vec![PathBuf::from("a.md"), PathBuf::from("b.txt")]);
	assert!(!cli.verbose);
}

#[test]
fn check_requires_paths_and_paired_dictionary_files() {
	assert!(Cli::try_parse_from(["ortho", "check"]).is_err());
	assert!(Cli::try_parse_from(["ortho", "check", "--dictionary", "en.dic", "a.txt"]).is_err());
}

#[test]
fn parse_accept() {
	let cli = Cli::try_parse_from(["ortho", "-v", "accept", "tokio", "--personal", "words.txt"]).unwrap();
	assert!(cli.verbose);
	let Command::Accept { word, personal, config } = cli.command else {
		panic!("expected accept");
	};
	assert_eq!(word, "tokio");
	assert_eq!(personal, Some(PathBuf::from("words.txt")));
	assert_eq!(config, None);
}

#[test]
fn grammar_from_file_name() {
	assert_eq!(grammar_for(Path::new("README.md")), "source.gfm");
	assert_eq!(grammar_for(Path::new("src/lib.rs")), "source.rust");
	assert_eq!(grammar_for(Path::new(".git/COMMIT_EDITMSG")), "text.git-commit");
	assert_eq!(grammar_for(Path::new("notes")), "text.plain");
}

#[test]
fn line_col_is_one_indexed() {
	let text = "first\nsécond teh";
	assert_eq!(line_col(text, 0), (1, 1));
	assert_eq!(line_col(text, 6), (2, 1));
	let offset = text.find("teh").unwrap();
	assert_eq!(line_col(text, offset), (2, 8));
}
