//! Property tests for splitting and quoting.

use proptest::prelude::*;
use shellwords_lex::{join, quote, split};

proptest! {
    #[test]
    fn whitespace_runs_do_not_change_words(
        words in prop::collection::vec("[a-zA-Z0-9_./-]{1,8}", 1..6),
        gaps in prop::collection::vec("[ \t\n]{1,4}", 6),
    ) {
        let single = words.join(" ");
        let mut spaced = String::new();
        for (word, gap) in words.iter().zip(&gaps) {
            spaced.push_str(word);
            spaced.push_str(gap);
        }
        prop_assert_eq!(split(&single, true, true).unwrap(), split(&spaced, true, true).unwrap());
        prop_assert_eq!(split(&spaced, true, true).unwrap(), words);
    }

    #[test]
    fn quote_is_stable(s in "\\PC*") {
        let quoted = quote(&s);
        let unquoted = split(&quoted, false, true).unwrap();
        prop_assert_eq!(unquoted.len(), 1);
        prop_assert_eq!(quote(&unquoted[0]), quoted);
    }

    #[test]
    fn join_then_split_round_trips(words in prop::collection::vec("\\PC{0,12}", 0..6)) {
        prop_assert_eq!(split(&join(&words), true, true).unwrap(), words);
    }
}
