/// Compare a typed answer against the displayed word.
///
/// Normal packs store their words upper-cased, so the input is upper-cased
/// and compared exactly. Case-insensitive packs lower-case both sides.
pub fn answer_matches(input: &str, word: &str, case_insensitive: bool) -> bool {
    if case_insensitive {
        input.to_lowercase() == word.to_lowercase()
    } else {
        input.to_uppercase() == word
    }
}
