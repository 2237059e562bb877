//! Translation of terminal escape sequences into markup
//!
//! The run output arrives colored with the handful of ANSI sequences the
//! tester emits. They are rewritten into markup fragments so the transcript
//! stays readable when saved or rendered. Substitution is plain literal
//! string replacement; no pattern engine is involved, so bracket characters
//! in the tokens need no escaping.

/// Ordered table of (escape sequence, markup fragment) pairs.
///
/// The tokens are disjoint byte sequences, so applying the replacements in
/// any order yields the same result; the table order matches the protocol
/// documentation.
const TOKENS: [(&str, &str); 4] = [
    ("\u{1b}[0m", "</strong>"),
    ("\u{1b}[32;1m", "<strong class=\"green\">"),
    ("\u{1b}[31;1m", "<strong class=\"red\">"),
    ("\u{1b}[1m", "<strong class=\"underline\">"),
];

/// Rewrite every known escape sequence in `chunk` into its markup fragment.
///
/// Must be called exactly once per freshly received chunk. Running it over
/// text that already went through it would only be a problem if that text
/// still contained a literal escape token, which translated output never
/// does; callers nevertheless translate before appending to any buffer.
pub fn translate(chunk: &str) -> String {
    TOKENS
        .iter()
        .fold(chunk.to_string(), |acc, (token, markup)| {
            acc.replace(token, markup)
        })
}
