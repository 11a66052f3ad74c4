use std::fmt;

use rand::seq::IndexedRandom;

/// Characters a forum code may contain. `0` is left out so codes never
/// hinge on an 0/O squint.
pub const ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ123456789";

pub const CODE_LEN: usize = 5;

/// Uppercase, drop everything outside [`ALPHABET`], keep the first five.
/// Idempotent, so it can run on every keystroke of raw input.
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter_map(|c| {
            let c = c.to_ascii_uppercase();
            ALPHABET.contains(c).then_some(c)
        })
        .take(CODE_LEN)
        .collect()
}

/// A well-formed 5-character forum code. The only ways in are [`ForumCode::parse`]
/// and [`ForumCode::random`], so anything holding one of these has already
/// cleared the grammar.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ForumCode(String);

impl ForumCode {
    pub fn parse(candidate: &str) -> Option<ForumCode> {
        let ok = candidate.len() == CODE_LEN
            && candidate.chars().all(|c| ALPHABET.contains(c));
        ok.then(|| ForumCode(candidate.to_owned()))
    }

    /// Uniform independent draw per character, same table as `parse`.
    pub fn random() -> ForumCode {
        let mut rng = rand::rng();
        ForumCode(
            (0..CODE_LEN)
                .map(|_| *ALPHABET.as_bytes().choose(&mut rng).unwrap() as char)
                .collect(),
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ForumCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_uppercases_and_keeps_alphabet() {
        assert_eq!(normalize("ab123"), "AB123");
        assert_eq!(normalize("a!b#1@2$3"), "AB123");
        assert_eq!(normalize("AB10"), "AB1");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn normalize_strips_zero_and_o_stays() {
        // 0 is outside the alphabet, O is not
        assert_eq!(normalize("ABCD0"), "ABCD");
        assert_eq!(normalize("ABCDO"), "ABCDO");
    }

    #[test]
    fn normalize_truncates_to_five() {
        assert_eq!(normalize("ABCDEFGH"), "ABCDE");
        assert_eq!(normalize("x1y2z3w4"), "X1Y2Z");
    }

    #[test]
    fn normalize_is_idempotent() {
        for raw in ["ab123", "a!b#1@2$3", "ABCD0", "héllo wörld 9", "", "12345678"] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn normalized_output_is_always_in_grammar() {
        for raw in ["~~~", "abcdefghij", "ñ0ç%PQ", "  a b 1  ", "\u{1F980}AB12"] {
            let out = normalize(raw);
            assert!(out.len() <= CODE_LEN);
            assert!(out.chars().all(|c| ALPHABET.contains(c)));
            // parse succeeds exactly when five valid characters survived
            assert_eq!(ForumCode::parse(&out).is_some(), out.len() == CODE_LEN);
        }
    }

    #[test]
    fn parse_accepts_only_exact_grammar() {
        assert!(ForumCode::parse("AB123").is_some());
        assert!(ForumCode::parse("ABCDE").is_some());
        assert!(ForumCode::parse("AB10").is_none()); // short
        assert!(ForumCode::parse("ABCD!").is_none()); // bad character
        assert!(ForumCode::parse("ABCD0").is_none()); // 0 excluded
        assert!(ForumCode::parse("abcde").is_none()); // normalization is the caller's job
        assert!(ForumCode::parse("ABCDEF").is_none()); // long
    }

    #[test]
    fn random_codes_always_parse() {
        for _ in 0..200 {
            let code = ForumCode::random();
            assert!(ForumCode::parse(code.as_str()).is_some());
        }
    }
}
