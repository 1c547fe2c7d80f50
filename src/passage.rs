use rand::Rng;

/// The fixed pool a session draws its passage from.
pub const PASSAGES: [&str; 3] = [
    "The first popular web browser with a graphical user interface, Mosaic, was released in 1993. Accessible to non-technical people, it played a prominent role in the rapid growth of the nascent World Wide Web. The lead developers of Mosaic then founded the Netscape corporation, which released a more polished browser, Netscape Navigator, in 1994. This quickly became the most-used.",
    "The HyperText Markup Language or HTML is the standard markup language for documents designed to be displayed in a web browser. It is frequently assisted by technologies such as Cascading Style Sheets (CSS) and scripting languages such as JavaScript.",
    "CSS is designed to enable the separation of content and presentation, including layout, colors, and fonts. This separation can improve content accessibility; provide more flexibility and control in the specification of presentation characteristics.",
];

const _: () = assert!(!PASSAGES.is_empty());

/// Characters accepted into the typed buffer, compared after lowercasing.
pub const ALLOWED_CHARS: &str = "abcdefghijklmnopqrstuvwxyz1234567890,.;:-()'\" ";

/// Whether a typed character may enter the buffer.
pub fn is_allowed(c: char) -> bool {
    c.to_lowercase().all(|l| ALLOWED_CHARS.contains(l))
}

/// Pick a passage uniformly at random, returning its pool index alongside it.
pub fn select_passage<R: Rng + ?Sized>(rng: &mut R) -> (usize, &'static str) {
    let idx = rng.gen_range(0..PASSAGES.len());
    (idx, PASSAGES[idx])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::HashSet;

    #[test]
    fn test_lowercase_letters_digits_and_punctuation_allowed() {
        for c in ALLOWED_CHARS.chars() {
            assert!(is_allowed(c), "{c:?} should be allowed");
        }
    }

    #[test]
    fn test_uppercase_letters_allowed() {
        assert!(is_allowed('A'));
        assert!(is_allowed('Z'));
    }

    #[test]
    fn test_disallowed_characters() {
        for c in ['!', '?', '@', '\n', '\t', 'é', '_', '/', '€'] {
            assert!(!is_allowed(c), "{c:?} should be rejected");
        }
    }

    #[test]
    fn test_lowercase_expanding_to_disallowed_sequence() {
        // U+0130 lowercases to 'i' followed by a combining dot
        assert!(!is_allowed('\u{130}'));
    }

    #[test]
    fn test_every_passage_is_typeable() {
        for passage in PASSAGES {
            assert!(!passage.is_empty());
            for c in passage.chars() {
                assert!(is_allowed(c), "{c:?} in passage cannot be typed");
            }
        }
    }

    #[test]
    fn test_select_passage_is_from_pool() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let (idx, passage) = select_passage(&mut rng);
            assert_eq!(PASSAGES[idx], passage);
        }
    }

    #[test]
    fn test_select_passage_reaches_every_entry() {
        let mut rng = StdRng::seed_from_u64(42);
        let seen: HashSet<usize> = (0..200).map(|_| select_passage(&mut rng).0).collect();
        assert_eq!(seen.len(), PASSAGES.len());
    }

    #[test]
    fn test_select_passage_seeded_is_reproducible() {
        let mut a = StdRng::seed_from_u64(3);
        let mut b = StdRng::seed_from_u64(3);
        for _ in 0..10 {
            assert_eq!(select_passage(&mut a), select_passage(&mut b));
        }
    }
}
