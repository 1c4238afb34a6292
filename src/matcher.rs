use crate::alphabet::AlphabetSequence;

/// How a single target letter compares against what has been typed so far.
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum MatchClass {
    Untyped,
    Correct,
    Incorrect,
}

/// Result of comparing an input buffer against an alphabet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Evaluation {
    pub classes: Vec<MatchClass>,
    pub is_complete: bool,
}

impl Evaluation {
    pub fn correct_count(&self) -> usize {
        self.classes
            .iter()
            .filter(|c| **c == MatchClass::Correct)
            .count()
    }
}

/// Classify every letter of `alphabet` against `input` and check for an exact,
/// case-insensitive match of the whole sequence.
///
/// Characters typed beyond the end of the alphabet are not classified, but they
/// do keep `is_complete` false.
pub fn evaluate(input: &str, alphabet: &AlphabetSequence) -> Evaluation {
    let mut typed = input.chars();
    let classes = alphabet
        .letters()
        .iter()
        .map(|&letter| match typed.next() {
            None => MatchClass::Untyped,
            Some(c) if matches_letter(c, letter) => MatchClass::Correct,
            Some(_) => MatchClass::Incorrect,
        })
        .collect();

    Evaluation {
        classes,
        is_complete: is_complete(input, alphabet),
    }
}

pub fn is_complete(input: &str, alphabet: &AlphabetSequence) -> bool {
    input.to_lowercase() == alphabet.joined()
}

fn matches_letter(typed: char, letter: char) -> bool {
    typed == letter || typed.to_lowercase().eq(std::iter::once(letter))
}
