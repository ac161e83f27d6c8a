use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Scoring value and English frequency (percent) of one letter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LetterInfo {
    pub letter: char,
    pub value: u8,
    pub frequency: f32,
}

const fn info(letter: char, value: u8, frequency: f32) -> LetterInfo {
    LetterInfo {
        letter,
        value,
        frequency,
    }
}

pub const ALPHABET: [LetterInfo; 26] = [
    info('A', 1, 8.16),
    info('B', 3, 1.49),
    info('C', 3, 2.78),
    info('D', 2, 4.25),
    info('E', 1, 12.70),
    info('F', 4, 2.22),
    info('G', 2, 2.01),
    info('H', 4, 6.09),
    info('I', 1, 6.96),
    info('J', 8, 0.15),
    info('K', 5, 0.77),
    info('L', 1, 4.02),
    info('M', 3, 2.40),
    info('N', 1, 6.74),
    info('O', 1, 7.50),
    info('P', 3, 1.92),
    info('Q', 10, 0.09),
    info('R', 1, 5.98),
    info('S', 1, 6.32),
    info('T', 1, 9.05),
    info('U', 1, 2.75),
    info('V', 4, 0.97),
    info('W', 4, 2.36),
    info('X', 8, 0.15),
    info('Y', 4, 1.97),
    info('Z', 10, 0.07),
];

static VALUES: Lazy<HashMap<char, u8>> =
    Lazy::new(|| ALPHABET.iter().map(|l| (l.letter, l.value)).collect());

static CUMULATIVE: Lazy<Vec<(char, f32)>> = Lazy::new(|| {
    let mut total = 0.0;
    ALPHABET
        .iter()
        .map(|l| {
            total += l.frequency;
            (l.letter, total)
        })
        .collect()
});

/// Point value of a letter in either case; anything outside A-Z is worth 1
pub fn letter_value(letter: char) -> u8 {
    VALUES
        .get(&letter.to_ascii_uppercase())
        .copied()
        .unwrap_or(1)
}

/// Running frequency totals in alphabet order, for weighted picks
pub fn cumulative_distribution() -> &'static [(char, f32)] {
    &CUMULATIVE
}
