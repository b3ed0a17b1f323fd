//! Solution trace decoding
//!
//! Some service deployments hide the solution behind a numeric "trace":
//! every letter becomes a 4-digit chunk whose first two digits are the
//! letter's code plus its position and whose last two are noise. This keeps
//! the word out of plain sight in responses; it is not encryption.

use crate::error::{Error, Result};

const CHUNK_WIDTH: usize = 4;
const CODE_WIDTH: usize = 2;

/// Recover the solution from a trace string
pub fn decode_trace(trace: &str) -> Result<String> {
    let digits = trace.trim().as_bytes();
    if digits.is_empty() || digits.len() % CHUNK_WIDTH != 0 {
        return Err(Error::Protocol(format!(
            "Trace length {} is not a multiple of {}",
            digits.len(),
            CHUNK_WIDTH
        )));
    }

    digits
        .chunks(CHUNK_WIDTH)
        .enumerate()
        .map(|(index, chunk)| {
            if !chunk.iter().all(u8::is_ascii_digit) {
                return Err(Error::Protocol(format!("Trace chunk {} is not numeric", index)));
            }
            let code = chunk[..CODE_WIDTH]
                .iter()
                .fold(0u32, |acc, d| acc * 10 + u32::from(d - b'0'));
            code.checked_sub(index as u32)
                .and_then(char::from_u32)
                .filter(char::is_ascii_uppercase)
                .ok_or_else(|| Error::Protocol(format!("Trace chunk {} has no letter", index)))
        })
        .collect()
}

/// Build a trace for `word`, taking the noise digits from `noise`
///
/// `noise` must return values in 10..=99.
pub fn encode_trace(word: &str, mut noise: impl FnMut() -> u8) -> String {
    word.to_ascii_uppercase()
        .chars()
        .enumerate()
        .map(|(index, c)| format!("{}{}", c as u32 + index as u32, noise().clamp(10, 99)))
        .collect()
}
