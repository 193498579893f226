//! Classification maps as ASCII PGM images.
//!
//! One pixel per classified window, wrapped into a near-square grid. The
//! gray levels are picked for contrast in a 0..=9 ramp: code is dark, data
//! is light, padding is near-white.

use std::io::Write;

use crate::error::Result;

/// Gray level for windows labeled `code`.
const CODE_LEVEL: u8 = 3;
/// Gray level for windows labeled `data`.
const DATA_LEVEL: u8 = 7;
/// Gray level for any other (operator-defined) label.
const OTHER_LEVEL: u8 = 1;
/// Gray level for padding pixels past the last window.
const PAD_LEVEL: u8 = 9;
/// Maximum gray value declared in the PGM header.
const MAX_LEVEL: u8 = 9;

/// Map a window label to its gray level.
pub fn label_level(label: &str) -> u8 {
    match label {
        "code" => CODE_LEVEL,
        "data" => DATA_LEVEL,
        _ => OTHER_LEVEL,
    }
}

/// Write the label sequence as a plain (P2) PGM image.
///
/// The grid is `w` pixels wide with `w = floor(sqrt(n))` and one extra row
/// tall, padded with [`PAD_LEVEL`] pixels; `name` goes into the header
/// comment. An empty label sequence writes nothing.
pub fn write_pgm<W: Write>(out: &mut W, name: &str, labels: &[String]) -> Result<()> {
    if labels.is_empty() {
        return Ok(());
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[allow(clippy::cast_precision_loss)]
    let width = ((labels.len() as f64).sqrt().floor() as usize).max(1);
    let height = width + 1;

    let mut levels: Vec<u8> = labels.iter().map(|l| label_level(l)).collect();
    levels.resize(width * height, PAD_LEVEL);

    writeln!(out, "P2")?;
    writeln!(out, "#{}", name)?;
    writeln!(out, "{} {}", width, height)?;
    writeln!(out, "{}", MAX_LEVEL)?;
    for row in levels.chunks(width) {
        let line = row
            .iter()
            .map(u8::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(out, "{}", line)?;
    }
    Ok(())
}
