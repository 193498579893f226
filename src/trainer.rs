//! Interactive training loop for the weight model.
//!
//! A session walks one file's byte buffer: pick a window (random, or an
//! operator-supplied address), show its disassembly and the current
//! prediction, then apply one line of feedback to the model. Input, output
//! and the random source are injected so sessions can be scripted in tests
//! and reproduced with a fixed seed.

use std::io::{BufRead, Write};

use rand::Rng;
use tracing::debug;

use crate::classifier::classify;
use crate::decoder::{decode, padded, PAD_BYTES};
use crate::error::{ClassifyError, Result};
use crate::features::FeatureVector;
use crate::model::Model;

/// Bytes per training window (excluding the decode pad).
pub const TRAINING_WINDOW: usize = 16;

/// One line of operator feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    /// Prediction was right: reinforce the predicted class.
    Confirm,
    /// Prediction was wrong: penalize the predicted class.
    Reject,
    /// Jump to an operator-chosen window instead.
    Reposition,
    /// No-op; empty or unrecognized input lands here.
    Ignore,
}

impl Feedback {
    /// Parse one input line. Only the first character matters, case
    /// insensitive: `y`es, `n`o, `p`osition; everything else is ignored.
    pub fn parse(line: &str) -> Feedback {
        match line.trim().chars().next() {
            Some('y') | Some('Y') => Feedback::Confirm,
            Some('n') | Some('N') => Feedback::Reject,
            Some('p') | Some('P') => Feedback::Reposition,
            _ => Feedback::Ignore,
        }
    }
}

/// Parse a position entry: `$` prefix for hex, plain decimal otherwise.
///
/// Returns the raw number; the session converts it from a target address to
/// a buffer offset. `None` for unparsable input.
pub fn parse_position(line: &str) -> Option<i64> {
    let line = line.trim();
    if let Some(hex) = line.strip_prefix('$') {
        i64::from_str_radix(hex, 16).ok()
    } else {
        line.parse().ok()
    }
}

/// Interactive training session over injected I/O and randomness.
pub struct TrainingSession<R, I, O> {
    rng: R,
    input: I,
    output: O,
    rounds: u32,
}

impl<R: Rng, I: BufRead, O: Write> TrainingSession<R, I, O> {
    /// Create a session that asks for `rounds` feedback rounds per file.
    pub fn new(rng: R, input: I, output: O, rounds: u32) -> Self {
        TrainingSession {
            rng,
            input,
            output,
            rounds,
        }
    }

    /// Run the session over one file's buffer, updating `model` in place.
    ///
    /// `data` is the raw buffer without pad. Confirm, reject and ignore each
    /// consume one round; repositioning does not. End-of-input on the
    /// feedback stream ends the session early. The caller persists the model
    /// afterwards.
    pub fn run(&mut self, model: &mut Model, data: &[u8], load_address: u16) -> Result<()> {
        if data.len() < TRAINING_WINDOW {
            return Err(ClassifyError::BufferTooSmall {
                expected: TRAINING_WINDOW,
                actual: data.len(),
            });
        }

        let buf = padded(data);
        let max_start = buf.len() - TRAINING_WINDOW;
        let mut next_pos: Option<usize> = None;
        let mut used = 0u32;

        while used < self.rounds {
            let pos = next_pos
                .take()
                .unwrap_or_else(|| self.rng.gen_range(0..=max_start));

            let window = decode(&buf, load_address, pos, TRAINING_WINDOW + PAD_BYTES);
            let features = FeatureVector::extract(&window);
            let verdict = classify(model, &features)?;

            for insn in &window {
                writeln!(self.output, "{}", insn)?;
            }
            writeln!(self.output, "{} {}", used, verdict.label)?;
            writeln!(self.output, "(Yes/No/Ignore/Pos)? ")?;

            let Some(line) = self.read_line()? else {
                debug!("input exhausted, ending session");
                break;
            };

            match Feedback::parse(&line) {
                Feedback::Confirm => {
                    model.reinforce(&verdict.label, &features);
                    used += 1;
                }
                Feedback::Reject => {
                    model.penalize(&verdict.label, &features);
                    used += 1;
                }
                Feedback::Reposition => {
                    write!(self.output, "Position? ")?;
                    self.output.flush()?;
                    let Some(entry) = self.read_line()? else {
                        debug!("input exhausted, ending session");
                        break;
                    };
                    // Unparsable or out-of-range entries fall back to a
                    // fresh random window on the next round.
                    next_pos = parse_position(&entry)
                        .map(|addr| addr - i64::from(load_address))
                        .filter(|&off| off >= 0 && off as usize <= max_start)
                        .map(|off| off as usize);
                }
                Feedback::Ignore => {
                    writeln!(self.output, "Ignoring...")?;
                    used += 1;
                }
            }
        }

        debug!(rounds = used, "training session finished");
        Ok(())
    }

    /// Read one line; `None` at end of input.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let n = self.input.read_line(&mut line)?;
        if n == 0 {
            Ok(None)
        } else {
            Ok(Some(line))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::io::Cursor;

    fn run_session(script: &str, data: &[u8], rounds: u32) -> (Model, String) {
        let mut model = Model::seeded();
        let mut output = Vec::new();
        let mut session = TrainingSession::new(
            StdRng::seed_from_u64(7),
            Cursor::new(script.as_bytes().to_vec()),
            &mut output,
            rounds,
        );
        session.run(&mut model, data, 0x1000).unwrap();
        (model, String::from_utf8(output).unwrap())
    }

    fn sample_data() -> Vec<u8> {
        // 16 bytes of simple code.
        vec![
            0xA9, 0x00, 0x8D, 0x00, 0xD4, 0xA2, 0x10, 0xCA, 0xD0, 0xFD, 0xE8, 0xEA, 0xEA, 0x4C,
            0x00, 0x10,
        ]
    }

    #[test]
    fn test_feedback_parsing() {
        assert_eq!(Feedback::parse("yes\n"), Feedback::Confirm);
        assert_eq!(Feedback::parse("Y"), Feedback::Confirm);
        assert_eq!(Feedback::parse("no"), Feedback::Reject);
        assert_eq!(Feedback::parse("  Position"), Feedback::Reposition);
        assert_eq!(Feedback::parse(""), Feedback::Ignore);
        assert_eq!(Feedback::parse("banana"), Feedback::Ignore);
    }

    #[test]
    fn test_position_parsing() {
        assert_eq!(parse_position("$1000"), Some(0x1000));
        assert_eq!(parse_position("4096\n"), Some(4096));
        assert_eq!(parse_position(" $FF "), Some(255));
        assert_eq!(parse_position("zzz"), None);
        assert_eq!(parse_position("$zzz"), None);
        assert_eq!(parse_position(""), None);
    }

    #[test]
    fn test_confirm_updates_predicted_class() {
        let (model, output) = run_session("y\n", &sample_data(), 1);
        // Zero model ties resolve to "code"; confirming bumps its weights.
        let weights = model.class_weights("code").unwrap();
        assert!(weights.iter().sum::<i64>() > 0);
        assert_eq!(model.class_weights("data").unwrap(), &[0i64; 256][..]);
        assert!(output.contains("0 code"));
    }

    #[test]
    fn test_confirm_twice_doubles_delta() {
        // Both rounds present the same window: reposition to $1000 first.
        let script = "p\n$1000\ny\np\n$1000\ny\n";
        let (model_twice, _) = run_session(script, &sample_data(), 2);
        let (model_once, _) = run_session("p\n$1000\ny\n", &sample_data(), 1);

        let once = model_once.class_weights("code").unwrap();
        let twice = model_twice.class_weights("code").unwrap();
        for i in 0..256 {
            assert_eq!(twice[i], 2 * once[i]);
        }
    }

    #[test]
    fn test_reject_subtracts() {
        let (model, _) = run_session("p\n$1000\nn\n", &sample_data(), 1);
        let weights = model.class_weights("code").unwrap();
        assert!(weights.iter().sum::<i64>() < 0);
    }

    #[test]
    fn test_ignore_leaves_model_unchanged() {
        let (model, output) = run_session("whatever\n", &sample_data(), 1);
        assert_eq!(model, Model::seeded());
        assert!(output.contains("Ignoring..."));
    }

    #[test]
    fn test_reposition_does_not_consume_round() {
        // One reposition plus one confirm fits in a single round.
        let (model, _) = run_session("p\n$1000\ny\n", &sample_data(), 1);
        assert!(model.class_weights("code").unwrap().iter().sum::<i64>() > 0);
    }

    #[test]
    fn test_bad_position_falls_back_to_random() {
        // Unparsable position, then confirm; session still completes.
        let (model, _) = run_session("p\nnot-a-number\ny\n", &sample_data(), 1);
        assert!(model.class_weights("code").unwrap().iter().sum::<i64>() > 0);
    }

    #[test]
    fn test_out_of_range_position_falls_back() {
        let (model, _) = run_session("p\n$FFFF\ny\n", &sample_data(), 1);
        assert!(model.class_weights("code").unwrap().iter().sum::<i64>() > 0);
    }

    #[test]
    fn test_eof_ends_session() {
        let (model, _) = run_session("", &sample_data(), 5);
        assert_eq!(model, Model::seeded());
    }

    #[test]
    fn test_too_short_buffer_is_rejected() {
        let mut model = Model::seeded();
        let mut output = Vec::new();
        let mut session = TrainingSession::new(
            StdRng::seed_from_u64(0),
            Cursor::new(Vec::new()),
            &mut output,
            1,
        );
        let result = session.run(&mut model, &[0xEA; 4], 0);
        assert!(matches!(
            result,
            Err(ClassifyError::BufferTooSmall { actual: 4, .. })
        ));
    }

    #[test]
    fn test_seeded_sessions_are_reproducible() {
        let (a, out_a) = run_session("y\ny\n", &sample_data(), 2);
        let (b, out_b) = run_session("y\ny\n", &sample_data(), 2);
        assert_eq!(a, b);
        assert_eq!(out_a, out_b);
    }
}
