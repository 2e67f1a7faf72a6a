// ============================================================================
// src/io/hid/mode/word_substitute.rs - Word Substitution Mode
// ============================================================================
//!
//! 単語の先頭5文字を固定語 "HODOR" の文字に置き換える。
//!
//! 単語境界（英数字以外のキー）で、途中まで打たれた語の残りを補完する。
//! 6文字目以降は実際のキーをそのまま通す。

use super::{Emitter, ModeContext};
use crate::io::hid::ps2::{KeyCode, LogicalKeyEvent, Modifiers};
use crate::io::hid::sink::HidSink;

/// 置換語
pub const SUBSTITUTE_WORD: [KeyCode; 5] = [
    KeyCode::H,
    KeyCode::O,
    KeyCode::D,
    KeyCode::O,
    KeyCode::R,
];

/// 文字カウンタの上限
const COUNT_LIMIT: usize = SUBSTITUTE_WORD.len() + 1;

pub(super) fn apply<S: HidSink>(
    ctx: &mut ModeContext,
    event: LogicalKeyEvent,
    emitter: &mut Emitter<'_, S>,
) {
    let LogicalKeyEvent {
        keycode: key,
        modifiers: mods,
    } = event;
    let letter_mods = mods - Modifiers::RIGHT_ALT;

    if key == KeyCode::BACKSPACE {
        ctx.retreat();
        emitter.stroke(key, mods);
    } else if !key.is_alphanumeric() {
        if ctx.count() > 0 {
            for &letter in SUBSTITUTE_WORD.iter().skip(ctx.count()) {
                emitter.stroke(letter, letter_mods);
            }
        }
        emitter.stroke(key, mods);
        ctx.reset_counters();
    } else {
        match SUBSTITUTE_WORD.get(ctx.count()) {
            Some(&letter) => emitter.stroke(letter, letter_mods),
            None => emitter.stroke(key, mods),
        }
        ctx.advance(COUNT_LIMIT);
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_util::FixedRng;
    use super::super::{Mode, ModeEngine};
    use super::*;
    use crate::config::AdapterConfig;
    use crate::io::hid::sink::RecordingSink;

    fn engine() -> ModeEngine<FixedRng> {
        ModeEngine::with_rng(
            &AdapterConfig::default().with_initial_mode(Mode::WordSubstitute),
            FixedRng(0),
        )
    }

    fn type_keys(engine: &mut ModeEngine<FixedRng>, sink: &mut RecordingSink, keys: &[KeyCode]) {
        for &key in keys {
            engine.apply(LogicalKeyEvent::new(key, Modifiers::empty()), sink);
        }
    }

    #[test]
    fn test_seven_letters() {
        let mut engine = engine();
        let mut sink = RecordingSink::new();
        type_keys(
            &mut engine,
            &mut sink,
            &[
                KeyCode::A,
                KeyCode::B,
                KeyCode::C,
                KeyCode::D,
                KeyCode::E,
                KeyCode::F,
                KeyCode::G,
            ],
        );
        assert_eq!(
            sink.pressed_keys(),
            [
                KeyCode::H,
                KeyCode::O,
                KeyCode::D,
                KeyCode::O,
                KeyCode::R,
                KeyCode::F,
                KeyCode::G
            ]
        );
        assert_eq!(engine.context(Mode::WordSubstitute).count(), COUNT_LIMIT);
    }

    #[test]
    fn test_boundary_completes_word() {
        let mut engine = engine();
        let mut sink = RecordingSink::new();
        type_keys(&mut engine, &mut sink, &[KeyCode::X, KeyCode::KEY_7, KeyCode::SPACE]);
        assert_eq!(
            sink.pressed_keys(),
            [
                KeyCode::H,
                KeyCode::O,
                KeyCode::D,
                KeyCode::O,
                KeyCode::R,
                KeyCode::SPACE
            ]
        );
        assert_eq!(engine.context(Mode::WordSubstitute).count(), 0);
    }

    #[test]
    fn test_boundary_without_word_passes() {
        let mut engine = engine();
        let mut sink = RecordingSink::new();
        type_keys(&mut engine, &mut sink, &[KeyCode::ENTER]);
        assert_eq!(sink.pressed_keys(), [KeyCode::ENTER]);
    }

    #[test]
    fn test_backspace_rewinds_counter() {
        let mut engine = engine();
        let mut sink = RecordingSink::new();
        type_keys(
            &mut engine,
            &mut sink,
            &[KeyCode::A, KeyCode::B, KeyCode::BACKSPACE, KeyCode::C],
        );
        assert_eq!(
            sink.pressed_keys(),
            [KeyCode::H, KeyCode::O, KeyCode::BACKSPACE, KeyCode::O]
        );

        type_keys(
            &mut engine,
            &mut sink,
            &[KeyCode::BACKSPACE, KeyCode::BACKSPACE, KeyCode::BACKSPACE],
        );
        assert_eq!(engine.context(Mode::WordSubstitute).count(), 0);
    }

    #[test]
    fn test_alt_gr_stripped_from_letters_only() {
        let mut engine = engine();
        let mut sink = RecordingSink::new();
        let mods = Modifiers::RIGHT_ALT | Modifiers::LEFT_SHIFT;
        engine.apply(LogicalKeyEvent::new(KeyCode::A, mods), &mut sink);
        assert_eq!(sink.reports()[0], (Modifiers::LEFT_SHIFT, KeyCode::H));

        sink.clear();
        engine.apply(LogicalKeyEvent::new(KeyCode::COMMA, mods), &mut sink);
        assert_eq!(sink.reports()[0], (Modifiers::LEFT_SHIFT, KeyCode::O));
        assert_eq!(sink.reports()[4], (mods, KeyCode::COMMA));
    }
}
