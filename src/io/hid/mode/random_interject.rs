// ============================================================================
// src/io/hid/mode/random_interject.rs - Random Interjection Mode
// ============================================================================
//!
//! 単語境界（スペース、Enter、ピリオド、カンマ）ごとに、辞書から選んだ
//! 語を大文字で挿入する。辞書の前半は空で、約半分の境界では何も挿入されない。

use rand::RngCore;

use super::Emitter;
use crate::io::hid::ps2::{KeyCode, LogicalKeyEvent, Modifiers};
use crate::io::hid::sink::HidSink;

/// 辞書の語数
pub const DICTIONARY_SIZE: usize = 16;

/// 1語の最大長（`KeyCode::NONE`で終端）
pub const WORD_SIZE: usize = 8;

const __: KeyCode = KeyCode::NONE;
const BANG: KeyCode = KeyCode::KEY_1;

/// 挿入語の辞書（Shift付きで送出される）
#[rustfmt::skip]
pub static DICTIONARY: [[KeyCode; WORD_SIZE]; DICTIONARY_SIZE] = [
    [__; WORD_SIZE],
    [__; WORD_SIZE],
    [__; WORD_SIZE],
    [__; WORD_SIZE],
    [__; WORD_SIZE],
    [__; WORD_SIZE],
    [__; WORD_SIZE],
    [__; WORD_SIZE],
    [KeyCode::O, KeyCode::O, KeyCode::P, KeyCode::S, BANG, __, __, __],
    [KeyCode::W, KeyCode::O, KeyCode::W, BANG, __, __, __, __],
    [KeyCode::Z, KeyCode::A, KeyCode::P, BANG, __, __, __, __],
    [KeyCode::Y, KeyCode::I, KeyCode::K, KeyCode::E, KeyCode::S, BANG, __, __],
    [KeyCode::B, KeyCode::O, KeyCode::O, KeyCode::M, BANG, __, __, __],
    [KeyCode::G, KeyCode::O, KeyCode::S, KeyCode::H, BANG, __, __, __],
    [KeyCode::B, KeyCode::I, KeyCode::N, KeyCode::G, KeyCode::O, BANG, __, __],
    [KeyCode::E, KeyCode::E, KeyCode::K, BANG, __, __, __, __],
];

fn is_boundary(key: KeyCode) -> bool {
    matches!(
        key,
        KeyCode::SPACE | KeyCode::ENTER | KeyCode::PERIOD | KeyCode::COMMA
    )
}

pub(super) fn apply<S: HidSink, R: RngCore>(
    event: LogicalKeyEvent,
    emitter: &mut Emitter<'_, S>,
    rng: &mut R,
) {
    if is_boundary(event.keycode) {
        emitter.stroke(KeyCode::SPACE, Modifiers::empty());

        let index = (rng.next_u32() % DICTIONARY_SIZE as u32) as usize;
        log::debug!("interject: dictionary index {}", index);
        let word = DICTIONARY[index]
            .iter()
            .copied()
            .take_while(|key| !key.is_none());
        for letter in word {
            emitter.stroke(letter, Modifiers::LEFT_SHIFT);
        }
    }

    emitter.stroke(event.keycode, event.modifiers);
}
