// ============================================================================
// src/io/hid/mode/word_reverse.rs - Word Reversal Mode
// ============================================================================
//!
//! 単語を打っている間はそのまま送出し、単語境界で消して逆順に打ち直す。
//!
//! 大文字の位置は保たれる（Shiftは位置に、その他の修飾キーは文字に付く）。

use super::{Emitter, ModeContext};
use crate::config::ReverseOverflow;
use crate::io::hid::ps2::{KeyCode, LogicalKeyEvent, Modifiers};
use crate::io::hid::sink::HidSink;

pub(super) fn apply<S: HidSink>(
    ctx: &mut ModeContext,
    event: LogicalKeyEvent,
    emitter: &mut Emitter<'_, S>,
    overflow: ReverseOverflow,
) {
    let LogicalKeyEvent {
        keycode: key,
        modifiers: mods,
    } = event;

    if key == KeyCode::BACKSPACE {
        ctx.retreat();
        emitter.stroke(key, mods);
    } else if !key.is_alphanumeric() {
        replay_reversed(ctx, emitter);
        emitter.stroke(key, mods);
        ctx.reset_counters();
    } else if ctx.push(event) {
        emitter.stroke(key, mods);
    } else {
        match overflow {
            ReverseOverflow::EchoLive => emitter.stroke(key, mods),
            ReverseOverflow::Suppress => {
                log::debug!("reverse: buffer full, dropping {:#04x}", key.0)
            }
        }
    }
}

fn replay_reversed<S: HidSink>(ctx: &ModeContext, emitter: &mut Emitter<'_, S>) {
    let word = ctx.history();
    let len = word.len();
    if len == 0 {
        return;
    }

    emitter.set_modifiers(Modifiers::empty());
    for _ in 0..len {
        emitter.tap(KeyCode::BACKSPACE);
    }

    for (pos, letter) in word.iter().rev().enumerate() {
        let shift = word[pos].modifiers & Modifiers::SHIFT;
        let others = letter.modifiers - Modifiers::SHIFT;
        emitter.stroke(letter.keycode, shift | others);
    }
}
