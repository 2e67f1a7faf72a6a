// ============================================================================
// src/io/hid/mode/identity.rs - Identity Mode
// ============================================================================
//! 入力をそのまま送出する。

use super::Emitter;
use crate::io::hid::ps2::LogicalKeyEvent;
use crate::io::hid::sink::HidSink;

pub(super) fn apply<S: HidSink>(event: LogicalKeyEvent, emitter: &mut Emitter<'_, S>) {
    emitter.stroke(event.keycode, event.modifiers);
}
