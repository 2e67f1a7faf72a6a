// ============================================================================
// src/io/hid/mode/digraph.rs - Polish Digraph Swap Mode
// ============================================================================
//!
//! ポーランド語の二重字と発音符付き文字を入れ替える。
//!
//! | 入力          | 出力             |
//! |---------------|------------------|
//! | `u`           | `ó`              |
//! | `ó`           | `u`              |
//! | `rz`          | `ż`              |
//! | `ch`          | `h`              |
//! | `h`           | `ch`             |
//! | `ż`           | `rz`             |
//! | `ą`           | `om`             |
//! | `om`          | `ą`              |
//!
//! 発音符はAltGr（右Alt）付きの打鍵として表現される。

use super::{Emitter, ModeContext};
use crate::io::hid::ps2::{KeyCode, LogicalKeyEvent, Modifiers};
use crate::io::hid::sink::HidSink;

/// 展開後の1打鍵
struct Stroke {
    key: KeyCode,
    set: Modifiers,
    clear: Modifiers,
}

impl Stroke {
    const fn new(key: KeyCode, set: Modifiers, clear: Modifiers) -> Self {
        Self { key, set, clear }
    }
}

/// 書き換え方法
enum Rewrite {
    /// 現在のキーを1つ以上の打鍵に展開
    Expand(&'static [Stroke]),
    /// 直前の文字を消し、直前の修飾キーを元に合成
    Compose {
        key: KeyCode,
        keep: Modifiers,
        force: Modifiers,
    },
}

const NO_MODS: Modifiers = Modifiers::empty();
const ALT_GR: Modifiers = Modifiers::RIGHT_ALT;
const ALT_GR_AND_SHIFT: Modifiers = Modifiers::RIGHT_ALT.union(Modifiers::SHIFT);

static U_TO_O_ACUTE: [Stroke; 1] = [Stroke::new(KeyCode::O, ALT_GR, NO_MODS)];
static O_ACUTE_TO_U: [Stroke; 1] = [Stroke::new(KeyCode::U, NO_MODS, ALT_GR)];
static H_TO_CH: [Stroke; 2] = [
    Stroke::new(KeyCode::C, NO_MODS, NO_MODS),
    Stroke::new(KeyCode::H, NO_MODS, Modifiers::SHIFT),
];
static Z_DOT_TO_RZ: [Stroke; 2] = [
    Stroke::new(KeyCode::R, NO_MODS, ALT_GR),
    Stroke::new(KeyCode::Z, NO_MODS, ALT_GR_AND_SHIFT),
];
static A_OGONEK_TO_OM: [Stroke; 2] = [
    Stroke::new(KeyCode::O, NO_MODS, ALT_GR),
    Stroke::new(KeyCode::M, NO_MODS, ALT_GR_AND_SHIFT),
];

/// 規則表（先に一致したものを採用）
fn rewrite(prev: KeyCode, key: KeyCode, alt_gr: bool) -> Option<Rewrite> {
    let rule = match (prev, key, alt_gr) {
        (_, KeyCode::U, _) => Rewrite::Expand(&U_TO_O_ACUTE),
        (_, KeyCode::O, true) => Rewrite::Expand(&O_ACUTE_TO_U),
        (KeyCode::R, KeyCode::Z, _) => Rewrite::Compose {
            key: KeyCode::Z,
            keep: Modifiers::SHIFT,
            force: ALT_GR,
        },
        (KeyCode::C, KeyCode::H, _) => Rewrite::Compose {
            key: KeyCode::H,
            keep: Modifiers::all(),
            force: NO_MODS,
        },
        (_, KeyCode::H, _) => Rewrite::Expand(&H_TO_CH),
        (_, KeyCode::Z, true) => Rewrite::Expand(&Z_DOT_TO_RZ),
        (_, KeyCode::A, true) => Rewrite::Expand(&A_OGONEK_TO_OM),
        (KeyCode::O, KeyCode::M, _) => Rewrite::Compose {
            key: KeyCode::A,
            keep: Modifiers::all(),
            force: ALT_GR,
        },
        _ => return None,
    };
    Some(rule)
}

pub(super) fn apply<S: HidSink>(
    ctx: &mut ModeContext,
    event: LogicalKeyEvent,
    emitter: &mut Emitter<'_, S>,
) {
    let mods = event.modifiers;

    match rewrite(ctx.prev_key, event.keycode, mods.alt_gr()) {
        Some(Rewrite::Expand(strokes)) => {
            for stroke in strokes {
                emitter.stroke(stroke.key, (mods | stroke.set) - stroke.clear);
            }
            emitter.restore(mods);
        }
        Some(Rewrite::Compose { key, keep, force }) => {
            emitter.stroke(KeyCode::BACKSPACE, Modifiers::empty());
            emitter.stroke(key, (ctx.prev_modifiers & keep) | force);
            emitter.restore(mods);
        }
        None => emitter.stroke(event.keycode, mods),
    }

    remember(ctx, event);
}

/// 生の入力を直前キーとして記録
pub(super) fn remember(ctx: &mut ModeContext, event: LogicalKeyEvent) {
    ctx.prev_key = event.keycode;
    ctx.prev_modifiers = event.modifiers;
}
