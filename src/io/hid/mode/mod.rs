// ============================================================================
// src/io/hid/mode/mod.rs - Output Transform Modes
// ============================================================================
//!
//! # 出力変換モード
//!
//! デコード済みのキー押下を、選択中のモードで書き換えてHIDシンクへ送る。
//!
//! | 番号 | モード            | 内容                                   |
//! |------|-------------------|----------------------------------------|
//! | 0    | `Identity`        | そのまま送出                           |
//! | 1    | `Digraph`         | ポーランド語の二重字・発音符の相互変換 |
//! | 2    | `WordSubstitute`  | 単語を固定語 "HODOR" に置換            |
//! | 3    | `WordReverse`     | 単語境界で直前の単語を逆順に打ち直す   |
//! | 4    | `RandomInterject` | 単語境界で辞書からランダムな語を挿入   |
//!
//! どのモードも最後に空キーのレポートを送り、次の押下と区別できるようにする。

mod digraph;
mod identity;
mod random_interject;
mod word_reverse;
mod word_substitute;

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};

use super::ps2::{KeyCode, LogicalKeyEvent, ModeStep, Modifiers};
use super::sink::HidSink;
use crate::config::{AdapterConfig, ModeSwitchPolicy, ReverseOverflow};
use crate::error::ModeError;

pub use random_interject::{DICTIONARY, DICTIONARY_SIZE, WORD_SIZE};
pub use word_substitute::SUBSTITUTE_WORD;

/// モード数
pub const MODE_COUNT: usize = 5;

/// 履歴バッファの容量
pub const HISTORY_CAPACITY: usize = 32;

// ============================================================================
// Mode
// ============================================================================

/// 出力変換モード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Mode {
    #[default]
    Identity = 0,
    Digraph = 1,
    WordSubstitute = 2,
    WordReverse = 3,
    RandomInterject = 4,
}

impl Mode {
    pub const ALL: [Mode; MODE_COUNT] = [
        Mode::Identity,
        Mode::Digraph,
        Mode::WordSubstitute,
        Mode::WordReverse,
        Mode::RandomInterject,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// 次のモード（最後で止まる）
    pub const fn next(self) -> Self {
        match self {
            Mode::Identity => Mode::Digraph,
            Mode::Digraph => Mode::WordSubstitute,
            Mode::WordSubstitute => Mode::WordReverse,
            Mode::WordReverse | Mode::RandomInterject => Mode::RandomInterject,
        }
    }

    /// 前のモード（先頭で止まる）
    pub const fn previous(self) -> Self {
        match self {
            Mode::Identity | Mode::Digraph => Mode::Identity,
            Mode::WordSubstitute => Mode::Digraph,
            Mode::WordReverse => Mode::WordSubstitute,
            Mode::RandomInterject => Mode::WordReverse,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Mode::Identity => "identity",
            Mode::Digraph => "digraph",
            Mode::WordSubstitute => "word-substitute",
            Mode::WordReverse => "word-reverse",
            Mode::RandomInterject => "random-interject",
        }
    }
}

impl TryFrom<u8> for Mode {
    type Error = ModeError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Mode::ALL
            .get(index as usize)
            .copied()
            .ok_or(ModeError::InvalidIndex(index))
    }
}

// ============================================================================
// ModeContext
// ============================================================================

/// モードごとの入力履歴
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeContext {
    /// 直前に入力されたキー（生の入力）
    pub prev_key: KeyCode,
    /// 直前のキーの修飾キー
    pub prev_modifiers: Modifiers,
    history: [LogicalKeyEvent; HISTORY_CAPACITY],
    count: usize,
}

impl ModeContext {
    pub const fn new() -> Self {
        Self {
            prev_key: KeyCode::NONE,
            prev_modifiers: Modifiers::empty(),
            history: [LogicalKeyEvent::new(KeyCode::NONE, Modifiers::empty()); HISTORY_CAPACITY],
            count: 0,
        }
    }

    /// 現在の単語の文字数
    pub fn count(&self) -> usize {
        self.count
    }

    /// バッファ済みの履歴（古い順）
    pub fn history(&self) -> &[LogicalKeyEvent] {
        &self.history[..self.count.min(HISTORY_CAPACITY)]
    }

    /// 履歴に追加。満杯なら`false`
    pub fn push(&mut self, event: LogicalKeyEvent) -> bool {
        if self.count >= HISTORY_CAPACITY {
            return false;
        }
        self.history[self.count] = event;
        self.count += 1;
        true
    }

    /// カウンタを1つ戻す（0で止まる）
    pub fn retreat(&mut self) {
        self.count = self.count.saturating_sub(1);
    }

    /// カウンタを1つ進める（上限で止まる）
    pub(crate) fn advance(&mut self, limit: usize) {
        if self.count < limit {
            self.count += 1;
        }
    }

    /// 文字カウンタのみクリア
    pub fn reset_counters(&mut self) {
        self.count = 0;
    }

    /// 全履歴をクリア
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for ModeContext {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Emitter
// ============================================================================

/// シンクへの送出ヘルパ
///
/// 同じキーを連続したレポートで送ると押下が1回に潰れるため、
/// その場合は間に空キーのレポートを挟む。
pub(crate) struct Emitter<'a, S: HidSink> {
    sink: &'a mut S,
    held: KeyCode,
}

impl<'a, S: HidSink> Emitter<'a, S> {
    fn new(sink: &'a mut S) -> Self {
        Self {
            sink,
            held: KeyCode::NONE,
        }
    }

    /// キーを修飾キー付きで1レポート送る（キーは押されたまま）
    pub(crate) fn stroke(&mut self, key: KeyCode, modifiers: Modifiers) {
        if !key.is_none() && key == self.held {
            self.release();
        }
        self.sink.set_modifiers(modifiers);
        self.sink.set_key(key);
        self.sink.send_report();
        self.held = key;
    }

    /// 修飾キーのみ変更して送る
    pub(crate) fn restore(&mut self, modifiers: Modifiers) {
        self.sink.set_modifiers(modifiers);
        self.sink.send_report();
    }

    /// 押して離す
    pub(crate) fn tap(&mut self, key: KeyCode) {
        self.sink.set_key(key);
        self.sink.send_report();
        self.release();
    }

    /// 修飾キーを設定（送信はしない）
    pub(crate) fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.sink.set_modifiers(modifiers);
    }

    /// キースロットを空にして送る
    pub(crate) fn release(&mut self) {
        self.sink.set_key(KeyCode::NONE);
        self.sink.send_report();
        self.held = KeyCode::NONE;
    }
}

// ============================================================================
// ModeEngine
// ============================================================================

/// 出力変換エンジン
pub struct ModeEngine<R: RngCore = SmallRng> {
    mode: Mode,
    contexts: [ModeContext; MODE_COUNT],
    switch_policy: ModeSwitchPolicy,
    reverse_overflow: ReverseOverflow,
    rng: R,
}

impl ModeEngine<SmallRng> {
    /// 設定のシードから乱数源を作成
    pub fn new(config: &AdapterConfig) -> Self {
        Self::with_rng(config, SmallRng::seed_from_u64(config.rng_seed))
    }
}

impl<R: RngCore> ModeEngine<R> {
    /// 乱数源を指定して作成
    pub fn with_rng(config: &AdapterConfig, rng: R) -> Self {
        Self {
            mode: config.initial_mode,
            contexts: [ModeContext::new(); MODE_COUNT],
            switch_policy: config.switch_policy,
            reverse_overflow: config.reverse_overflow,
            rng,
        }
    }

    /// 現在のモード
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// モードのコンテキスト
    pub fn context(&self, mode: Mode) -> &ModeContext {
        &self.contexts[mode.index()]
    }

    /// モードを直接選択
    ///
    /// 変化した場合は切り替えポリシーに従って履歴を破棄し`true`を返す。
    pub fn set_mode(&mut self, mode: Mode) -> bool {
        if mode == self.mode {
            return false;
        }
        log::info!("mode: {} -> {}", self.mode.name(), mode.name());
        self.mode = mode;
        match self.switch_policy {
            ModeSwitchPolicy::Keep => {}
            ModeSwitchPolicy::ResetCounters => {
                self.contexts.iter_mut().for_each(ModeContext::reset_counters)
            }
            ModeSwitchPolicy::ResetAll => self.contexts.iter_mut().for_each(ModeContext::reset),
        }
        true
    }

    /// 切り替えキーによる1段階の移動
    pub fn step(&mut self, step: ModeStep) -> Mode {
        let target = match step {
            ModeStep::Next => self.mode.next(),
            ModeStep::Previous => self.mode.previous(),
        };
        self.set_mode(target);
        self.mode
    }

    /// キー押下を現在のモードで変換してシンクへ送る
    pub fn apply<S: HidSink>(&mut self, event: LogicalKeyEvent, sink: &mut S) {
        let mut emitter = Emitter::new(sink);

        let ctx = &mut self.contexts[self.mode.index()];
        if event.keycode.is_none() {
            // 未割り当てキーも直前キーとして記録し、途中の二重字を打ち切る
            if self.mode == Mode::Digraph {
                digraph::remember(ctx, event);
            }
        } else {
            log::debug!(
                "mode {}: key {:#04x} mods {:#04x}",
                self.mode.name(),
                event.keycode.0,
                event.modifiers.bits()
            );
            match self.mode {
                Mode::Identity => identity::apply(event, &mut emitter),
                Mode::Digraph => digraph::apply(ctx, event, &mut emitter),
                Mode::WordSubstitute => word_substitute::apply(ctx, event, &mut emitter),
                Mode::WordReverse => {
                    word_reverse::apply(ctx, event, &mut emitter, self.reverse_overflow)
                }
                Mode::RandomInterject => {
                    random_interject::apply(event, &mut emitter, &mut self.rng)
                }
            }
        }

        emitter.release();
    }
}
