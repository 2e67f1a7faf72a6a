// ============================================================================
// src/config.rs - Adapter Runtime Configuration
// ============================================================================
//!
//! ブリッジの実行時設定。
//!
//! 電源断をまたいだ永続化は行わない。ファームウェアが起動時に構築して
//! `Ps2Keyboard::new` に渡す。

use crate::error::ConfigError;
use crate::io::hid::mode::Mode;

/// アイドルタイムアウトの既定値（ミリ秒）
pub const DEFAULT_IDLE_TIMEOUT_MS: u32 = 250;

/// アイドルタイムアウトの上限（ミリ秒）
pub const MAX_IDLE_TIMEOUT_MS: u32 = 10_000;

/// モード切り替え時に破棄する履歴の範囲
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModeSwitchPolicy {
    /// 何も破棄しない
    Keep,
    /// 全モードの文字カウンタを0に戻す（直前キー履歴は保持）
    #[default]
    ResetCounters,
    /// 全モードのコンテキストを初期状態に戻す
    ResetAll,
}

/// 逆順モードのバッファが満杯になった後の文字の扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReverseOverflow {
    /// バッファには積まず、そのまま送出を続ける
    #[default]
    EchoLive,
    /// バッファにも積まず、送出もしない
    Suppress,
}

/// ブリッジ設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdapterConfig {
    /// 起動時のモード
    pub initial_mode: Mode,
    /// モード切り替え時の履歴破棄ポリシー
    pub switch_policy: ModeSwitchPolicy,
    /// 逆順モードのバッファ溢れポリシー
    pub reverse_overflow: ReverseOverflow,
    /// 乱入モードの乱数シード
    pub rng_seed: u64,
    /// フレーム再同期のアイドル時間（ミリ秒）
    pub idle_timeout_ms: u32,
}

impl AdapterConfig {
    /// 既定の設定
    pub const DEFAULT: Self = Self {
        initial_mode: Mode::Identity,
        switch_policy: ModeSwitchPolicy::ResetCounters,
        reverse_overflow: ReverseOverflow::EchoLive,
        rng_seed: 0x5EED_CAFE,
        idle_timeout_ms: DEFAULT_IDLE_TIMEOUT_MS,
    };

    /// 設定値を検証
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.idle_timeout_ms == 0 {
            return Err(ConfigError::ZeroIdleTimeout);
        }
        if self.idle_timeout_ms > MAX_IDLE_TIMEOUT_MS {
            return Err(ConfigError::IdleTimeoutTooLong(self.idle_timeout_ms));
        }
        Ok(())
    }

    /// 起動モードを指定
    pub const fn with_initial_mode(mut self, mode: Mode) -> Self {
        self.initial_mode = mode;
        self
    }

    /// モード切り替えポリシーを指定
    pub const fn with_switch_policy(mut self, policy: ModeSwitchPolicy) -> Self {
        self.switch_policy = policy;
        self
    }

    /// 逆順モードの溢れポリシーを指定
    pub const fn with_reverse_overflow(mut self, policy: ReverseOverflow) -> Self {
        self.reverse_overflow = policy;
        self
    }

    /// 乱数シードを指定
    pub const fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = seed;
        self
    }
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
