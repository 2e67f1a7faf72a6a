//! 統一エラーハンドリングモジュール
//!
//! ブリッジ全体で使用される統一エラー型を定義し、
//! 各サブシステムのエラーから変換を提供します。
//!
//! デコードと変換の経路は致命的エラーを持たない（劣化のみ）。
//! エラーになるのは設定の検証、モード番号の変換、ロガーの導入だけ。

use core::fmt;

/// ブリッジ全体の統一エラー型
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    /// 設定関連エラー
    Config(ConfigError),
    /// モード関連エラー
    Mode(ModeError),
    /// ロガーが既に設定されている
    LoggerAlreadySet,
}

/// 設定関連エラーの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// アイドルタイムアウトが0
    ZeroIdleTimeout,
    /// アイドルタイムアウトが上限超過
    IdleTimeoutTooLong(u32),
}

/// モード関連エラー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeError {
    /// 範囲外のモード番号
    InvalidIndex(u8),
}

/// ブリッジ用Result型
pub type Result<T> = core::result::Result<T, AdapterError>;

// ===== Display implementations =====

impl fmt::Display for AdapterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdapterError::Config(e) => write!(f, "Config error: {}", e),
            AdapterError::Mode(e) => write!(f, "Mode error: {}", e),
            AdapterError::LoggerAlreadySet => write!(f, "logger already set"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroIdleTimeout => write!(f, "idle timeout must be non-zero"),
            ConfigError::IdleTimeoutTooLong(ms) => {
                write!(f, "idle timeout of {} ms exceeds the 10000 ms limit", ms)
            }
        }
    }
}

impl fmt::Display for ModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModeError::InvalidIndex(index) => write!(f, "mode index {} out of range", index),
        }
    }
}

// ===== From implementations for sub-errors =====

impl From<ConfigError> for AdapterError {
    fn from(e: ConfigError) -> Self {
        AdapterError::Config(e)
    }
}

impl From<ModeError> for AdapterError {
    fn from(e: ModeError) -> Self {
        AdapterError::Mode(e)
    }
}

impl From<log::SetLoggerError> for AdapterError {
    fn from(_: log::SetLoggerError) -> Self {
        AdapterError::LoggerAlreadySet
    }
}

impl core::error::Error for AdapterError {}
