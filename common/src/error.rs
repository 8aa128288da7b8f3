//! エラー型定義
//!
//! 集計処理そのものは失敗しない（未採点・対象外として扱う）。
//! ここにあるのはエイリアス表の読み込みとチャート描画の失敗のみ。

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Chart error: {0}")]
    Chart(#[from] ChartError),
}

/// チャート描画エラー
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    #[error("データ点が多すぎます: {count} (最大 {max})")]
    TooManyPoints { count: usize, max: usize },

    #[error("描画領域が不正です: {width} x {height}")]
    InvalidBounds { width: f32, height: f32 },

    #[error("描画エラー: {0}")]
    Draw(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
