//! 回答のスコア化
//!
//! 数値・ラベル（Sangat Baik / Baik / Cukup / Kurang）・オブジェクトの
//! いずれの回答も数値スコアに変換する。変換できない回答は `None`
//! （未採点）として集計から除外され、エラーにはならない。

use crate::error::{Error, Result};
use crate::types::{Answer, MAX_SCORE};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

lazy_static! {
    /// 文字列中の最初の数値（符号・小数点対応）
    static ref EMBEDDED_NUMBER_RE: Regex = Regex::new(r"-?\d*\.?\d+").unwrap();
}

/// スコア変換の設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// ラベル（小文字）→ スコア
    pub labels: HashMap<String, f64>,
    /// 数値を探すキー（優先順）
    pub numeric_keys: Vec<String>,
    /// ラベルを探すキー（優先順）
    pub label_keys: Vec<String>,
    /// スコアの上限（平均・チャートはこの範囲に収める）
    pub max_score: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let labels = [("sangat baik", 4.0), ("baik", 3.0), ("cukup", 2.0), ("kurang", 1.0)]
            .into_iter()
            .map(|(label, score)| (label.to_string(), score))
            .collect();

        Self {
            labels,
            numeric_keys: vec!["score".into(), "value".into(), "rating".into()],
            label_keys: vec!["scoreLabel".into(), "label".into(), "text".into()],
            max_score: MAX_SCORE,
        }
    }
}

impl ScoringConfig {
    /// 上限とラベル表の値を検証する
    pub fn validate(&self) -> Result<()> {
        if !(self.max_score.is_finite() && self.max_score > 0.0) {
            return Err(Error::Config(format!("max_score は正の数にしてください: {}", self.max_score)));
        }
        for (label, score) in &self.labels {
            if !score.is_finite() || *score < 0.0 || *score > self.max_score {
                return Err(Error::Config(format!(
                    "ラベル '{}' のスコア {} が 0〜{} の範囲外です",
                    label, score, self.max_score
                )));
            }
        }
        Ok(())
    }
}

/// オブジェクト回答から値を取り出す関数（先に値を返したものが採用される）
type FieldExtractor = fn(&ScoreNormalizer, &Map<String, Value>) -> Option<f64>;

const STRUCTURED_EXTRACTORS: &[FieldExtractor] = &[
    ScoreNormalizer::numeric_field,
    ScoreNormalizer::label_field,
];

/// 回答 → スコア変換器
#[derive(Debug, Clone, Default)]
pub struct ScoreNormalizer {
    config: ScoringConfig,
}

impl ScoreNormalizer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// 設定を検証してから作成
    pub fn try_new(config: ScoringConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// 集計に使う上限（不正な設定なら4）
    pub fn max_score(&self) -> f64 {
        if self.config.max_score.is_finite() && self.config.max_score > 0.0 {
            self.config.max_score
        } else {
            MAX_SCORE
        }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// 回答をスコアに変換する
    ///
    /// # Returns
    /// スコア。未採点扱いの場合は `None`
    pub fn normalize(&self, answer: &Answer) -> Option<f64> {
        match answer {
            Answer::Numeric(n) => Self::numeric(*n),
            Answer::Label(text) => self.normalize_label(text),
            Answer::Structured(map) => self.normalize_structured(map),
            Answer::Unrecognized(_) => None,
        }
    }

    /// 数値はそのまま（NaNのみ除外）
    fn numeric(n: f64) -> Option<f64> {
        if n.is_nan() {
            None
        } else {
            Some(n)
        }
    }

    /// 文字列回答を変換する
    ///
    /// ラベル表との完全一致（大文字小文字無視）を優先し、
    /// 一致しなければ文字列中の最初の数値を使う。
    pub fn normalize_label(&self, text: &str) -> Option<f64> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }

        if let Some(score) = self.config.labels.get(&trimmed.to_lowercase()) {
            return Some(*score);
        }

        extract_embedded_number(trimmed)
    }

    fn normalize_structured(&self, map: &Map<String, Value>) -> Option<f64> {
        STRUCTURED_EXTRACTORS
            .iter()
            .find_map(|extract| extract(self, map))
    }

    /// 数値キーを優先順に探す（有限の数値のみ）
    fn numeric_field(&self, map: &Map<String, Value>) -> Option<f64> {
        self.config
            .numeric_keys
            .iter()
            .filter_map(|key| map.get(key).and_then(Value::as_f64))
            .find(|n| n.is_finite())
    }

    /// ラベルキーを優先順に探し、文字列ルールで変換
    fn label_field(&self, map: &Map<String, Value>) -> Option<f64> {
        self.config
            .label_keys
            .iter()
            .filter_map(|key| map.get(key).and_then(Value::as_str))
            .find_map(|text| self.normalize_label(text))
    }
}

/// 文字列中の最初の数値を取り出す
pub fn extract_embedded_number(text: &str) -> Option<f64> {
    EMBEDDED_NUMBER_RE
        .find(text)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}
