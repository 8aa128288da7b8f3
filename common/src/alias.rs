//! スキル名のエイリアス変換モジュール
//!
//! 質問文に埋め込まれたカテゴリ名の表記ゆれ（綴り違い・英語名・
//! ゼロ幅文字混入など）を6つの正規カテゴリに寄せる。

use crate::error::{Error, Result};
use crate::types::{SkillCategory, SkillName};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 質問文とカテゴリの区切り
pub const DEFAULT_QUESTION_DELIMITER: &str = "|";

lazy_static! {
    /// 括弧内のカテゴリ名
    static ref PAREN_GROUP_RE: Regex = Regex::new(r"\(([^)]+)\)").unwrap();
}

/// エイリアス定義
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillAliasConfig {
    /// 表記（小文字）→ 正規カテゴリ
    #[serde(default)]
    pub synonyms: HashMap<String, SkillCategory>,
    /// 質問文の区切り文字（未指定なら "|"）
    #[serde(default)]
    pub question_delimiter: Option<String>,
}

impl SkillAliasConfig {
    /// 組み込みプリセットを取得
    pub fn from_preset(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "standard" | "default" | "bawaan" => Some(Self::standard_preset()),
            "indonesia" | "id" => Some(Self::indonesian_preset()),
            "english" | "en" => Some(Self::english_preset()),
            _ => None,
        }
    }

    /// JSONファイルから読み込み
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// JSON文字列から読み込み
    ///
    /// 空の区切り文字は指定ミスとしてエラーにする。
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        if matches!(&config.question_delimiter, Some(d) if d.is_empty()) {
            return Err(Error::Config("question_delimiter が空です".into()));
        }
        Ok(config.lowercased())
    }

    /// キーを小文字に揃える（外部JSONは表記がまちまち）
    fn lowercased(self) -> Self {
        Self {
            synonyms: self
                .synonyms
                .into_iter()
                .map(|(k, v)| (k.trim().to_lowercase(), v))
                .collect(),
            question_delimiter: self.question_delimiter,
        }
    }

    fn insert_all(&mut self, category: SkillCategory, names: &[&str]) {
        for name in names {
            self.synonyms.insert((*name).to_string(), category);
        }
    }

    /// 正規ラベルそのもの
    fn canonical_labels(&mut self) {
        for category in SkillCategory::ALL {
            self.synonyms.insert(category.label().to_lowercase(), category);
        }
    }

    /// インドネシア語の表記ゆれ
    fn indonesian_preset() -> Self {
        let mut config = Self::default();
        config.canonical_labels();

        config.insert_all(
            SkillCategory::KerjaSama,
            &["kerjasama", "kerja-sama", "kolaborasi", "kooperatif", "gotong royong"],
        );
        config.insert_all(
            SkillCategory::TanggungJawab,
            &["tanggungjawab", "tanggung-jawab", "komitmen", "disiplin", "tanggung jawap"],
        );
        config.insert_all(
            SkillCategory::Komunikasi,
            &["komunkasi", "komonikasi", "berkomunikasi", "komunikatif"],
        );
        config.insert_all(
            SkillCategory::ProblemSolving,
            &["pemecahan masalah", "pemecahan-masalah", "penyelesaian masalah", "problemsolving"],
        );
        config.insert_all(
            SkillCategory::Kepemimpinan,
            &["kepemimpin", "memimpin", "kepimpinan"],
        );
        config.insert_all(
            SkillCategory::Fleksibilitas,
            &["fleksibel", "flexibilitas", "fleksibilitas diri", "adaptasi", "beradaptasi"],
        );

        config
    }

    /// 英語名
    fn english_preset() -> Self {
        let mut config = Self::default();
        config.canonical_labels();

        config.insert_all(
            SkillCategory::KerjaSama,
            &["teamwork", "team work", "collaboration", "cooperation"],
        );
        config.insert_all(
            SkillCategory::TanggungJawab,
            &["responsibility", "accountability", "commitment"],
        );
        config.insert_all(SkillCategory::Komunikasi, &["communication"]);
        config.insert_all(
            SkillCategory::ProblemSolving,
            &["problem-solving", "problem solving skill"],
        );
        config.insert_all(SkillCategory::Kepemimpinan, &["leadership"]);
        config.insert_all(
            SkillCategory::Fleksibilitas,
            &["flexibility", "adaptability", "adaptation"],
        );

        config
    }

    /// 標準プリセット（インドネシア語 + 英語）
    fn standard_preset() -> Self {
        let mut config = Self::indonesian_preset();
        config.merge(&Self::english_preset());
        config
    }

    /// 設定をマージ（後から追加した設定が優先）
    pub fn merge(&mut self, other: &SkillAliasConfig) {
        self.synonyms.extend(other.synonyms.clone());
        if other.question_delimiter.is_some() {
            self.question_delimiter = other.question_delimiter.clone();
        }
    }
}

/// プリセット名とカスタムJSONからエイリアス設定を組み立てる
///
/// プリセット未指定なら標準プリセット。カスタム設定はプリセットを上書きする。
pub fn build_alias_config(preset: Option<&str>, alias_json: Option<&str>) -> Result<SkillAliasConfig> {
    let mut config = SkillAliasConfig::default();

    match preset {
        Some(name) => match SkillAliasConfig::from_preset(name) {
            Some(preset_config) => config.merge(&preset_config),
            None => {
                tracing::warn!("不明なプリセット '{}' (standard/indonesia/english)", name);
                config.merge(&SkillAliasConfig::standard_preset());
            }
        },
        None => config.merge(&SkillAliasConfig::standard_preset()),
    }

    if let Some(json) = alias_json {
        let custom_config = SkillAliasConfig::from_json(json)?;
        config.merge(&custom_config);
    }

    Ok(config)
}

/// スキル名の正規化器
#[derive(Debug, Clone)]
pub struct SkillNormalizer {
    config: SkillAliasConfig,
}

impl Default for SkillNormalizer {
    fn default() -> Self {
        Self::new(SkillAliasConfig::standard_preset())
    }
}

impl SkillNormalizer {
    pub fn new(config: SkillAliasConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SkillAliasConfig {
        &self.config
    }

    pub fn delimiter(&self) -> &str {
        self.config
            .question_delimiter
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or(DEFAULT_QUESTION_DELIMITER)
    }

    /// カテゴリ名を正規化する
    ///
    /// 1. ゼロ幅文字を除去して前後の空白を削る（空なら `None`）
    /// 2. 小文字でエイリアス表を引く
    /// 3. 部分一致のヒューリスティック
    /// 4. どれにも当たらなければ整形済みの文字列をそのまま返す
    pub fn normalize_skill_name(&self, raw: &str) -> Option<SkillName> {
        let cleaned = strip_format_chars(raw);
        let cleaned = cleaned.trim();
        if cleaned.is_empty() {
            return None;
        }

        let key = lookup_key(cleaned);
        if let Some(category) = self.config.synonyms.get(&key) {
            return Some(SkillName::Canonical(*category));
        }

        match match_heuristics(&key) {
            Some(category) => Some(SkillName::Canonical(category)),
            None => Some(SkillName::Other(cleaned.to_string())),
        }
    }

    /// 質問文からカテゴリ部分を取り出す
    ///
    /// 区切り文字で分割した2番目の要素を使い、括弧があればその中身を返す。
    /// 2番目の要素がなければ空文字。
    pub fn extract_category_from_question(&self, question: &str) -> String {
        match self.category_segment(question) {
            Some(segment) => paren_contents(segment).unwrap_or(segment).trim().to_string(),
            None => String::new(),
        }
    }

    /// 質問文のカテゴリを正規化して返す
    ///
    /// 括弧内が6カテゴリに当たらない場合は括弧の前の表記でも試す
    /// （例: "Tanggung Jawab (Sikap)"）。
    pub fn category_of_question(&self, question: &str) -> Option<SkillName> {
        let name = self.normalize_skill_name(&self.extract_category_from_question(question))?;
        if name.canonical().is_some() {
            return Some(name);
        }

        let outer = self
            .category_segment(question)
            .and_then(|segment| segment.split('(').next())
            .and_then(|outer| self.normalize_skill_name(outer))
            .filter(|outer| outer.canonical().is_some());

        Some(outer.unwrap_or(name))
    }

    /// 集計済みスコアのキーからカテゴリを取り出す
    ///
    /// 区切り文字を含めば質問文として、含まなければキー全体をカテゴリ名として扱う。
    pub fn category_of_key(&self, key: &str) -> Option<SkillName> {
        if key.contains(self.delimiter()) {
            self.category_of_question(key)
        } else {
            self.normalize_skill_name(paren_contents(key).unwrap_or(key))
        }
    }

    fn category_segment<'a>(&self, question: &'a str) -> Option<&'a str> {
        question.split(self.delimiter()).nth(1)
    }
}

/// 括弧内の文字列
fn paren_contents(text: &str) -> Option<&str> {
    PAREN_GROUP_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// ゼロ幅文字・書式制御文字を除去
fn strip_format_chars(text: &str) -> String {
    text.chars()
        .filter(|c| {
            !matches!(
                c,
                '\u{00AD}'
                    | '\u{200B}'..='\u{200F}'
                    | '\u{202A}'..='\u{202E}'
                    | '\u{2060}'..='\u{2064}'
                    | '\u{FEFF}'
            )
        })
        .collect()
}

/// 表引き用のキー（小文字・連続空白を1つに）
fn lookup_key(cleaned: &str) -> String {
    cleaned
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// 部分一致による推定（順序に意味がある）
fn match_heuristics(key: &str) -> Option<SkillCategory> {
    if key.contains("problem") {
        Some(SkillCategory::ProblemSolving)
    } else if key.contains("kerja") && key.contains("sama") {
        Some(SkillCategory::KerjaSama)
    } else if key.contains("tanggung") {
        Some(SkillCategory::TanggungJawab)
    } else if key.contains("komunik") {
        Some(SkillCategory::Komunikasi)
    } else if key.contains("pimpin") || key.contains("leader") {
        Some(SkillCategory::Kepemimpinan)
    } else if key.contains("fleks") || key.contains("adapt") {
        Some(SkillCategory::Fleksibilitas)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical(normalizer: &SkillNormalizer, raw: &str) -> Option<SkillCategory> {
        normalizer.normalize_skill_name(raw).and_then(|n| n.canonical())
    }

    #[test]
    fn test_standard_preset() {
        let config = SkillAliasConfig::from_preset("standard").unwrap();
        assert_eq!(config.synonyms.get("kerjasama"), Some(&SkillCategory::KerjaSama));
        assert_eq!(config.synonyms.get("leadership"), Some(&SkillCategory::Kepemimpinan));
        assert_eq!(config.synonyms.get("adaptasi"), Some(&SkillCategory::Fleksibilitas));
        assert_eq!(config.synonyms.get("adaptability"), Some(&SkillCategory::Fleksibilitas));
        assert!(SkillAliasConfig::from_preset("unknown").is_none());
    }

    #[test]
    fn test_synonyms() {
        let normalizer = SkillNormalizer::default();
        assert_eq!(canonical(&normalizer, "Kerjasama"), Some(SkillCategory::KerjaSama));
        assert_eq!(canonical(&normalizer, "kolaborasi"), Some(SkillCategory::KerjaSama));
        assert_eq!(canonical(&normalizer, "Leadership"), Some(SkillCategory::Kepemimpinan));
        assert_eq!(canonical(&normalizer, "ADAPTASI"), Some(SkillCategory::Fleksibilitas));
        assert_eq!(canonical(&normalizer, "Komitmen"), Some(SkillCategory::TanggungJawab));
    }

    #[test]
    fn test_zero_width_and_underscore() {
        let normalizer = SkillNormalizer::default();
        let name = normalizer.normalize_skill_name("  Kerja_Sama\u{200B} ").unwrap();
        assert_eq!(name, SkillName::Canonical(SkillCategory::KerjaSama));
        assert_eq!(name.as_str(), "Kerja Sama");
        assert_eq!(
            canonical(&normalizer, "\u{FEFF}Tanggung  Jawab"),
            Some(SkillCategory::TanggungJawab)
        );
    }

    #[test]
    fn test_heuristics_order() {
        let normalizer = SkillNormalizer::new(SkillAliasConfig::default());
        assert_eq!(canonical(&normalizer, "Problem kerja sama"), Some(SkillCategory::ProblemSolving));
        assert_eq!(canonical(&normalizer, "Kerja bersama-sama"), Some(SkillCategory::KerjaSama));
        assert_eq!(canonical(&normalizer, "Sikap tanggung"), Some(SkillCategory::TanggungJawab));
        assert_eq!(canonical(&normalizer, "Komunikatif"), Some(SkillCategory::Komunikasi));
        assert_eq!(canonical(&normalizer, "Team Leader"), Some(SkillCategory::Kepemimpinan));
        assert_eq!(canonical(&normalizer, "Fleksibel"), Some(SkillCategory::Fleksibilitas));
    }

    #[test]
    fn test_unknown_passes_through() {
        let normalizer = SkillNormalizer::default();
        assert_eq!(
            normalizer.normalize_skill_name(" Kreativitas\u{200B}"),
            Some(SkillName::Other("Kreativitas".into()))
        );
        assert_eq!(normalizer.normalize_skill_name(" \u{200B} "), None);
        assert_eq!(normalizer.normalize_skill_name(""), None);
    }

    #[test]
    fn test_extract_category_from_question() {
        let normalizer = SkillNormalizer::default();
        assert_eq!(
            normalizer.extract_category_from_question("Q2|Tanggung Jawab (Komitmen)"),
            "Komitmen"
        );
        assert_eq!(normalizer.extract_category_from_question("Q1| Kerjasama "), "Kerjasama");
        assert_eq!(normalizer.extract_category_from_question("Tanpa kategori"), "");
        assert_eq!(
            normalizer.extract_category_from_question("Q|Tanggung Jawab (Komitmen"),
            "Tanggung Jawab (Komitmen"
        );
    }

    #[test]
    fn test_category_of_question_outer_fallback() {
        let normalizer = SkillNormalizer::default();
        assert_eq!(
            normalizer.category_of_question("Q|Komunikasi (Lisan)"),
            Some(SkillName::Canonical(SkillCategory::Komunikasi))
        );
        assert_eq!(
            normalizer.category_of_question("Q|Unknown Thing"),
            Some(SkillName::Other("Unknown Thing".into()))
        );
    }

    #[test]
    fn test_category_of_key() {
        let normalizer = SkillNormalizer::default();
        assert_eq!(
            normalizer.category_of_key("Fleksibilitas").and_then(|n| n.canonical()),
            Some(SkillCategory::Fleksibilitas)
        );
        assert_eq!(
            normalizer.category_of_key("Q3|Sikap (Kepemimpinan)").and_then(|n| n.canonical()),
            Some(SkillCategory::Kepemimpinan)
        );
    }

    #[test]
    fn test_custom_json_overrides_preset() {
        let json = r#"{"synonyms": {"  Kreativitas ": "Problem Solving"}, "question_delimiter": "::"}"#;
        let config = build_alias_config(Some("indonesia"), Some(json)).unwrap();
        let normalizer = SkillNormalizer::new(config);
        assert_eq!(normalizer.delimiter(), "::");
        assert_eq!(canonical(&normalizer, "kreativitas"), Some(SkillCategory::ProblemSolving));
        assert_eq!(
            normalizer.extract_category_from_question("Soal::Kerjasama"),
            "Kerjasama"
        );
    }

    #[test]
    fn test_invalid_json() {
        assert!(SkillAliasConfig::from_json("{").is_err());
    }

    #[test]
    fn test_empty_delimiter_rejected() {
        let result = SkillAliasConfig::from_json(r#"{"question_delimiter": ""}"#);
        assert!(matches!(result, Err(Error::Config(_))));

        let result = build_alias_config(None, Some(r#"{"question_delimiter": ""}"#));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
