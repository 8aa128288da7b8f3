use crate::error::{ReportError, Result};
use serde::{Deserialize, Serialize};
use skill_report_common::{build_alias_config, ScoreNormalizer, ScoringConfig, SkillNormalizer, SkillScorer};
use std::path::{Path, PathBuf};

/// エイリアスファイルの環境変数（設定ファイルより優先）
pub const ALIAS_FILE_ENV: &str = "SKILL_REPORT_ALIASES";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// カスタムエイリアスJSON
    pub alias_file: Option<PathBuf>,
    /// 質問文の区切り文字
    pub question_delimiter: String,
    /// レーダーチャートのスキル名省略の閾値
    pub label_max_chars: usize,
    /// PDFの文書タイトル
    pub report_title: String,
    /// ラベル表・スコア上限
    pub scoring: ScoringConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            alias_file: None,
            question_delimiter: "|".into(),
            label_max_chars: 12,
            report_title: "Laporan Assessment Kelas".into(),
            scoring: ScoringConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// 指定パスから読み込み（ファイルがなければデフォルト）
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ReportError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("skill-report").join("config.json"))
    }

    /// 有効なエイリアスファイル（環境変数を優先）
    pub fn effective_alias_file(&self) -> Option<PathBuf> {
        match std::env::var(ALIAS_FILE_ENV) {
            Ok(path) if !path.trim().is_empty() => Some(PathBuf::from(path)),
            _ => self.alias_file.clone(),
        }
    }

    /// プリセットとエイリアスファイルから集計器を作る
    ///
    /// `alias_file` を省略すると環境変数・設定ファイルのものを使う。
    /// エイリアスファイルに区切り文字がなければ設定の区切り文字を使う。
    pub fn build_scorer(&self, preset: Option<&str>, alias_file: Option<&Path>) -> Result<SkillScorer> {
        let alias_path = alias_file.map(Path::to_path_buf).or_else(|| self.effective_alias_file());
        let alias_json = match &alias_path {
            Some(path) if !path.exists() => {
                return Err(ReportError::FileNotFound(path.display().to_string()));
            }
            Some(path) => {
                tracing::debug!("エイリアスファイル: {}", path.display());
                Some(std::fs::read_to_string(path)?)
            }
            None => None,
        };

        let mut aliases = build_alias_config(preset, alias_json.as_deref())?;
        if aliases.question_delimiter.is_none() && !self.question_delimiter.is_empty() {
            aliases.question_delimiter = Some(self.question_delimiter.clone());
        }

        let scores = ScoreNormalizer::try_new(self.scoring.clone())?;
        Ok(SkillScorer::new(scores, SkillNormalizer::new(aliases)))
    }

    pub fn set_alias_file(&mut self, path: PathBuf) -> Result<()> {
        if !path.exists() {
            return Err(ReportError::FileNotFound(path.display().to_string()));
        }
        self.alias_file = Some(path);
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("none.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.question_delimiter, "|");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            alias_file: Some(PathBuf::from("/tmp/aliases.json")),
            label_max_chars: 10,
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"question_delimiter": "::"}"#).unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.question_delimiter, "::");
        assert_eq!(config.label_max_chars, 12);
    }

    #[test]
    fn test_build_scorer_with_alias_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("aliases.json");
        std::fs::write(&path, r#"{"synonyms": {"Kreativitas": "Problem Solving"}}"#).unwrap();

        let config = Config {
            question_delimiter: "::".into(),
            ..Config::default()
        };
        let scorer = config.build_scorer(Some("english"), Some(&path)).unwrap();
        let skills = scorer.skill_normalizer();
        assert_eq!(skills.delimiter(), "::");
        assert_eq!(
            skills.category_of_question("Membuat ide baru :: Kreativitas").and_then(|n| n.canonical()),
            Some(skill_report_common::SkillCategory::ProblemSolving)
        );
    }

    #[test]
    fn test_build_scorer_missing_alias_file() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("none.json");
        let result = Config::default().build_scorer(None, Some(&missing));
        assert!(matches!(result, Err(ReportError::FileNotFound(_))));
    }

    #[test]
    fn test_scoring_section_sets_max_score() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"scoring": {"max_score": 5}}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        // ラベル表は既定のまま
        assert_eq!(config.scoring.labels.len(), 4);
        let scorer = config.build_scorer(None, None).unwrap();
        assert_eq!(scorer.max_score(), 5.0);
    }

    #[test]
    fn test_invalid_scoring_section() {
        let config = Config {
            scoring: ScoringConfig {
                max_score: -1.0,
                ..ScoringConfig::default()
            },
            ..Config::default()
        };
        assert!(matches!(config.build_scorer(None, None), Err(ReportError::Config(_))));
    }

    #[test]
    fn test_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{").unwrap();
        assert!(matches!(Config::load_from(&path), Err(ReportError::Json(_))));
    }
}
