//! Skill Report Common Library
//!
//! 評価データのスコア化・カテゴリ正規化・集計と、チャート描画・
//! Excel生成のコア。CLI側はこれを使ってファイルを書き出す。

pub mod types;
pub mod layout;
pub mod alias;
pub mod error;
pub mod score;
pub mod aggregate;
pub mod chart;
pub mod export;

pub use types::{Answer, AnswerSheet, ClassRecord, SchoolInfo, ScoreLevel, SkillAverages, SkillCategory, SkillName};
pub use layout::{ExcelLayout, PdfLayout};
pub use alias::{build_alias_config, SkillAliasConfig, SkillNormalizer};
pub use error::{ChartError, Error, Result};
pub use score::{ScoreNormalizer, ScoringConfig};
pub use aggregate::{SchoolSummary, SkillScorer, SkillStats, StudentSummary};
