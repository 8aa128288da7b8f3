//! 評価データの型定義
//!
//! ドキュメントDBから取得したスナップショットをそのまま受け取る型:
//! - Answer: 1問あたりの回答（数値 / ラベル / オブジェクト）
//! - ClassRecord: 1クラス分の評価ドキュメント
//! - SkillCategory / SkillAverages / ScoreLevel: 集計結果

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

/// スコアの上限（0〜4のスケール）
pub const MAX_SCORE: f64 = 4.0;

/// 生徒1人分の回答（質問文 → 回答）
pub type AnswerSheet = BTreeMap<String, Answer>;

/// 1問あたりの回答
///
/// JSONの形そのままに判別する。数値・文字列・オブジェクト以外
/// （null / bool / 配列）は `Unrecognized` に落ち、常に未採点扱いになる。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Numeric(f64),
    Label(String),
    Structured(serde_json::Map<String, serde_json::Value>),
    Unrecognized(serde_json::Value),
}

impl Answer {
    /// 表示用の文字列（Excelのセル値など）
    pub fn display_text(&self) -> String {
        match self {
            Answer::Numeric(n) => format_number(*n),
            Answer::Label(s) => s.trim().to_string(),
            Answer::Structured(map) => ["scoreLabel", "label", "text", "score", "value", "rating"]
                .iter()
                .find_map(|key| match map.get(*key) {
                    Some(serde_json::Value::String(s)) => Some(s.clone()),
                    Some(serde_json::Value::Number(n)) => n.as_f64().map(format_number),
                    _ => None,
                })
                .unwrap_or_default(),
            Answer::Unrecognized(serde_json::Value::Null) => String::new(),
            Answer::Unrecognized(value) => value.to_string(),
        }
    }
}

impl From<f64> for Answer {
    fn from(value: f64) -> Self {
        Answer::Numeric(value)
    }
}

impl From<&str> for Answer {
    fn from(value: &str) -> Self {
        Answer::Label(value.to_string())
    }
}

impl From<String> for Answer {
    fn from(value: String) -> Self {
        Answer::Label(value)
    }
}

/// 整数なら小数点なしで表示
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// ソフトスキルの6カテゴリ（並び順はチャートの軸順）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SkillCategory {
    #[serde(rename = "Kerja Sama")]
    KerjaSama,
    #[serde(rename = "Tanggung Jawab")]
    TanggungJawab,
    #[serde(rename = "Komunikasi")]
    Komunikasi,
    #[serde(rename = "Problem Solving")]
    ProblemSolving,
    #[serde(rename = "Kepemimpinan")]
    Kepemimpinan,
    #[serde(rename = "Fleksibilitas")]
    Fleksibilitas,
}

impl SkillCategory {
    /// 全カテゴリ（軸順）
    pub const ALL: [SkillCategory; 6] = [
        SkillCategory::KerjaSama,
        SkillCategory::TanggungJawab,
        SkillCategory::Komunikasi,
        SkillCategory::ProblemSolving,
        SkillCategory::Kepemimpinan,
        SkillCategory::Fleksibilitas,
    ];

    /// 正規ラベル
    pub fn label(&self) -> &'static str {
        match self {
            SkillCategory::KerjaSama => "Kerja Sama",
            SkillCategory::TanggungJawab => "Tanggung Jawab",
            SkillCategory::Komunikasi => "Komunikasi",
            SkillCategory::ProblemSolving => "Problem Solving",
            SkillCategory::Kepemimpinan => "Kepemimpinan",
            SkillCategory::Fleksibilitas => "Fleksibilitas",
        }
    }

    /// 軸インデックス（0..6）
    pub fn index(&self) -> usize {
        match self {
            SkillCategory::KerjaSama => 0,
            SkillCategory::TanggungJawab => 1,
            SkillCategory::Komunikasi => 2,
            SkillCategory::ProblemSolving => 3,
            SkillCategory::Kepemimpinan => 4,
            SkillCategory::Fleksibilitas => 5,
        }
    }

    /// 正規ラベルと完全一致する場合のみ変換
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }
}

impl std::fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// カテゴリ名の正規化結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkillName {
    /// 6カテゴリのいずれか
    Canonical(SkillCategory),
    /// どれにも当てはまらない（整形済みの元の文字列）
    Other(String),
}

impl SkillName {
    pub fn canonical(&self) -> Option<SkillCategory> {
        match self {
            SkillName::Canonical(category) => Some(*category),
            SkillName::Other(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SkillName::Canonical(category) => category.label(),
            SkillName::Other(name) => name,
        }
    }
}

/// 6カテゴリそれぞれの平均値（常に6件、0〜上限にクランプ済み）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SkillAverages([f64; 6]);

impl SkillAverages {
    /// 値を0〜4にクランプして作成
    pub fn new(values: [f64; 6]) -> Self {
        Self(values.map(clamp_score))
    }

    /// 値を0〜`max_score`にクランプして作成
    pub fn with_max(values: [f64; 6], max_score: f64) -> Self {
        Self(values.map(|v| clamp_score_to(v, max_score)))
    }

    pub fn get(&self, category: SkillCategory) -> f64 {
        self.0[category.index()]
    }

    /// 軸順に (カテゴリ, 平均) を返す
    pub fn iter(&self) -> impl Iterator<Item = (SkillCategory, f64)> + '_ {
        SkillCategory::ALL.iter().map(move |c| (*c, self.0[c.index()]))
    }

    /// 6カテゴリの単純平均
    pub fn overall(&self) -> f64 {
        self.0.iter().sum::<f64>() / self.0.len() as f64
    }

    pub fn values(&self) -> [f64; 6] {
        self.0
    }
}

impl Serialize for SkillAverages {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(6))?;
        for (category, value) in self.iter() {
            map.serialize_entry(category.label(), &value)?;
        }
        map.end()
    }
}

/// 0〜4に収める（NaNは0）
pub fn clamp_score(value: f64) -> f64 {
    clamp_score_to(value, MAX_SCORE)
}

/// 0〜`max_score`に収める（NaNは0、上限が不正なら4）
pub fn clamp_score_to(value: f64, max_score: f64) -> f64 {
    let max_score = if max_score.is_finite() && max_score > 0.0 {
        max_score
    } else {
        MAX_SCORE
    };
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, max_score)
    }
}

/// 平均値の評価段階
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScoreLevel {
    #[serde(rename = "Sangat Baik")]
    SangatBaik,
    #[serde(rename = "Baik")]
    Baik,
    #[serde(rename = "Cukup")]
    Cukup,
    #[serde(rename = "Kurang")]
    Kurang,
}

impl ScoreLevel {
    /// 平均値から段階を判定（>=4, >=3, >=2, それ以外）
    pub fn from_average(average: f64) -> Self {
        if average >= 4.0 {
            ScoreLevel::SangatBaik
        } else if average >= 3.0 {
            ScoreLevel::Baik
        } else if average >= 2.0 {
            ScoreLevel::Cukup
        } else {
            ScoreLevel::Kurang
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreLevel::SangatBaik => "Sangat Baik",
            ScoreLevel::Baik => "Baik",
            ScoreLevel::Cukup => "Cukup",
            ScoreLevel::Kurang => "Kurang",
        }
    }
}

impl std::fmt::Display for ScoreLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Firestoreのタイムスタンプ（{seconds} / 文字列 / ミリ秒）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Seconds { seconds: i64 },
    Millis(i64),
    Text(String),
}

/// 1クラス分の評価ドキュメント
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClassRecord {
    /// ドキュメントID（例: "smk_negeri_1_xii_tkj"）
    pub id: String,
    pub school_name: String,
    pub class_level: String,
    pub program_keahlian: String,
    pub observer_name: String,
    pub observer_role: String,
    pub student_count: u32,
    pub status: String,
    pub created_at: Option<Timestamp>,
    pub assessment_date: Option<Timestamp>,
    /// 生徒名 → 質問 → 回答
    pub answers: BTreeMap<String, AnswerSheet>,
    /// 生徒名 → スキルキー → 集計済みスコア
    pub student_scores: BTreeMap<String, BTreeMap<String, f64>>,
    pub ai_suggestions: Vec<String>,
}

impl ClassRecord {
    /// 学校名（フィールドが空ならドキュメントIDから推定）
    pub fn school_display_name(&self) -> String {
        if self.school_name.trim().is_empty() {
            SchoolInfo::from_document_id(&self.id).school_name
        } else {
            self.school_name.trim().to_string()
        }
    }

    /// 生徒数（フィールドが0なら回答数から）
    pub fn effective_student_count(&self) -> usize {
        if self.student_count > 0 {
            self.student_count as usize
        } else {
            self.answers.len().max(self.student_scores.len())
        }
    }
}

/// ドキュメントIDから取り出した学校情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchoolInfo {
    pub school_name: String,
    pub grade: String,
    pub program: String,
}

impl SchoolInfo {
    /// "<学校名の単語>_<学年>_<専攻>" 形式のIDを分解する
    pub fn from_document_id(id: &str) -> Self {
        let parts: Vec<&str> = id.split('_').collect();
        if parts.len() >= 3 {
            let school_name = parts[..parts.len() - 2]
                .iter()
                .map(|w| title_case(w))
                .collect::<Vec<_>>()
                .join(" ");
            Self {
                school_name,
                grade: parts[parts.len() - 2].to_string(),
                program: title_case(parts[parts.len() - 1]),
            }
        } else {
            Self {
                school_name: id.to_string(),
                grade: "N/A".to_string(),
                program: "N/A".to_string(),
            }
        }
    }
}

/// 先頭文字のみ大文字化
fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_deserialize_variants() {
        let json = r#"{"a": 3, "b": "Baik", "c": {"score": 2}, "d": null, "e": true}"#;
        let sheet: AnswerSheet = serde_json::from_str(json).unwrap();
        assert_eq!(sheet["a"], Answer::Numeric(3.0));
        assert_eq!(sheet["b"], Answer::Label("Baik".into()));
        assert!(matches!(sheet["c"], Answer::Structured(_)));
        assert!(matches!(sheet["d"], Answer::Unrecognized(serde_json::Value::Null)));
        assert!(matches!(sheet["e"], Answer::Unrecognized(_)));
    }

    #[test]
    fn test_answer_display_text() {
        assert_eq!(Answer::Numeric(3.0).display_text(), "3");
        assert_eq!(Answer::Numeric(2.5).display_text(), "2.5");
        assert_eq!(Answer::from(" Baik ").display_text(), "Baik");
        let structured: Answer = serde_json::from_str(r#"{"label": "Cukup"}"#).unwrap();
        assert_eq!(structured.display_text(), "Cukup");
    }

    #[test]
    fn test_score_level_bands() {
        assert_eq!(ScoreLevel::from_average(4.0), ScoreLevel::SangatBaik);
        assert_eq!(ScoreLevel::from_average(3.99), ScoreLevel::Baik);
        assert_eq!(ScoreLevel::from_average(3.0), ScoreLevel::Baik);
        assert_eq!(ScoreLevel::from_average(2.0), ScoreLevel::Cukup);
        assert_eq!(ScoreLevel::from_average(1.99), ScoreLevel::Kurang);
        assert_eq!(ScoreLevel::from_average(0.0), ScoreLevel::Kurang);
        assert_eq!(ScoreLevel::from_average(f64::NAN), ScoreLevel::Kurang);
    }

    #[test]
    fn test_skill_averages_clamped() {
        let averages = SkillAverages::new([10.0, -1.0, 2.5, f64::NAN, 4.0, 0.0]);
        assert_eq!(averages.get(SkillCategory::KerjaSama), 4.0);
        assert_eq!(averages.get(SkillCategory::TanggungJawab), 0.0);
        assert_eq!(averages.get(SkillCategory::Komunikasi), 2.5);
        assert_eq!(averages.get(SkillCategory::ProblemSolving), 0.0);
        assert_eq!(averages.iter().count(), 6);
    }

    #[test]
    fn test_skill_averages_custom_max() {
        let averages = SkillAverages::with_max([10.0, 5.0, 4.5, -1.0, 0.0, 0.0], 5.0);
        assert_eq!(averages.get(SkillCategory::KerjaSama), 5.0);
        assert_eq!(averages.get(SkillCategory::TanggungJawab), 5.0);
        assert_eq!(averages.get(SkillCategory::Komunikasi), 4.5);
        assert_eq!(averages.get(SkillCategory::ProblemSolving), 0.0);

        // 上限が不正なら4で切る
        assert_eq!(clamp_score_to(7.0, 0.0), 4.0);
        assert_eq!(clamp_score_to(7.0, f64::NAN), 4.0);
    }

    #[test]
    fn test_skill_averages_serialize_in_axis_order() {
        let averages = SkillAverages::new([1.0, 2.0, 3.0, 4.0, 0.0, 0.5]);
        let json = serde_json::to_string(&averages).unwrap();
        assert!(json.starts_with(r#"{"Kerja Sama":1.0,"Tanggung Jawab":2.0"#));
        assert!(json.ends_with(r#""Fleksibilitas":0.5}"#));
    }

    #[test]
    fn test_school_info_from_document_id() {
        let info = SchoolInfo::from_document_id("smk_negeri_1_xii_tkj");
        assert_eq!(info.school_name, "Smk Negeri 1");
        assert_eq!(info.grade, "xii");
        assert_eq!(info.program, "Tkj");

        let short = SchoolInfo::from_document_id("sekolah");
        assert_eq!(short.school_name, "sekolah");
        assert_eq!(short.grade, "N/A");
    }

    #[test]
    fn test_class_record_defaults() {
        let record: ClassRecord = serde_json::from_str(r#"{"id": "x_10_ipa"}"#).unwrap();
        assert!(record.answers.is_empty());
        assert_eq!(record.school_display_name(), "X");
        assert_eq!(record.effective_student_count(), 0);
    }

    #[test]
    fn test_timestamp_variants() {
        let ts: Timestamp = serde_json::from_str(r#"{"seconds": 1700000000, "nanoseconds": 0}"#).unwrap();
        assert_eq!(ts, Timestamp::Seconds { seconds: 1700000000 });
        let ts: Timestamp = serde_json::from_str(r#""2026-10-18""#).unwrap();
        assert_eq!(ts, Timestamp::Text("2026-10-18".into()));
    }
}
