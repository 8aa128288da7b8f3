//! スキル平均の集計
//!
//! 生徒 → クラス → 学校の順に平均を積み上げる。
//! 集計値は保存せず、取得済みスナップショットから毎回計算する。

use crate::alias::SkillNormalizer;
use crate::score::ScoreNormalizer;
use crate::types::{
    clamp_score_to, AnswerSheet, ClassRecord, SchoolInfo, ScoreLevel, SkillAverages, SkillCategory,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// 回答スコアとカテゴリの両方を扱う集計器
#[derive(Debug, Clone, Default)]
pub struct SkillScorer {
    scores: ScoreNormalizer,
    skills: SkillNormalizer,
}

/// 1カテゴリ分の統計
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillStats {
    pub category: SkillCategory,
    /// 平均（0〜上限にクランプ済み、スコアなしは0）
    pub average: f64,
    pub count: usize,
    pub min: f64,
    pub max: f64,
    /// 四捨五入したスコア 1〜5 の件数
    pub distribution: [usize; 5],
}

impl SkillStats {
    fn from_scores(category: SkillCategory, scores: &[f64], max_score: f64) -> Self {
        let mut distribution = [0usize; 5];
        for score in scores {
            let rounded = score.round();
            if (1.0..=5.0).contains(&rounded) {
                distribution[rounded as usize - 1] += 1;
            }
        }

        Self {
            category,
            average: mean(scores).map(|m| clamp_score_to(m, max_score)).unwrap_or(0.0),
            count: scores.len(),
            min: scores.iter().copied().reduce(f64::min).unwrap_or(0.0),
            max: scores.iter().copied().reduce(f64::max).unwrap_or(0.0),
            distribution,
        }
    }

    pub fn level(&self) -> ScoreLevel {
        ScoreLevel::from_average(self.average)
    }
}

/// 生徒1人分の総合結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentSummary {
    pub name: String,
    /// 採点できた正のスコアの平均
    pub average: f64,
    pub level: ScoreLevel,
    /// 採点できた回答数
    pub answered: usize,
    /// 質問数
    pub total: usize,
    pub skills: SkillAverages,
}

/// 学校単位の平均
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchoolSummary {
    pub school_name: String,
    pub class_count: usize,
    pub student_count: usize,
    pub averages: SkillAverages,
}

impl SkillScorer {
    pub fn new(scores: ScoreNormalizer, skills: SkillNormalizer) -> Self {
        Self { scores, skills }
    }

    pub fn score_normalizer(&self) -> &ScoreNormalizer {
        &self.scores
    }

    pub fn skill_normalizer(&self) -> &SkillNormalizer {
        &self.skills
    }

    /// 平均・チャートの上限
    pub fn max_score(&self) -> f64 {
        self.scores.max_score()
    }

    /// 回答をカテゴリごとのスコア列に振り分ける
    ///
    /// カテゴリが6つのいずれにも当たらない回答、採点できない回答は捨てる。
    fn collect_scores<'a, I>(&self, answers: I, buckets: &mut [Vec<f64>; 6])
    where
        I: IntoIterator<Item = (&'a String, &'a crate::types::Answer)>,
    {
        for (question, answer) in answers {
            let Some(category) = self
                .skills
                .category_of_question(question)
                .and_then(|name| name.canonical())
            else {
                tracing::debug!(question = %question, "カテゴリ対象外のため除外");
                continue;
            };
            let Some(score) = self.scores.normalize(answer) else {
                tracing::debug!(question = %question, "採点できない回答を除外");
                continue;
            };
            buckets[category.index()].push(score);
        }
    }

    /// 1人分の回答から6カテゴリの平均を計算する
    ///
    /// スコアのないカテゴリは0で埋め、結果は常に6件・0〜4の範囲。
    pub fn compute_skill_averages(&self, answers: &AnswerSheet) -> SkillAverages {
        let mut buckets: [Vec<f64>; 6] = Default::default();
        self.collect_scores(answers, &mut buckets);
        SkillAverages::with_max(buckets.map(|scores| mean(&scores).unwrap_or(0.0)), self.max_score())
    }

    /// 生徒の総合平均（正のスコアのみ）
    pub fn student_summary(&self, name: &str, answers: &AnswerSheet) -> StudentSummary {
        let scores: Vec<f64> = answers
            .values()
            .filter_map(|answer| self.scores.normalize(answer))
            .filter(|score| *score > 0.0)
            .collect();
        let average = mean(&scores).unwrap_or(0.0);

        StudentSummary {
            name: name.to_string(),
            average,
            level: ScoreLevel::from_average(average),
            answered: scores.len(),
            total: answers.len(),
            skills: self.compute_skill_averages(answers),
        }
    }

    /// クラス全員の回答をまとめた6カテゴリの統計
    pub fn class_skill_summary(&self, record: &ClassRecord) -> Vec<SkillStats> {
        let mut buckets: [Vec<f64>; 6] = Default::default();
        for answers in record.answers.values() {
            self.collect_scores(answers, &mut buckets);
        }
        stats_from_buckets(&buckets, self.max_score())
    }

    /// 集計済みスコア（studentScores）から6カテゴリの統計を計算する
    pub fn class_averages_from_scores(
        &self,
        student_scores: &BTreeMap<String, BTreeMap<String, f64>>,
    ) -> Vec<SkillStats> {
        let mut buckets: [Vec<f64>; 6] = Default::default();
        for scores in student_scores.values() {
            for (key, score) in scores {
                if score.is_nan() {
                    continue;
                }
                if let Some(category) = self.skills.category_of_key(key).and_then(|n| n.canonical()) {
                    buckets[category.index()].push(*score);
                }
            }
        }
        stats_from_buckets(&buckets, self.max_score())
    }

    /// クラスのスキル平均（回答があれば回答から、なければ集計済みスコアから）
    pub fn class_skill_averages(&self, record: &ClassRecord) -> Vec<SkillStats> {
        if record.answers.is_empty() {
            self.class_averages_from_scores(&record.student_scores)
        } else {
            self.class_skill_summary(record)
        }
    }

    /// 学校ごとのクラス平均の平均
    ///
    /// 学校名はドキュメントIDから推定したものでまとめる。
    /// スコアのないカテゴリを持つクラスはそのカテゴリに寄与しない。
    pub fn school_skill_averages(&self, records: &[ClassRecord]) -> Vec<SchoolSummary> {
        let mut schools: BTreeMap<String, (usize, usize, [Vec<f64>; 6])> = BTreeMap::new();

        for record in records {
            let name = if record.id.is_empty() {
                record.school_display_name()
            } else {
                SchoolInfo::from_document_id(&record.id).school_name
            };
            let entry = schools.entry(name).or_default();
            entry.0 += 1;
            entry.1 += record.effective_student_count();

            for stats in self.class_skill_averages(record) {
                if stats.count > 0 {
                    entry.2[stats.category.index()].push(stats.average);
                }
            }
        }

        schools
            .into_iter()
            .map(|(school_name, (class_count, student_count, buckets))| SchoolSummary {
                school_name,
                class_count,
                student_count,
                averages: SkillAverages::with_max(buckets.map(|b| mean(&b).unwrap_or(0.0)), self.max_score()),
            })
            .collect()
    }

    /// 全クラスのスコア分布（四捨五入したスコア 1〜5 の件数）
    pub fn score_distribution(&self, records: &[ClassRecord]) -> [usize; 5] {
        let mut total = [0usize; 5];
        for record in records {
            for stats in self.class_skill_averages(record) {
                for (sum, count) in total.iter_mut().zip(stats.distribution) {
                    *sum += count;
                }
            }
        }
        total
    }
}

/// スコアのあるカテゴリだけの平均（クラス一覧用）
pub fn scored_average(stats: &[SkillStats]) -> f64 {
    let scored: Vec<f64> = stats.iter().filter(|s| s.count > 0).map(|s| s.average).collect();
    mean(&scored).unwrap_or(0.0)
}

/// 集計済みスコア全体の平均（クラス見出し用）
pub fn class_overall_average(record: &ClassRecord) -> f64 {
    let scores: Vec<f64> = record
        .student_scores
        .values()
        .flat_map(|scores| scores.values().copied())
        .filter(|score| !score.is_nan())
        .collect();
    mean(&scores).unwrap_or(0.0)
}

/// 統計からチャート用の平均を取り出す
pub fn averages_of(stats: &[SkillStats], max_score: f64) -> SkillAverages {
    let mut values = [0.0; 6];
    for s in stats {
        values[s.category.index()] = s.average;
    }
    SkillAverages::with_max(values, max_score)
}

fn stats_from_buckets(buckets: &[Vec<f64>; 6], max_score: f64) -> Vec<SkillStats> {
    SkillCategory::ALL
        .iter()
        .map(|category| SkillStats::from_scores(*category, &buckets[category.index()], max_score))
        .collect()
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
