//! PDFレポートの文面（レイアウト非依存）
//!
//! 描画側はここで組み立てた行をそのまま並べる。

use crate::aggregate::{SchoolSummary, SkillStats, StudentSummary};
use crate::layout::approx_text_width_mm;
use crate::types::{ClassRecord, Timestamp};
use chrono::{DateTime, Datelike, NaiveDate};
use std::collections::BTreeMap;

/// インドネシア語の月名
const MONTHS_ID: [&str; 12] = [
    "Januari", "Februari", "Maret", "April", "Mei", "Juni",
    "Juli", "Agustus", "September", "Oktober", "November", "Desember",
];

/// 1行分のテキスト
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub font_size: f32,
    pub bold: bool,
}

impl TextLine {
    pub fn new(text: impl Into<String>, font_size: f32) -> Self {
        Self {
            text: text.into(),
            font_size,
            bold: false,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// 最大幅に収まるよう単語単位で折り返す
///
/// 1単語で幅を超える場合はそのまま1行にする。
pub fn wrap_text(text: &str, max_width_mm: f32, font_size: f32) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };
            if !current.is_empty() && approx_text_width_mm(&candidate, font_size) > max_width_mm {
                lines.push(std::mem::take(&mut current));
                current = word.to_string();
            } else {
                current = candidate;
            }
        }
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// 日付（例: 18 Oktober 2026）
pub fn format_date_long(date: NaiveDate) -> String {
    format!("{} {} {}", date.day(), MONTHS_ID[date.month0() as usize], date.year())
}

/// 日付（例: 18/10/2026）
pub fn format_date_short(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.day(), date.month(), date.year())
}

/// タイムスタンプの表示（未設定は "N/A"）
///
/// {seconds} 形式は月名表記、それ以外は数字表記。
/// 解釈できない文字列はそのまま返す。
pub fn format_timestamp(timestamp: Option<&Timestamp>) -> String {
    match timestamp {
        None => "N/A".to_string(),
        Some(Timestamp::Seconds { seconds }) => DateTime::from_timestamp(*seconds, 0)
            .map(|dt| format_date_long(dt.date_naive()))
            .unwrap_or_else(|| "N/A".to_string()),
        Some(Timestamp::Millis(millis)) => DateTime::from_timestamp_millis(*millis)
            .map(|dt| format_date_short(dt.date_naive()))
            .unwrap_or_else(|| "N/A".to_string()),
        Some(Timestamp::Text(text)) => parse_date_text(text)
            .map(format_date_short)
            .unwrap_or_else(|| text.clone()),
    }
}

fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.date_naive())
        .ok()
        .or_else(|| NaiveDate::parse_from_str(text, "%Y-%m-%d").ok())
        .or_else(|| text.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()))
}

/// クラス情報欄
pub fn class_info_lines(record: &ClassRecord) -> Vec<TextLine> {
    vec![
        TextLine::new(
            format!("Kelas: {} - {}", record.class_level, record.program_keahlian),
            14.0,
        )
        .bold(),
        TextLine::new(format!("Sekolah: {}", record.school_display_name()), 12.0),
        TextLine::new(
            format!("Observer: {} ({})", record.observer_name, record.observer_role),
            12.0,
        ),
        TextLine::new(format!("Jumlah Siswa: {}", record.effective_student_count()), 12.0),
        TextLine::new(
            format!("Tanggal Dibuat: {}", format_timestamp(record.created_at.as_ref())),
            12.0,
        ),
    ]
}

/// スキルごとの平均行（例: "Kerja Sama: 3.25 (Baik)"）
pub fn skill_summary_lines(stats: &[SkillStats]) -> Vec<String> {
    stats
        .iter()
        .map(|s| format!("{}: {:.2} ({})", s.category, s.average, s.level()))
        .collect()
}

/// 生徒情報欄
pub fn student_info_lines(summary: &StudentSummary) -> Vec<String> {
    vec![
        format!("Rata-rata Skor: {:.2} ({})", summary.average, summary.level),
        format!("Jumlah Assessment: {}", summary.total),
    ]
}

/// 生徒ページの見出し
pub fn student_heading(name: &str) -> String {
    format!("SISWA: {}", name.to_uppercase())
}

/// AI提案の番号付きリスト（空の提案は除く）
pub fn suggestion_lines(suggestions: &[String]) -> Vec<String> {
    suggestions
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .enumerate()
        .map(|(i, s)| format!("{}. {}", i + 1, s))
        .collect()
}

/// ステータス表示
pub fn status_label(status: &str) -> &'static str {
    match status.trim().to_lowercase().as_str() {
        "active" => "Active",
        "inactive" => "Inactive",
        "pending" => "Pending",
        "completed" => "Completed",
        _ => "Unknown",
    }
}

/// ステータスごとのクラス数（表示名順）
pub fn status_breakdown(records: &[ClassRecord]) -> Vec<(&'static str, usize)> {
    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    for record in records {
        *counts.entry(status_label(&record.status)).or_default() += 1;
    }
    counts.into_iter().collect()
}

/// 学校一覧PDFの集計欄
pub fn school_overview_lines(records: &[ClassRecord], schools: &[SchoolSummary]) -> Vec<TextLine> {
    let students: usize = records.iter().map(|r| r.effective_student_count()).sum();
    let per_class = if records.is_empty() {
        0.0
    } else {
        students as f64 / records.len() as f64
    };
    vec![
        TextLine::new(format!("Total Sekolah: {}", schools.len()), 12.0),
        TextLine::new(format!("Total Kelas: {}", records.len()), 12.0),
        TextLine::new(format!("Total Siswa: {}", students), 12.0),
        TextLine::new(format!("Rata-rata Siswa per Kelas: {:.1}", per_class), 12.0),
    ]
}

/// クラスの見出し（例: "1. Smk Negeri 1 - XII TKJ"）
pub fn class_heading(number: usize, record: &ClassRecord) -> String {
    format!(
        "{}. {} - {} {}",
        number,
        record.school_display_name(),
        record.class_level,
        record.program_keahlian
    )
    .trim_end()
    .to_string()
}

/// クラス見出しの下の補足行
pub fn class_detail_line(record: &ClassRecord) -> String {
    let observer = record.observer_name.trim();
    format!(
        "Status: {} | Observer: {} | Siswa: {} | Tanggal: {}",
        status_label(&record.status),
        if observer.is_empty() { "N/A" } else { observer },
        record.effective_student_count(),
        format_timestamp(record.created_at.as_ref())
    )
}

pub const SKILL_STATS_HEADERS: [&str; 6] = ["Skill", "Rata-rata", "Min", "Maks", "Jumlah", "Level"];

/// スキル統計表の1行
pub fn skill_stats_cells(stats: &SkillStats) -> Vec<String> {
    vec![
        stats.category.label().to_string(),
        format!("{:.2}", stats.average),
        format!("{:.1}", stats.min),
        format!("{:.1}", stats.max),
        stats.count.to_string(),
        stats.level().to_string(),
    ]
}

pub const CLASS_TABLE_HEADERS: [&str; 6] = ["No", "Sekolah", "Kelas", "Status", "Siswa", "Rata-rata"];

/// クラス一覧表の1行
pub fn class_row_cells(number: usize, record: &ClassRecord, average: f64) -> Vec<String> {
    vec![
        number.to_string(),
        record.school_display_name(),
        format!("{} {}", record.class_level, record.program_keahlian).trim().to_string(),
        status_label(&record.status).to_string(),
        record.effective_student_count().to_string(),
        format!("{:.2}", average),
    ]
}

/// フッター（ページ番号, 作成日）
pub fn footer_texts(page: usize, total: usize, generated: NaiveDate) -> (String, String) {
    (
        format!("Halaman {} dari {}", page, total),
        format!("Dibuat pada: {}", format_date_short(generated)),
    )
}

/// ファイル名に使えない文字を置換
pub fn sanitize_file_component(text: &str) -> String {
    let cleaned: String = text
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c if c.is_whitespace() => '_',
            c => c,
        })
        .collect();
    if cleaned.is_empty() {
        "NA".to_string()
    } else {
        cleaned
    }
}

/// PDFのファイル名（Assessment_<クラス>_<専攻>_<日付>.pdf）
pub fn pdf_file_name(record: &ClassRecord, date: NaiveDate) -> String {
    format!(
        "Assessment_{}_{}_{}.pdf",
        sanitize_file_component(&record.class_level),
        sanitize_file_component(&record.program_keahlian),
        date.format("%Y-%m-%d")
    )
}

/// Excelのファイル名（Data_Assessment_<クラス>_<学校>_<日付>.xlsx）
pub fn excel_file_name(record: &ClassRecord, date: NaiveDate) -> String {
    format!(
        "Data_Assessment_{}_{}_{}.xlsx",
        sanitize_file_component(&record.class_level),
        sanitize_file_component(&record.school_display_name()),
        date.format("%Y-%m-%d")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ScoreLevel, SkillAverages, SkillCategory};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn test_wrap_text() {
        let text = "Siswa menunjukkan kemampuan kerja sama yang sangat baik dalam kelompok";
        let lines = wrap_text(text, 60.0, 12.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(approx_text_width_mm(line, 12.0) <= 60.0 || !line.contains(' '));
        }
        assert_eq!(lines.join(" "), text);

        assert_eq!(wrap_text("", 60.0, 12.0), vec![String::new()]);
        assert_eq!(wrap_text("a\nb", 60.0, 12.0), vec!["a", "b"]);
    }

    #[test]
    fn test_format_dates() {
        assert_eq!(format_date_long(date()), "18 Oktober 2026");
        assert_eq!(format_date_short(date()), "18/10/2026");
        // 2023-11-14T22:13:20Z
        let ts = Timestamp::Seconds { seconds: 1_700_000_000 };
        assert_eq!(format_timestamp(Some(&ts)), "14 November 2023");
        assert_eq!(format_timestamp(Some(&Timestamp::Millis(1_700_000_000_000))), "14/11/2023");
        assert_eq!(format_timestamp(Some(&Timestamp::Text("2026-01-05".into()))), "5/1/2026");
        assert_eq!(
            format_timestamp(Some(&Timestamp::Text("2026-01-05T08:00:00+07:00".into()))),
            "5/1/2026"
        );
        assert_eq!(format_timestamp(Some(&Timestamp::Text("kemarin".into()))), "kemarin");
        assert_eq!(format_timestamp(None), "N/A");
    }

    #[test]
    fn test_class_info_lines() {
        let record: ClassRecord = serde_json::from_value(serde_json::json!({
            "id": "smk_negeri_1_xii_tkj",
            "classLevel": "XII",
            "programKeahlian": "TKJ",
            "observerName": "Bu Sari",
            "observerRole": "Guru BK",
            "studentCount": 32
        }))
        .unwrap();

        let lines = class_info_lines(&record);
        assert_eq!(lines[0].text, "Kelas: XII - TKJ");
        assert!(lines[0].bold);
        assert_eq!(lines[1].text, "Sekolah: Smk Negeri 1");
        assert_eq!(lines[2].text, "Observer: Bu Sari (Guru BK)");
        assert_eq!(lines[3].text, "Jumlah Siswa: 32");
        assert_eq!(lines[4].text, "Tanggal Dibuat: N/A");
    }

    #[test]
    fn test_student_lines() {
        let summary = StudentSummary {
            name: "budi santoso".into(),
            average: 3.456,
            level: ScoreLevel::Baik,
            answered: 9,
            total: 10,
            skills: SkillAverages::default(),
        };
        assert_eq!(student_heading(&summary.name), "SISWA: BUDI SANTOSO");
        assert_eq!(
            student_info_lines(&summary),
            vec!["Rata-rata Skor: 3.46 (Baik)", "Jumlah Assessment: 10"]
        );
    }

    #[test]
    fn test_skill_summary_lines() {
        let stats = vec![SkillStats {
            category: SkillCategory::Komunikasi,
            average: 2.5,
            count: 2,
            min: 2.0,
            max: 3.0,
            distribution: [0, 1, 1, 0, 0],
        }];
        assert_eq!(skill_summary_lines(&stats), vec!["Komunikasi: 2.50 (Cukup)"]);
    }

    #[test]
    fn test_suggestions_and_footer() {
        let suggestions = vec!["Perbanyak diskusi".to_string(), " ".to_string(), "Latihan presentasi".to_string()];
        assert_eq!(
            suggestion_lines(&suggestions),
            vec!["1. Perbanyak diskusi", "2. Latihan presentasi"]
        );
        let (page, generated) = footer_texts(2, 5, date());
        assert_eq!(page, "Halaman 2 dari 5");
        assert_eq!(generated, "Dibuat pada: 18/10/2026");
    }

    #[test]
    fn test_status_label() {
        assert_eq!(status_label("active"), "Active");
        assert_eq!(status_label(" Completed "), "Completed");
        assert_eq!(status_label(""), "Unknown");
    }

    #[test]
    fn test_school_overview() {
        let records: Vec<ClassRecord> = serde_json::from_value(serde_json::json!([
            {"id": "smk_negeri_1_xii_tkj", "classLevel": "XII", "programKeahlian": "TKJ",
             "status": "active", "studentCount": 30, "observerName": "Bu Sari"},
            {"id": "smk_negeri_1_xi_tkj", "status": "Active", "studentCount": 20},
            {"id": "sma_2_x_ipa", "status": "pending", "studentCount": 25}
        ]))
        .unwrap();
        let schools = vec![
            SchoolSummary {
                school_name: "Sma 2".into(),
                class_count: 1,
                student_count: 25,
                averages: SkillAverages::default(),
            },
            SchoolSummary {
                school_name: "Smk Negeri 1".into(),
                class_count: 2,
                student_count: 50,
                averages: SkillAverages::default(),
            },
        ];

        let lines: Vec<String> = school_overview_lines(&records, &schools).into_iter().map(|l| l.text).collect();
        assert_eq!(
            lines,
            vec!["Total Sekolah: 2", "Total Kelas: 3", "Total Siswa: 75", "Rata-rata Siswa per Kelas: 25.0"]
        );
        assert_eq!(status_breakdown(&records), vec![("Active", 2), ("Pending", 1)]);

        assert_eq!(class_heading(1, &records[0]), "1. Smk Negeri 1 - XII TKJ");
        assert_eq!(
            class_detail_line(&records[0]),
            "Status: Active | Observer: Bu Sari | Siswa: 30 | Tanggal: N/A"
        );
        assert_eq!(
            class_row_cells(3, &records[2], 2.5),
            vec!["3", "Sma 2", "", "Pending", "25", "2.50"]
        );
        assert_eq!(school_overview_lines(&[], &[])[3].text, "Rata-rata Siswa per Kelas: 0.0");
    }

    #[test]
    fn test_skill_stats_cells() {
        let stats = SkillStats {
            category: SkillCategory::KerjaSama,
            average: 3.256,
            count: 4,
            min: 2.0,
            max: 4.0,
            distribution: [0, 1, 1, 2, 0],
        };
        assert_eq!(skill_stats_cells(&stats), vec!["Kerja Sama", "3.26", "2.0", "4.0", "4", "Baik"]);
        assert_eq!(skill_stats_cells(&stats).len(), SKILL_STATS_HEADERS.len());
    }

    #[test]
    fn test_file_names() {
        let record = ClassRecord {
            school_name: "SMK Negeri 1".into(),
            class_level: "XII".into(),
            program_keahlian: "TKJ/RPL".into(),
            ..Default::default()
        };
        assert_eq!(pdf_file_name(&record, date()), "Assessment_XII_TKJ-RPL_2026-10-18.pdf");
        assert_eq!(
            excel_file_name(&record, date()),
            "Data_Assessment_XII_SMK_Negeri_1_2026-10-18.xlsx"
        );
        assert_eq!(sanitize_file_component("  "), "NA");
    }
}
