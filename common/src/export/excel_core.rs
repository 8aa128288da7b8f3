//! Excel生成（共通ライブラリ）
//!
//! クラス別ワークブック（回答一覧・スキル集計・生徒集計）と
//! 学校一覧ワークブックをバッファに生成する。

use crate::aggregate::SkillScorer;
use crate::export::pdf_core::{format_timestamp, status_label};
use crate::layout::ExcelLayout;
use crate::types::{Answer, ClassRecord, SchoolInfo, ScoreLevel, SkillCategory};
use rust_xlsxwriter::*;
use std::collections::BTreeSet;

/// 集計表の先頭行（Ringkasanシート）
const SKILL_TABLE_FIRST_ROW: u32 = 13;

fn xlsx_err(context: &'static str) -> impl Fn(XlsxError) -> String {
    move |e| format!("{}: {}", context, e)
}

struct Formats {
    title: Format,
    header: Format,
    label: Format,
    score: Format,
}

impl Formats {
    fn new() -> Self {
        Self {
            title: Format::new().set_bold().set_font_size(14.0),
            header: Format::new()
                .set_bold()
                .set_font_color(Color::RGB(0xFFFFFF))
                .set_background_color(Color::RGB(0x3B82F6))
                .set_border(FormatBorder::Thin)
                .set_align(FormatAlign::Center),
            label: Format::new()
                .set_bold()
                .set_background_color(Color::RGB(0xF3F4F6)),
            score: Format::new().set_num_format("0.00"),
        }
    }
}

/// 値が空なら "N/A"
fn or_na(value: &str) -> &str {
    if value.trim().is_empty() {
        "N/A"
    } else {
        value
    }
}

/// 回答セルを書き込む（数値はそのまま、それ以外は表示文字列）
fn write_answer(sheet: &mut Worksheet, row: u32, col: u16, answer: &Answer) -> Result<(), String> {
    match answer {
        Answer::Numeric(n) if n.is_finite() => {
            sheet.write_number(row, col, *n).map_err(xlsx_err("回答書き込みエラー"))?;
        }
        other => {
            sheet
                .write_string(row, col, other.display_text())
                .map_err(xlsx_err("回答書き込みエラー"))?;
        }
    }
    Ok(())
}

/// クラス別ワークブックをバッファに生成
///
/// # Arguments
/// * `record` - クラスの評価ドキュメント
/// * `scorer` - 集計器
/// * `layout` - 列幅
pub fn generate_class_workbook(
    record: &ClassRecord,
    scorer: &SkillScorer,
    layout: &ExcelLayout,
) -> Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();
    let formats = Formats::new();

    let questions: Vec<&String> = record
        .answers
        .values()
        .flat_map(|answers| answers.keys())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    write_assessment_sheet(workbook.add_worksheet(), record, &questions, scorer, layout, &formats)?;
    write_summary_sheet(workbook.add_worksheet(), record, questions.len(), scorer, layout, &formats)?;
    write_student_sheet(workbook.add_worksheet(), record, scorer, layout, &formats)?;

    workbook.save_to_buffer().map_err(xlsx_err("Excel保存エラー"))
}

/// 回答一覧（質問 × 生徒）
fn write_assessment_sheet(
    sheet: &mut Worksheet,
    record: &ClassRecord,
    questions: &[&String],
    scorer: &SkillScorer,
    layout: &ExcelLayout,
    formats: &Formats,
) -> Result<(), String> {
    sheet.set_name("Data Assessment").map_err(xlsx_err("シート名設定エラー"))?;
    sheet
        .write_string_with_format(0, 0, "DATA ASSESSMENT SOFT SKILLS", &formats.title)
        .map_err(xlsx_err("見出し書き込みエラー"))?;

    let info = [
        ("Tanggal", format_timestamp(record.assessment_date.as_ref())),
        ("Sekolah", or_na(&record.school_display_name()).to_string()),
        ("Kelas", or_na(&record.class_level).to_string()),
        ("Program Keahlian", or_na(&record.program_keahlian).to_string()),
        ("Observer", or_na(&record.observer_name).to_string()),
    ];
    for (i, (label, value)) in info.iter().enumerate() {
        let row = 2 + i as u32;
        sheet
            .write_string_with_format(row, 0, *label, &formats.label)
            .map_err(xlsx_err("クラス情報書き込みエラー"))?;
        sheet.write_string(row, 1, value).map_err(xlsx_err("クラス情報書き込みエラー"))?;
    }

    let header_row = 8;
    sheet
        .write_string_with_format(header_row, 0, "Alur Pembelajaran", &formats.header)
        .map_err(xlsx_err("ヘッダー書き込みエラー"))?;
    sheet
        .write_string_with_format(header_row, 1, "Butir Observasi", &formats.header)
        .map_err(xlsx_err("ヘッダー書き込みエラー"))?;
    for (i, student) in record.answers.keys().enumerate() {
        sheet
            .write_string_with_format(header_row, 2 + i as u16, student, &formats.header)
            .map_err(xlsx_err("ヘッダー書き込みエラー"))?;
        sheet
            .set_column_width(2 + i as u16, layout.student_col_width)
            .map_err(xlsx_err("列幅設定エラー"))?;
    }
    sheet.set_column_width(0, layout.flow_col_width).map_err(xlsx_err("列幅設定エラー"))?;
    sheet.set_column_width(1, layout.item_col_width).map_err(xlsx_err("列幅設定エラー"))?;

    let delimiter = scorer.skill_normalizer().delimiter();
    for (q, question) in questions.iter().enumerate() {
        let row = header_row + 1 + q as u32;
        let mut parts = question.splitn(2, delimiter);
        let flow = parts.next().map(str::trim).filter(|s| !s.is_empty()).unwrap_or("Unknown");
        let item = parts.next().map(str::trim).unwrap_or(question.as_str());

        sheet.write_string(row, 0, flow).map_err(xlsx_err("質問書き込みエラー"))?;
        sheet.write_string(row, 1, item).map_err(xlsx_err("質問書き込みエラー"))?;

        for (s, answers) in record.answers.values().enumerate() {
            if let Some(answer) = answers.get(*question) {
                write_answer(sheet, row, 2 + s as u16, answer)?;
            }
        }
    }

    sheet.set_freeze_panes(header_row + 1, 2).map_err(xlsx_err("ウィンドウ枠固定エラー"))?;
    Ok(())
}

/// クラス情報とスキル集計（レーダーチャート付き）
fn write_summary_sheet(
    sheet: &mut Worksheet,
    record: &ClassRecord,
    question_count: usize,
    scorer: &SkillScorer,
    layout: &ExcelLayout,
    formats: &Formats,
) -> Result<(), String> {
    sheet.set_name("Ringkasan").map_err(xlsx_err("シート名設定エラー"))?;
    sheet
        .write_string_with_format(0, 0, "RINGKASAN ASSESSMENT", &formats.title)
        .map_err(xlsx_err("見出し書き込みエラー"))?;
    sheet
        .write_string_with_format(2, 0, "Informasi Kelas", &formats.label)
        .map_err(xlsx_err("見出し書き込みエラー"))?;

    let text_rows = [
        ("Nama Kelas", or_na(&record.class_level).to_string()),
        ("Sekolah", or_na(&record.school_display_name()).to_string()),
        ("Program Keahlian", or_na(&record.program_keahlian).to_string()),
        ("Observer", or_na(&record.observer_name).to_string()),
        ("Tanggal Assessment", format_timestamp(record.assessment_date.as_ref())),
    ];
    for (i, (label, value)) in text_rows.iter().enumerate() {
        let row = 3 + i as u32;
        sheet.write_string(row, 0, *label).map_err(xlsx_err("クラス情報書き込みエラー"))?;
        sheet.write_string(row, 1, value).map_err(xlsx_err("クラス情報書き込みエラー"))?;
    }
    sheet.write_string(8, 0, "Jumlah Siswa").map_err(xlsx_err("クラス情報書き込みエラー"))?;
    sheet
        .write_number(8, 1, record.answers.len() as f64)
        .map_err(xlsx_err("クラス情報書き込みエラー"))?;
    sheet.write_string(9, 0, "Jumlah Pertanyaan").map_err(xlsx_err("クラス情報書き込みエラー"))?;
    sheet
        .write_number(9, 1, question_count as f64)
        .map_err(xlsx_err("クラス情報書き込みエラー"))?;

    sheet
        .write_string_with_format(11, 0, "RINGKASAN SKILL", &formats.label)
        .map_err(xlsx_err("見出し書き込みエラー"))?;
    for (col, title) in ["Skill", "Rata-rata", "Level", "Jumlah Assessment"].iter().enumerate() {
        sheet
            .write_string_with_format(12, col as u16, *title, &formats.header)
            .map_err(xlsx_err("ヘッダー書き込みエラー"))?;
    }

    let stats = scorer.class_skill_averages(record);
    for (i, s) in stats.iter().enumerate() {
        let row = SKILL_TABLE_FIRST_ROW + i as u32;
        sheet.write_string(row, 0, s.category.label()).map_err(xlsx_err("集計書き込みエラー"))?;
        sheet
            .write_number_with_format(row, 1, s.average, &formats.score)
            .map_err(xlsx_err("集計書き込みエラー"))?;
        sheet.write_string(row, 2, s.level().label()).map_err(xlsx_err("集計書き込みエラー"))?;
        sheet.write_number(row, 3, s.count as f64).map_err(xlsx_err("集計書き込みエラー"))?;
    }
    sheet.set_column_width(0, layout.summary_label_width).map_err(xlsx_err("列幅設定エラー"))?;
    sheet.set_column_width(1, layout.summary_value_width).map_err(xlsx_err("列幅設定エラー"))?;

    let last_row = SKILL_TABLE_FIRST_ROW + SkillCategory::ALL.len() as u32 - 1;
    let mut chart = Chart::new(ChartType::Radar);
    chart
        .add_series()
        .set_name("Rata-rata")
        .set_categories(("Ringkasan", SKILL_TABLE_FIRST_ROW, 0, last_row, 0))
        .set_values(("Ringkasan", SKILL_TABLE_FIRST_ROW, 1, last_row, 1));
    chart.title().set_name("Spider Chart Keterampilan");
    chart.y_axis().set_min(0.0).set_max(scorer.max_score()).set_major_unit(1.0);
    chart.set_width(480).set_height(360);
    sheet.insert_chart(2, 5, &chart).map_err(xlsx_err("チャート挿入エラー"))?;

    Ok(())
}

/// 生徒ごとの総合平均
fn write_student_sheet(
    sheet: &mut Worksheet,
    record: &ClassRecord,
    scorer: &SkillScorer,
    layout: &ExcelLayout,
    formats: &Formats,
) -> Result<(), String> {
    sheet.set_name("Ringkasan Siswa").map_err(xlsx_err("シート名設定エラー"))?;
    sheet
        .write_string_with_format(0, 0, "RINGKASAN SISWA", &formats.title)
        .map_err(xlsx_err("見出し書き込みエラー"))?;
    for (col, title) in ["Nama Siswa", "Rata-rata Skor", "Level", "Jumlah Assessment"]
        .iter()
        .enumerate()
    {
        sheet
            .write_string_with_format(2, col as u16, *title, &formats.header)
            .map_err(xlsx_err("ヘッダー書き込みエラー"))?;
    }

    for (i, (name, answers)) in record.answers.iter().enumerate() {
        let summary = scorer.student_summary(name, answers);
        let row = 3 + i as u32;
        sheet.write_string(row, 0, name).map_err(xlsx_err("生徒書き込みエラー"))?;
        sheet
            .write_number_with_format(row, 1, summary.average, &formats.score)
            .map_err(xlsx_err("生徒書き込みエラー"))?;
        sheet.write_string(row, 2, summary.level.label()).map_err(xlsx_err("生徒書き込みエラー"))?;
        sheet.write_number(row, 3, summary.total as f64).map_err(xlsx_err("生徒書き込みエラー"))?;
    }
    sheet.set_column_width(0, layout.summary_label_width).map_err(xlsx_err("列幅設定エラー"))?;
    sheet.set_column_width(1, layout.summary_value_width).map_err(xlsx_err("列幅設定エラー"))?;
    Ok(())
}

/// 学校一覧ワークブックをバッファに生成
///
/// 1シート目は1クラス1行、2シート目は学校ごとの平均。
pub fn generate_school_workbook(records: &[ClassRecord], scorer: &SkillScorer) -> Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();
    let formats = Formats::new();

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Data Sekolah").map_err(xlsx_err("シート名設定エラー"))?;

        let fixed = ["ID", "Nama Sekolah", "Kelas", "Status", "Jumlah Siswa", "Observer", "Peran Observer", "Tanggal Dibuat"];
        let headers = fixed.iter().copied().chain(SkillCategory::ALL.iter().map(|c| c.label()));
        for (col, title) in headers.enumerate() {
            sheet
                .write_string_with_format(0, col as u16, title, &formats.header)
                .map_err(xlsx_err("ヘッダー書き込みエラー"))?;
        }

        for (i, record) in records.iter().enumerate() {
            let row = 1 + i as u32;
            let info = SchoolInfo::from_document_id(&record.id);
            let texts = [
                record.id.clone(),
                info.school_name,
                format!("{} {}", info.grade, info.program),
                status_label(&record.status).to_string(),
            ];
            for (col, text) in texts.iter().enumerate() {
                sheet.write_string(row, col as u16, text).map_err(xlsx_err("クラス書き込みエラー"))?;
            }
            sheet
                .write_number(row, 4, record.effective_student_count() as f64)
                .map_err(xlsx_err("クラス書き込みエラー"))?;
            sheet.write_string(row, 5, or_na(&record.observer_name)).map_err(xlsx_err("クラス書き込みエラー"))?;
            sheet.write_string(row, 6, or_na(&record.observer_role)).map_err(xlsx_err("クラス書き込みエラー"))?;
            sheet
                .write_string(row, 7, format_timestamp(record.created_at.as_ref()))
                .map_err(xlsx_err("クラス書き込みエラー"))?;

            for (k, stats) in scorer.class_skill_averages(record).iter().enumerate() {
                sheet
                    .write_number_with_format(row, 8 + k as u16, stats.average, &formats.score)
                    .map_err(xlsx_err("クラス書き込みエラー"))?;
            }
        }
        sheet.set_column_width(0, 30).map_err(xlsx_err("列幅設定エラー"))?;
        sheet.set_column_width(1, 25).map_err(xlsx_err("列幅設定エラー"))?;
    }

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Rata-rata Sekolah").map_err(xlsx_err("シート名設定エラー"))?;

        let fixed = ["Nama Sekolah", "Jumlah Kelas", "Jumlah Siswa"];
        let headers = fixed
            .iter()
            .copied()
            .chain(SkillCategory::ALL.iter().map(|c| c.label()))
            .chain(["Rata-rata", "Level"]);
        for (col, title) in headers.enumerate() {
            sheet
                .write_string_with_format(0, col as u16, title, &formats.header)
                .map_err(xlsx_err("ヘッダー書き込みエラー"))?;
        }

        for (i, school) in scorer.school_skill_averages(records).iter().enumerate() {
            let row = 1 + i as u32;
            sheet.write_string(row, 0, &school.school_name).map_err(xlsx_err("学校書き込みエラー"))?;
            sheet.write_number(row, 1, school.class_count as f64).map_err(xlsx_err("学校書き込みエラー"))?;
            sheet.write_number(row, 2, school.student_count as f64).map_err(xlsx_err("学校書き込みエラー"))?;
            for (k, (_, value)) in school.averages.iter().enumerate() {
                sheet
                    .write_number_with_format(row, 3 + k as u16, value, &formats.score)
                    .map_err(xlsx_err("学校書き込みエラー"))?;
            }
            let overall = school.averages.overall();
            sheet
                .write_number_with_format(row, 9, overall, &formats.score)
                .map_err(xlsx_err("学校書き込みエラー"))?;
            sheet
                .write_string(row, 10, ScoreLevel::from_average(overall).label())
                .map_err(xlsx_err("学校書き込みエラー"))?;
        }
        sheet.set_column_width(0, 25).map_err(xlsx_err("列幅設定エラー"))?;
    }

    workbook.save_to_buffer().map_err(xlsx_err("Excel保存エラー"))
}
