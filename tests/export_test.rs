//! PDF/Excel出力の統合テスト

use calamine::{open_workbook, Data, Reader, Xlsx};
use chrono::NaiveDate;
use skill_report::cli::ExportFormat;
use skill_report::export::{self, excel, pdf};
use skill_report_common::{ClassRecord, SkillScorer};
use tempfile::tempdir;

const CLASS_JSON: &str = r#"{
    "id": "smk_negeri_1_xii_tkj",
    "classLevel": "XII",
    "programKeahlian": "TKJ",
    "observerName": "Bu Sari",
    "observerRole": "Guru BK",
    "status": "active",
    "createdAt": {"seconds": 1760745600},
    "answers": {
        "Ani": {"q1|Kerja Sama": "Sangat Baik", "q2|Komunikasi": 2},
        "Budi": {"q1|Kerja Sama": "Cukup", "q2|Komunikasi": "Kurang"}
    },
    "aiSuggestions": ["Latih presentasi singkat setiap minggu", ""]
}"#;

fn class_record() -> ClassRecord {
    export::parse_records(CLASS_JSON).expect("fixture").remove(0)
}

fn report_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

fn pdf_options() -> pdf::PdfOptions {
    pdf::PdfOptions::new("Laporan Assessment Kelas", 12, report_date())
}

fn number(value: Option<&Data>) -> f64 {
    match value {
        Some(Data::Float(v)) => *v,
        Some(Data::Int(v)) => *v as f64,
        other => panic!("数値ではありません: {:?}", other),
    }
}

fn text(value: Option<&Data>) -> String {
    match value {
        Some(Data::String(s)) => s.clone(),
        other => panic!("文字列ではありません: {:?}", other),
    }
}

#[test]
fn test_pdf_generation() {
    let dir = tempdir().expect("Failed to create temp dir");
    let output_path = dir.path().join("kelas.pdf");

    let result = pdf::generate_class_pdf(&class_record(), &SkillScorer::default(), &pdf_options(), &output_path);

    assert!(result.is_ok(), "PDF生成に失敗: {:?}", result.err());
    let bytes = std::fs::read(&output_path).expect("PDF読み込み失敗");
    assert!(bytes.starts_with(b"%PDF"), "PDFヘッダーがない");
}

#[test]
fn test_pdf_generation_without_students() {
    let record = ClassRecord {
        class_level: "X".into(),
        ..ClassRecord::default()
    };
    let result = pdf::generate_class_pdf_bytes(&record, &SkillScorer::default(), &pdf_options());
    assert!(result.is_ok(), "空のPDF生成に失敗: {:?}", result.err());
}

#[test]
fn test_class_workbook_contents() {
    let dir = tempdir().expect("Failed to create temp dir");
    let output_path = dir.path().join("kelas.xlsx");

    excel::generate_class_excel(&class_record(), &SkillScorer::default(), &output_path).expect("Excel生成に失敗");

    let mut workbook: Xlsx<_> = open_workbook(&output_path).expect("Excelを開けない");
    assert_eq!(workbook.sheet_names(), vec!["Data Assessment", "Ringkasan", "Ringkasan Siswa"]);

    let data = workbook.worksheet_range("Data Assessment").unwrap();
    assert_eq!(text(data.get_value((8, 2))), "Ani");
    assert_eq!(text(data.get_value((8, 3))), "Budi");
    assert_eq!(text(data.get_value((9, 0))), "q1");
    assert_eq!(text(data.get_value((9, 1))), "Kerja Sama");

    let summary = workbook.worksheet_range("Ringkasan").unwrap();
    assert_eq!(number(summary.get_value((8, 1))), 2.0);
    assert_eq!(number(summary.get_value((9, 1))), 2.0);
    assert_eq!(text(summary.get_value((13, 0))), "Kerja Sama");
    assert!((number(summary.get_value((13, 1))) - 3.0).abs() < 1e-9);
    assert_eq!(text(summary.get_value((15, 0))), "Komunikasi");
    assert!((number(summary.get_value((15, 1))) - 1.5).abs() < 1e-9);

    let students = workbook.worksheet_range("Ringkasan Siswa").unwrap();
    assert_eq!(text(students.get_value((3, 0))), "Ani");
    assert!((number(students.get_value((3, 1))) - 3.0).abs() < 1e-9);
    assert_eq!(text(students.get_value((4, 0))), "Budi");
    assert!((number(students.get_value((4, 1))) - 1.5).abs() < 1e-9);
}

#[test]
fn test_school_workbook_contents() {
    let dir = tempdir().expect("Failed to create temp dir");
    let output_path = dir.path().join("sekolah.xlsx");

    let mut other = class_record();
    other.id = "sma_2_x_ipa".into();
    let records = vec![class_record(), other];

    excel::generate_school_excel(&records, &SkillScorer::default(), &output_path).expect("Excel生成に失敗");

    let mut workbook: Xlsx<_> = open_workbook(&output_path).expect("Excelを開けない");
    assert_eq!(workbook.sheet_names(), vec!["Data Sekolah", "Rata-rata Sekolah"]);

    let data = workbook.worksheet_range("Data Sekolah").unwrap();
    assert_eq!(text(data.get_value((0, 8))), "Kerja Sama");
    assert_eq!(text(data.get_value((1, 1))), "Smk Negeri 1");
    assert_eq!(text(data.get_value((1, 3))), "Active");
    assert!((number(data.get_value((1, 8))) - 3.0).abs() < 1e-9);

    let schools = workbook.worksheet_range("Rata-rata Sekolah").unwrap();
    assert_eq!(text(schools.get_value((0, 9))), "Rata-rata");
    assert!(schools.get_value((2, 0)).is_some(), "学校が2件ない");
}

#[test]
fn test_school_workbook_requires_records() {
    let dir = tempdir().expect("Failed to create temp dir");
    let result = excel::generate_school_excel(&[], &SkillScorer::default(), &dir.path().join("x.xlsx"));
    assert!(result.is_err());
}

#[test]
fn test_school_pdf_generation() {
    let dir = tempdir().expect("Failed to create temp dir");
    let output_path = dir.path().join("sekolah.pdf");

    let mut other = class_record();
    other.id = "sma_2_x_ipa".into();
    other.status = "pending".into();
    let records = vec![class_record(), other];

    let result = pdf::generate_school_pdf(&records, &SkillScorer::default(), &pdf_options(), &output_path);

    assert!(result.is_ok(), "学校一覧PDF生成に失敗: {:?}", result.err());
    let bytes = std::fs::read(&output_path).expect("PDF読み込み失敗");
    assert!(bytes.starts_with(b"%PDF"), "PDFヘッダーがない");
}

#[test]
fn test_school_pdf_requires_records() {
    let result = pdf::generate_school_pdf_bytes(&[], &SkillScorer::default(), &pdf_options());
    assert!(result.is_err());
}

#[test]
fn test_export_schools_formats() {
    let dir = tempdir().expect("Failed to create temp dir");
    let records = vec![class_record()];

    let written = export::export_schools(&records, &SkillScorer::default(), ExportFormat::Both, dir.path(), &pdf_options())
        .expect("出力に失敗");
    let names: Vec<String> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(
        names,
        vec![
            "Laporan_Sekolah_2026-10-18.pdf".to_string(),
            "Data_Sekolah_2026-10-18.xlsx".to_string(),
        ]
    );
    assert!(written.iter().all(|p| p.exists()));

    let pdf_only = export::export_schools(&records, &SkillScorer::default(), ExportFormat::Pdf, &dir.path().join("pdf"), &pdf_options())
        .unwrap();
    assert_eq!(pdf_only.len(), 1);
    assert_eq!(pdf_only[0].extension().unwrap(), "pdf");
}

#[test]
fn test_export_class_both_formats() {
    let dir = tempdir().expect("Failed to create temp dir");
    let output_dir = dir.path().join("out");

    let written = export::export_class(
        &class_record(),
        &SkillScorer::default(),
        ExportFormat::Both,
        &output_dir,
        &pdf_options(),
    )
    .expect("出力に失敗");

    let names: Vec<String> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(
        names,
        vec![
            "Assessment_XII_TKJ_2026-10-18.pdf".to_string(),
            "Data_Assessment_XII_Smk_Negeri_1_2026-10-18.xlsx".to_string(),
        ]
    );
    assert!(written.iter().all(|p| p.exists()));
}

#[test]
fn test_export_class_pdf_only() {
    let dir = tempdir().expect("Failed to create temp dir");
    let written = export::export_class(
        &class_record(),
        &SkillScorer::default(),
        ExportFormat::Pdf,
        dir.path(),
        &pdf_options(),
    )
    .unwrap();
    assert_eq!(written.len(), 1);
    assert_eq!(written[0].extension().unwrap(), "pdf");
}
