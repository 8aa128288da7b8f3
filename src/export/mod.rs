pub mod pdf;
pub mod excel;

use crate::cli::ExportFormat;
use crate::error::{ReportError, Result};
use chrono::NaiveDate;
use pdf::PdfOptions;
use skill_report_common::export::pdf_core::{excel_file_name, pdf_file_name};
use skill_report_common::{ClassRecord, SkillScorer};
use std::path::{Path, PathBuf};

/// 入力JSONを読み込む（1クラスのオブジェクトまたは配列）
pub fn load_records(path: &Path) -> Result<Vec<ClassRecord>> {
    if !path.exists() {
        return Err(ReportError::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    parse_records(&content)
}

pub fn parse_records(content: &str) -> Result<Vec<ClassRecord>> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    let records = match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<ClassRecord>, _>>()?,
        serde_json::Value::Object(_) => vec![serde_json::from_value(value)?],
        _ => {
            return Err(ReportError::InvalidInput(
                "クラスのオブジェクトまたは配列を指定してください".into(),
            ))
        }
    };
    tracing::debug!("{}クラスを読み込み", records.len());
    Ok(records)
}

/// 1クラス分のPDF/Excelを出力ディレクトリに書き出す
///
/// # Returns
/// 書き出したファイルのパス
pub fn export_class(
    record: &ClassRecord,
    scorer: &SkillScorer,
    format: ExportFormat,
    output_dir: &Path,
    pdf_options: &PdfOptions,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)?;
    let date = pdf_options.generated;
    let mut written = Vec::new();

    if format.includes_pdf() {
        let path = output_dir.join(pdf_file_name(record, date));
        pdf::generate_class_pdf(record, scorer, pdf_options, &path)?;
        written.push(path);
    }

    if format.includes_excel() {
        let path = output_dir.join(excel_file_name(record, date));
        excel::generate_class_excel(record, scorer, &path)?;
        written.push(path);
    }

    Ok(written)
}

/// 学校一覧ワークブックのデフォルトファイル名
pub fn school_file_name(date: NaiveDate) -> String {
    format!("Data_Sekolah_{}.xlsx", date.format("%Y-%m-%d"))
}

/// 学校一覧PDFのデフォルトファイル名
pub fn school_pdf_file_name(date: NaiveDate) -> String {
    format!("Laporan_Sekolah_{}.pdf", date.format("%Y-%m-%d"))
}

/// 学校一覧のPDF/Excelを出力ディレクトリに書き出す
///
/// # Returns
/// 書き出したファイルのパス
pub fn export_schools(
    records: &[ClassRecord],
    scorer: &SkillScorer,
    format: ExportFormat,
    output_dir: &Path,
    pdf_options: &PdfOptions,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)?;
    let date = pdf_options.generated;
    let mut written = Vec::new();

    if format.includes_pdf() {
        let path = output_dir.join(school_pdf_file_name(date));
        pdf::generate_school_pdf(records, scorer, pdf_options, &path)?;
        written.push(path);
    }

    if format.includes_excel() {
        let path = output_dir.join(school_file_name(date));
        excel::generate_school_excel(records, scorer, &path)?;
        written.push(path);
    }

    Ok(written)
}
