//! Excel生成（CLI版）
//!
//! ワークブックの中身は共通ライブラリで作り、ここではファイルに書くだけ。

use crate::error::{ReportError, Result};
use skill_report_common::export::excel_core;
use skill_report_common::{ClassRecord, ExcelLayout, SkillScorer};
use std::path::Path;

/// クラスのワークブックを書き出す
pub fn generate_class_excel(record: &ClassRecord, scorer: &SkillScorer, output_path: &Path) -> Result<()> {
    let buffer = excel_core::generate_class_workbook(record, scorer, &ExcelLayout::default())
        .map_err(ReportError::ExcelGeneration)?;
    std::fs::write(output_path, buffer)?;
    tracing::info!("Excel出力: {}", output_path.display());
    Ok(())
}

/// 学校一覧のワークブックを書き出す
pub fn generate_school_excel(records: &[ClassRecord], scorer: &SkillScorer, output_path: &Path) -> Result<()> {
    if records.is_empty() {
        return Err(ReportError::InvalidInput("クラスが1件もありません".into()));
    }
    let buffer = excel_core::generate_school_workbook(records, scorer).map_err(ReportError::ExcelGeneration)?;
    std::fs::write(output_path, buffer)?;
    tracing::info!("Excel出力: {} ({}クラス)", output_path.display(), records.len());
    Ok(())
}
