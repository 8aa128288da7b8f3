//! 出力のコア（PDFの文面・Excelワークブック）
//!
//! ファイルへの書き出しはバイナリ側で行う。

pub mod pdf_core;

#[cfg(feature = "excel")]
pub mod excel_core;
