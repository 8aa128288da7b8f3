//! skill-report
//!
//! 評価JSONを読み込み、クラスのPDF/Excelレポートと学校一覧を生成する。
//! 集計とチャートは `skill-report-common` 側にある。

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
