use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("入力データが不正: {0}")]
    InvalidInput(String),

    #[error("PDF生成エラー: {0}")]
    PdfGeneration(String),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("JSON解析エラー: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

impl From<skill_report_common::Error> for ReportError {
    fn from(e: skill_report_common::Error) -> Self {
        match e {
            skill_report_common::Error::Io(e) => ReportError::Io(e),
            skill_report_common::Error::Json(e) => ReportError::Json(e),
            other => ReportError::Config(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
