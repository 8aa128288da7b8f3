use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "skill-report")]
#[command(about = "ソフトスキル評価データの集計・レポート生成ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// クラス評価JSONからPDF/Excelレポートを生成
    Report {
        /// 入力JSONファイル（1クラスまたは配列）
        #[arg(required = true)]
        input: PathBuf,

        /// 出力形式 (pdf/excel/both)
        #[arg(short, long, default_value = "both")]
        format: ExportFormat,

        /// 出力ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// エイリアスプリセット (standard/indonesia/english)
        #[arg(long)]
        preset: Option<String>,

        /// カスタムエイリアスファイル（JSON）
        #[arg(long)]
        alias: Option<PathBuf>,
    },

    /// クラス・生徒ごとのスキル平均を表示
    Summary {
        /// 入力JSONファイル
        #[arg(required = true)]
        input: PathBuf,

        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 学校一覧のPDF/Excelを生成
    Schools {
        /// 入力JSONファイル（クラスの配列）
        #[arg(required = true)]
        input: PathBuf,

        /// 出力形式 (pdf/excel/both)
        #[arg(short, long, default_value = "both")]
        format: ExportFormat,

        /// 出力ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// エイリアスファイルを設定
        #[arg(long)]
        set_alias_file: Option<PathBuf>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Excel,
    #[default]
    Both,
}

impl ExportFormat {
    pub fn includes_pdf(&self) -> bool {
        matches!(self, ExportFormat::Pdf | ExportFormat::Both)
    }

    pub fn includes_excel(&self) -> bool {
        matches!(self, ExportFormat::Excel | ExportFormat::Both)
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "both" => Ok(ExportFormat::Both),
            _ => Err(format!("Unknown format: {}. Use pdf, excel, or both", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_format_parse() {
        assert_eq!("PDF".parse::<ExportFormat>(), Ok(ExportFormat::Pdf));
        assert_eq!("xlsx".parse::<ExportFormat>(), Ok(ExportFormat::Excel));
        assert_eq!("both".parse::<ExportFormat>(), Ok(ExportFormat::Both));
        assert!("csv".parse::<ExportFormat>().is_err());
        assert!(ExportFormat::Both.includes_pdf() && ExportFormat::Both.includes_excel());
        assert!(!ExportFormat::Pdf.includes_excel());
    }

    #[test]
    fn test_parse_report_command() {
        let cli = Cli::try_parse_from([
            "skill-report", "report", "kelas.json", "-f", "pdf", "-o", "out", "--preset", "english", "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Report { input, format, output, preset, alias } => {
                assert_eq!(input, PathBuf::from("kelas.json"));
                assert_eq!(format, ExportFormat::Pdf);
                assert_eq!(output, Some(PathBuf::from("out")));
                assert_eq!(preset.as_deref(), Some("english"));
                assert!(alias.is_none());
            }
            _ => panic!("report expected"),
        }
    }

    #[test]
    fn test_parse_schools_command() {
        let cli = Cli::try_parse_from(["skill-report", "schools", "semua.json", "-f", "pdf"]).unwrap();
        match cli.command {
            Commands::Schools { input, format, output } => {
                assert_eq!(input, PathBuf::from("semua.json"));
                assert_eq!(format, ExportFormat::Pdf);
                assert!(output.is_none());
            }
            _ => panic!("schools expected"),
        }

        let cli = Cli::try_parse_from(["skill-report", "schools", "semua.json"]).unwrap();
        assert!(matches!(cli.command, Commands::Schools { format: ExportFormat::Both, .. }));
    }

    #[test]
    fn test_parse_summary_json() {
        let cli = Cli::try_parse_from(["skill-report", "summary", "data.json", "--json"]).unwrap();
        assert!(matches!(cli.command, Commands::Summary { json: true, .. }));
    }
}
