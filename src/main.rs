use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use skill_report::export::pdf::PdfOptions;
use skill_report::{cli, config, export, logging};
use skill_report_common::aggregate::class_overall_average;
use skill_report_common::export::pdf_core::format_timestamp;
use cli::{Cli, Commands};
use config::Config;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose)?;
    let config = Config::load()?;

    match cli.command {
        Commands::Report { input, format, output, preset, alias } => {
            println!("📊 skill-report - レポート生成\n");

            println!("[1/3] 評価データを読み込み中...");
            let records = export::load_records(&input)?;
            println!("✔ {}クラスを読み込み\n", records.len());

            println!("[2/3] エイリアス設定を準備中...");
            let scorer = config.build_scorer(preset.as_deref(), alias.as_deref())?;
            println!("✔ 区切り文字: \"{}\"\n", scorer.skill_normalizer().delimiter());

            println!("[3/3] レポートを生成中...");
            let output_dir = output.unwrap_or_else(|| std::path::PathBuf::from("."));
            let options = PdfOptions::new(
                config.report_title.clone(),
                config.label_max_chars,
                chrono::Local::now().date_naive(),
            );

            let progress = ProgressBar::new(records.len() as u64);
            progress.set_style(
                ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );

            let mut written = Vec::new();
            for record in &records {
                progress.set_message(format!("{} {}", record.class_level, record.program_keahlian));
                let paths = export::export_class(record, &scorer, format, &output_dir, &options)
                    .with_context(|| format!("クラス '{}' の出力に失敗", record.id))?;
                written.extend(paths);
                progress.inc(1);
            }
            progress.finish_and_clear();

            for path in &written {
                println!("✔ 出力: {}", path.display());
            }
            println!("\n✅ {}ファイルを生成", written.len());
        }

        Commands::Summary { input, json } => {
            let records = export::load_records(&input)?;
            let scorer = config.build_scorer(None, None)?;

            if json {
                let summaries: Vec<serde_json::Value> = records
                    .iter()
                    .map(|record| {
                        let students: Vec<_> = record
                            .answers
                            .iter()
                            .map(|(name, answers)| scorer.student_summary(name, answers))
                            .collect();
                        serde_json::json!({
                            "id": record.id,
                            "school": record.school_display_name(),
                            "class": format!("{} {}", record.class_level, record.program_keahlian),
                            "overallAverage": class_overall_average(record),
                            "skills": scorer.class_skill_averages(record),
                            "students": students,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&summaries)?);
                return Ok(());
            }

            for record in &records {
                println!("■ {} - {} {}", record.school_display_name(), record.class_level, record.program_keahlian);
                println!("  作成日: {}", format_timestamp(record.created_at.as_ref()));
                println!("  生徒数: {}", record.effective_student_count());
                println!("  総合平均: {:.2}", class_overall_average(record));
                for stats in scorer.class_skill_averages(record) {
                    println!(
                        "    {:<16} {:.2} ({}) n={}",
                        stats.category.label(),
                        stats.average,
                        stats.level(),
                        stats.count
                    );
                }
                for (name, answers) in &record.answers {
                    let summary = scorer.student_summary(name, answers);
                    println!(
                        "  - {}: {:.2} ({}) {}/{}",
                        summary.name, summary.average, summary.level, summary.answered, summary.total
                    );
                }
                println!();
            }
        }

        Commands::Schools { input, format, output } => {
            println!("🏫 skill-report - 学校一覧\n");

            let records = export::load_records(&input)?;
            let scorer = config.build_scorer(None, None)?;
            let output_dir = output.unwrap_or_else(|| std::path::PathBuf::from("."));
            let options = PdfOptions::new(
                config.report_title.clone(),
                config.label_max_chars,
                chrono::Local::now().date_naive(),
            );

            for school in scorer.school_skill_averages(&records) {
                println!(
                    "  {}: {}クラス / {}人 / 平均 {:.2}",
                    school.school_name,
                    school.class_count,
                    school.student_count,
                    school.averages.overall()
                );
            }

            let written = export::export_schools(&records, &scorer, format, &output_dir, &options)
                .context("学校一覧の出力に失敗")?;
            println!();
            for path in &written {
                println!("✔ 出力: {}", path.display());
            }
        }

        Commands::Config { set_alias_file, show } => {
            let mut config = config;

            if let Some(path) = set_alias_file {
                config.set_alias_file(path)?;
                println!("✔ エイリアスファイルを設定しました");
            }

            if show {
                println!("設定:");
                println!("  エイリアスファイル: {}", match config.effective_alias_file() {
                    Some(path) => path.display().to_string(),
                    None => "未設定".to_string(),
                });
                println!("  区切り文字: \"{}\"", config.question_delimiter);
                println!("  ラベル最大文字数: {}", config.label_max_chars);
                println!("  レポートタイトル: {}", config.report_title);
                println!("  スコア上限: {}", config.scoring.max_score);
            }
        }
    }

    Ok(())
}
