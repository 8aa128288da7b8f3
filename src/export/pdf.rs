//! クラスレポートPDFと学校一覧PDF
//!
//! クラスレポートは1ページ目にクラス情報とスキル平均の棒グラフ、以降は生徒ごとに
//! 1ページ（レーダーチャート付き）。学校一覧はA4横で、集計・スコア分布・
//! クラスごとの統計表・クラス一覧を並べる。最後に全ページへフッターを入れる。

use crate::error::{ReportError, Result};
use chrono::NaiveDate;
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    calculate_points_for_circle, BlendMode, BuiltinFont, Color, IndirectFontRef, Line, Mm,
    PdfDocument, PdfDocumentReference, PdfLayerIndex, PdfLayerReference, PdfPageIndex, Polygon,
    Pt, Rect, SeperableBlendMode,
};
use skill_report_common::aggregate::{averages_of, scored_average};
use skill_report_common::chart::{
    abbreviate, radar_points, render_or_placeholder, Align, BarRenderer, Bounds, Canvas, DrawResult,
    Paint, Point, RadarPoint, RadarRenderer, RadarStyle, Rgb, BAR_PLACEHOLDER, RADAR_PLACEHOLDER,
};
use skill_report_common::export::pdf_core::{
    class_detail_line, class_heading, class_info_lines, class_row_cells, footer_texts,
    format_date_long, school_overview_lines, skill_stats_cells, skill_summary_lines,
    status_breakdown, student_heading, student_info_lines, suggestion_lines, wrap_text,
    CLASS_TABLE_HEADERS, SKILL_STATS_HEADERS,
};
use skill_report_common::layout::{approx_text_width_mm, line_height_mm, PdfLayout};
use skill_report_common::{ChartError, ClassRecord, SkillCategory, SkillScorer};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

const HEADER_BLUE: Rgb = Rgb(59, 130, 246);
const INFO_BOX_GRAY: Rgb = Rgb(248, 250, 252);
const BORDER_GRAY: Rgb = Rgb(226, 232, 240);
const FOOTER_GRAY: Rgb = Rgb(128, 128, 128);

/// PDF生成の設定
#[derive(Debug, Clone)]
pub struct PdfOptions {
    /// 文書タイトル（メタデータ）
    pub title: String,
    /// レーダーチャートのスキル名省略の閾値
    pub label_max_chars: usize,
    /// フッターに入れる作成日
    pub generated: NaiveDate,
    pub layout: PdfLayout,
}

impl PdfOptions {
    pub fn new(title: impl Into<String>, label_max_chars: usize, generated: NaiveDate) -> Self {
        Self {
            title: title.into(),
            label_max_chars,
            generated,
            layout: PdfLayout::default(),
        }
    }
}

/// printpdf のレイヤーへ描くキャンバス
///
/// 左上原点・mm の座標を PDF の左下原点へ変換する。
pub struct PdfCanvas {
    layer: PdfLayerReference,
    font: IndirectFontRef,
    page_height_mm: f32,
}

impl PdfCanvas {
    pub fn new(layer: PdfLayerReference, font: IndirectFontRef, page_height_mm: f32) -> Self {
        Self {
            layer,
            font,
            page_height_mm,
        }
    }

    fn to_pdf(&self, p: Point) -> printpdf::Point {
        printpdf::Point::new(Mm(p.x), Mm(self.page_height_mm - p.y))
    }
}

fn pdf_color(color: Rgb) -> Color {
    let (r, g, b) = color.to_unit();
    Color::Rgb(printpdf::Rgb::new(r, g, b, None))
}

fn paint_mode(paint: Paint) -> PaintMode {
    match paint {
        Paint::Fill => PaintMode::Fill,
        Paint::Stroke => PaintMode::Stroke,
        Paint::FillStroke => PaintMode::FillStroke,
    }
}

fn check_finite(points: &[Point]) -> DrawResult {
    if points.iter().all(|p| p.x.is_finite() && p.y.is_finite()) {
        Ok(())
    } else {
        Err(ChartError::Draw("座標が数値ではありません".into()))
    }
}

impl Canvas for PdfCanvas {
    fn set_stroke(&mut self, color: Rgb, width: f32) -> DrawResult {
        self.layer.set_outline_color(pdf_color(color));
        self.layer.set_outline_thickness(width);
        Ok(())
    }

    fn set_fill(&mut self, color: Rgb) -> DrawResult {
        self.layer.set_fill_color(pdf_color(color));
        Ok(())
    }

    fn set_translucent(&mut self, on: bool) -> DrawResult {
        let mode = if on {
            SeperableBlendMode::Multiply
        } else {
            SeperableBlendMode::Normal
        };
        self.layer.set_blend_mode(BlendMode::Seperable(mode));
        Ok(())
    }

    fn circle(&mut self, center: Point, radius: f32, paint: Paint) -> DrawResult {
        check_finite(&[center])?;
        if !(radius.is_finite() && radius > 0.0) {
            return Err(ChartError::Draw(format!("半径が不正です: {}", radius)));
        }
        let c = self.to_pdf(center);
        let r: Pt = Mm(radius).into();
        self.layer.add_polygon(Polygon {
            rings: vec![calculate_points_for_circle(r, c.x, c.y)],
            mode: paint_mode(paint),
            winding_order: WindingOrder::NonZero,
        });
        Ok(())
    }

    fn line(&mut self, from: Point, to: Point) -> DrawResult {
        check_finite(&[from, to])?;
        self.layer.add_line(Line {
            points: vec![(self.to_pdf(from), false), (self.to_pdf(to), false)],
            is_closed: false,
        });
        Ok(())
    }

    fn polygon(&mut self, points: &[Point], paint: Paint) -> DrawResult {
        check_finite(points)?;
        if points.len() < 3 {
            return Err(ChartError::Draw(format!("多角形の頂点が足りません: {}", points.len())));
        }
        let ring = points.iter().map(|p| (self.to_pdf(*p), false)).collect();
        self.layer.add_polygon(Polygon {
            rings: vec![ring],
            mode: paint_mode(paint),
            winding_order: WindingOrder::NonZero,
        });
        Ok(())
    }

    fn rect(&mut self, top_left: Point, width: f32, height: f32, paint: Paint) -> DrawResult {
        check_finite(&[top_left, Point::new(width, height)])?;
        let bottom = self.page_height_mm - top_left.y - height;
        let top = self.page_height_mm - top_left.y;
        self.layer.add_rect(
            Rect::new(Mm(top_left.x), Mm(bottom), Mm(top_left.x + width), Mm(top)).with_mode(paint_mode(paint)),
        );
        Ok(())
    }

    fn text(&mut self, text: &str, at: Point, size: f32, align: Align) -> DrawResult {
        check_finite(&[at])?;
        let width = approx_text_width_mm(text, size);
        let x = match align {
            Align::Left => at.x,
            Align::Center => at.x - width / 2.0,
            Align::Right => at.x - width,
        };
        self.layer
            .use_text(text, size, Mm(x), Mm(self.page_height_mm - at.y), &self.font);
        Ok(())
    }
}

/// ページ送りを管理しながら上から順に書いていく
struct ReportWriter {
    doc: PdfDocumentReference,
    pages: Vec<(PdfPageIndex, PdfLayerIndex)>,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    layout: PdfLayout,
    /// 現在の書き込み位置（ページ上端からのmm）
    y: f32,
}

impl ReportWriter {
    fn new(title: &str, layout: PdfLayout) -> Result<Self> {
        let (doc, page, layer) = PdfDocument::new(
            title,
            Mm(layout.page_width_mm),
            Mm(layout.page_height_mm),
            "Layer 1",
        );

        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ReportError::PdfGeneration(format!("フォント追加エラー: {:?}", e)))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ReportError::PdfGeneration(format!("フォント追加エラー: {:?}", e)))?;

        let y = layout.margin_mm;
        Ok(Self {
            doc,
            pages: vec![(page, layer)],
            regular,
            bold,
            layout,
            y,
        })
    }

    fn layer_at(&self, index: usize) -> PdfLayerReference {
        let (page, layer) = self.pages[index];
        self.doc.get_page(page).get_layer(layer)
    }

    fn canvas(&self) -> PdfCanvas {
        self.canvas_with(self.regular.clone())
    }

    fn canvas_with(&self, font: IndirectFontRef) -> PdfCanvas {
        let last = self.pages.len() - 1;
        PdfCanvas::new(self.layer_at(last), font, self.layout.page_height_mm)
    }

    fn add_page(&mut self) {
        let number = self.pages.len() + 1;
        let (page, layer) = self.doc.add_page(
            Mm(self.layout.page_width_mm),
            Mm(self.layout.page_height_mm),
            format!("Page {}", number),
        );
        self.pages.push((page, layer));
        self.y = self.layout.margin_mm;
        tracing::debug!("ページ追加: {}", number);
    }

    fn ensure_space(&mut self, required_mm: f32) {
        if self.layout.needs_new_page(self.y, required_mm) {
            self.add_page();
        }
    }

    /// 折り返して書き、書いた分だけ y を進める
    fn write_text(&mut self, text: &str, x: f32, max_width: f32, size: f32, bold: bool, color: Rgb) -> DrawResult {
        let font = if bold { self.bold.clone() } else { self.regular.clone() };
        let mut canvas = self.canvas_with(font);
        canvas.set_fill(color)?;
        let lines = wrap_text(text, max_width, size);
        for (i, line) in lines.iter().enumerate() {
            let at = Point::new(x, self.y + i as f32 * line_height_mm(size));
            canvas.text(line, at, size, Align::Left)?;
        }
        self.y += lines.len() as f32 * line_height_mm(size);
        Ok(())
    }

    /// 見出しなど1行だけの太字テキスト（y は進めない）
    fn bold_line(&self, text: &str, at: Point, size: f32, align: Align, color: Rgb) -> DrawResult {
        let mut canvas = self.canvas_with(self.bold.clone());
        canvas.set_fill(color)?;
        canvas.text(text, at, size, align)
    }

    /// 表の1行を書く（列幅に収まらないセルは省略）
    fn table_row(&mut self, cells: &[String], widths: &[f32], size: f32, bold: bool) -> DrawResult {
        let font = if bold { self.bold.clone() } else { self.regular.clone() };
        let mut canvas = self.canvas_with(font);
        canvas.set_fill(Rgb::BLACK)?;
        let char_width = approx_text_width_mm("n", size).max(0.1);
        let mut x = self.layout.margin_mm;
        for (cell, width) in cells.iter().zip(widths) {
            let fit = ((width - 2.0) / char_width).floor().max(1.0) as usize;
            let text = if cell.chars().count() > fit {
                abbreviate(cell, fit.saturating_sub(3).max(1))
            } else {
                cell.clone()
            };
            canvas.text(&text, Point::new(x, self.y), size, Align::Left)?;
            x += width;
        }
        self.y += line_height_mm(size) + 2.0;
        Ok(())
    }

    /// 背景付きの見出し行
    fn table_header(&mut self, cells: &[&str], widths: &[f32], size: f32) -> DrawResult {
        let top = self.y - line_height_mm(size);
        let width: f32 = widths.iter().sum();
        self.filled_box(
            Point::new(self.layout.margin_mm, top),
            width,
            line_height_mm(size) + 2.0,
            INFO_BOX_GRAY,
            Some(BORDER_GRAY),
        )?;
        let cells: Vec<String> = cells.iter().map(|c| c.to_string()).collect();
        self.table_row(&cells, widths, size, true)
    }

    fn filled_box(&self, top_left: Point, width: f32, height: f32, fill: Rgb, border: Option<Rgb>) -> DrawResult {
        let mut canvas = self.canvas();
        canvas.set_fill(fill)?;
        match border {
            Some(color) => {
                canvas.set_stroke(color, 0.5)?;
                canvas.rect(top_left, width, height, Paint::FillStroke)
            }
            None => canvas.rect(top_left, width, height, Paint::Fill),
        }
    }

    fn write_footers(&self, generated: NaiveDate) -> DrawResult {
        let total = self.pages.len();
        let y = self.layout.page_height_mm - self.layout.footer_offset_mm;
        for index in 0..total {
            let mut canvas = PdfCanvas::new(self.layer_at(index), self.regular.clone(), self.layout.page_height_mm);
            let (page_text, date_text) = footer_texts(index + 1, total, generated);
            canvas.set_fill(FOOTER_GRAY)?;
            canvas.text(&page_text, Point::new(self.layout.page_width_mm - 40.0, y), 10.0, Align::Left)?;
            canvas.text(&date_text, Point::new(self.layout.margin_mm, y), 10.0, Align::Left)?;
        }
        Ok(())
    }

    fn into_bytes(self) -> Result<Vec<u8>> {
        self.doc
            .save_to_bytes()
            .map_err(|e| ReportError::PdfGeneration(format!("PDF保存エラー: {:?}", e)))
    }

    fn save(self, output_path: &Path) -> Result<()> {
        let file = File::create(output_path)?;
        self.doc
            .save(&mut BufWriter::new(file))
            .map_err(|e| ReportError::PdfGeneration(format!("PDF保存エラー: {:?}", e)))
    }
}

fn draw_err(e: ChartError) -> ReportError {
    ReportError::PdfGeneration(e.to_string())
}

/// クラスレポートを組み立てる
fn build_report(record: &ClassRecord, scorer: &SkillScorer, options: &PdfOptions) -> Result<ReportWriter> {
    let mut w = ReportWriter::new(&options.title, options.layout.clone())?;
    let layout = options.layout.clone();
    let margin = layout.margin_mm;
    let indent = layout.indent_mm;
    let content_width = layout.content_width_mm();

    // 見出し帯
    w.filled_box(Point::new(0.0, 0.0), layout.page_width_mm, layout.header_height_mm, HEADER_BLUE, None)
        .map_err(draw_err)?;
    w.y = margin;
    w.write_text("LAPORAN ASSESSMENT KELAS", margin, content_width, 18.0, true, Rgb::WHITE)
        .map_err(draw_err)?;
    w.y += 10.0;

    // クラス情報
    w.filled_box(Point::new(margin, w.y), content_width, layout.info_box_height_mm, INFO_BOX_GRAY, None)
        .map_err(draw_err)?;
    w.y += 10.0;
    for line in class_info_lines(record) {
        w.write_text(&line.text, indent, layout.indented_width_mm(), line.font_size, line.bold, Rgb::BLACK)
            .map_err(draw_err)?;
    }
    w.y += 20.0;

    // スキル平均
    let stats = scorer.class_skill_averages(record);
    w.ensure_space(80.0);
    w.write_text("RINGKASAN ASSESSMENT KETERAMPILAN", margin, content_width, 16.0, true, Rgb::BLACK)
        .map_err(draw_err)?;
    w.y += 10.0;

    let bar_bounds = Bounds::new(margin, w.y, content_width, layout.bar_chart_height_mm);
    let max_value = scorer.max_score() as f32;
    let bar_data = radar_points(&averages_of(&stats, scorer.max_score()));
    let bar = BarRenderer {
        max_value,
        ..BarRenderer::default()
    };
    let drawn = render_or_placeholder(&mut w.canvas(), bar_bounds, BAR_PLACEHOLDER, |c| {
        bar.render(c, &bar_data, bar_bounds)
    });
    tracing::debug!(drawn, "棒グラフ");
    w.y += layout.bar_chart_height_mm + 10.0;

    for line in skill_summary_lines(&stats) {
        w.ensure_space(15.0);
        w.write_text(&line, indent, layout.indented_width_mm(), 12.0, false, Rgb::BLACK)
            .map_err(draw_err)?;
    }
    w.y += 20.0;

    // 生徒ごとの詳細
    if !record.answers.is_empty() {
        w.ensure_space(30.0);
        w.write_text("DETAIL ASSESSMENT SISWA", margin, content_width, 16.0, true, Rgb::BLACK)
            .map_err(draw_err)?;
        w.y += 10.0;
    }

    let radar = RadarRenderer::new(RadarStyle {
        label_max_chars: options.label_max_chars,
        max_value,
        ..RadarStyle::default()
    });

    for (name, answers) in &record.answers {
        let summary = scorer.student_summary(name, answers);
        tracing::debug!(student = %name, average = summary.average, "生徒ページ");

        w.add_page();

        w.filled_box(Point::new(margin, w.y - 5.0), content_width, 20.0, HEADER_BLUE, None)
            .map_err(draw_err)?;
        let center_x = layout.page_width_mm / 2.0;
        w.bold_line(&student_heading(name), Point::new(center_x, w.y + 5.0), 16.0, Align::Center, Rgb::WHITE)
            .map_err(draw_err)?;
        w.y += 20.0;

        w.filled_box(Point::new(margin, w.y - 5.0), content_width, 25.0, INFO_BOX_GRAY, Some(BORDER_GRAY))
            .map_err(draw_err)?;
        for line in student_info_lines(&summary) {
            w.write_text(&line, indent, layout.indented_width_mm(), 12.0, false, Rgb::BLACK)
                .map_err(draw_err)?;
        }
        w.y += 20.0;

        w.write_text("SPIDER CHART KETERAMPILAN", margin, content_width, 18.0, true, Rgb::BLACK)
            .map_err(draw_err)?;
        w.y += 10.0;

        let bounds = Bounds::new(margin, w.y, content_width, layout.radar_chart_height_mm);
        let points = radar_points(&summary.skills);
        if !render_or_placeholder(&mut w.canvas(), bounds, RADAR_PLACEHOLDER, |c| {
            radar.render(c, &points, bounds)
        }) {
            tracing::warn!(student = %name, "レーダーチャートを代替テキストにしました");
        }
        w.y += layout.radar_chart_height_mm + 20.0;
    }

    // AIの提案
    let suggestions = suggestion_lines(&record.ai_suggestions);
    if !suggestions.is_empty() {
        w.ensure_space(40.0);
        w.write_text("REKOMENDASI AI", margin, content_width, 16.0, true, Rgb::BLACK)
            .map_err(draw_err)?;
        w.y += 10.0;
        for line in &suggestions {
            w.ensure_space(20.0);
            w.write_text(line, indent, layout.indented_width_mm(), 11.0, false, Rgb::BLACK)
                .map_err(draw_err)?;
            w.y += 5.0;
        }
    }

    w.write_footers(options.generated).map_err(draw_err)?;
    tracing::info!("PDF: {}ページ", w.pages.len());

    Ok(w)
}

/// クラスレポートPDFをバイト列で生成
pub fn generate_class_pdf_bytes(record: &ClassRecord, scorer: &SkillScorer, options: &PdfOptions) -> Result<Vec<u8>> {
    build_report(record, scorer, options)?.into_bytes()
}

/// クラスレポートPDFをファイルに書き出す
pub fn generate_class_pdf(
    record: &ClassRecord,
    scorer: &SkillScorer,
    options: &PdfOptions,
    output_path: &Path,
) -> Result<()> {
    build_report(record, scorer, options)?.save(output_path)?;
    tracing::info!("PDF出力: {}", output_path.display());
    Ok(())
}

/// スキル統計表の列幅（mm）
const SKILL_STATS_WIDTHS: [f32; 6] = [50.0, 25.0, 20.0, 20.0, 20.0, 30.0];
/// クラス一覧表の列幅（mm）
const CLASS_TABLE_WIDTHS: [f32; 6] = [12.0, 80.0, 50.0, 30.0, 20.0, 30.0];

/// 学校一覧レポートを組み立てる（A4横）
fn build_school_report(records: &[ClassRecord], scorer: &SkillScorer, options: &PdfOptions) -> Result<ReportWriter> {
    if records.is_empty() {
        return Err(ReportError::InvalidInput("クラスがありません".into()));
    }
    let mut w = ReportWriter::new(&options.title, options.layout.landscape())?;
    draw_school_report(&mut w, records, scorer, options.generated).map_err(draw_err)?;
    w.write_footers(options.generated).map_err(draw_err)?;
    tracing::info!("学校一覧PDF: {}クラス, {}ページ", records.len(), w.pages.len());
    Ok(w)
}

fn draw_school_report(w: &mut ReportWriter, records: &[ClassRecord], scorer: &SkillScorer, generated: NaiveDate) -> DrawResult {
    let layout = w.layout.clone();
    let margin = layout.margin_mm;
    let content_width = layout.content_width_mm();
    let center_x = layout.page_width_mm / 2.0;
    let schools = scorer.school_skill_averages(records);
    let class_stats: Vec<_> = records.iter().map(|r| scorer.class_skill_averages(r)).collect();

    // 見出し帯
    w.filled_box(Point::new(0.0, 0.0), layout.page_width_mm, layout.header_height_mm, HEADER_BLUE, None)?;
    w.bold_line("LAPORAN ASSESSMENT SOFT SKILLS", Point::new(center_x, 14.0), 20.0, Align::Center, Rgb::WHITE)?;
    let mut canvas = w.canvas();
    canvas.set_fill(Rgb::WHITE)?;
    canvas.text(
        &format!("Dicetak pada: {}", format_date_long(generated)),
        Point::new(center_x, 23.0),
        12.0,
        Align::Center,
    )?;
    w.y = layout.header_height_mm + 12.0;

    // 集計
    w.write_text("RINGKASAN DATA", margin, content_width, 14.0, true, Rgb::BLACK)?;
    w.y += 4.0;
    for line in school_overview_lines(records, &schools) {
        w.write_text(&line.text, margin, content_width, line.font_size, line.bold, Rgb::BLACK)?;
    }
    w.y += 6.0;
    w.write_text("Distribusi Status", margin, content_width, 12.0, true, Rgb::BLACK)?;
    for (status, count) in status_breakdown(records) {
        w.write_text(&format!("- {}: {} kelas", status, count), margin + 5.0, content_width, 11.0, false, Rgb::BLACK)?;
    }
    w.y += 8.0;

    // スコア分布（件数の棒グラフ）
    let distribution = scorer.score_distribution(records);
    let bar_data: Vec<RadarPoint> = distribution
        .iter()
        .enumerate()
        .map(|(i, count)| RadarPoint::new(format!("Skor {}", i + 1), *count as f64))
        .collect();
    let peak = distribution.iter().copied().max().unwrap_or(0).max(1);
    let bar = BarRenderer {
        title: "Distribusi Skor".to_string(),
        max_value: peak as f32,
        value_decimals: 0,
        ..BarRenderer::default()
    };
    let chart_height = layout.bar_chart_height_mm + 10.0;
    w.ensure_space(chart_height);
    let bounds = Bounds::new(margin, w.y, content_width / 2.0, chart_height);
    let drawn = render_or_placeholder(&mut w.canvas(), bounds, BAR_PLACEHOLDER, |c| {
        bar.render(c, &bar_data, bounds)
    });
    tracing::debug!(drawn, ?distribution, "スコア分布");
    w.y += chart_height + 10.0;

    // 学校ごとの平均
    let fixed: [f32; 4] = [60.0, 18.0, 18.0, 22.0];
    let skill_width = (content_width - fixed.iter().sum::<f32>()) / SkillCategory::ALL.len() as f32;
    let mut widths = vec![fixed[0], fixed[1], fixed[2]];
    widths.extend(std::iter::repeat(skill_width).take(SkillCategory::ALL.len()));
    widths.push(fixed[3]);

    let mut headers = vec!["Sekolah", "Kelas", "Siswa"];
    headers.extend(SkillCategory::ALL.iter().map(|c| c.label()));
    headers.push("Rata-rata");

    w.ensure_space(30.0);
    w.write_text("RATA-RATA SEKOLAH", margin, content_width, 14.0, true, Rgb::BLACK)?;
    w.y += 6.0;
    w.table_header(&headers, &widths, 9.0)?;
    for school in &schools {
        w.ensure_space(8.0);
        let mut cells = vec![
            school.school_name.clone(),
            school.class_count.to_string(),
            school.student_count.to_string(),
        ];
        cells.extend(school.averages.values().iter().map(|v| format!("{:.2}", v)));
        cells.push(format!("{:.2}", school.averages.overall()));
        w.table_row(&cells, &widths, 9.0, false)?;
    }
    w.y += 10.0;

    // クラスごとの統計
    for (i, (record, stats)) in records.iter().zip(&class_stats).enumerate() {
        w.ensure_space(30.0 + (stats.len() as f32 + 1.0) * (line_height_mm(10.0) + 2.0));
        w.write_text(&class_heading(i + 1, record), margin, content_width, 13.0, true, Rgb::BLACK)?;
        w.write_text(&class_detail_line(record), margin, content_width, 10.0, false, FOOTER_GRAY)?;
        w.y += 6.0;
        w.table_header(&SKILL_STATS_HEADERS, &SKILL_STATS_WIDTHS, 10.0)?;
        for s in stats {
            w.table_row(&skill_stats_cells(s), &SKILL_STATS_WIDTHS, 10.0, false)?;
        }
        w.y += 8.0;
    }

    // クラス一覧
    w.ensure_space(30.0);
    w.write_text("DAFTAR KELAS", margin, content_width, 14.0, true, Rgb::BLACK)?;
    w.y += 6.0;
    w.table_header(&CLASS_TABLE_HEADERS, &CLASS_TABLE_WIDTHS, 10.0)?;
    for (i, (record, stats)) in records.iter().zip(&class_stats).enumerate() {
        w.ensure_space(8.0);
        let cells = class_row_cells(i + 1, record, scored_average(stats));
        w.table_row(&cells, &CLASS_TABLE_WIDTHS, 10.0, false)?;
    }
    Ok(())
}

/// 学校一覧PDFをバイト列で生成
pub fn generate_school_pdf_bytes(records: &[ClassRecord], scorer: &SkillScorer, options: &PdfOptions) -> Result<Vec<u8>> {
    build_school_report(records, scorer, options)?.into_bytes()
}

/// 学校一覧PDFをファイルに書き出す
pub fn generate_school_pdf(
    records: &[ClassRecord],
    scorer: &SkillScorer,
    options: &PdfOptions,
    output_path: &Path,
) -> Result<()> {
    build_school_report(records, scorer, options)?.save(output_path)?;
    tracing::info!("PDF出力: {}", output_path.display());
    Ok(())
}
