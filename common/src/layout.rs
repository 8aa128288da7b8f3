//! レイアウト設定モジュール
//!
//! PDFはA4縦・mm単位、左上原点で定義する（PDF座標への変換は描画側）。
//! Excelは列幅（文字数単位）を定義する。

/// A4 幅（mm）
pub const A4_WIDTH_MM: f32 = 210.0;
/// A4 高さ（mm）
pub const A4_HEIGHT_MM: f32 = 297.0;

/// 1mm あたりのpt
pub const MM_TO_PT: f32 = 72.0 / 25.4;

/// Helveticaの平均文字幅（フォントサイズ比）
const AVERAGE_CHAR_WIDTH_RATIO: f32 = 0.5;

pub fn mm_to_pt(mm: f32) -> f32 {
    mm * MM_TO_PT
}

pub fn pt_to_mm(pt: f32) -> f32 {
    pt / MM_TO_PT
}

/// 行送り（mm）。フォントサイズ(pt) × 0.4
pub fn line_height_mm(font_size: f32) -> f32 {
    font_size * 0.4
}

/// 文字列の概算幅（mm）
pub fn approx_text_width_mm(text: &str, font_size: f32) -> f32 {
    pt_to_mm(text.chars().count() as f32 * font_size * AVERAGE_CHAR_WIDTH_RATIO)
}

/// クラスレポートPDFのレイアウト（mm）
#[derive(Debug, Clone, PartialEq)]
pub struct PdfLayout {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub margin_mm: f32,
    /// 本文の字下げ
    pub indent_mm: f32,
    /// 1ページ目の見出し帯
    pub header_height_mm: f32,
    pub info_box_height_mm: f32,
    pub bar_chart_height_mm: f32,
    pub radar_chart_height_mm: f32,
    /// フッター行のページ下端からの距離
    pub footer_offset_mm: f32,
}

impl Default for PdfLayout {
    fn default() -> Self {
        Self {
            page_width_mm: A4_WIDTH_MM,
            page_height_mm: A4_HEIGHT_MM,
            margin_mm: 20.0,
            indent_mm: 30.0,
            header_height_mm: 30.0,
            info_box_height_mm: 40.0,
            bar_chart_height_mm: 50.0,
            radar_chart_height_mm: 120.0,
            footer_offset_mm: 10.0,
        }
    }
}

impl PdfLayout {
    /// 本文の幅
    pub fn content_width_mm(&self) -> f32 {
        self.page_width_mm - self.margin_mm * 2.0
    }

    /// 字下げした本文の幅
    pub fn indented_width_mm(&self) -> f32 {
        self.page_width_mm - self.indent_mm * 2.0
    }

    /// 横向きにしたレイアウト（学校一覧PDF用）
    pub fn landscape(&self) -> Self {
        Self {
            page_width_mm: self.page_width_mm.max(self.page_height_mm),
            page_height_mm: self.page_width_mm.min(self.page_height_mm),
            ..self.clone()
        }
    }

    /// 改ページが必要か
    pub fn needs_new_page(&self, y_mm: f32, required_mm: f32) -> bool {
        y_mm + required_mm > self.page_height_mm - self.margin_mm
    }
}

/// Excelの列幅（文字数単位）
#[derive(Debug, Clone, PartialEq)]
pub struct ExcelLayout {
    pub flow_col_width: f64,
    pub item_col_width: f64,
    pub student_col_width: f64,
    pub summary_label_width: f64,
    pub summary_value_width: f64,
}

impl Default for ExcelLayout {
    fn default() -> Self {
        Self {
            flow_col_width: 28.0,
            item_col_width: 60.0,
            student_col_width: 18.0,
            summary_label_width: 24.0,
            summary_value_width: 16.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mm_pt_conversion() {
        assert!((mm_to_pt(25.4) - 72.0).abs() < 1e-4);
        assert!((pt_to_mm(mm_to_pt(210.0)) - 210.0).abs() < 1e-3);
    }

    #[test]
    fn test_page_break() {
        let layout = PdfLayout::default();
        assert!(!layout.needs_new_page(200.0, 50.0));
        assert!(layout.needs_new_page(240.0, 40.0));
        assert_eq!(layout.content_width_mm(), 170.0);
        assert_eq!(layout.indented_width_mm(), 150.0);
    }

    #[test]
    fn test_landscape() {
        let layout = PdfLayout::default().landscape();
        assert_eq!(layout.page_width_mm, A4_HEIGHT_MM);
        assert_eq!(layout.page_height_mm, A4_WIDTH_MM);
        assert_eq!(layout.content_width_mm(), 257.0);
        assert_eq!(layout.landscape(), layout);
    }

    #[test]
    fn test_text_width_grows_with_length() {
        let short = approx_text_width_mm("Baik", 12.0);
        let long = approx_text_width_mm("Sangat Baik", 12.0);
        assert!(long > short);
        assert_eq!(approx_text_width_mm("", 12.0), 0.0);
    }
}
