//! チャート描画
//!
//! - canvas: 描画先の抽象と記録用キャンバス
//! - radar: 6軸レーダーチャート
//! - bar: クラス平均の棒グラフ

pub mod bar;
pub mod canvas;
pub mod radar;

pub use bar::BarRenderer;
pub use canvas::{Align, Canvas, DrawCommand, DrawResult, Paint, Point, RecordingCanvas, Rgb};
pub use radar::{radar_points, Bounds, RadarPoint, RadarRenderer, RadarStyle, AXIS_COUNT};

/// レーダーチャートが描けなかった場合の表示
pub const RADAR_PLACEHOLDER: &str = "Spider chart tidak dapat ditampilkan";
/// 棒グラフが描けなかった場合の表示
pub const BAR_PLACEHOLDER: &str = "Chart tidak dapat ditampilkan";

/// 長いラベルを省略（先頭 `max_chars` 文字 + "..."）
pub fn abbreviate(label: &str, max_chars: usize) -> String {
    if label.chars().count() > max_chars {
        let head: String = label.chars().take(max_chars).collect();
        format!("{}...", head)
    } else {
        label.to_string()
    }
}

/// 描画し、失敗したら代替テキストを書く
///
/// 1つのチャートの失敗で文書全体の生成を止めない。
///
/// # Returns
/// チャートを描画できた場合は `true`
pub fn render_or_placeholder<F>(canvas: &mut dyn Canvas, bounds: Bounds, placeholder: &str, draw: F) -> bool
where
    F: FnOnce(&mut dyn Canvas) -> DrawResult,
{
    match draw(canvas) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("チャート描画に失敗: {}", e);
            let at = Point::new(bounds.x, bounds.y + 20.0);
            if let Err(e) = canvas
                .set_fill(Rgb::BLACK)
                .and_then(|_| canvas.text(placeholder, at, 12.0, Align::Left))
            {
                tracing::warn!("代替テキストも描画できません: {}", e);
            }
            false
        }
    }
}
