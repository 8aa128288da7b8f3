//! クラス平均の棒グラフ

use super::abbreviate;
use super::canvas::{Align, Canvas, DrawResult, Paint, Point, Rgb};
use super::radar::{Bounds, RadarPoint};
use crate::error::ChartError;
use crate::types::MAX_SCORE;

/// 目盛りの最大本数
const MAX_GRID_STEPS: usize = 10;

/// 棒グラフ描画器
#[derive(Debug, Clone)]
pub struct BarRenderer {
    pub title: String,
    pub label_max_chars: usize,
    pub max_value: f32,
    /// 棒の幅（1本あたりの枠に対する割合）
    pub bar_ratio: f32,
    /// 棒の上に書く値の小数桁
    pub value_decimals: usize,
}

impl Default for BarRenderer {
    fn default() -> Self {
        Self {
            title: "Rata-rata Skor Kelas".to_string(),
            label_max_chars: 8,
            max_value: MAX_SCORE as f32,
            bar_ratio: 0.8,
            value_decimals: 1,
        }
    }
}

impl BarRenderer {
    /// 棒グラフを描画する
    ///
    /// 左右20mm・上20mm・下10mmを目盛りとラベル用に空ける。
    pub fn render(&self, canvas: &mut dyn Canvas, data: &[RadarPoint], bounds: Bounds) -> DrawResult {
        let chart_width = bounds.width - 40.0;
        let chart_height = bounds.height - 30.0;
        if chart_width <= 0.0 || chart_height <= 0.0 {
            return Err(ChartError::InvalidBounds {
                width: bounds.width,
                height: bounds.height,
            });
        }

        let start_x = bounds.x + 20.0;
        let start_y = bounds.y + 20.0;
        let chart_bottom = start_y + chart_height;

        canvas.set_stroke(Rgb(200, 200, 200), 0.5)?;
        canvas.rect(Point::new(start_x, start_y), chart_width, chart_height, Paint::Stroke)?;

        if !(self.max_value.is_finite() && self.max_value > 0.0) {
            return Err(ChartError::Draw(format!("最大値が不正です: {}", self.max_value)));
        }

        // 横線と目盛り（上が最大値）
        let steps = (self.max_value.round() as usize).clamp(1, MAX_GRID_STEPS);
        for i in 0..=steps {
            let tick = self.max_value * (steps - i) as f32 / steps as f32;
            let grid_y = start_y + chart_height / steps as f32 * i as f32;
            canvas.set_stroke(Rgb(220, 220, 220), 0.3)?;
            canvas.line(Point::new(start_x, grid_y), Point::new(start_x + chart_width, grid_y))?;

            canvas.set_fill(Rgb(100, 100, 100))?;
            canvas.text(
                &format_tick(tick),
                Point::new(start_x - 5.0, grid_y + 2.0),
                8.0,
                Align::Right,
            )?;
        }

        if !data.is_empty() {
            let slot = chart_width / data.len() as f32;
            let bar_width = slot * self.bar_ratio;

            for (index, item) in data.iter().enumerate() {
                let value = clamp(item.value, self.max_value);
                let bar_height = value / self.max_value * chart_height;
                let bar_x = start_x + slot * index as f32 + (slot - bar_width) / 2.0;
                let bar_y = chart_bottom - bar_height;

                if bar_height > 0.0 {
                    canvas.set_fill(Rgb(59, 130, 246))?;
                    canvas.set_stroke(Rgb(37, 99, 235), 0.5)?;
                    canvas.rect(Point::new(bar_x, bar_y), bar_width, bar_height, Paint::FillStroke)?;
                }

                canvas.set_fill(Rgb::BLACK)?;
                canvas.text(
                    &format!("{:.*}", self.value_decimals, value),
                    Point::new(bar_x + bar_width / 2.0, bar_y - 2.0),
                    8.0,
                    Align::Center,
                )?;
                canvas.text(
                    &abbreviate(&item.skill, self.label_max_chars),
                    Point::new(start_x + slot * index as f32 + slot / 2.0, chart_bottom + 8.0),
                    8.0,
                    Align::Center,
                )?;
            }
        }

        canvas.set_fill(Rgb::BLACK)?;
        canvas.text(
            &self.title,
            Point::new(start_x + chart_width / 2.0, bounds.y + 10.0),
            10.0,
            Align::Center,
        )
    }
}

fn format_tick(value: f32) -> String {
    if (value - value.round()).abs() < 1e-3 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

fn clamp(value: f64, max: f32) -> f32 {
    if value.is_finite() {
        (value as f32).clamp(0.0, max)
    } else {
        0.0
    }
}
