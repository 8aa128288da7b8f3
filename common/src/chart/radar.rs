//! レーダー（スパイダー）チャート
//!
//! 6軸の六角形グリッドにスキル平均を描く。画像キャプチャを使わず
//! `Canvas` の基本図形だけで描画する。

use super::abbreviate;
use super::canvas::{Align, Canvas, DrawResult, Paint, Point, Rgb};
use crate::error::ChartError;
use crate::types::{SkillAverages, MAX_SCORE};
use std::f32::consts::PI;

/// 軸の数（6カテゴリ固定）
pub const AXIS_COUNT: usize = 6;

/// 描画範囲（mm、左上原点）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// 1軸分のデータ
#[derive(Debug, Clone, PartialEq)]
pub struct RadarPoint {
    pub skill: String,
    /// 0〜上限にクランプ済みの値
    pub value: f64,
}

impl RadarPoint {
    pub fn new(skill: impl Into<String>, value: f64) -> Self {
        Self {
            skill: skill.into(),
            value,
        }
    }
}

/// スキル平均を軸順のデータに変換
pub fn radar_points(averages: &SkillAverages) -> Vec<RadarPoint> {
    averages
        .iter()
        .map(|(category, value)| RadarPoint::new(category.label(), value))
        .collect()
}

/// 見た目の設定
#[derive(Debug, Clone)]
pub struct RadarStyle {
    /// 描画範囲の内側の余白（半径から引く）
    pub margin: f32,
    pub max_value: f32,
    /// これより長いスキル名は省略
    pub label_max_chars: usize,
    pub ring_count: usize,
    pub value_label_offset: f32,
    pub skill_label_offset: f32,
    pub marker_radius: f32,
    pub title: String,
    pub background: Rgb,
    pub border: Rgb,
    pub grid: Rgb,
    pub axis: Rgb,
    pub area_fill: Rgb,
    pub area_stroke: Rgb,
    pub marker: Rgb,
    pub text: Rgb,
    pub scale_text: Rgb,
}

impl Default for RadarStyle {
    fn default() -> Self {
        Self {
            margin: 15.0,
            max_value: MAX_SCORE as f32,
            label_max_chars: 12,
            ring_count: 4,
            value_label_offset: 12.0,
            skill_label_offset: 20.0,
            marker_radius: 1.5,
            title: "Spider Chart".to_string(),
            background: Rgb(240, 248, 255),
            border: Rgb(100, 100, 100),
            grid: Rgb(200, 200, 200),
            axis: Rgb(180, 180, 180),
            area_fill: Rgb(173, 216, 230),
            area_stroke: Rgb(70, 130, 180),
            marker: Rgb(25, 25, 112),
            text: Rgb::BLACK,
            scale_text: Rgb(100, 100, 100),
        }
    }
}

/// レーダーチャート描画器
#[derive(Debug, Clone, Default)]
pub struct RadarRenderer {
    style: RadarStyle,
}

impl RadarRenderer {
    pub fn new(style: RadarStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &RadarStyle {
        &self.style
    }

    /// 軸 i の角度（上から時計回り、ラジアン）
    pub fn axis_angle(index: usize) -> f32 {
        index as f32 * (2.0 * PI / AXIS_COUNT as f32) - PI / 2.0
    }

    /// 中心から角度・距離の位置
    fn polar(center: Point, radius: f32, angle: f32) -> Point {
        Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
    }

    /// 六角形の頂点
    pub fn hexagon(center: Point, radius: f32) -> Vec<Point> {
        (0..AXIS_COUNT)
            .map(|j| Self::polar(center, radius, Self::axis_angle(j)))
            .collect()
    }

    /// 描画半径
    pub fn radius(&self, bounds: &Bounds) -> f32 {
        bounds.width.min(bounds.height) / 2.0 - self.style.margin
    }

    /// データ点の座標（軸順）
    pub fn data_points(&self, points: &[RadarPoint], bounds: &Bounds) -> Vec<Point> {
        let center = bounds.center();
        let radius = self.radius(bounds);
        points
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let value = sanitize(p.value).min(self.style.max_value);
                let r = radius * (value / self.style.max_value);
                Self::polar(center, r, Self::axis_angle(i))
            })
            .collect()
    }

    /// レーダーチャートを描画する
    ///
    /// # Arguments
    /// * `canvas` - 描画先
    /// * `points` - 軸順のデータ（最大6件、3件未満は多角形を省略）
    /// * `bounds` - 描画範囲
    pub fn render(&self, canvas: &mut dyn Canvas, points: &[RadarPoint], bounds: Bounds) -> DrawResult {
        if points.len() > AXIS_COUNT {
            return Err(ChartError::TooManyPoints {
                count: points.len(),
                max: AXIS_COUNT,
            });
        }
        let radius = self.radius(&bounds);
        if !(radius > 0.0) {
            return Err(ChartError::InvalidBounds {
                width: bounds.width,
                height: bounds.height,
            });
        }

        let center = bounds.center();
        self.draw_background(canvas, center, radius)?;
        self.draw_grid(canvas, center, radius)?;
        self.draw_axes(canvas, center, radius)?;

        let data = self.data_points(points, &bounds);
        if data.len() >= 3 {
            self.draw_area(canvas, &data)?;
        }
        self.draw_markers(canvas, center, radius, points, &data)?;
        self.draw_skill_labels(canvas, center, radius, points)?;

        canvas.set_fill(self.style.text)?;
        canvas.text(
            &self.style.title,
            Point::new(center.x, center.y - 8.0),
            12.0,
            Align::Center,
        )
    }

    fn draw_background(&self, canvas: &mut dyn Canvas, center: Point, radius: f32) -> DrawResult {
        canvas.set_stroke(self.style.border, 1.0)?;
        canvas.set_fill(self.style.background)?;
        canvas.circle(center, radius, Paint::FillStroke)
    }

    /// 目盛りの六角形と数値
    fn draw_grid(&self, canvas: &mut dyn Canvas, center: Point, radius: f32) -> DrawResult {
        let rings = self.style.ring_count.max(1);
        for i in 1..=rings {
            let ring_radius = radius * i as f32 / rings as f32;
            canvas.set_stroke(self.style.grid, 0.3)?;
            canvas.polygon(&Self::hexagon(center, ring_radius), Paint::Stroke)?;

            let scale = self.style.max_value * i as f32 / rings as f32;
            canvas.set_fill(self.style.scale_text)?;
            canvas.text(
                &format!("{}", scale.round() as i32),
                Point::new(center.x + ring_radius + 3.0, center.y - 2.0),
                8.0,
                Align::Left,
            )?;
        }
        Ok(())
    }

    fn draw_axes(&self, canvas: &mut dyn Canvas, center: Point, radius: f32) -> DrawResult {
        canvas.set_stroke(self.style.axis, 0.5)?;
        for i in 0..AXIS_COUNT {
            canvas.line(center, Self::polar(center, radius, Self::axis_angle(i)))?;
        }
        Ok(())
    }

    fn draw_area(&self, canvas: &mut dyn Canvas, data: &[Point]) -> DrawResult {
        canvas.set_translucent(true)?;
        canvas.set_fill(self.style.area_fill)?;
        canvas.polygon(data, Paint::Fill)?;
        canvas.set_translucent(false)?;

        canvas.set_stroke(self.style.area_stroke, 1.5)?;
        canvas.polygon(data, Paint::Stroke)
    }

    /// 点マーカーと値ラベル（軸の外側）
    fn draw_markers(
        &self,
        canvas: &mut dyn Canvas,
        center: Point,
        radius: f32,
        points: &[RadarPoint],
        data: &[Point],
    ) -> DrawResult {
        for (i, (point, position)) in points.iter().zip(data).enumerate() {
            canvas.set_fill(self.style.marker)?;
            canvas.set_stroke(Rgb::WHITE, 0.5)?;
            canvas.circle(*position, self.style.marker_radius, Paint::FillStroke)?;

            let label_at = Self::polar(center, radius + self.style.value_label_offset, Self::axis_angle(i));
            canvas.set_fill(self.style.text)?;
            canvas.text(&format!("{:.1}", sanitize(point.value)), label_at, 8.0, Align::Center)?;
        }
        Ok(())
    }

    fn draw_skill_labels(
        &self,
        canvas: &mut dyn Canvas,
        center: Point,
        radius: f32,
        points: &[RadarPoint],
    ) -> DrawResult {
        canvas.set_fill(self.style.text)?;
        for (i, point) in points.iter().enumerate() {
            let at = Self::polar(center, radius + self.style.skill_label_offset, Self::axis_angle(i));
            let label = abbreviate(&point.skill, self.style.label_max_chars);
            canvas.text(&label, at, 10.0, Align::Center)?;
        }
        Ok(())
    }
}

/// 負値・NaNは0
fn sanitize(value: f64) -> f32 {
    if value.is_finite() && value > 0.0 {
        value as f32
    } else {
        0.0
    }
}
