//! 描画先の抽象
//!
//! 座標はmm、原点はページ左上（yは下向き）。
//! PDFへの変換（原点左下）は実装側で行う。

use crate::error::ChartError;

/// 描画結果
pub type DrawResult = std::result::Result<(), ChartError>;

/// 座標（mm）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// RGB色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    /// 0.0〜1.0の成分に変換
    pub fn to_unit(self) -> (f32, f32, f32) {
        (
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
        )
    }
}

/// 塗り・線の指定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    Fill,
    Stroke,
    FillStroke,
}

/// 文字揃え（x座標に対する位置）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// チャート描画先
pub trait Canvas {
    fn set_stroke(&mut self, color: Rgb, width: f32) -> DrawResult;
    fn set_fill(&mut self, color: Rgb) -> DrawResult;
    /// 以降の塗りを半透明（乗算）にする
    fn set_translucent(&mut self, on: bool) -> DrawResult;
    fn circle(&mut self, center: Point, radius: f32, paint: Paint) -> DrawResult;
    fn line(&mut self, from: Point, to: Point) -> DrawResult;
    fn polygon(&mut self, points: &[Point], paint: Paint) -> DrawResult;
    fn rect(&mut self, top_left: Point, width: f32, height: f32, paint: Paint) -> DrawResult;
    /// `at.y` は文字のベースライン
    fn text(&mut self, text: &str, at: Point, size: f32, align: Align) -> DrawResult;
}

/// 記録された描画命令
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Stroke { color: Rgb, width: f32 },
    Fill(Rgb),
    Translucent(bool),
    Circle { center: Point, radius: f32, paint: Paint },
    Line { from: Point, to: Point },
    Polygon { points: Vec<Point>, paint: Paint },
    Rect { top_left: Point, width: f32, height: f32, paint: Paint },
    Text { text: String, at: Point, size: f32, align: Align },
}

/// 描画命令を記録するだけのキャンバス
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub commands: Vec<DrawCommand>,
    /// n番目（0始まり）の図形描画で失敗させる
    fail_at: Option<usize>,
    shapes: usize,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定した図形描画で `ChartError::Draw` を返すキャンバス
    pub fn failing_at(shape_index: usize) -> Self {
        Self {
            fail_at: Some(shape_index),
            ..Self::default()
        }
    }

    pub fn lines(&self) -> Vec<(Point, Point)> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Line { from, to } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }

    pub fn polygons(&self) -> Vec<&[Point]> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Polygon { points, .. } => Some(points.as_slice()),
                _ => None,
            })
            .collect()
    }

    pub fn circles(&self) -> Vec<(Point, f32)> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Circle { center, radius, .. } => Some((*center, *radius)),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn shape(&mut self, command: DrawCommand) -> DrawResult {
        let index = self.shapes;
        self.shapes += 1;
        if self.fail_at == Some(index) {
            return Err(ChartError::Draw(format!("shape #{} rejected", index)));
        }
        self.commands.push(command);
        Ok(())
    }
}

impl Canvas for RecordingCanvas {
    fn set_stroke(&mut self, color: Rgb, width: f32) -> DrawResult {
        self.commands.push(DrawCommand::Stroke { color, width });
        Ok(())
    }

    fn set_fill(&mut self, color: Rgb) -> DrawResult {
        self.commands.push(DrawCommand::Fill(color));
        Ok(())
    }

    fn set_translucent(&mut self, on: bool) -> DrawResult {
        self.commands.push(DrawCommand::Translucent(on));
        Ok(())
    }

    fn circle(&mut self, center: Point, radius: f32, paint: Paint) -> DrawResult {
        self.shape(DrawCommand::Circle { center, radius, paint })
    }

    fn line(&mut self, from: Point, to: Point) -> DrawResult {
        self.shape(DrawCommand::Line { from, to })
    }

    fn polygon(&mut self, points: &[Point], paint: Paint) -> DrawResult {
        self.shape(DrawCommand::Polygon {
            points: points.to_vec(),
            paint,
        })
    }

    fn rect(&mut self, top_left: Point, width: f32, height: f32, paint: Paint) -> DrawResult {
        self.shape(DrawCommand::Rect {
            top_left,
            width,
            height,
            paint,
        })
    }

    fn text(&mut self, text: &str, at: Point, size: f32, align: Align) -> DrawResult {
        self.shape(DrawCommand::Text {
            text: text.to_string(),
            at,
            size,
            align,
        })
    }
}
