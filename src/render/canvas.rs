use super::palette::PanelColor;
use crate::error::{config_error, AppResult};
use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_rect_mut, draw_line_segment_mut, draw_text_mut,
};
use imageproc::rect::Rect;
use std::fs;
use std::path::Path;

/// Pixel position on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Which loaded face a piece of text uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFace {
    Regular,
    Bold,
    Footer,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontStyle {
    pub face: FontFace,
    pub size: f32,
}

/// Drawing surface the layout engine writes into
pub trait Canvas {
    /// Filled rectangle with rounded corners, inclusive corner points
    fn rounded_rectangle(
        &mut self,
        top_left: Point,
        bottom_right: Point,
        radius: i32,
        fill: PanelColor,
    );

    /// Text with its top-left corner at `at`
    fn text(&mut self, at: Point, text: &str, font: FontStyle, color: PanelColor);

    fn line(&mut self, from: Point, to: Point, width: i32, color: PanelColor);
}

/// The three font files the panel uses
pub struct Fonts {
    regular: FontVec,
    bold: FontVec,
    footer: FontVec,
}

impl Fonts {
    pub const REGULAR_FILE: &'static str = "FreeSans.ttf";
    pub const BOLD_FILE: &'static str = "FreeSansBold.ttf";
    pub const FOOTER_FILE: &'static str = "Font.ttc";

    /// Load the fonts from the resources directory
    pub fn load(resources_dir: &Path) -> AppResult<Self> {
        Ok(Self {
            regular: load_font(&resources_dir.join(Self::REGULAR_FILE))?,
            bold: load_font(&resources_dir.join(Self::BOLD_FILE))?,
            footer: load_font(&resources_dir.join(Self::FOOTER_FILE))?,
        })
    }

    fn face(&self, face: FontFace) -> &FontVec {
        match face {
            FontFace::Regular => &self.regular,
            FontFace::Bold => &self.bold,
            FontFace::Footer => &self.footer,
        }
    }
}

fn load_font(path: &Path) -> AppResult<FontVec> {
    let data = fs::read(path).map_err(|e| {
        config_error(&format!("Failed to read font {}: {}", path.display(), e))
    })?;

    // Collections (.ttc) use their first face
    FontVec::try_from_vec_and_index(data, 0)
        .map_err(|e| config_error(&format!("Invalid font {}: {}", path.display(), e)))
}

/// Canvas backed by an RGB image
pub struct ImageCanvas<'a> {
    image: RgbImage,
    fonts: &'a Fonts,
}

impl<'a> ImageCanvas<'a> {
    /// White canvas of the given size
    pub fn new(width: u32, height: u32, fonts: &'a Fonts) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, PanelColor::White.rgb()),
            fonts,
        }
    }

    fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Rgb<u8>) {
        if width > 0 && height > 0 {
            draw_filled_rect_mut(
                &mut self.image,
                Rect::at(x, y).of_size(width as u32, height as u32),
                color,
            );
        }
    }
}

impl From<ImageCanvas<'_>> for RgbImage {
    fn from(canvas: ImageCanvas<'_>) -> Self {
        canvas.image
    }
}

impl Canvas for ImageCanvas<'_> {
    fn rounded_rectangle(
        &mut self,
        top_left: Point,
        bottom_right: Point,
        radius: i32,
        fill: PanelColor,
    ) {
        let color = fill.rgb();
        let width = bottom_right.x - top_left.x + 1;
        let height = bottom_right.y - top_left.y + 1;
        let radius = radius.clamp(0, width.min(height) / 2);

        // Cross of two rectangles, corners filled by circles
        self.fill_rect(top_left.x + radius, top_left.y, width - 2 * radius, height, color);
        self.fill_rect(top_left.x, top_left.y + radius, width, height - 2 * radius, color);

        if radius > 0 {
            for (cx, cy) in [
                (top_left.x + radius, top_left.y + radius),
                (bottom_right.x - radius, top_left.y + radius),
                (top_left.x + radius, bottom_right.y - radius),
                (bottom_right.x - radius, bottom_right.y - radius),
            ] {
                draw_filled_circle_mut(&mut self.image, (cx, cy), radius, color);
            }
        }
    }

    fn text(&mut self, at: Point, text: &str, font: FontStyle, color: PanelColor) {
        draw_text_mut(
            &mut self.image,
            color.rgb(),
            at.x,
            at.y,
            PxScale::from(font.size),
            self.fonts.face(font.face),
            text,
        );
    }

    fn line(&mut self, from: Point, to: Point, width: i32, color: PanelColor) {
        // Thicken across the dominant direction
        let horizontal = (to.x - from.x).abs() >= (to.y - from.y).abs();
        for step in 0..width.max(1) {
            let offset = step - (width - 1) / 2;
            let (dx, dy) = if horizontal { (0, offset) } else { (offset, 0) };
            draw_line_segment_mut(
                &mut self.image,
                ((from.x + dx) as f32, (from.y + dy) as f32),
                ((to.x + dx) as f32, (to.y + dy) as f32),
                color.rgb(),
            );
        }
    }
}

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    RoundedRectangle {
        top_left: Point,
        bottom_right: Point,
        radius: i32,
        fill: PanelColor,
    },
    Text {
        at: Point,
        text: String,
        font: FontStyle,
        color: PanelColor,
    },
    Line {
        from: Point,
        to: Point,
        width: i32,
        color: PanelColor,
    },
}

/// Canvas that only records what was drawn, for inspecting a layout without fonts
#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    pub commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// All text drawn, in draw order
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// All rounded rectangles drawn, in draw order
    pub fn rectangles(&self) -> Vec<(Point, Point, PanelColor)> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::RoundedRectangle {
                    top_left,
                    bottom_right,
                    fill,
                    ..
                } => Some((*top_left, *bottom_right, *fill)),
                _ => None,
            })
            .collect()
    }

    /// Colour a piece of text was drawn in
    pub fn text_color(&self, wanted: &str) -> Option<PanelColor> {
        self.commands.iter().find_map(|command| match command {
            DrawCommand::Text { text, color, .. } if text == wanted => Some(*color),
            _ => None,
        })
    }
}

impl Canvas for RecordingCanvas {
    fn rounded_rectangle(
        &mut self,
        top_left: Point,
        bottom_right: Point,
        radius: i32,
        fill: PanelColor,
    ) {
        self.commands.push(DrawCommand::RoundedRectangle {
            top_left,
            bottom_right,
            radius,
            fill,
        });
    }

    fn text(&mut self, at: Point, text: &str, font: FontStyle, color: PanelColor) {
        self.commands.push(DrawCommand::Text {
            at,
            text: text.to_string(),
            font,
            color,
        });
    }

    fn line(&mut self, from: Point, to: Point, width: i32, color: PanelColor) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }
}
