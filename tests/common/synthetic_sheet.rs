#![allow(dead_code)]

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::{DynamicImage, RgbaImage};
use omr_reader::image::GrayImageU8;
use omr_reader::layout::{photograph, SheetLayout};
use omr_reader::types::{BoundingRect, Point2D};
use omr_reader::RgbaImageU8;
use std::io::Cursor;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Canonical sheet with one optional mark per question.
pub fn marked_sheet(marks: &[Option<usize>], num_questions: usize) -> GrayImageU8 {
    SheetLayout::default().render_sheet(marks, num_questions)
}

/// Blank sheet with the rectified cell `(row, col)` blackened edge to edge.
pub fn sheet_with_full_cell(row: usize, col: usize, num_questions: usize) -> GrayImageU8 {
    let layout = SheetLayout::default();
    let mut sheet = layout.render_blank();
    layout.paint_cell(&mut sheet, row, col, num_questions);
    sheet
}

pub fn paint(sheet: &mut GrayImageU8, rect: BoundingRect, value: u8) {
    sheet.fill_rect(
        rect.x as usize,
        rect.y as usize,
        (rect.x + rect.width) as usize,
        (rect.y + rect.height) as usize,
        value,
    );
}

/// Place `sheet` unscaled at `(dx, dy)` inside a larger white frame.
pub fn padded(sheet: &GrayImageU8, width: usize, height: usize, dx: usize, dy: usize) -> GrayImageU8 {
    let mut frame = GrayImageU8::filled(width, height, 255);
    for y in 0..sheet.height() {
        for x in 0..sheet.width() {
            frame.set(x + dx, y + dy, sheet.get(x, y));
        }
    }
    frame
}

/// Perspective-distorted capture of `sheet` on a light table.
pub fn skewed_photo(sheet: &GrayImageU8) -> GrayImageU8 {
    let corners = [
        Point2D::new(60.0, 40.0),
        Point2D::new(640.0, 90.0),
        Point2D::new(600.0, 900.0),
        Point2D::new(30.0, 860.0),
    ];
    photograph(sheet, corners, 700, 950, 230).expect("valid perspective")
}

/// Uniform 3× upscale, used where a job should take a while.
pub fn large_photo(sheet: &GrayImageU8) -> GrayImageU8 {
    let (w, h) = (sheet.width() as f64 * 3.0, sheet.height() as f64 * 3.0);
    let corners = [
        Point2D::new(0.0, 0.0),
        Point2D::new(w, 0.0),
        Point2D::new(w, h),
        Point2D::new(0.0, h),
    ];
    photograph(sheet, corners, w as usize, h as usize, 255).expect("valid perspective")
}

/// Colour version of a rendered sheet: blue ink on off-white paper.
pub fn to_rgba(sheet: &GrayImageU8) -> RgbaImageU8 {
    let mut data = Vec::with_capacity(sheet.width() * sheet.height() * 4);
    for &v in sheet.data() {
        let px = if v < 128 {
            [20, 30, 90, 255]
        } else {
            [250, 248, 240, 255]
        };
        data.extend_from_slice(&px);
    }
    RgbaImageU8::from_raw(sheet.width(), sheet.height(), data).expect("rgba buffer")
}

pub fn rgba_png_data_url(img: &RgbaImageU8) -> String {
    let buffer = RgbaImage::from_raw(img.width() as u32, img.height() as u32, img.data().to_vec())
        .expect("rgba buffer");
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(buffer)
        .write_to(&mut out, image::ImageFormat::Png)
        .expect("png encoding");
    format!("data:image/png;base64,{}", STANDARD.encode(out.into_inner()))
}

pub fn letters(answers: &[&str]) -> Vec<String> {
    answers.iter().map(|s| s.to_string()).collect()
}
