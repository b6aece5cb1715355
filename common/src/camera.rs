//! Post-capture color transforms for the camera feed, plus the trait the car
//! console uses to pull frames without caring where they come from.

use serde::{Deserialize, Serialize};

/// One of the three display modes selectable from the console buttons.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    #[default]
    Color,
    Grayscale,
    Infrared,
}

impl ColorMode {
    /// The one-letter codes shown on the buttons.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "C" => Some(ColorMode::Color),
            "B" => Some(ColorMode::Grayscale),
            "I" => Some(ColorMode::Infrared),
            _ => None,
        }
    }

    /// Round-trip through `u8` so the mode can live in an atomic shared with
    /// the sampler thread.
    pub fn as_u8(self) -> u8 {
        match self {
            ColorMode::Color => 0,
            ColorMode::Grayscale => 1,
            ColorMode::Infrared => 2,
        }
    }

    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => ColorMode::Grayscale,
            2 => ColorMode::Infrared,
            _ => ColorMode::Color,
        }
    }
}

/// A packed RGB8 frame. `rgb.len() == width * height * 3`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

impl Frame {
    pub fn black(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            rgb: vec![0; (width * height * 3) as usize],
        }
    }
}

/// Applies `mode` to the frame in place. `Color` is a pass-through.
pub fn apply(mode: ColorMode, frame: &mut Frame) {
    match mode {
        ColorMode::Color => {}
        ColorMode::Grayscale => {
            for px in frame.rgb.chunks_exact_mut(3) {
                let y = luma(px[0], px[1], px[2]);
                px.fill(y);
            }
        }
        ColorMode::Infrared => {
            for px in frame.rgb.chunks_exact_mut(3) {
                let y = luma(px[0], px[1], px[2]);
                px.copy_from_slice(&false_color(y));
            }
        }
    }
}

// ITU-R 601 weights, scaled so they sum to 256.
fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((77 * r as u32 + 150 * g as u32 + 29 * b as u32) >> 8) as u8
}

// Jet-style gradient: cold pixels blue, hot pixels red.
fn false_color(y: u8) -> [u8; 3] {
    let t = y as f64 / 255.0;
    let channel = |center: f64| {
        let v = 1.5 - (4.0 * t - center).abs();
        (v.clamp(0.0, 1.0) * 255.0).round() as u8
    };
    [channel(3.0), channel(2.0), channel(1.0)]
}

/// Where frames come from: the real webcam when one is attached, a synthetic
/// test pattern otherwise.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<Frame, Box<dyn std::error::Error>>;
}

pub type FrameSourcePointer = Box<dyn FrameSource + Send>;

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_of(pixels: &[[u8; 3]]) -> Frame {
        Frame {
            width: pixels.len() as u32,
            height: 1,
            rgb: pixels.concat(),
        }
    }

    #[test]
    fn color_mode_is_a_pass_through() {
        let mut frame = frame_of(&[[10, 20, 30], [200, 0, 255]]);
        let original = frame.clone();
        apply(ColorMode::Color, &mut frame);
        assert_eq!(frame, original);
    }

    #[test]
    fn grayscale_flattens_channels() {
        let mut frame = frame_of(&[[255, 0, 0], [0, 255, 0], [40, 40, 40]]);
        apply(ColorMode::Grayscale, &mut frame);
        for px in frame.rgb.chunks_exact(3) {
            assert_eq!(px[0], px[1]);
            assert_eq!(px[1], px[2]);
        }
        // Green carries the most weight.
        assert!(frame.rgb[3] > frame.rgb[0]);
    }

    #[test]
    fn grayscale_preserves_extremes() {
        let mut frame = frame_of(&[[0, 0, 0], [255, 255, 255]]);
        apply(ColorMode::Grayscale, &mut frame);
        assert_eq!(&frame.rgb[0..3], &[0, 0, 0]);
        assert_eq!(&frame.rgb[3..6], &[255, 255, 255]);
    }

    #[test]
    fn infrared_maps_dark_to_blue_and_bright_to_red() {
        let mut frame = frame_of(&[[0, 0, 0], [255, 255, 255]]);
        apply(ColorMode::Infrared, &mut frame);
        let dark = &frame.rgb[0..3];
        assert_eq!(dark[0], 0);
        assert_eq!(dark[1], 0);
        assert!(dark[2] > 0);
        let bright = &frame.rgb[3..6];
        assert!(bright[0] > 0);
        assert_eq!(bright[1], 0);
        assert_eq!(bright[2], 0);
    }

    #[test]
    fn mode_codes_match_the_buttons() {
        assert_eq!(ColorMode::from_code("C"), Some(ColorMode::Color));
        assert_eq!(ColorMode::from_code("B"), Some(ColorMode::Grayscale));
        assert_eq!(ColorMode::from_code("I"), Some(ColorMode::Infrared));
        assert_eq!(ColorMode::from_code("X"), None);
    }

    #[test]
    fn mode_survives_the_atomic_round_trip() {
        for mode in [ColorMode::Color, ColorMode::Grayscale, ColorMode::Infrared] {
            assert_eq!(ColorMode::from_u8(mode.as_u8()), mode);
        }
    }
}
