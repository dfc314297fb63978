pub mod app;
pub mod images;
pub mod scene;
pub mod theme;
pub mod view;

pub const NOTE_GLYPH: &str = "\u{266A}";
pub const LABEL_RATIO: f64 = 0.35; // record label vs disk radius
pub const SPINDLE_RATIO: f64 = 0.06;
