pub const PIXEL_MIN: u8 = 0;
pub const PIXEL_MAX: u8 = 255;
pub const SWATCH_GRAY: f64 = 127.;

/// Titles of the three threshold windows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WindowNames {
    pub controls: String,
    pub thresholded: String,
    pub original: String,
}

impl Default for WindowNames {
    fn default() -> Self {
        Self {
            controls: "Controls".to_string(),
            thresholded: "Thresholded".to_string(),
            original: "Original".to_string(),
        }
    }
}
