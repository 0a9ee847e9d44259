//! Font registration for chart text.
//!
//! Chart text is rasterised with `ab_glyph`, which needs a TrueType font
//! registered up front. The first readable font from `DIABETES_CHART_FONT` or
//! a list of common system locations is registered as the sans-serif family.
//! Without one, charts are drawn without titles, axis labels or legends.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use plotters::style::{FontStyle, register_font};

use super::FONT_FAMILY;

/// Environment variable naming a TrueType font to use for chart text
pub const FONT_ENV: &str = "DIABETES_CHART_FONT";

const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

static TEXT_AVAILABLE: OnceLock<bool> = OnceLock::new();

/// Whether a font has been registered for chart text
pub fn text_available() -> bool {
    *TEXT_AVAILABLE.get_or_init(|| {
        let candidates = std::env::var(FONT_ENV)
            .ok()
            .map(PathBuf::from)
            .into_iter()
            .chain(SYSTEM_FONTS.iter().map(PathBuf::from));

        for path in candidates {
            if register_from(&path) {
                log::debug!("Using chart font {}", path.display());
                return true;
            }
        }

        log::warn!("No TrueType font found (set {FONT_ENV}); charts will be drawn without text");
        false
    })
}

fn register_from(path: &Path) -> bool {
    let Ok(bytes) = std::fs::read(path) else {
        return false;
    };
    // Registered fonts live for the rest of the process
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    register_font(FONT_FAMILY, FontStyle::Normal, bytes).is_ok()
}
