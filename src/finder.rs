//! Recolored finder patterns.

use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use log::info;

use crate::config::Palette;
use crate::raster::{Canvas, Layout};

/// Modules per side of a finder pattern.
pub const FINDER_MODULES: u32 = 7;

/// Top-left module of each finder pattern: top-left, top-right, bottom-left.
pub fn finder_positions(layout: &Layout) -> [(u32, u32); 3] {
    let far = layout.modules - FINDER_MODULES;
    [(0, 0), (far, 0), (0, far)]
}

/// Repaint the three finder patterns as hollow markers in the finder color.
///
/// Each marker keeps the 1:1:3:1:1 proportions scanners look for: a 7x7 outer square, a 5x5
/// background ring and a 3x3 core.
pub fn paint_finders(canvas: &mut Canvas, palette: &Palette) {
    let layout = canvas.layout;
    let unit = layout.box_size;
    for (mx, my) in finder_positions(&layout) {
        let (x, y) = layout.module_origin(mx, my);
        for (inset, modules, color) in [
            (0, FINDER_MODULES, palette.finder),
            (1, FINDER_MODULES - 2, palette.background),
            (2, FINDER_MODULES - 4, palette.finder),
        ] {
            let rect = Rect::at((x + inset * unit) as i32, (y + inset * unit) as i32)
                .of_size(modules * unit, modules * unit);
            draw_filled_rect_mut(&mut canvas.image, rect, color.rgba());
        }
    }
    info!("Added custom hollow finder patterns.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Color, Ecl};
    use crate::raster::render_symbol;

    #[test]
    fn test_finder_positions() {
        let layout = Layout { modules: 25, box_size: 1, border: 0, outer_border: 0 };
        assert_eq!(finder_positions(&layout), [(0, 0), (18, 0), (0, 18)]);
    }

    #[test]
    fn test_finders_are_recolored() {
        let palette = Palette::default();
        let mut canvas = render_symbol("https://example.com", Ecl::H, 5, 4, 0, &palette).unwrap();
        paint_finders(&mut canvas, &palette);
        let layout = canvas.layout;

        for (mx, my) in finder_positions(&layout) {
            let (x, y) = layout.module_origin(mx, my);
            // Outer ring, inner ring and core, sampled at module centers.
            assert_eq!(*canvas.image.get_pixel(x + 2, y + 2), palette.finder.rgba());
            assert_eq!(*canvas.image.get_pixel(x + 7, y + 7), Color::WHITE.rgba());
            assert_eq!(*canvas.image.get_pixel(x + 17, y + 17), palette.finder.rgba());
        }
        // Separator just outside the top-left marker stays background.
        let (x, y) = layout.module_origin(7, 0);
        assert_eq!(*canvas.image.get_pixel(x + 2, y + 2), palette.background.rgba());
    }
}
