use image::{Rgba, RgbaImage};
use skyline_atlas_core::{Page, Rect};

const BACKGROUND: Rgba<u8> = Rgba([128, 128, 128, 255]);
const OUTLINE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Grey page with a 1 px white outline around every placed frame.
pub fn render_outlines(page: &Page) -> RgbaImage {
    let mut img = RgbaImage::from_pixel(page.width, page.height, BACKGROUND);
    for f in &page.frames {
        draw_outline(&mut img, &f.frame);
    }
    img
}

fn draw_outline(img: &mut RgbaImage, r: &Rect) {
    if r.w == 0 || r.h == 0 {
        return;
    }
    let (w, h) = img.dimensions();
    let x2 = r.right().min(w.saturating_sub(1));
    let y2 = r.bottom().min(h.saturating_sub(1));
    for x in r.x..=x2 {
        img.put_pixel(x, r.y, OUTLINE);
        img.put_pixel(x, y2, OUTLINE);
    }
    for y in r.y..=y2 {
        img.put_pixel(r.x, y, OUTLINE);
        img.put_pixel(x2, y, OUTLINE);
    }
}
