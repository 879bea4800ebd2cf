use serde::{Deserialize, Serialize};

/// Handle of an image registered with an `AtlasManager`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(pub(crate) u64);

impl ImageId {
    pub fn index(&self) -> u64 {
        self.0
    }
}

/// Handle of a live atlas.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AtlasId(pub(crate) u64);

impl AtlasId {
    pub fn index(&self) -> u64 {
        self.0
    }
}

/// Axis-aligned rectangle (pixels). `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
    /// Inclusive right edge coordinate (`x + w - 1`).
    pub fn right(&self) -> u32 {
        self.x + self.w.saturating_sub(1)
    }
    /// Inclusive bottom edge coordinate (`y + h - 1`).
    pub fn bottom(&self) -> u32 {
        self.y + self.h.saturating_sub(1)
    }
    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }
    /// Returns true if `r` is fully inside `self` (inclusive edges).
    pub fn contains(&self, r: &Rect) -> bool {
        r.x >= self.x && r.y >= self.y && r.right() <= self.right() && r.bottom() <= self.bottom()
    }
    /// Returns true if the two rectangles share at least one pixel.
    pub fn intersects(&self, other: &Rect) -> bool {
        let ax2 = self.x + self.w;
        let ay2 = self.y + self.h;
        let bx2 = other.x + other.w;
        let by2 = other.y + other.h;
        !(self.x >= bx2 || other.x >= ax2 || self.y >= by2 || other.y >= ay2)
    }
}

/// Where an image ended up inside its atlas.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Placement {
    pub atlas: AtlasId,
    pub x: u32,
    pub y: u32,
    /// True if the image was rotated 90° when placed.
    pub flipped: bool,
}

/// An image known to the manager: caller-supplied size plus packing state.
#[derive(Debug, Clone)]
pub struct ImageEntry {
    pub(crate) key: String,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) seq: u64,
    pub(crate) placement: Option<Placement>,
}

impl ImageEntry {
    pub fn key(&self) -> &str {
        &self.key
    }
    pub fn width(&self) -> u32 {
        self.width
    }
    pub fn height(&self) -> u32 {
        self.height
    }
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
    /// Enqueue sequence number; later enqueues get larger numbers.
    pub fn sequence(&self) -> u64 {
        self.seq
    }
    /// `None` while the image waits in the unprocessed queue.
    pub fn placement(&self) -> Option<&Placement> {
        self.placement.as_ref()
    }
    /// Footprint in its atlas (post-rotation width/height), if placed.
    pub fn frame(&self) -> Option<Rect> {
        self.placement.map(|p| {
            let (w, h) = if p.flipped {
                (self.height, self.width)
            } else {
                (self.width, self.height)
            };
            Rect::new(p.x, p.y, w, h)
        })
    }
}

/// A fixed-size power-of-two container holding placed images.
#[derive(Debug, Clone)]
pub struct Atlas {
    pub(crate) id: AtlasId,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) images: Vec<ImageId>,
    pub(crate) tight: bool,
}

impl Atlas {
    pub(crate) fn new(id: AtlasId, width: u32, height: u32) -> Self {
        Self {
            id,
            width,
            height,
            images: Vec::new(),
            tight: false,
        }
    }
    pub fn id(&self) -> AtlasId {
        self.id
    }
    pub fn width(&self) -> u32 {
        self.width
    }
    pub fn height(&self) -> u32 {
        self.height
    }
    pub fn images(&self) -> &[ImageId] {
        &self.images
    }
    /// True when the last fill ran out of room rather than out of images.
    /// Tight atlases survive later repacks; the others are torn down and refilled.
    pub fn is_tight(&self) -> bool {
        self.tight
    }
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }
}

/// A placed image as handed to external renderers and serializers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Frame {
    pub image: ImageId,
    pub key: String,
    /// Placed rectangle within the page (post-rotation width/height).
    pub frame: Rect,
    pub flipped: bool,
    /// Original (unrotated) image size.
    pub source_size: (u32, u32),
}

/// A single atlas page (logical record).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub id: AtlasId,
    pub width: u32,
    pub height: u32,
    pub tight: bool,
    pub frames: Vec<Frame>,
}

/// Owned copy of every live atlas.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AtlasSet {
    pub pages: Vec<Page>,
}

/// Statistics about atlas packing efficiency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PackStats {
    /// Number of live atlases.
    pub num_atlases: usize,
    /// Number of tight atlases among them.
    pub num_tight: usize,
    /// Number of placed images.
    pub num_images: usize,
    /// Number of images still waiting in the unprocessed queue.
    pub num_queued: usize,
    /// Total area of all atlases.
    pub total_atlas_area: u64,
    /// Total area covered by placed images.
    pub used_area: u64,
    /// Occupancy ratio: used_area / total_atlas_area (0.0 to 1.0).
    pub occupancy: f64,
    pub max_atlas_width: u32,
    pub max_atlas_height: u32,
    /// Number of images placed rotated.
    pub num_flipped: usize,
}

impl AtlasSet {
    /// Computes packing statistics for this snapshot. The queue is not part of
    /// a snapshot, so `num_queued` is always zero here.
    pub fn stats(&self) -> PackStats {
        let mut stats = PackStats {
            num_atlases: self.pages.len(),
            num_tight: 0,
            num_images: 0,
            num_queued: 0,
            total_atlas_area: 0,
            used_area: 0,
            occupancy: 0.0,
            max_atlas_width: 0,
            max_atlas_height: 0,
            num_flipped: 0,
        };

        for page in &self.pages {
            stats.total_atlas_area += page.width as u64 * page.height as u64;
            stats.max_atlas_width = stats.max_atlas_width.max(page.width);
            stats.max_atlas_height = stats.max_atlas_height.max(page.height);
            if page.tight {
                stats.num_tight += 1;
            }
            for frame in &page.frames {
                stats.num_images += 1;
                stats.used_area += frame.frame.area();
                if frame.flipped {
                    stats.num_flipped += 1;
                }
            }
        }

        if stats.total_atlas_area > 0 {
            stats.occupancy = stats.used_area as f64 / stats.total_atlas_area as f64;
        }
        stats
    }
}

impl PackStats {
    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Atlases: {} ({} tight), Images: {}, Queued: {}, Occupancy: {:.2}%, Total Area: {} px², Used Area: {} px², Flipped: {}",
            self.num_atlases,
            self.num_tight,
            self.num_images,
            self.num_queued,
            self.occupancy * 100.0,
            self.total_atlas_area,
            self.used_area,
            self.num_flipped,
        )
    }

    /// Returns wasted space in pixels.
    pub fn wasted_area(&self) -> u64 {
        self.total_atlas_area.saturating_sub(self.used_area)
    }

    /// Returns wasted space as a percentage (0.0 to 100.0).
    pub fn waste_percentage(&self) -> f64 {
        if self.total_atlas_area > 0 {
            (self.wasted_area() as f64 / self.total_atlas_area as f64) * 100.0
        } else {
            0.0
        }
    }
}
