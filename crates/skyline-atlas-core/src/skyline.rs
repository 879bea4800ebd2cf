//! Skyline bookkeeping for filling a single atlas.
//!
//! The skyline is the upper boundary of occupied space, stored as horizontal
//! segments that tile the atlas width left to right. Heights are measured from
//! the atlas' far edge (y = atlas height in top-left pixel coordinates) and grow
//! towards y = 0 as images are stacked.

/// One horizontal run of the skyline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment {
    pub left: u32,
    pub width: u32,
    pub height: u32,
}

impl Segment {
    #[inline]
    fn right(&self) -> u32 {
        self.left + self.width
    }
}

/// Orientation and footprint chosen for an image above a segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fit {
    /// Placed width (post-rotation).
    pub width: u32,
    /// Placed height (post-rotation).
    pub height: u32,
    pub flipped: bool,
}

pub struct Skyline {
    width: u32,
    height: u32,
    segments: Vec<Segment>,
}

impl Skyline {
    /// A flat skyline at height 0 spanning `width`.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            segments: vec![Segment {
                left: 0,
                width,
                height: 0,
            }],
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// True once a single segment at full height covers the width: nothing fits anymore.
    pub fn is_closed(&self) -> bool {
        match self.segments.as_slice() {
            [only] => only.left == 0 && only.width == self.width && only.height == self.height,
            _ => false,
        }
    }

    /// Index of the lowest segment; the leftmost one on ties.
    pub fn lowest(&self) -> usize {
        let mut best = 0;
        for (i, seg) in self.segments.iter().enumerate().skip(1) {
            if seg.height < self.segments[best].height {
                best = i;
            }
        }
        best
    }

    /// Checks whether a `w`x`h` image fits directly above segment `index`.
    ///
    /// When both orientations fit, the one with the lower placed height wins and
    /// ties keep the image unrotated.
    pub fn fit(&self, index: usize, w: u32, h: u32, allow_rotation: bool) -> Option<Fit> {
        let seg = self.segments.get(index)?;
        let room = self.height - seg.height;

        let mut best: Option<Fit> = None;
        if w <= seg.width && h <= room {
            best = Some(Fit {
                width: w,
                height: h,
                flipped: false,
            });
        }
        if allow_rotation && h <= seg.width && w <= room {
            let lower = best.is_none_or(|b| b.height > w);
            if lower {
                best = Some(Fit {
                    width: h,
                    height: w,
                    flipped: true,
                });
            }
        }
        best
    }

    /// Stacks a footprint of `fit` onto the left end of segment `index` and
    /// returns the top-left pixel position of the placed image.
    ///
    /// Returns `None` and leaves the skyline untouched if `index` is out of range
    /// or the footprint does not fit above that segment.
    pub fn place(&mut self, index: usize, fit: &Fit) -> Option<(u32, u32)> {
        let seg = *self.segments.get(index)?;
        if fit.width == 0 || fit.width > seg.width || fit.height > self.height - seg.height {
            return None;
        }

        let top = seg.height + fit.height;
        self.segments[index] = Segment {
            left: seg.left,
            width: fit.width,
            height: top,
        };
        if fit.width < seg.width {
            self.segments.insert(
                index + 1,
                Segment {
                    left: seg.left + fit.width,
                    width: seg.width - fit.width,
                    height: seg.height,
                },
            );
        }
        self.flatten();

        Some((seg.left, self.height - top))
    }

    /// Gives up on the gap above segment `index`: lifts it to the lower of its
    /// neighbours (the atlas edge stands in for a missing neighbour).
    /// Returns false if `index` is out of range.
    pub fn raise(&mut self, index: usize) -> bool {
        if index >= self.segments.len() {
            return false;
        }
        let left = match index.checked_sub(1) {
            Some(prev) => self.segments[prev].height,
            None => self.height,
        };
        let right = match self.segments.get(index + 1) {
            Some(next) => next.height,
            None => self.height,
        };
        self.segments[index].height = left.min(right);
        self.flatten();
        true
    }

    /// Merges runs of adjacent segments that share a height.
    fn flatten(&mut self) {
        let mut i = 1;
        while i < self.segments.len() {
            if self.segments[i - 1].height == self.segments[i].height {
                let w = self.segments[i].width;
                self.segments[i - 1].width += w;
                self.segments.remove(i);
            } else {
                i += 1;
            }
        }
        debug_assert_eq!(
            self.segments.last().map(Segment::right),
            Some(self.width),
            "skyline must tile the atlas width"
        );
    }
}
