use crate::config::AtlasConfig;
use crate::error::{AtlasError, Result};
use crate::model::{
    Atlas, AtlasId, AtlasSet, Frame, ImageEntry, ImageId, PackStats, Page, Placement,
};
use crate::order::pack_order;
use crate::sizing::atlas_size_for;
use crate::skyline::Skyline;
use std::collections::HashMap;
use tracing::{debug, instrument, trace};

/// Packs a changing set of images into power-of-two atlases.
///
/// Images wait in an unprocessed queue until [`AtlasManager::pack_all`] moves each of
/// them into exactly one atlas. Every image is either queued or placed, never both.
///
/// Atlases whose last fill ran out of images (non-tight) are torn down whenever a new
/// atlas is opened, and their images are offered to the new one together with the
/// rest of the queue.
pub struct AtlasManager {
    cfg: AtlasConfig,
    images: HashMap<ImageId, ImageEntry>,
    queue: Vec<ImageId>,
    atlases: Vec<Atlas>,
    next_image: u64,
    next_atlas: u64,
}

impl Default for AtlasManager {
    fn default() -> Self {
        Self::with_valid_config(AtlasConfig::default())
    }
}

impl AtlasManager {
    pub fn new(cfg: AtlasConfig) -> Result<Self> {
        cfg.validate()?;
        Ok(Self::with_valid_config(cfg))
    }

    fn with_valid_config(cfg: AtlasConfig) -> Self {
        Self {
            cfg,
            images: HashMap::new(),
            queue: Vec::new(),
            atlases: Vec::new(),
            next_image: 0,
            next_atlas: 0,
        }
    }

    pub fn config(&self) -> &AtlasConfig {
        &self.cfg
    }

    /// Registers a `width`x`height` image and appends it to the unprocessed queue.
    ///
    /// `key` is a label for consumers; two images may share a key and still be
    /// distinct. The returned id is the image's identity.
    pub fn enqueue(&mut self, key: impl Into<String>, width: u32, height: u32) -> Result<ImageId> {
        if width == 0 || height == 0 {
            return Err(AtlasError::InvalidDimensions { width, height });
        }
        let id = ImageId(self.next_image);
        self.next_image += 1;
        self.images.insert(
            id,
            ImageEntry {
                key: key.into(),
                width,
                height,
                seq: id.0,
                placement: None,
            },
        );
        self.queue.push(id);
        Ok(id)
    }

    /// Removes an image from the manager, wherever it currently is.
    ///
    /// Taking an image out of an atlas empties or loosens it: an emptied atlas is
    /// dropped, any other is marked non-tight. Returns false for unknown ids.
    pub fn dequeue(&mut self, id: ImageId) -> bool {
        if !self.detach(id) {
            return false;
        }
        self.images.remove(&id);
        true
    }

    /// Sends an image back to the end of the unprocessed queue, detaching it from its
    /// atlas the same way [`AtlasManager::dequeue`] would. A queued image only moves to
    /// the back. Returns false for unknown ids.
    pub fn requeue(&mut self, id: ImageId) -> bool {
        if !self.detach(id) {
            return false;
        }
        let seq = self.next_image;
        self.next_image += 1;
        if let Some(entry) = self.images.get_mut(&id) {
            entry.seq = seq;
        }
        self.queue.push(id);
        true
    }

    /// Takes `id` out of the queue or its atlas, leaving it registered but nowhere.
    fn detach(&mut self, id: ImageId) -> bool {
        let Some(entry) = self.images.get_mut(&id) else {
            return false;
        };
        match entry.placement.take() {
            None => self.queue.retain(|&q| q != id),
            Some(placement) => {
                if let Some(pos) = self.atlases.iter().position(|a| a.id == placement.atlas) {
                    let atlas = &mut self.atlases[pos];
                    atlas.images.retain(|&i| i != id);
                    if atlas.images.is_empty() {
                        debug!(atlas = atlas.id.0, "atlas emptied; dropping it");
                        self.atlases.remove(pos);
                    } else {
                        atlas.tight = false;
                    }
                }
            }
        }
        true
    }

    /// Places every queued image, opening atlases around the largest one left.
    ///
    /// A second call without new enqueues does nothing.
    #[instrument(skip_all)]
    pub fn pack_all(&mut self) -> Result<()> {
        self.sort_queue();
        while let Some(&front) = self.queue.first() {
            self.prepare_image(front)?;
        }
        debug!(
            atlases = self.atlases.len(),
            images = self.images.len(),
            "pack_all finished"
        );
        Ok(())
    }

    /// Opens a new atlas sized for `id` and fills it, starting with `id`.
    ///
    /// Before filling, every non-tight atlas is reclaimed and its images rejoin the
    /// queue. No-op if the image is already placed or unknown.
    pub fn prepare_image(&mut self, id: ImageId) -> Result<()> {
        let Some(entry) = self.images.get(&id) else {
            return Ok(());
        };
        if entry.placement.is_some() {
            return Ok(());
        }

        let (width, height) = atlas_size_for(self.cfg.min_dimension, entry.width, entry.height)?;
        let mut atlas = Atlas::new(AtlasId(self.next_atlas), width, height);
        self.next_atlas += 1;
        debug!(
            atlas = atlas.id.0,
            width,
            height,
            trigger = entry.key.as_str(),
            "opening atlas"
        );

        self.reclaim_loose_atlases();

        self.queue.retain(|&q| q != id);
        self.sort_queue();
        self.queue.insert(0, id);

        self.fill_atlas(&mut atlas);

        atlas.tight = !self.queue.is_empty();
        debug!(
            atlas = atlas.id.0,
            images = atlas.images.len(),
            tight = atlas.tight,
            "atlas filled"
        );
        self.atlases.push(atlas);
        Ok(())
    }

    /// Moves the images of every non-tight atlas back to the queue and drops those atlases.
    fn reclaim_loose_atlases(&mut self) {
        let (loose, kept): (Vec<Atlas>, Vec<Atlas>) =
            std::mem::take(&mut self.atlases).into_iter().partition(|a| !a.tight);
        self.atlases = kept;

        for atlas in loose {
            debug!(
                atlas = atlas.id.0,
                images = atlas.images.len(),
                "reclaiming non-tight atlas"
            );
            for id in atlas.images {
                if let Some(entry) = self.images.get_mut(&id) {
                    entry.placement = None;
                }
                self.queue.push(id);
            }
        }
    }

    fn sort_queue(&mut self) {
        let images = &self.images;
        self.queue
            .sort_by(|a, b| match (images.get(a), images.get(b)) {
                (Some(ea), Some(eb)) => pack_order(ea, eb),
                _ => a.cmp(b),
            });
    }

    /// Fills `atlas` from the front of the queue using the skyline, lowest gap first.
    ///
    /// Each step either places the first queued image that fits above the lowest
    /// segment, or raises that segment to its lower neighbour. Stops when the queue
    /// is empty or the skyline is closed.
    fn fill_atlas(&mut self, atlas: &mut Atlas) {
        let allow_rotation = self.cfg.allow_rotation;
        let mut skyline = Skyline::new(atlas.width, atlas.height);

        while !self.queue.is_empty() && !skyline.is_closed() {
            let lowest = skyline.lowest();

            let found = self.queue.iter().enumerate().find_map(|(qi, id)| {
                let entry = self.images.get(id)?;
                skyline
                    .fit(lowest, entry.width, entry.height, allow_rotation)
                    .map(|fit| (qi, fit))
            });

            let placed = found
                .and_then(|(qi, fit)| skyline.place(lowest, &fit).map(|pos| (qi, fit, pos)));
            match placed {
                Some((qi, fit, (x, y))) => {
                    let id = self.queue.remove(qi);
                    if let Some(entry) = self.images.get_mut(&id) {
                        entry.placement = Some(Placement {
                            atlas: atlas.id,
                            x,
                            y,
                            flipped: fit.flipped,
                        });
                        trace!(
                            atlas = atlas.id.0,
                            key = entry.key.as_str(),
                            x,
                            y,
                            flipped = fit.flipped,
                            "placed"
                        );
                    }
                    atlas.images.push(id);
                }
                None => {
                    trace!(atlas = atlas.id.0, segment = lowest, "nothing fits; raising");
                    skyline.raise(lowest);
                }
            }
        }
    }

    pub fn image(&self, id: ImageId) -> Option<&ImageEntry> {
        self.images.get(&id)
    }

    /// Placement of `id`; `None` if it is queued or unknown.
    pub fn placement(&self, id: ImageId) -> Option<&Placement> {
        self.images.get(&id).and_then(|e| e.placement.as_ref())
    }

    pub fn is_queued(&self, id: ImageId) -> bool {
        self.images
            .get(&id)
            .is_some_and(|e| e.placement.is_none())
    }

    /// Unprocessed images in their current queue order.
    pub fn queued(&self) -> &[ImageId] {
        &self.queue
    }

    pub fn atlases(&self) -> &[Atlas] {
        &self.atlases
    }

    pub fn atlas(&self, id: AtlasId) -> Option<&Atlas> {
        self.atlases.iter().find(|a| a.id == id)
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    pub fn atlas_count(&self) -> usize {
        self.atlases.len()
    }

    /// Copies the live atlases into a serializable record for renderers and writers.
    pub fn snapshot(&self) -> AtlasSet {
        let pages = self
            .atlases
            .iter()
            .map(|atlas| {
                let frames = atlas
                    .images
                    .iter()
                    .filter_map(|id| {
                        let entry = self.images.get(id)?;
                        let frame = entry.frame()?;
                        Some(Frame {
                            image: *id,
                            key: entry.key.clone(),
                            frame,
                            flipped: entry.placement.is_some_and(|p| p.flipped),
                            source_size: (entry.width, entry.height),
                        })
                    })
                    .collect();
                Page {
                    id: atlas.id,
                    width: atlas.width,
                    height: atlas.height,
                    tight: atlas.tight,
                    frames,
                }
            })
            .collect();
        AtlasSet { pages }
    }

    pub fn stats(&self) -> PackStats {
        let mut stats = self.snapshot().stats();
        stats.num_queued = self.queue.len();
        stats
    }
}
