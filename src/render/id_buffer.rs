//! ID pass output: per-pixel prim id, element id and depth.

/// One ID-buffer texel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdSample {
    /// 1-based draw item id, `0` for background.
    pub prim: u32,
    /// 1-based coarse element id, `0` for none.
    pub element: u32,
    /// Window-space depth in `[0, 1]`, `1.0` for background.
    pub depth: f32,
}

impl IdSample {
    /// Cleared texel.
    pub const BACKGROUND: Self = Self {
        prim: 0,
        element: 0,
        depth: 1.0,
    };

    /// Whether something was drawn here.
    #[must_use]
    pub fn is_hit(&self) -> bool {
        self.prim != 0
    }
}

/// Row-major ID buffer (row 0 is the top of the target).
#[derive(Debug, Clone, PartialEq)]
pub struct IdBuffer {
    width: u32,
    height: u32,
    samples: Vec<IdSample>,
}

impl IdBuffer {
    /// Buffer cleared to background.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            samples: vec![IdSample::BACKGROUND; width as usize * height as usize],
        }
    }

    /// Assemble from separately read-back channels.
    #[must_use]
    pub fn from_channels(
        width: u32,
        height: u32,
        prims: &[u32],
        elements: &[u32],
        depths: &[f32],
    ) -> Self {
        let samples = prims
            .iter()
            .zip(elements)
            .zip(depths)
            .map(|((&prim, &element), &depth)| IdSample {
                prim,
                element,
                depth,
            })
            .collect();
        Self {
            width,
            height,
            samples,
        }
    }

    /// Width in texels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in texels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Texel at `(x, y)`, background if out of range.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> IdSample {
        if x >= self.width || y >= self.height {
            return IdSample::BACKGROUND;
        }
        self.samples[(y * self.width + x) as usize]
    }

    /// Depth-tested write; returns whether the texel was replaced.
    pub fn write(&mut self, x: u32, y: u32, sample: IdSample) -> bool {
        let idx = (y * self.width + x) as usize;
        match self.samples.get_mut(idx) {
            Some(texel) if sample.depth < texel.depth => {
                *texel = sample;
                true
            }
            _ => false,
        }
    }

    /// Every texel with something drawn, with its coordinates, row by row.
    pub fn hits(&self) -> impl Iterator<Item = (u32, u32, IdSample)> + '_ {
        let width = self.width;
        self.samples
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_hit())
            .map(move |(i, s)| (i as u32 % width, i as u32 / width, *s))
    }
}
