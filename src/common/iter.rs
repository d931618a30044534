use super::metadata::Version;

// Iterator for placing data in encoding region of QR
//------------------------------------------------------------------------------

/// Yields every coordinate of the placement scan: column pairs from the right
/// edge leftwards, skipping the vertical timing column, alternating upward and
/// downward per pair, right cell before left cell on each row.
pub struct EncRegionIter {
    r: i16,
    c: i16,
    width: i16,
    upward: bool,
    left: bool,
    vert_timing_col: i16,
}

impl EncRegionIter {
    pub const fn new(version: Version) -> Self {
        let w = version.width() as i16;
        Self { r: w - 1, c: w - 1, width: w, upward: true, left: false, vert_timing_col: 6 }
    }

    fn next_pair(&mut self) {
        self.c -= 2;
        if self.c == self.vert_timing_col {
            self.c -= 1;
        }
        self.upward = !self.upward;
    }
}

impl Iterator for EncRegionIter {
    type Item = (i16, i16);
    fn next(&mut self) -> Option<Self::Item> {
        if self.c <= 0 {
            return None;
        }

        let res = (self.r, self.c - self.left as i16);
        if !self.left {
            self.left = true;
            return Some(res);
        }

        self.left = false;
        match self.upward {
            true if self.r > 0 => self.r -= 1,
            false if self.r < self.width - 1 => self.r += 1,
            _ => self.next_pair(),
        }
        Some(res)
    }
}
