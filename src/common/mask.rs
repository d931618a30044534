use std::ops::Deref;

use super::error::{QRError, QRResult};
use super::metadata::Color;
use crate::builder::QR;

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord)]
pub struct MaskPattern(u8);

impl MaskPattern {
    pub fn new(pattern: u8) -> QRResult<Self> {
        if pattern < 8 {
            Ok(Self(pattern))
        } else {
            Err(QRError::InvalidMaskingPattern)
        }
    }
}

impl Deref for MaskPattern {
    type Target = u8;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

mod mask_functions {
    pub fn checkerboard(r: i16, c: i16) -> bool {
        (r + c) & 1 == 0
    }

    pub fn horizontal_lines(r: i16, _: i16) -> bool {
        r & 1 == 0
    }

    pub fn vertical_lines(_: i16, c: i16) -> bool {
        c % 3 == 0
    }

    pub fn diagonal_lines(r: i16, c: i16) -> bool {
        (r + c) % 3 == 0
    }

    pub fn large_checkerboard(r: i16, c: i16) -> bool {
        ((r >> 1) + (c / 3)) & 1 == 0
    }

    pub fn fields(r: i16, c: i16) -> bool {
        ((r * c) & 1) + ((r * c) % 3) == 0
    }

    pub fn diamonds(r: i16, c: i16) -> bool {
        (((r * c) & 1) + ((r * c) % 3)) & 1 == 0
    }

    pub fn meadow(r: i16, c: i16) -> bool {
        (((r + c) & 1) + ((r * c) % 3)) & 1 == 0
    }
}

impl MaskPattern {
    pub fn mask_function(self) -> fn(i16, i16) -> bool {
        match *self {
            0b000 => mask_functions::checkerboard,
            0b001 => mask_functions::horizontal_lines,
            0b010 => mask_functions::vertical_lines,
            0b011 => mask_functions::diagonal_lines,
            0b100 => mask_functions::large_checkerboard,
            0b101 => mask_functions::fields,
            0b110 => mask_functions::diamonds,
            0b111 => mask_functions::meadow,
            _ => unreachable!("Invalid pattern {}", self.0),
        }
    }
}


// Mask selection
//------------------------------------------------------------------------------

/// Scores every pattern against the current grid, applies the lowest scoring
/// one and returns it. Earlier patterns win ties.
pub fn apply_best_mask(qr: &mut QR) -> MaskPattern {
    let best_mask = (0..8)
        .map(MaskPattern)
        .min_by_key(|&m| compute_masked_penalty(qr, m))
        .unwrap_or(MaskPattern(0));
    qr.apply_mask(best_mask);
    best_mask
}

/// Penalty of `qr` with `pattern` applied, evaluated on a scoped copy so the
/// baseline grid is left untouched.
pub fn compute_masked_penalty(qr: &QR, pattern: MaskPattern) -> u32 {
    let mut trial = qr.clone();
    trial.apply_mask(pattern);
    compute_total_penalty(&trial)
}

pub fn compute_total_penalty(qr: &QR) -> u32 {
    compute_adjacent_penalty(qr)
}

// Every maximal run of 5 or more same colored modules in a row or column costs
// its length minus 2
fn compute_adjacent_penalty(qr: &QR) -> u32 {
    let w = qr.width() as i16;
    let mut pen = 0;
    for i in 0..w {
        pen += compute_run_penalty((0..w).map(|j| *qr.get(i, j)));
        pen += compute_run_penalty((0..w).map(|j| *qr.get(j, i)));
    }
    pen
}

fn compute_run_penalty(line: impl Iterator<Item = Color>) -> u32 {
    let mut pen = 0;
    let mut last = None;
    let mut run = 0;
    for clr in line {
        if last == Some(clr) {
            run += 1;
            continue;
        }
        if run >= 5 {
            pen += run - 2;
        }
        last = Some(clr);
        run = 1;
    }
    if run >= 5 {
        pen += run - 2;
    }
    pen
}
