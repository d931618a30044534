use std::ops::Deref;

use image::{GrayImage, Luma};

use crate::common::{
    bit_utils::BitStream,
    codec::Mode,
    iter::EncRegionIter,
    mask::MaskPattern,
    metadata::{Color, ECLevel, Version},
};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Module {
    Empty,
    Func(Color),
    Data(Color),
}

impl Deref for Module {
    type Target = Color;
    fn deref(&self) -> &Self::Target {
        match self {
            Module::Empty => &Color::Light,
            Module::Func(c) => c,
            Module::Data(c) => c,
        }
    }
}

#[derive(Debug, Clone)]
pub struct QR {
    grid: Box<[Module]>,
    w: usize,
    ver: Version,
    ecl: ECLevel,
    mode: Mode,
    text: String,
    mask: Option<MaskPattern>,
}

// QR type for builder
//------------------------------------------------------------------------------

impl QR {
    pub(crate) fn new(ver: Version, ecl: ECLevel, mode: Mode, text: &str) -> Self {
        let w = ver.width();
        let grid = vec![Module::Empty; w * w].into_boxed_slice();
        Self { grid, w, ver, ecl, mode, text: text.to_string(), mask: None }
    }

    pub fn grid(&self) -> &[Module] {
        &self.grid
    }

    pub fn version(&self) -> Version {
        self.ver
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn ec_level(&self) -> ECLevel {
        self.ecl
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn mask(&self) -> Option<MaskPattern> {
        self.mask
    }

    pub fn metadata(&self) -> String {
        let mask = match self.mask {
            Some(m) => format!("{}", *m),
            None => "None".to_string(),
        };
        format!(
            "{{ Version: {}, Ec level: {:?}, Mode: {}, Mask: {} }}",
            *self.ver, self.ecl, self.mode, mask
        )
    }

    pub fn count_dark_modules(&self) -> usize {
        self.grid.iter().filter(|&m| matches!(**m, Color::Dark)).count()
    }

    #[cfg(test)]
    pub fn to_debug_str(&self) -> String {
        let w = self.w as i16;
        let mut res = String::with_capacity((w * (w + 1)) as usize);
        res.push('\n');
        for i in 0..w {
            for j in 0..w {
                let c = match self.get(i, j) {
                    Module::Empty => '.',
                    Module::Func(Color::Dark) => 'f',
                    Module::Func(Color::Light) => 'F',
                    Module::Data(Color::Dark) => 'd',
                    Module::Data(Color::Light) => 'D',
                };
                res.push(c);
            }
            res.push('\n');
        }
        res
    }

    fn coord_to_index(&self, r: i16, c: i16) -> usize {
        let w = self.w as i16;
        debug_assert!(-w <= r && r < w, "row should be greater than or equal to w");
        debug_assert!(-w <= c && c < w, "column should be greater than or equal to w");

        let r = if r < 0 { r + w } else { r };
        let c = if c < 0 { c + w } else { c };
        (r * w + c) as _
    }

    pub fn get(&self, r: i16, c: i16) -> Module {
        self.grid[self.coord_to_index(r, c)]
    }

    pub fn is_dark(&self, r: i16, c: i16) -> bool {
        *self.get(r, c) == Color::Dark
    }

    fn get_mut(&mut self, r: i16, c: i16) -> &mut Module {
        let index = self.coord_to_index(r, c);
        &mut self.grid[index]
    }

    fn set(&mut self, r: i16, c: i16, module: Module) {
        *self.get_mut(r, c) = module;
    }
}

#[cfg(test)]
mod qr_util_tests {
    use crate::builder::{Module, QR};
    use crate::common::codec::Mode;
    use crate::common::metadata::{Color, ECLevel, DEFAULT_VERSION};

    fn empty_qr() -> QR {
        QR::new(DEFAULT_VERSION, ECLevel::L, Mode::Byte, "")
    }

    #[test]
    fn test_index_wrap() {
        let mut qr = empty_qr();
        let w = qr.w as i16;
        qr.set(-1, -1, Module::Func(Color::Dark));
        assert_eq!(qr.get(w - 1, w - 1), Module::Func(Color::Dark));
        qr.set(0, 0, Module::Func(Color::Dark));
        assert_eq!(qr.get(-w, -w), Module::Func(Color::Dark));
    }

    #[test]
    #[should_panic]
    fn test_row_out_of_bound() {
        let qr = empty_qr();
        let w = qr.w as i16;
        qr.get(w, 0);
    }

    #[test]
    #[should_panic]
    fn test_col_out_of_bound() {
        let qr = empty_qr();
        let w = qr.w as i16;
        qr.get(0, w);
    }

    #[test]
    #[should_panic]
    fn test_row_index_overwrap() {
        let qr = empty_qr();
        let w = qr.w as i16;
        qr.get(-(w + 1), 0);
    }

    #[test]
    fn test_metadata() {
        let qr = QR::new(DEFAULT_VERSION, ECLevel::Q, Mode::Numeric, "123");
        assert_eq!(qr.metadata(), "{ Version: 4, Ec level: Q, Mode: NUMERIC, Mask: None }");
        assert_eq!(qr.width(), 33);
        assert_eq!(qr.text(), "123");
    }
}

// Finder pattern & separators
//------------------------------------------------------------------------------

impl QR {
    fn draw_finder_patterns(&mut self) {
        self.draw_finder_pattern_at(0, 0);
        self.draw_finder_pattern_at(0, -7);
        self.draw_finder_pattern_at(-7, 0);
    }

    // (r, c) is the top left corner of the 7x7 pattern
    fn draw_finder_pattern_at(&mut self, r: i16, c: i16) {
        for i in 0..7 {
            for j in 0..7 {
                self.set(
                    r + i,
                    c + j,
                    match (i, j) {
                        (0 | 6, _) | (_, 0 | 6) => Module::Func(Color::Dark),
                        (1 | 5, _) | (_, 1 | 5) => Module::Func(Color::Light),
                        _ => Module::Func(Color::Dark),
                    },
                );
            }
        }
    }

    fn draw_separators(&mut self) {
        let light = Module::Func(Color::Light);
        for i in 0..8 {
            // Top left
            self.set(7, i, light);
            self.set(i, 7, light);
            // Top right
            self.set(7, -8 + i, light);
            self.set(i, -8, light);
            // Bottom left
            self.set(-8, i, light);
            self.set(-8 + i, 7, light);
        }
    }
}


// Timing pattern & dark module
//------------------------------------------------------------------------------

impl QR {
    fn draw_timing_pattern(&mut self) {
        let w = self.w as i16;
        self.draw_line(6, 8, 6, w - 9);
        self.draw_line(8, 6, w - 9, 6);
    }

    fn draw_line(&mut self, r1: i16, c1: i16, r2: i16, c2: i16) {
        debug_assert!(r1 == r2 || c1 == c2, "Line is neither vertical nor horizontal");

        if r1 == r2 {
            for j in c1..=c2 {
                let m =
                    if j & 1 == 0 { Module::Func(Color::Dark) } else { Module::Func(Color::Light) };
                self.set(r1, j, m);
            }
        } else {
            for i in r1..=r2 {
                let m =
                    if i & 1 == 0 { Module::Func(Color::Dark) } else { Module::Func(Color::Light) };
                self.set(i, c1, m);
            }
        }
    }

    fn draw_dark_module(&mut self) {
        let (r, c) = self.ver.dark_module();
        self.set(r, c, Module::Func(Color::Dark));
    }
}


// All function patterns
//------------------------------------------------------------------------------

impl QR {
    pub(crate) fn draw_all_function_patterns(&mut self) {
        self.draw_finder_patterns();
        self.draw_separators();
        self.draw_timing_pattern();
        self.draw_dark_module();
    }
}

#[cfg(test)]
mod all_function_patterns_test {
    use crate::builder::{Module, QR};
    use crate::common::codec::Mode;
    use crate::common::metadata::{ECLevel, DEFAULT_VERSION};

    #[test]
    fn test_all_function_patterns() {
        let mut qr = QR::new(DEFAULT_VERSION, ECLevel::L, Mode::Byte, "");
        qr.draw_all_function_patterns();
        assert_eq!(
            qr.to_debug_str(),
            "\n\
             fffffffF.................Ffffffff\n\
             fFFFFFfF.................FfFFFFFf\n\
             fFfffFfF.................FfFfffFf\n\
             fFfffFfF.................FfFfffFf\n\
             fFfffFfF.................FfFfffFf\n\
             fFFFFFfF.................FfFFFFFf\n\
             fffffffFfFfFfFfFfFfFfFfFfFfffffff\n\
             FFFFFFFF.................FFFFFFFF\n\
             ......f..........................\n\
             ......F..........................\n\
             ......f..........................\n\
             ......F..........................\n\
             ......f..........................\n\
             ......F..........................\n\
             ......f..........................\n\
             ......F..........................\n\
             ......f..........................\n\
             ......F..........................\n\
             ......f..........................\n\
             ......F..........................\n\
             ......f..........................\n\
             ......F..........................\n\
             ......f..........................\n\
             ......F..........................\n\
             ......f..........................\n\
             FFFFFFFFf........................\n\
             fffffffF.........................\n\
             fFFFFFfF.........................\n\
             fFfffFfF.........................\n\
             fFfffFfF.........................\n\
             fFfffFfF.........................\n\
             fFFFFFfF.........................\n\
             fffffffF.........................\n",
        );
    }

    #[test]
    fn test_writable_module_count() {
        let mut qr = QR::new(DEFAULT_VERSION, ECLevel::L, Mode::Byte, "");
        qr.draw_all_function_patterns();
        let empty = qr.grid().iter().filter(|m| matches!(m, Module::Empty)).count();
        assert_eq!(empty, 862);
    }
}

// Encoding region
//------------------------------------------------------------------------------

impl QR {
    /// Writes `payload` into the empty modules along the placement scan, then
    /// resolves every module still empty to light.
    pub(crate) fn draw_encoding_region(&mut self, payload: BitStream) {
        let payload_len = payload.len();
        let mut placed = 0;
        let mut coords = EncRegionIter::new(self.ver);
        for bit in payload {
            let module = Module::Data(Color::from(bit));
            for (r, c) in coords.by_ref() {
                if matches!(self.get(r, c), Module::Empty) {
                    self.set(r, c, module);
                    placed += 1;
                    break;
                }
            }
        }
        debug_assert_eq!(placed, payload_len, "Payload overflows the encoding region");

        self.fill_remainder();
        debug_assert!(!self.grid.contains(&Module::Empty), "Empty module found after placement");
    }

    fn fill_remainder(&mut self) {
        self.grid
            .iter_mut()
            .filter(|m| matches!(m, Module::Empty))
            .for_each(|m| *m = Module::Data(Color::Light));
    }

    /// Modules a mask must never flip: the three corner blocks, row 6 and
    /// column 6.
    pub fn is_function_region(&self, r: i16, c: i16) -> bool {
        let w = self.w as i16;
        (r < 9 && c < 9) || (r < 9 && c >= w - 8) || (r >= w - 8 && c < 9) || r == 6 || c == 6
    }

    pub(crate) fn apply_mask(&mut self, pattern: MaskPattern) {
        self.mask = Some(pattern);
        let mask_fn = pattern.mask_function();
        let w = self.w as i16;
        for r in 0..w {
            for c in 0..w {
                if self.is_function_region(r, c) || !mask_fn(r, c) {
                    continue;
                }
                if let Module::Data(clr) = self.get(r, c) {
                    self.set(r, c, Module::Data(!clr))
                }
            }
        }
    }
}


// Render
//------------------------------------------------------------------------------

impl QR {
    /// Console rendering: two glyphs per module with a quiet zone around the
    /// symbol.
    pub fn to_console_str(&self) -> String {
        let blank = "  ".repeat(self.w + 2 * QUIET_ZONE);
        let margin = "  ".repeat(QUIET_ZONE);
        let mut canvas = String::new();
        for _ in 0..QUIET_ZONE {
            canvas.push_str(&blank);
            canvas.push('\n');
        }
        for r in 0..self.w as i16 {
            canvas.push_str(&margin);
            for c in 0..self.w as i16 {
                canvas.push_str(self.get(r, c).select("██", "  "));
            }
            canvas.push_str(&margin);
            canvas.push('\n');
        }
        for _ in 0..QUIET_ZONE {
            canvas.push_str(&blank);
            canvas.push('\n');
        }
        canvas
    }

    /// Plain text grid: one mark per dark module, a space per light module.
    pub fn to_text(&self) -> String {
        let mut canvas = String::with_capacity(self.w * (self.w * 3 + 1));
        for r in 0..self.w as i16 {
            for c in 0..self.w as i16 {
                canvas.push(self.get(r, c).select('█', ' '));
            }
            canvas.push('\n');
        }
        canvas
    }

    pub fn to_image(&self, module_sz: u32) -> GrayImage {
        let qz_sz = QUIET_ZONE as u32 * module_sz;
        let qr_sz = self.w as u32 * module_sz;
        let total_sz = qz_sz + qr_sz + qz_sz;

        let mut canvas = GrayImage::new(total_sz, total_sz);
        for i in 0..total_sz {
            for j in 0..total_sz {
                if i < qz_sz || i >= qz_sz + qr_sz || j < qz_sz || j >= qz_sz + qr_sz {
                    canvas.put_pixel(j, i, Luma([255]));
                    continue;
                }
                let r = ((i - qz_sz) / module_sz) as i16;
                let c = ((j - qz_sz) / module_sz) as i16;

                debug_assert!(self.get(r, c) != Module::Empty, "Empty module found at: {r} {c}");
                let pixel = self.get(r, c).select(Luma([0]), Luma([255]));
                canvas.put_pixel(j, i, pixel);
            }
        }

        canvas
    }
}


// Global constants
//------------------------------------------------------------------------------

pub const QUIET_ZONE: usize = 4;
