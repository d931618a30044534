use std::fmt::{Display, Formatter};

use super::bit_utils::BitStream;
use super::error::{QRError, QRResult};
use super::metadata::{ECLevel, Version};

// Mode
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Mode {
    Numeric = 0b0001,
    Alphanumeric = 0b0010,
    Byte = 0b0100,
    Kanji = 0b1000,
}

impl Mode {
    /// Picks the most restrictive mode able to represent every byte of `data`.
    /// Kanji is never selected.
    pub fn classify(data: &str) -> Self {
        let bytes = data.as_bytes();
        if bytes.is_empty() {
            return Self::Byte;
        }
        if bytes.iter().all(|&b| Self::Numeric.contains(b)) {
            Self::Numeric
        } else if bytes.iter().all(|&b| Self::Alphanumeric.contains(b)) {
            Self::Alphanumeric
        } else {
            Self::Byte
        }
    }

    pub fn contains(&self, byte: u8) -> bool {
        match self {
            Self::Numeric => byte.is_ascii_digit(),
            Self::Alphanumeric => {
                matches!(byte, b'0'..=b'9' | b'A'..=b'Z' | b' ' | b'$' | b'%' | b'*' | b'+' | b'-' | b'.' | b'/' | b':')
            }
            Self::Byte => true,
            Self::Kanji => false,
        }
    }

    #[inline]
    fn numeric_digit(char: u8) -> u16 {
        debug_assert!(Mode::Numeric.contains(char), "Invalid numeric data: {char}");
        (char - b'0') as u16
    }

    #[inline]
    fn alphanumeric_digit(char: u8) -> u16 {
        debug_assert!(Mode::Alphanumeric.contains(char), "Invalid alphanumeric data: {char}");
        match char {
            b'0'..=b'9' => (char - b'0') as u16,
            b'A'..=b'Z' => (char - b'A' + 10) as u16,
            b' ' => 36,
            b'$' => 37,
            b'%' => 38,
            b'*' => 39,
            b'+' => 40,
            b'-' => 41,
            b'.' => 42,
            b'/' => 43,
            b':' => 44,
            _ => unreachable!("Invalid alphanumeric {char}"),
        }
    }

    /// Value of a numeric group (up to 3 digits) or alphanumeric pair.
    pub fn encode_chunk(&self, data: &[u8]) -> QRResult<u16> {
        let len = data.len();
        match self {
            Self::Numeric => {
                debug_assert!(len <= 3, "Data is too long for numeric conversion: {len}");
                Ok(data.iter().fold(0_u16, |n, b| n * 10 + Self::numeric_digit(*b)))
            }
            Self::Alphanumeric => {
                debug_assert!(len <= 2, "Data is too long for alphanumeric conversion: {len}");
                Ok(data.iter().fold(0_u16, |n, b| n * 45 + Self::alphanumeric_digit(*b)))
            }
            Self::Byte => {
                debug_assert!(len == 1, "Data is too long for byte conversion: {len}");
                Ok(data[0] as u16)
            }
            Self::Kanji => Err(QRError::UnsupportedMode),
        }
    }

    pub fn encoded_len(&self, len: usize) -> usize {
        match *self {
            Self::Numeric => (len * 10).div_ceil(3),
            Self::Alphanumeric => (len * 11).div_ceil(2),
            Self::Byte => len * 8,
            Self::Kanji => unreachable!("Kanji is rejected before encoding"),
        }
    }

    fn chunk_size(&self) -> usize {
        match self {
            Self::Numeric => 3,
            Self::Alphanumeric => 2,
            Self::Byte | Self::Kanji => 1,
        }
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Numeric => "NUMERIC",
            Self::Alphanumeric => "ALPHANUMERIC",
            Self::Byte => "BYTE",
            Self::Kanji => "KANJI",
        };
        f.write_str(name)
    }
}


// Encoder
//------------------------------------------------------------------------------

/// Encodes `data` in `mode` and pads it to the data capacity of `ver` at `ecl`.
pub fn encode(data: &str, mode: Mode, ecl: ECLevel, ver: Version) -> QRResult<BitStream> {
    if mode == Mode::Kanji {
        return Err(QRError::UnsupportedMode);
    }

    let data = data.as_bytes();
    if !data.iter().all(|&b| mode.contains(b)) {
        return Err(QRError::InvalidChar);
    }

    let len_bits = ver.char_cnt_bits(mode);
    if data.len() >= (1 << len_bits) {
        return Err(QRError::DataTooLong);
    }

    let bcap = ver.data_bit_capacity(ecl);
    let sz = ver.mode_bits() + len_bits + mode.encoded_len(data.len());
    if sz > bcap {
        return Err(QRError::DataTooLong);
    }

    let mut bs = BitStream::new(bcap);
    push_header(mode, ver.mode_bits(), data.len(), len_bits, &mut bs);
    for chunk in data.chunks(mode.chunk_size()) {
        let bits = mode.encode_chunk(chunk)?;
        bs.push_bits(bits, mode.encoded_len(chunk.len()));
    }
    push_terminator(&mut bs);
    pad_remaining_capacity(&mut bs);
    Ok(bs)
}

fn push_header(mode: Mode, mode_bits: usize, char_cnt: usize, len_bits: usize, out: &mut BitStream) {
    out.push_bits(mode as u8, mode_bits);
    debug_assert!(
        char_cnt < (1 << len_bits),
        "Char count exceeds bit length: Char count {char_cnt}, Char count bits {len_bits}"
    );
    out.push_bits(char_cnt as u16, len_bits);
}

pub fn push_terminator(out: &mut BitStream) {
    let bit_len = out.len();
    let bit_capacity = out.capacity();
    if bit_len < bit_capacity {
        let term_len = std::cmp::min(4, bit_capacity - bit_len);
        out.push_bits(0, term_len);
    }
}

pub fn pad_remaining_capacity(out: &mut BitStream) {
    push_padding_bits(out);
    push_padding_codewords(out);
}

fn push_padding_bits(out: &mut BitStream) {
    let offset = out.len() & 7;
    if offset > 0 && out.len() < out.capacity() {
        let padding_bits_len = std::cmp::min(8 - offset, out.capacity() - out.len());
        out.push_bits(0, padding_bits_len);
    }
}

fn push_padding_codewords(out: &mut BitStream) {
    let remain_byte_capacity = (out.capacity() - out.len()) >> 3;
    PADDING_CODEWORDS.iter().copied().cycle().take(remain_byte_capacity).for_each(|pc| {
        out.push_bits(pc, 8);
    });
}

pub const PADDING_CODEWORDS: [u8; 2] = [0b1110_1100, 0b0001_0001];
