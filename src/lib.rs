//! # fixqr
//!
//! A Rust library for generating fixed-geometry, QR-style module matrices.
//! Every symbol is a 33x33 grid (version 4) carrying finder patterns,
//! separators, timing patterns and a dark module, with the payload written in
//! the standard zigzag order and masked with the lowest penalty pattern.
//!
//! ## Features
//!
//! - **Mode classification**: Numeric, Alphanumeric or Byte, picked from the input
//! - **Bitstream encoding**: Mode header, character count, payload, terminator and padding
//! - **Parity redundancy**: A XOR fold of the data codewords sized per error correction level
//! - **Mask selection**: All 8 patterns scored by an adjacency penalty, lowest wins
//! - **Rendering**: Console text, plain text grid and grayscale images
//!
//! The redundancy block is a parity fold, not a Reed-Solomon remainder, so the
//! symbols are not readable by standard QR scanners.
//!
//! ## Quick Start
//!
//! ```rust
//! use fixqr::QRBuilder;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Simplest usage: level M, automatic mode and mask
//! let qr = QRBuilder::new("HELLO WORLD").build()?;
//!
//! assert_eq!(qr.width(), 33);
//! println!("{}", qr.to_console_str());
//! # Ok(())
//! # }
//! ```
//!
//! ### Full Configuration
//!
//! ```rust
//! use fixqr::{ECLevel, MaskPattern, Mode, QRBuilder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = QRBuilder::new("12345")
//!     .ec_level(ECLevel::Q)          // Error correction level, defaults to ECLevel::M
//!     .mode(Mode::Numeric)           // Encoding mode, classified from the data if not provided
//!     .mask(MaskPattern::new(3)?)    // Mask pattern, lowest penalty one if not provided
//!     .build()?;
//!
//! let img = qr.to_image(4); // 4 pixels per module
//! assert_eq!(img.width(), (33 + 8) * 4);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Correction Levels
//!
//! | Level | Data codewords | Redundancy codewords |
//! |-------|----------------|----------------------|
//! | L     | 80             | 10                   |
//! | M     | 64             | 16                   |
//! | Q     | 48             | 24                   |
//! | H     | 36             | 28                   |

#![allow(clippy::items_after_test_module)]

pub mod builder;
pub(crate) mod common;

pub use builder::{Module, QRBuilder, QR, QUIET_ZONE};
pub use common::bit_utils::BitStream;
pub use common::codec::{encode, Mode};
pub use common::error::{QRError, QRResult};
pub use common::mask::{compute_total_penalty, MaskPattern};
pub use common::metadata::{Color, ECLevel, Version, DEFAULT_VERSION};
