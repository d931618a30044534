mod ec;
mod qr;

pub use qr::{Module, QR, QUIET_ZONE};

use tracing::{debug, info};

use crate::common::{
    bit_utils::BitStream,
    codec::{encode, Mode},
    error::{QRError, QRResult},
    mask::{apply_best_mask, compute_total_penalty, MaskPattern},
    metadata::{ECLevel, Version, DEFAULT_VERSION},
};
use ec::ecc;

pub struct QRBuilder<'a> {
    data: &'a str,
    version: Version,
    ec_level: ECLevel,
    mode: Option<Mode>,
    mask: Option<MaskPattern>,
}

impl<'a> QRBuilder<'a> {
    pub fn new(data: &'a str) -> Self {
        Self { data, version: DEFAULT_VERSION, ec_level: ECLevel::M, mode: None, mask: None }
    }

    pub fn data(&mut self, data: &'a str) -> &mut Self {
        self.data = data;
        self
    }

    pub fn version(&mut self, version: Version) -> &mut Self {
        self.version = version;
        self
    }

    pub fn ec_level(&mut self, ec_level: ECLevel) -> &mut Self {
        self.ec_level = ec_level;
        self
    }

    /// Forces an encoding mode instead of classifying the input.
    pub fn mode(&mut self, mode: Mode) -> &mut Self {
        self.mode = Some(mode);
        self
    }

    /// Forces a mask pattern instead of picking the lowest penalty one.
    pub fn mask(&mut self, mask: MaskPattern) -> &mut Self {
        self.mask = Some(mask);
        self
    }

    pub fn metadata(&self) -> String {
        let mode = match self.mode {
            Some(m) => m.to_string(),
            None => "Auto".to_string(),
        };
        let mask = match self.mask {
            Some(m) => format!("{}", *m),
            None => "Auto".to_string(),
        };
        format!(
            "{{ Version: {}, Ec level: {:?}, Mode: {mode}, Mask: {mask} }}",
            *self.version, self.ec_level
        )
    }
}

#[cfg(test)]
mod qrbuilder_util_tests {
    use super::QRBuilder;
    use crate::common::{codec::Mode, error::QRError, mask::MaskPattern, metadata::ECLevel};

    #[test]
    fn test_metadata() {
        let mut qr_builder = QRBuilder::new("Hello, world!");
        assert_eq!(qr_builder.metadata(), "{ Version: 4, Ec level: M, Mode: Auto, Mask: Auto }");
        qr_builder.ec_level(ECLevel::L).mode(Mode::Byte).mask(MaskPattern::new(5).unwrap());
        assert_eq!(qr_builder.metadata(), "{ Version: 4, Ec level: L, Mode: BYTE, Mask: 5 }");
    }

    #[test]
    fn test_data_setter() {
        let mut qr_builder = QRBuilder::new("first");
        let qr = qr_builder.data("12345").build().unwrap();
        assert_eq!(qr.text(), "12345");
        assert_eq!(qr.mode(), Mode::Numeric);
        assert_eq!(qr_builder.data("").build().unwrap_err(), QRError::EmptyData);
    }
}

impl QRBuilder<'_> {
    pub fn build(&self) -> QRResult<QR> {
        let mut qr = self.build_unmasked()?;

        let mask = match self.mask {
            Some(m) => {
                debug!("Applying mask {}...", *m);
                qr.apply_mask(m);
                m
            }
            None => {
                debug!("Finding & applying best mask...");
                apply_best_mask(&mut qr)
            }
        };

        let total_modules = qr.width() * qr.width();
        let dark_modules = qr.count_dark_modules();
        let data_cap = qr.version().data_codewords(qr.ec_level());
        let ecc_cap = qr.version().ecc_codewords(qr.ec_level());

        info!("QR generated {}", qr.metadata());
        info!("Data codewords: {data_cap}, Ecc codewords: {ecc_cap}");
        info!(
            "Dark cells: {dark_modules}, Light cells: {}, Balance: {}%",
            total_modules - dark_modules,
            dark_modules * 100 / total_modules
        );
        info!("Mask: {}, Penalty: {}", *mask, compute_total_penalty(&qr));

        Ok(qr)
    }

    /// Runs every stage except masking: the grid holds function patterns and
    /// unmasked payload modules.
    pub(crate) fn build_unmasked(&self) -> QRResult<QR> {
        debug!("Generating QR {}...", self.metadata());
        if self.data.is_empty() {
            return Err(QRError::EmptyData);
        }

        let mode = self.mode.unwrap_or_else(|| Mode::classify(self.data));
        debug!("Encoding data in {mode} mode...");
        let encoded_data = encode(self.data, mode, self.ec_level, self.version)?;

        debug!("Constructing payload with ecc...");
        let data_codewords = encoded_data.codewords();
        let ecc_codewords = ecc(data_codewords, self.version, self.ec_level);
        let mut payload = BitStream::new(self.version.total_codewords(self.ec_level) << 3);
        payload.extend(data_codewords);
        payload.extend(&ecc_codewords);

        debug!("Constructing QR...");
        let mut qr = QR::new(self.version, self.ec_level, mode, self.data);

        debug!("Drawing functional patterns...");
        qr.draw_all_function_patterns();

        debug!("Drawing encoding region...");
        qr.draw_encoding_region(payload);

        Ok(qr)
    }
}
