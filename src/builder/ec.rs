use crate::common::metadata::{ECLevel, Version};

// ECC: Error correction codeword generator
pub fn ecc(data: &[u8], version: Version, ec_level: ECLevel) -> Vec<u8> {
    ecc_per_block(data, version.ecc_codewords(ec_level))
}

// Parity fold: data codeword i is XORed into slot i % ecc_count. This is not a
// Reed-Solomon remainder and cannot locate or repair errors.
fn ecc_per_block(block: &[u8], ecc_count: usize) -> Vec<u8> {
    let mut res = vec![0; ecc_count];
    if ecc_count == 0 {
        return res;
    }

    for (i, b) in block.iter().enumerate() {
        res[i % ecc_count] ^= b;
    }
    res
}

#[cfg(test)]
mod ec_tests {
    use test_case::test_case;

    use super::{ecc, ecc_per_block};
    use crate::common::{
        codec::{encode, Mode},
        metadata::{ECLevel, DEFAULT_VERSION},
    };

    #[test]
    fn test_parity_fold() {
        assert_eq!(ecc_per_block(&[1, 2, 3, 4, 5], 2), [7, 6]);
        assert_eq!(ecc_per_block(&[0xEC, 0x11], 4), [0xEC, 0x11, 0, 0]);
    }

    #[test]
    fn test_zero_ecc_count() {
        assert!(ecc_per_block(&[1, 2, 3], 0).is_empty());
    }

    #[test]
    fn test_ecc_hello_world() {
        let data = encode("HELLO WORLD", Mode::Alphanumeric, ECLevel::M, DEFAULT_VERSION).unwrap();
        let data = data.codewords();
        assert_eq!(&data[..10], b" [\x0bx\xd1r\xdcMC@");
        let ecc = ecc(data, DEFAULT_VERSION, ECLevel::M);
        assert_eq!(ecc, [204, 74, 231, 105, 61, 99, 48, 92, 175, 81, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_ecc_numeric_quartile() {
        let data = encode("12345", Mode::Numeric, ECLevel::Q, DEFAULT_VERSION).unwrap();
        let ecc = ecc(data.codewords(), DEFAULT_VERSION, ECLevel::Q);
        let mut exp = vec![0; 24];
        exp[..5].copy_from_slice(&[1, 248, 106, 182, 17]);
        assert_eq!(ecc, exp);
    }

    #[test_case(ECLevel::L, 10)]
    #[test_case(ECLevel::M, 16)]
    #[test_case(ECLevel::Q, 24)]
    #[test_case(ECLevel::H, 28)]
    fn test_ecc_len(ecl: ECLevel, exp: usize) {
        let data = encode("A", Mode::Alphanumeric, ecl, DEFAULT_VERSION).unwrap();
        assert_eq!(ecc(data.codewords(), DEFAULT_VERSION, ecl).len(), exp);
    }
}
