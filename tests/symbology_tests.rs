//! QR and Data Matrix codeword tests against published reference values

use rust_barcode::qr::{QrEncoder, QrMode, ec_block_info};
use rust_barcode::{
    Correction, DataMatrix, ECLevel, EncodeError, Encodation, QrCode, ReedSolomonDecoder, StandardField, Symbology,
    encode_codewords, encode_data_matrix, encode_qr,
};

const HELLO_WORLD_1M: [u8; 26] = [
    0x20, 0x5B, 0x0B, 0x78, 0xD1, 0x72, 0xDC, 0x4D, 0x43, 0x40, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11, 0xC4, 0x23,
    0x27, 0x77, 0xEB, 0xD7, 0xE7, 0xE2, 0x5D, 0x17,
];

fn widen(codewords: &[u8]) -> Vec<u16> {
    codewords.iter().map(|&c| u16::from(c)).collect()
}

#[test]
fn test_qr_hello_world_known_answer() {
    let qr = encode_qr(b"HELLO WORLD", ECLevel::M).unwrap();
    assert_eq!(qr.version, 1);
    assert_eq!(qr.size(), 21);
    assert_eq!(qr.data_codewords, 16);
    assert_eq!(qr.codewords, HELLO_WORLD_1M);
}

#[test]
fn test_qr_single_block_repairs_errors() {
    let qr = encode_qr(b"HELLO WORLD", ECLevel::M).unwrap();
    let mut received = widen(&qr.codewords);
    for (position, flip) in [(0, 0x55), (4, 0x01), (9, 0xFF), (17, 0x80), (25, 0x3C)] {
        received[position] ^= flip;
    }

    let decoder = ReedSolomonDecoder::new(StandardField::Qr.field(), 10);
    assert_eq!(decoder.decode(&mut received), Ok(Correction::Repaired(5)));
    assert_eq!(received, widen(&HELLO_WORLD_1M));
}

#[test]
fn test_qr_version_one_capacities() {
    // Published version 1 capacities: 41 digits (L), 10 alphanumerics (H), 17 bytes (L)
    let cases: [(Vec<u8>, ECLevel, QrMode); 3] = [
        (vec![b'9'; 41], ECLevel::L, QrMode::Numeric),
        (vec![b'Z'; 10], ECLevel::H, QrMode::Alphanumeric),
        (vec![b'z'; 17], ECLevel::L, QrMode::Byte),
    ];

    let mut encoder = QrEncoder::new();
    for (text, level, mode) in cases {
        let fits = encoder.encode(&text, level).unwrap();
        assert_eq!(fits.version, 1);
        assert_eq!(fits.mode, mode);

        let mut longer = text.clone();
        longer.push(text[0]);
        let grown = encoder.encode(&longer, level).unwrap();
        assert_eq!(grown.version, 2);
    }
}

#[test]
fn test_qr_codeword_counts_follow_block_table() {
    let text = b"https://example.com/a/fairly/long/path?with=query&and=more#fragment";
    let mut encoder = QrEncoder::new();
    for level in ECLevel::ALL {
        let qr = encoder.encode(text, level).unwrap();
        let info = ec_block_info(qr.version, level).unwrap();
        assert_eq!(qr.codewords.len(), info.total_codewords());
        assert_eq!(qr.data_codewords, info.data_codewords);
    }

    let fixed = QrCode::encode_with_version(text, 10, ECLevel::H).unwrap();
    assert_eq!(fixed.version, 10);
    assert_eq!(fixed.size(), 57);
}

#[test]
fn test_qr_rejects_oversized_text() {
    let text = vec![b'x'; 3000];
    let err = encode_qr(&text, ECLevel::L).unwrap_err();
    assert!(matches!(err, EncodeError::PayloadTooLarge { .. }));
}

#[test]
fn test_data_matrix_aim_in_every_triplet_encodation() {
    let c40 = encode_data_matrix(b"AIMAIMAIM", Encodation::C40).unwrap();
    assert_eq!(c40.data_codewords(), &[230, 91, 11, 91, 11, 91, 11, 254]);

    // Text swaps the case of the basic set
    let text = encode_data_matrix(b"aimaimaim", Encodation::Text).unwrap();
    assert_eq!(text.data_codewords(), &[239, 91, 11, 91, 11, 91, 11, 254]);

    let x12 = encode_data_matrix(b"AIMAIMAIM", Encodation::X12).unwrap();
    assert_eq!(x12.data_codewords(), &[238, 91, 11, 91, 11, 91, 11, 254]);

    for dm in [&c40, &text, &x12] {
        assert_eq!(dm.size(), 14);
        assert_eq!(dm.codewords.len(), 18);
    }
}

#[test]
fn test_data_matrix_repairs_errors() {
    let dm = DataMatrix::encode(b"123456", Encodation::Ascii).unwrap();
    let original = widen(&dm.codewords);
    let mut received = original.clone();
    for position in [1, 6, 10, 15, 17] {
        received[position] ^= 0xA5;
    }

    let decoder = ReedSolomonDecoder::new(StandardField::DataMatrix.field(), dm.symbol.ecc_codewords());
    assert_eq!(decoder.decode(&mut received), Ok(Correction::Repaired(5)));
    assert_eq!(received, original);
}

#[test]
fn test_encode_codewords_matches_symbol_encoders() {
    let qr = encode_codewords(Symbology::Qr, b"HELLO WORLD").unwrap();
    assert_eq!(qr, widen(&HELLO_WORLD_1M));

    let dm = encode_codewords(Symbology::DataMatrix, b"AIMAIMAIM").unwrap();
    let direct = DataMatrix::encode(b"AIMAIMAIM", Encodation::C40).unwrap();
    assert_eq!(dm, widen(&direct.codewords));

    let aztec = encode_codewords(Symbology::Aztec, b"HELLO").unwrap();
    assert_eq!(&aztec[..5], &[18, 25, 43, 24, 31]);
}

#[test]
fn test_unsupported_characters_are_reported() {
    let err = encode_data_matrix(b"AIM!", Encodation::X12).unwrap_err();
    assert_eq!(
        err,
        EncodeError::UnsupportedCharacter {
            byte: b'!',
            mode: "x12"
        }
    );
}
