use crate::{BinaryAttachment, BinaryEncoding};

use std::str::FromStr;

#[test]
fn given_bytes_when_hex_encoded_then_lowercase_pairs() {
    let encoded = BinaryEncoding::Hex.encode(&[0x00, 0xab, 0x7f]).unwrap();

    assert_eq!(encoded, "00ab7f");
}

#[test]
fn given_bytes_when_base64_encoded_then_standard_alphabet() {
    let encoded = BinaryEncoding::Base64.encode(b"hello").unwrap();

    assert_eq!(encoded, "aGVsbG8=");
}

#[test]
fn given_invalid_utf8_when_raw_encoded_then_error() {
    let result = BinaryEncoding::Raw.encode(&[0xff, 0xfe]);

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("raw"));
}

#[test]
fn given_odd_length_hex_when_decoded_then_error() {
    assert!(BinaryEncoding::Hex.decode("abc").is_err());
    assert!(BinaryEncoding::Hex.decode("zz").is_err());
}

#[test]
fn given_uppercase_hex_when_decoded_then_same_bytes_as_lowercase() {
    assert_eq!(BinaryEncoding::Hex.decode("00AB7F").unwrap(), vec![0x00, 0xab, 0x7f]);
}

#[test]
fn given_non_hex_digit_when_decoded_then_error_names_hex_decode() {
    let message = BinaryEncoding::Hex.decode("0g").unwrap_err().to_string();

    assert!(message.contains("Cannot decode hex attachment"));
}

#[test]
fn given_hex_text_when_decoded_then_original_bytes() {
    assert_eq!(BinaryEncoding::Hex.decode("00ab7f").unwrap(), vec![0x00, 0xab, 0x7f]);
}

#[test]
fn given_attachment_when_encoded_then_size_is_decoded_length() {
    let attachment = BinaryAttachment::new(vec![1, 2, 3, 4], BinaryEncoding::Hex, "bin");

    let encoded = attachment.encoded().unwrap();

    assert_eq!(encoded.data, "01020304");
    assert_eq!(encoded.size, 4);
    assert_eq!(encoded.format, "bin");
}

#[test]
fn given_encoded_json_when_deserialized_then_attachment_decoded() {
    let json = r#"{"encoding":"base64","format":"text/plain","data":"aGk="}"#;

    let attachment: BinaryAttachment = serde_json::from_str(json).unwrap();

    assert_eq!(attachment.data, b"hi".to_vec());
    assert_eq!(attachment.encoding, BinaryEncoding::Base64);
}

#[test]
fn given_unknown_name_when_parsed_then_error() {
    assert!(BinaryEncoding::from_str("base32").is_err());
    assert_eq!(BinaryEncoding::from_str("hex").unwrap(), BinaryEncoding::Hex);
}
