use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

use crate::assistant::ImageAsset;

pub const IMAGE_MIME_TYPE: &str = "image/jpeg";

// Browser clients encode with btoa and some strip the `=` padding.
const FORGIVING: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decodes one caller-supplied base64 image.
///
/// ASCII whitespace (line wrapping from clients) is ignored, padding is
/// optional and non-zero trailing bits are accepted. The filename is
/// derived from the current time plus a random suffix so images decoded in the
/// same millisecond stay distinct.
pub fn decode_image(raw_base64: &str) -> Result<ImageAsset, base64::DecodeError> {
    let compact: String = raw_base64
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = FORGIVING.decode(compact.as_bytes())?;

    Ok(ImageAsset {
        bytes,
        mime_type: IMAGE_MIME_TYPE,
        filename: image_filename(),
    })
}

fn image_filename() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("image_{}_{}.jpg", millis, &suffix[..8])
}
