use crate::{BinaryEncoding, CoreError, Result as CoreErrorResult};

use serde::{Deserialize, Serialize};

/// Raw bytes attached to a world, e.g. a thumbnail or an audio clip
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "EncodedAttachment")]
pub struct BinaryAttachment {
    pub data: Vec<u8>,
    pub encoding: BinaryEncoding,
    /// Free-form format label ("png", "wav", "text/plain")
    pub format: String,
}

/// Wire form of an attachment: `data` holds the encoded text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedAttachment {
    pub encoding: BinaryEncoding,
    pub format: String,
    pub data: String,
    /// Length of the decoded bytes
    #[serde(default)]
    pub size: usize,
}

impl BinaryAttachment {
    pub fn new(data: Vec<u8>, encoding: BinaryEncoding, format: impl Into<String>) -> Self {
        Self {
            data,
            encoding,
            format: format.into(),
        }
    }

    /// Encode the bytes per the declared tag
    #[track_caller]
    pub fn encoded(&self) -> CoreErrorResult<EncodedAttachment> {
        Ok(EncodedAttachment {
            encoding: self.encoding,
            format: self.format.clone(),
            data: self.encoding.encode(&self.data)?,
            size: self.data.len(),
        })
    }
}

impl TryFrom<EncodedAttachment> for BinaryAttachment {
    type Error = CoreError;

    fn try_from(encoded: EncodedAttachment) -> CoreErrorResult<Self> {
        let data = encoded.encoding.decode(&encoded.data)?;
        Ok(Self {
            data,
            encoding: encoded.encoding,
            format: encoded.format,
        })
    }
}
