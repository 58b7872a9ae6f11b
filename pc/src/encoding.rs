//! Persisted field encoding
//!
//! Stores keep a template's field list as one opaque blob next to the other
//! template columns. A blob that cannot be decoded loads as an empty field
//! list so one bad row never prevents the rest of the store from loading.

use tracing::{debug, warn};

use crate::error::{PromptError, PromptResult};
use crate::field::Field;

/// Encode a field list for storage
pub fn encode_fields(fields: &[Field]) -> PromptResult<Vec<u8>> {
    debug!(count = fields.len(), "encode_fields: called");
    serde_json::to_vec(fields).map_err(|e| PromptError::Encode(format!("field list: {}", e)))
}

/// Decode a stored field list, reporting corruption
pub fn try_decode_fields(blob: &[u8]) -> PromptResult<Vec<Field>> {
    serde_json::from_slice(blob).map_err(|e| PromptError::Decode(format!("field list: {}", e)))
}

/// Decode a stored field list, treating a corrupt blob as no fields
pub fn decode_fields(blob: &[u8]) -> Vec<Field> {
    debug!(len = blob.len(), "decode_fields: called");
    match try_decode_fields(blob) {
        Ok(fields) => fields,
        Err(e) => {
            warn!(error = %e, "Discarding undecodable field list");
            Vec::new()
        }
    }
}
