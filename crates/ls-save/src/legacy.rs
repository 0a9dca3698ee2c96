//! Legacy flat layout: the persisted fields as little-endian `f32`, in
//! record order, with no header.

use ls_steam::{FIELD_COUNT, PersistedSteamState};

use crate::SaveError;
use crate::schema::SaveFile;

pub const LEGACY_LEN: usize = FIELD_COUNT * 4;

pub fn encode(state: &PersistedSteamState) -> Vec<u8> {
    let mut out = Vec::with_capacity(LEGACY_LEN);
    for v in state.to_fields() {
        out.extend_from_slice(&(v as f32).to_le_bytes());
    }
    out
}

pub fn decode(bytes: &[u8]) -> Result<PersistedSteamState, SaveError> {
    if bytes.len() != LEGACY_LEN {
        return Err(SaveError::LegacyLength {
            expected: LEGACY_LEN,
            found: bytes.len(),
        });
    }
    let mut fields = [0.0f64; FIELD_COUNT];
    for (field, chunk) in fields.iter_mut().zip(bytes.chunks_exact(4)) {
        *field = f64::from(f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }
    Ok(PersistedSteamState::from_fields(&fields))
}

/// Legacy bytes as an unidentified version-0 save.
pub fn decode_save(bytes: &[u8]) -> Result<SaveFile, SaveError> {
    Ok(SaveFile {
        version: 0,
        locomotive: String::new(),
        saved_at_tick: 0,
        state: decode(bytes)?,
    })
}
