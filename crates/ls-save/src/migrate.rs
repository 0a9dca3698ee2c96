//! Save schema migration.

use crate::SaveError;
use crate::schema::SaveFile;

pub const SAVE_VERSION: u32 = 1;

pub fn migrate_to_latest(mut save: SaveFile) -> Result<SaveFile, SaveError> {
    if save.version > SAVE_VERSION {
        return Err(SaveError::UnsupportedVersion {
            version: save.version,
        });
    }
    while save.version < SAVE_VERSION {
        save = migrate_one_version(save)?;
    }
    Ok(save)
}

fn migrate_one_version(save: SaveFile) -> Result<SaveFile, SaveError> {
    match save.version {
        0 => migrate_v0_to_v1(save),
        v => Err(SaveError::Migration {
            what: format!("No migration path from version {}", v),
        }),
    }
}

/// Version 0 is a record decoded from the flat legacy layout: the values
/// carry over unchanged, only the identification is unknown.
fn migrate_v0_to_v1(mut save: SaveFile) -> Result<SaveFile, SaveError> {
    save.version = 1;
    Ok(save)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ls_steam::PersistedSteamState;

    fn save(version: u32) -> SaveFile {
        SaveFile {
            version,
            locomotive: String::new(),
            saved_at_tick: 0,
            state: PersistedSteamState::default(),
        }
    }

    #[test]
    fn migrate_latest_is_noop() {
        let s = save(SAVE_VERSION);
        assert_eq!(migrate_to_latest(s.clone()).unwrap(), s);
    }

    #[test]
    fn legacy_version_is_upgraded() {
        assert_eq!(migrate_to_latest(save(0)).unwrap().version, SAVE_VERSION);
    }

    #[test]
    fn future_version_is_rejected() {
        assert!(matches!(
            migrate_to_latest(save(SAVE_VERSION + 1)),
            Err(SaveError::UnsupportedVersion { .. })
        ));
    }
}
