//! Per-user directories and the `user-info.json` profile file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use tracker_core::UserProfile;

use crate::store::FileStore;

pub const USER_INFO_FILE_NAME: &str = "user-info.json";

#[derive(Debug, Error)]
pub enum UserInfoError {
    #[error("invalid username '{0}'")]
    InvalidUsername(String),
    #[error("no profile for user '{0}' (run: tracker init-user)")]
    NotFound(String),
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Directory holding everything for `username` under `data_dir`.
///
/// Usernames become path components, so separators and dot-names are refused.
pub fn user_dir(data_dir: &Path, username: &str) -> Result<PathBuf, UserInfoError> {
    let name = username.trim();
    let valid = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.chars().any(char::is_control);
    if !valid {
        return Err(UserInfoError::InvalidUsername(username.to_string()));
    }
    Ok(data_dir.join(name))
}

/// The activity log store for `username`.
pub fn activity_store(data_dir: &Path, username: &str) -> Result<FileStore, UserInfoError> {
    Ok(FileStore::in_dir(&user_dir(data_dir, username)?))
}

pub fn write_user_info(data_dir: &Path, profile: &UserProfile) -> Result<PathBuf, UserInfoError> {
    let dir = user_dir(data_dir, &profile.username)?;
    let path = dir.join(USER_INFO_FILE_NAME);
    fs::create_dir_all(&dir).map_err(|source| UserInfoError::Io {
        path: dir.clone(),
        source,
    })?;
    let json = serde_json::to_string_pretty(profile).map_err(|source| UserInfoError::Json {
        path: path.clone(),
        source,
    })?;
    fs::write(&path, json).map_err(|source| UserInfoError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

pub fn read_user_info(data_dir: &Path, username: &str) -> Result<UserProfile, UserInfoError> {
    let path = user_dir(data_dir, username)?.join(USER_INFO_FILE_NAME);
    let s = match fs::read_to_string(&path) {
        Ok(s) => s,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(UserInfoError::NotFound(username.to_string()));
        }
        Err(source) => return Err(UserInfoError::Io { path, source }),
    };
    serde_json::from_str(&s).map_err(|source| UserInfoError::Json { path, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_profile_written_and_read_back() {
        let dir = TempDir::new().unwrap();
        let profile = UserProfile::new("sam", 61.5, NaiveDate::from_ymd_opt(1988, 3, 9).unwrap());

        let path = write_user_info(dir.path(), &profile).unwrap();
        assert!(path.ends_with("sam/user-info.json"));

        let back = read_user_info(dir.path(), "sam").unwrap();
        assert_eq!(back, profile);
    }

    #[test]
    fn test_missing_profile() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            read_user_info(dir.path(), "ghost"),
            Err(UserInfoError::NotFound(_))
        ));
    }

    #[test]
    fn test_usernames_cannot_escape_data_dir() {
        let base = Path::new("/data");
        assert_eq!(user_dir(base, "sam").unwrap(), PathBuf::from("/data/sam"));
        for bad in ["", "  ", "..", ".", "a/b", "a\\b", "tab\there"] {
            assert!(user_dir(base, bad).is_err(), "{bad:?}");
        }
    }
}
