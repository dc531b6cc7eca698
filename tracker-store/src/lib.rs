//! tracker-store: CSV codec for the activity log, append-only byte stores,
//! and per-user profile files.

pub mod codec;
pub mod store;
pub mod user_info;

pub use codec::{
    decode, encode_and_append, encode_append, encode_rows, read_days, CodecError, Decoded,
    RowError, SkippedRow,
};
pub use store::{ActivityStore, FileStore, MemoryStore, DATA_FILE_NAME};
pub use user_info::{activity_store, read_user_info, user_dir, write_user_info, UserInfoError};
