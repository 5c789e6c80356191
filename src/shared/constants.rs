/// Maximum number of documents a single user may keep, across all types
pub const MAX_DOCUMENTS_PER_USER: i64 = 7;
