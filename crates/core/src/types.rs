/// Database primary keys for users, payments, and events are PostgreSQL
/// BIGSERIAL.
pub type DbId = i64;

/// Interview sessions are keyed by UUID so an id can be minted before the
/// row is inserted.
pub type SessionId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
