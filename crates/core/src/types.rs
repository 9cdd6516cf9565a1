/// User primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Project identifiers are UUIDv4; the string form doubles as the
/// extraction directory name on disk.
pub type ProjectId = uuid::Uuid;
