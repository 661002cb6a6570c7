/// Hero primary keys come from the external catalog and are stored as BIGINT.
pub type DbId = i64;
