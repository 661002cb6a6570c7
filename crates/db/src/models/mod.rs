//! Row structs returned by the repositories and the typed batches they accept.

pub mod hero;
