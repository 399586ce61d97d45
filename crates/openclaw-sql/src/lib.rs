//! `openclaw-sql` — stateless invocation of the external `psql`-compatible
//! SQL client (§4.5, §6.6): the one component every DB-backed module
//! (tasks, pending questions, memories) shells out through.

pub mod client;
pub mod error;

pub use client::{escape_sql_literal, format_vector_literal, parse_rows, PostgresClient, FIELD_SEP};
pub use error::{Result, SqlError};
