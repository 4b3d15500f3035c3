//! Storage dialect contract for relmap.
//!
//! The mapper core never talks to a database directly. It needs two things
//! from the storage layer, both expressed as traits here:
//! - [`SqlHelper`]: dialect-specific quoting, string escaping and
//!   full-text match syntax
//! - [`Connection`]: access to the helper and the number of rows touched by
//!   the last write
//!
//! [`SqliteHelper`] and [`MySqlHelper`] implement the two dialects relmap ships
//! with; [`SqliteConnection`] is a thin rusqlite-backed connection.

mod connection;
mod error;
mod helper;

pub use connection::{Connection, SqliteConnection};
pub use error::{DbError, DbResult};
pub use helper::{MySqlHelper, SqlHelper, SqliteHelper};
