#![doc = include_str!("../README.md")]
#![no_std]
#![deny(clippy::mod_module_files)]

extern crate alloc;

pub mod case;
pub mod editor;
pub mod errors;
pub mod format;
pub mod renames;
pub mod scan;
pub mod statement;
#[cfg(feature = "testing")]
pub mod testing;

pub use case::CaseStyle;
pub use editor::Editor;
pub use errors::ParseError;
pub use format::FormatSql;
pub use renames::TableRenames;
pub use statement::{
    Assignments, Degraded, Delete, FieldRef, Insert, Join, JoinConstraint, Select, Statement,
    StatementKind, TableRef, Update,
};
