//! Stateful services shared by the command handlers.

pub mod homework_store;

pub use homework_store::HomeworkStore;
