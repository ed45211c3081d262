// taskdeck-common: shared types and utilities for the TaskDeck workspace

pub mod id;
pub mod status;
pub mod types;
