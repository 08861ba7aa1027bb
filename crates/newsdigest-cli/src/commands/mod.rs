pub mod collect;
pub mod sources;
