pub mod categories;
pub mod compute;
pub mod explain;
