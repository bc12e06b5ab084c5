pub mod layout;
pub mod table;
pub mod partition;
pub mod loader;
