pub mod exec_in;
pub mod health;
pub mod namespaces;
