pub mod parlia;
