pub mod deepwaters;
