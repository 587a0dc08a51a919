pub mod bounds;
