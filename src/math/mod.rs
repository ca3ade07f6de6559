pub mod bounds;
pub mod ray;
pub mod rect;
