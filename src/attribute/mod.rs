pub mod attribute;
pub mod compound;
