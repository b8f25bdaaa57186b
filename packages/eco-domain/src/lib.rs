pub mod barcode;
pub mod merge;
pub mod normalized;
pub mod score;
