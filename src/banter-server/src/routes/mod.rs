pub mod debate;
pub mod score;
