pub mod category;
pub mod dto;
pub mod export;
pub mod monthly;
