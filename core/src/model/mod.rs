pub mod aggregate;
pub mod category;
pub mod months;
pub mod row;
