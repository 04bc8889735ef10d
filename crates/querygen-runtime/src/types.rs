//! Column types referenced by generated entity structs.

pub use chrono::NaiveDateTime as DateTime;
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
