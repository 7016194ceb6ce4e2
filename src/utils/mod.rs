pub mod dates;

pub use dates::{parse_date, today};
