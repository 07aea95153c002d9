mod price;
mod query;
mod record;

pub use price::{Price, PriceError};
pub use query::{Query, QueryLineError};
pub use record::{Record, RecordLineError, Year, YearError};
