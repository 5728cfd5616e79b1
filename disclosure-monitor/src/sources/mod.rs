pub mod congress;
pub mod openinsider;

pub use congress::{CongressTradesSource, CONGRESS_DEFAULT_URL, CONGRESS_SOURCE_ID};
pub use openinsider::{OpenInsiderSource, OPENINSIDER_DEFAULT_URL, OPENINSIDER_SOURCE_ID};
