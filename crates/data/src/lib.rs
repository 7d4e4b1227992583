//! Data loading and validation for the card catalog and album content.

pub mod images;
pub mod load;
pub mod schema;

pub use images::*;
pub use load::*;
pub use schema::*;
