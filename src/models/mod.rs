pub mod event;
pub mod booking;
pub mod movie;
pub mod tick;

pub use event::Event;
pub use booking::Booking;
pub use movie::{CatalogPage, MovieSummary};
pub use tick::StockTick;
