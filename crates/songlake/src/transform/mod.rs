//! In-memory transforms from raw records to star-schema rows.

mod catalog;
mod events;
mod songplays;

pub use catalog::load_catalog;
pub use events::load_events;
pub use songplays::assemble_songplays;
