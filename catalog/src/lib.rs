//! Course catalog domain: the data model, the store port with its MongoDB and
//! in-memory adapters, and the startup seed routine.

pub mod memory;
pub mod model;
pub mod mongo;
pub mod seed;
pub mod store;

pub use model::{Chapter, Course, CourseRecord};
pub use store::{CourseStore, SortKey, StoreError};
