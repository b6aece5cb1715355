//! Hardware-free logic shared by the panel and car consoles: the bounded
//! reading history, the distance-to-LED mapping, the motor pin table, the
//! serial pair decoder and the camera color transforms.

pub mod camera;
pub mod drive;
pub mod history;
pub mod leds;
pub mod ranging;
pub mod sample;
pub mod serial;
pub mod slot;

pub use slot::Latest;
