//! Types and traits for recording per-episode results.
//!
//! A [`Session`](crate::Session) writes one [`Record`] per episode to a
//! [`Recorder`], and aggregates the records of a whole run with a
//! [`RecordStorage`] when the run finishes.
//!
//! # Basic Usage
//!
//! ```rust
//! use episodic_core::record::{Record, RecordValue};
//!
//! let mut record = Record::empty();
//! record.insert("episode", RecordValue::Scalar(3.0));
//! record.insert("episode_reward", RecordValue::Scalar(-200.0));
//! record.insert("env", RecordValue::String("MountainCar-v0".to_string()));
//! assert_eq!(record.get_scalar("episode_reward").unwrap(), -200.0);
//! ```
//!
//! # Data Types
//!
//! * `Scalar(f32)` - Single floating-point values
//! * `String(String)` - Text values
mod base;
mod buffered_recorder;
mod null_recorder;
mod recorder;
mod storage;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::Recorder;
pub use storage::RecordStorage;
