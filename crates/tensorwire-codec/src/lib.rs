//! Canonical wire serialization for strided tensor views.
//!
//! Takes an N-dimensional view — shape, element strides, and a flat byte
//! buffer — and produces a [`WireTensor`]: the same elements flattened into
//! row-major order, tagged with their scalar type and byte order. Receivers
//! get one canonical layout no matter how the sender's memory was strided,
//! and large contiguous spans can alias the source allocation instead of
//! being copied, governed by a [`SharingMode`].
//!
//! # Example
//!
//! ```
//! use tensorwire_codec::{serialize_pod, deserialize_pod, DataType, SharingMode};
//!
//! let wire = serialize_pod(&[1i32, 2, 3, 4, 5, 6], &[2, 3], DataType::I32, SharingMode::All);
//! assert_eq!(wire.sizes, vec![2, 3]);
//!
//! let bytes = wire.encode();
//! // ... ship `bytes` ...
//! # let wire = tensorwire_codec::WireTensor::decode(&bytes.into()).unwrap();
//! let back: Vec<i32> = deserialize_pod(&wire, DataType::I32);
//! assert_eq!(back, vec![1, 2, 3, 4, 5, 6]);
//! ```
//!
//! The requested byte order must match the running machine's; no conversion
//! is performed anywhere in the pipeline.

pub mod dtype;
pub mod layout;
pub mod odometer;
pub mod record;
pub mod serialize;

pub use dtype::{DataType, Endianness};
pub use record::{WireError, WireTensor};
pub use serialize::{
    deserialize, deserialize_pod, serialize, serialize_pod, SharingMode, MIN_SHARE_SIZE,
};
