//! Typed facades over [prost](https://docs.rs/prost) messages.
//!
//! A facade is a thin handle onto a prost storage message that exposes
//! accessors with protobuf semantics spelled out in types:
//!
//! * scalar fields read their value, or the wire default when unset,
//! * `optional` fields and oneof cases read as `Option`, so "unset" and
//!   "set to zero" stay distinguishable,
//! * enum fields convert to their symbolic type and fail on unknown values,
//! * sub-message fields return facades that share the parent's storage,
//! * repeated fields return a [`RepeatedField`] proxy.
//!
//! All encoding and decoding is delegated to prost, see [`Facade`].
//!
//! # Example
//!
//! ```ignore
//! mod pb {
//!     #[derive(Clone, PartialEq, prost::Message)]
//!     pub struct Point {
//!         #[prost(int32, tag = "1")]
//!         pub x: i32,
//!         #[prost(int32, optional, tag = "2")]
//!         pub y: Option<i32>,
//!     }
//! }
//!
//! #[protoface::message(storage = "pb::Point")]
//! pub struct Point {
//!     x: i32,
//!     #[proto(optional)]
//!     y: Option<i32>,
//! }
//!
//! let point = Point::new().with_x(3);
//! assert_eq!(point.y(), None);
//! let bytes = point.serialize();
//! ```
//!
//! # Threading
//!
//! Facades keep their storage in an `Rc<RefCell<_>>` so sub-message facades
//! can alias their parent. They are neither `Send` nor `Sync`; move the
//! storage (see [`Facade::to_storage`]) to hand a message to another thread.

pub mod error;
pub mod handle;
pub mod repeated;

mod facade;

pub use error::{DecodeError, EncodeError, UnknownEnumValue};
pub use facade::{enum_from_wire, Facade};
pub use handle::Handle;
pub use repeated::RepeatedField;

#[cfg(feature = "derive")]
pub use protoface_derive::message;
