//! Packbuf: fixed-capacity binary packing with lossy quantization
//!
//! This crate packs numeric state into a pre-sized byte buffer through a
//! sequential cursor, trimming and truncating values to make them smaller,
//! often at the cost of precision, and quickly. It is aimed at transform
//! snapshots (position, rotation, scale) headed for a file or a network
//! socket where bandwidth matters more than full precision.
//!
//! **This is a pure codec** - there is no schema, no versioning, and no
//! framing. A receiver must issue the exact same sequence of `unpack_*`
//! calls that the sender issued as `pack_*` calls. That symmetry is a caller
//! contract; the engine does not enforce it.
//!
//! # Buffer Layout
//!
//! ```text
//! ┌────────────────────┬─────────────────────────────────────┐
//! │ fingerprint prefix │ payload                             │
//! │ 0/1/2/4/8 bytes    │ len() bytes, cursor starts at 0     │
//! └────────────────────┴─────────────────────────────────────┘
//! ```
//!
//! # Wire Format
//!
//! | Field kind | Encoding |
//! |------------|----------|
//! | Fingerprint prefix | big-endian, truncated mixing hash |
//! | Integers 8/16/24/32/64 bit, floats, doubles | big-endian (floats via raw IEEE-754 bits) |
//! | Byte blob | u16 big-endian length + raw bytes (max 65535) |
//! | Quantized field (8..56 bit) | little-endian within the field |
//! | Mixed-precision shared word | big-endian, fixed bit positions |
//!
//! # Failure Policy
//!
//! Every codec call is fail-quiet: packing past capacity silently writes
//! nothing and leaves the cursor alone, unpacking past the end yields the
//! zero value. Nothing panics and nothing is logged. Callers that need a
//! guarantee compare [`PackBuf::cursor`] before and after, or verify the
//! fingerprint.
//!
//! # Usage
//!
//! ```
//! use packbuf::{FingerprintWidth, PackBuf, Quat, Vec3};
//!
//! let mut buf = PackBuf::with_fingerprint(64, FingerprintWidth::B16);
//! buf.pack_vec3_48_extents(Vec3::new(1.0, 2.0, 3.0), [100.0; 3]);
//! buf.pack_quat_64(Quat::IDENTITY);
//! buf.generate_fingerprint();
//!
//! // ...transmit buf.data()...
//!
//! buf.seek_to_start();
//! assert!(buf.has_valid_fingerprint());
//! let position = buf.unpack_vec3_48_extents([100.0; 3]);
//! let rotation = buf.unpack_quat_64();
//! assert!((rotation.length() - 1.0).abs() < 1e-6);
//! # let _ = position;
//! ```

mod bitfield;
mod buffer;
mod fingerprint;
mod math;
mod quantize;
mod scalar;
mod transform;

pub use buffer::PackBuf;
pub use fingerprint::{FingerprintWidth, hash_region};
pub use math::{Quat, Vec2, Vec3};
