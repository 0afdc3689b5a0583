//! Slot-based template composition.
//!
//! ```text
//!  layer args (SlotArgs) ──► WithDefaults ──► ResolvedSlots ──► SlotTemplate ──► text
//!                              │                                   │
//!                              └ unknown slot = DomainError        └ join | first | merge
//!                                                                      (deep_merge + stringify)
//! ```

pub mod merge;
pub mod parameterized;
pub mod slots;
pub mod stringify;
pub mod value;

pub use merge::deep_merge;
pub use parameterized::{ParameterizedTemplate, SlotKind, SlotSpec};
pub use slots::{ResolvedSlots, SlotArgs, SlotTemplate, WithDefaults};
pub use stringify::{stringify, stringify_with_comments};
pub use value::{ConfigValue, RAW_KEY};
