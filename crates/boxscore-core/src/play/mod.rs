// Play-code decoding: notation atoms, the decoded event, and the decoder.

mod decoder;
mod event;
mod notation;

pub use decoder::{classify_primary, decode, PrimaryKind, PRIMARY_TABLE};
pub use event::{Modifiers, PlayEvent};
pub use notation::{Advance, Base, FieldPosition};
