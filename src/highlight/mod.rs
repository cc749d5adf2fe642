//! Mistake highlighting core
//!
//! Given a block of student-written text and the list of mistakes an
//! upstream model flagged in it, this module computes a deterministic,
//! non-overlapping partition of the text into plain and highlighted
//! segments, each highlighted segment carrying the stable id of the mistake
//! it belongs to.
//!
//! The stages, each a pure function:
//!
//! 1. [`normalize`](normalize::normalize): canonicalize line endings and
//!    non-breaking spaces so every later offset refers to one canonical
//!    text.
//! 2. [`resolve_spans`](resolve::resolve_spans): turn loosely-typed
//!    mistake descriptors into validated, non-overlapping
//!    [`HighlightSpan`]s plus an id for every mistake.
//! 3. [`tokenize`](tokenize::tokenize): walk text + spans into an ordered
//!    [`HighlightToken`] stream whose concatenated values reproduce the
//!    text exactly.
//!
//! [`pipeline::highlight`] runs all three. Token text originates from an
//! untrusted model response; renderers must treat token values as plain
//! data, never as markup.
//!
//! [`queue::RequestQueue`] is the one piece that is not text processing: it
//! serializes outbound scoring requests one at a time with a fixed pause,
//! as the upstream API requires.

pub mod descriptor;
pub mod normalize;
pub mod pipeline;
pub mod queue;
pub mod resolve;
pub mod token;
pub mod tokenize;

pub use descriptor::{MistakeDescriptor, OffsetRange, ResolutionStrategy};
pub use normalize::normalize;
pub use pipeline::{highlight, Highlight};
pub use queue::{QueueError, RequestQueue};
pub use resolve::{resolve_spans, ResolvedMistakes};
pub use token::{HighlightSpan, HighlightToken};
pub use tokenize::tokenize;
