//! # redpen
//!
//! Mistake-span resolution and highlight tokenization for writing
//! feedback.
//!
//! An upstream language model reviews student-written English and returns
//! a list of mistakes, each naming an offending substring or an explicit
//! character range. This crate locates those mistakes in the text and
//! emits a token stream a renderer can display as clickable highlights,
//! without re-deriving positions and without ever interpreting model
//! output as markup.
//!
//! The entry point is [`highlight::highlight`]; the individual stages
//! (normalization, span resolution, tokenization) live in the submodules
//! of [`highlight`].

pub mod highlight;
