//! # cftool-intrinsics
//!
//! Rewrites short-form intrinsic function tags in YAML templates into their
//! canonical key form.
//!
//! ```text
//! Bucket: !Sub my-${AWS::Region}-bucket   ->   Bucket: "Fn::Sub": "my-${AWS::Region}-bucket"
//! - !Ref Role                             ->   - "Ref" Role          (when the next line is a sequence item)
//! ```
//!
//! The pass works on raw lines rather than a parsed tree. It never fails:
//! anything it cannot rewrite is left as written, for the template
//! validator to reject.
//!
//! ## Example
//!
//! ```rust
//! use cftool_intrinsics::{Document, TagCatalog};
//!
//! let mut document = Document::from_text("Value: !Ref MyBucket\n");
//! document.rewrite(TagCatalog::standard());
//! assert_eq!(document.to_text(), "Value: \"Ref\": MyBucket\n");
//! ```

pub mod catalog;
pub mod document;
pub mod indent;
pub mod nesting;
pub mod quoting;
pub mod rewriter;

pub use catalog::{TagCatalog, TagDefinition};
pub use document::{Document, elongate, rewrite_lines};
pub use rewriter::{has_short_form, rewrite_line, rewrite_step, rewrite_tag};
