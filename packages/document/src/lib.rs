//! # Mailcraft Document Model
//!
//! Typed model shared by every mailcraft crate:
//!
//! - [`ast`]: the block/mark tree produced by the editing surface
//! - [`styles`]: per-block style overrides (all optional)
//! - [`global_styles`]: template-wide defaults (always fully populated)
//! - [`template`]: the `EmailTemplate` aggregate root
//! - [`id_generator`] / [`index`]: stable block identity and uid lookup
//! - [`validation`]: persisted-shape checks and migration

pub mod ast;
pub mod error;
pub mod global_styles;
pub mod id_generator;
pub mod index;
pub mod styles;
pub mod template;
pub mod validation;

pub use ast::{Attrs, Mark, MarkType, Node, NodeType};
pub use error::{DocumentError, DocumentResult};
pub use global_styles::{
    Align, BodyStyles, BodyStylesPatch, ButtonStyles, ButtonStylesPatch, CodeBlockStyles,
    CodeBlockStylesPatch, ContainerStyles, ContainerStylesPatch, GlobalStyles, GlobalStylesPatch,
    ImageStyles, ImageStylesPatch, InlineCodeStyles, InlineCodeStylesPatch, LinkStyles,
    LinkStylesPatch, PaddingPatch, TypographyStyles, TypographyStylesPatch,
};
pub use id_generator::{
    assign_missing_uids, generate_uid, RandomUidGenerator, SequentialUidGenerator, UidGenerator,
    UID_ATTR,
};
pub use index::{collect_uids, duplicate_uids, find_by_uid, NodeWithPath, UidIndex};
pub use styles::{
    BlockStyles, BorderStyle, Display, FontWeight, Height, Padding, TextAlign, TextDecoration,
};
pub use template::{
    default_content, EmailHeader, EmailHeaderPatch, EmailTemplate, Variable, VariableType,
    VariableValue,
};
pub use validation::{load_template, load_template_value, validate_template_value, LoadedTemplate};
