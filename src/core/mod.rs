pub mod breadcrumbs;
pub mod catalog;
pub mod consent;
pub mod navigator;
pub mod page;
pub mod report;
pub mod resolver;
pub mod similarity;
pub mod view;

pub use crate::domain::model::{
    Breadcrumb, ConsentRecord, ContentRecord, PageMeta, PrevNext, Ranked, Scope, Section,
};
pub use crate::domain::ports::{ConsentStore, PageContext};
pub use crate::utils::error::Result;
