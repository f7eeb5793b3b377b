//! Query parameter encoding and validation
//!
//! - [`QueryStringBuilder`] turns named parameters into a query string
//! - [`validate_filter`] checks filter expressions token by token
//! - [`validate_fields`], [`validate_group`], [`validate_sort`] and
//!   [`validate_datetime`] canonicalise the other report parameters

mod encoder;
mod filter;
mod validate;


pub use encoder::{ParamValue, QueryStringBuilder};
pub use filter::{
    classify_token, is_parentheses_balanced, validate_filter, FilterToken, FILTER_CONJUNCTIONS,
    FILTER_OPERATIONS,
};
pub use validate::{
    split_list, validate_datetime, validate_fields, validate_group, validate_sort,
};

pub(crate) use filter::wrap_once;
