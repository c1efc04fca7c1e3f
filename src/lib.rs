pub mod cgi;
pub mod protocol;

pub use cgi::{
    config::CgiConfig,
    meta::{EnvSource, MetaSource, is_active, is_active_env},
    params::ParamMap,
    req::{CgiRequest, Decoded},
    types::{DecodeError, Outcome},
};
