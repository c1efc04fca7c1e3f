pub mod config;
pub mod cookie;
pub mod meta;
pub mod multipart;
pub mod params;
pub mod percent;
pub mod req;
pub mod types;
pub mod urlencoded;
