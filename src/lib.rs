#![allow(async_fn_in_trait)]

pub mod error;
pub mod extractors;
pub mod flow;
pub mod logger;
pub mod lookup;
pub mod opener;
pub mod render;
