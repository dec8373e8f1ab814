pub mod cart;
pub mod config;
pub mod context;
pub mod error;
pub mod filter;
pub mod order;
pub mod product;
pub mod profile;
pub mod service;
pub mod stats;
pub mod storage;
pub mod utils;
pub mod wishlist;
