pub mod http;
pub mod runtime;
pub mod service;
pub mod storage;
