mod jwt;

pub use jwt::*;
