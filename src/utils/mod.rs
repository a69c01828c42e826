pub mod logger;
pub mod time;
pub mod url;
