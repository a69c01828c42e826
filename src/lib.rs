#![allow(dead_code)]

use wasm_bindgen::prelude::*;

mod auth;
mod bindings;
pub mod dispatcher;
mod media_element;
mod records;
mod requester;
mod session;
mod source;
mod utils;

pub use utils::logger::Logger;
