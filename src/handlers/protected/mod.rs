// handlers/protected/mod.rs - Endpoints behind the token gate

pub mod crush;
pub mod search;

pub use crush::create as crush_create;
pub use crush::delete as crush_delete;
pub use crush::update as crush_update;
pub use search::get as crush_search;
