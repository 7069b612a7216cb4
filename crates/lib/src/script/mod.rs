mod load;
mod runtime;

pub use load::{ENTRY_POINT, LoadedScript, load_script};
pub use runtime::create_runtime;
