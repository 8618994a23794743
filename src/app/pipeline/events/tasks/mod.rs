mod inject_params;
mod parse_current_url;

pub use inject_params::InjectParamsTask;
pub use parse_current_url::ParseCurrentUrlTask;
