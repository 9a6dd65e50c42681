pub mod errors;
pub mod events;
pub mod id;
pub mod types;

pub use errors::{ConfigError, NovaError, StoreError};
pub use events::{EventBus, WidgetEvent};
pub use id::{new_correlation_id, SessionId};
pub use types::{BuildState, Role};

pub type Result<T> = std::result::Result<T, NovaError>;
