pub mod app;
pub mod models;

pub use app::AppContext;
pub use app::NetworkInfo;
pub use app::NullAppContext;
pub use models::node::ContainerDetail;
pub use models::node::NodeSpec;
pub use models::profile::PluginRef;
pub use models::profile::Profile;
