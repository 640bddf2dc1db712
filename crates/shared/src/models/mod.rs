pub mod node;
pub mod profile;

pub use node::ContainerDetail;
pub use node::NodeSpec;
pub use profile::PluginRef;
pub use profile::Profile;
