/// CLI Indexes: Models
pub mod models;

/// CLI Indexes: Datasets
pub mod datasets;

/// CLI Indexes: Devices
pub mod devices;

/// Shared command line options
pub mod overrides;

pub use datasets::Dataset;
pub use devices::Device;
pub use models::Model;
pub use overrides::Overrides;
