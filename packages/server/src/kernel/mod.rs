// Infrastructure layer: dependency container, service traits and adapters.

pub mod deps;
pub mod test_dependencies;
pub mod traits;

pub use deps::{CloudAuthAdapter, DysmsAdapter, OssAdapter, ServerDeps};
pub use traits::{BaseIdentityService, BaseSmsService, BaseStorageService, InitVerifyParams};
