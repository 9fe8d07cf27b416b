pub mod blur_kernel;
pub mod image_store;
pub mod partition_planner;
pub mod pixel;
pub mod section;
pub mod snapshot;
pub mod utils;
pub mod worker_pool;
