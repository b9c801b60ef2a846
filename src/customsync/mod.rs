pub mod resource_pool;
pub mod semaphore;
pub mod signals;
pub mod work_queue;

pub use resource_pool::BoundedResourcePool;
pub use semaphore::CountingSemaphore;
pub use signals::{CustomerSignals, SignalBoard};
pub use work_queue::WorkQueue;
