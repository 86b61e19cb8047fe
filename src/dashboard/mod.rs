pub mod paging;
pub mod poller;
pub mod reconciler;
pub mod series;
pub mod state;


pub use poller::poll_loop;
pub use reconciler::{DashboardEvent, Reconciler, ThresholdInput};
pub use state::{DashboardState, Phase};
