pub mod app;
pub mod notification;
pub mod pulse;
pub mod view;

pub use app::{DialogConfirm, TallyApp};
pub use view::TallyView;
