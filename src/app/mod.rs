pub mod event;
pub mod modal;
pub mod mode;
pub mod state;

pub use modal::{ExtrasModal, ModalFocus};
pub use mode::Mode;
pub use state::AppState;
