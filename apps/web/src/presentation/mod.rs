// Result presentation pipeline: payload sections → fragments → view model.
// Everything here is synchronous and free of shared state.

pub mod format;
pub mod presenter;
pub mod recommendations;
pub mod sections;

pub use presenter::ResultPresenter;
