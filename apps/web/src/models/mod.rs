pub mod analysis;
pub mod view;
