//! Signal detectors.
//!
//! Each detector consumes a [`crate::surface::RenderSurface`] and produces
//! one of the enumerated verdicts from [`crate::report`]. Detectors never
//! abort on per-element failures; only the loss of the surface itself
//! propagates.

pub mod modal;
pub mod price;
pub mod reviews;
pub mod shipping;

pub use modal::ModalDetector;
pub use price::PriceDetector;
pub use reviews::ReviewClassifier;
pub use shipping::ShippingDetector;
