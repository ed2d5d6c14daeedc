//! Kinship related-content widget.
//!
//! Finds items related to a current item through shared taxonomy terms and
//! renders them as a list, grid or slider. The `kinship` binary drives the
//! widget against a site fixture.

pub mod config;
pub mod error;
pub mod gather;
pub mod host;
pub mod models;
pub mod params;
pub mod services;
pub mod theme;
pub mod widget;

pub use config::Config;
pub use error::{KinshipError, KinshipResult};
pub use widget::{Collaborators, CurrentItem, RelatedContent, RenderPlan};
