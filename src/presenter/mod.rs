//! Segment result presenter.
//!
//! Pure transforms from decoded service payloads into [`DisplayTree`]s. Nothing
//! in this module performs I/O or keeps state between calls; printing a tree
//! is the job of [`crate::cli`].
//!
//! - [`render_population_result`] — distribution, profiles, model and transitions
//! - [`render_prediction_result`] — single-customer prediction
//! - [`render_segment_analysis`] — per-segment descriptive statistics
//! - [`render_transition_matrix`] — transition probabilities as a table
//! - [`format_metric_name`] / [`format_metric_value`] — label and value formatting

pub mod analysis;
pub mod display;
pub mod format;
pub mod metrics;
pub mod population;
pub mod prediction;
pub mod transitions;

pub use analysis::render_segment_analysis;
pub use display::{DisplayTree, Section, StatItem, Table, TableRow};
pub use format::{format_metric_name, format_metric_value};
pub use metrics::{render_model_info, render_model_metrics};
pub use population::{PopulationView, render_population_result};
pub use prediction::render_prediction_result;
pub use transitions::{render_transition_matrix, validate_transitions};
