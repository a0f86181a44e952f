use thiserror::Error;

/// Errors that can occur during Bulirsch–Stoer integration.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum Error {
    #[error("integration bound is not finite: {value}")]
    NonFiniteTime { value: f64 },

    #[error("invalid reporting interval {dt} over a span of {span}")]
    InvalidReportInterval { dt: f64, span: f64 },

    #[error("{rejections} consecutive trial steps rejected at t = {t} (last step {dt})")]
    TooManyRejections { t: f64, dt: f64, rejections: usize },
}
