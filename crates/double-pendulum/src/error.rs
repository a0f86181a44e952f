use std::{error::Error as StdError, io, path::PathBuf};

use pendulum_solvers::transient::bulirsch_stoer;
use thiserror::Error;

use crate::table::Handle;

/// Errors returned by the double pendulum simulation.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("integration failed: {0}")]
    Integration(#[from] bulirsch_stoer::Error),

    #[error("cannot write trajectory to {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("trajectory sink failed")]
    Sink(#[source] Box<dyn StdError + Send + Sync>),

    #[error("no simulation for handle {0}")]
    UnknownHandle(Handle),
}
