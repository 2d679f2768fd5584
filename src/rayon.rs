//! Parallel batch probing.
//!
//! Exposed through
//! [`MediaProbe::probe_many_parallel`](crate::MediaProbe::probe_many_parallel);
//! this module holds only the implementation. Each rayon worker runs an
//! independent probe with its own container, so no state is shared.

use std::path::Path;

use ::rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::{error::SamplerError, metadata::ProbeReport, probe::MediaProbe};

/// Probe every path on the rayon pool, keeping input order.
pub(crate) fn probe_parallel<P: AsRef<Path> + Sync>(
    paths: &[P],
) -> Vec<Result<ProbeReport, SamplerError>> {
    log::debug!("Probing {} files in parallel", paths.len());

    paths
        .par_iter()
        .map(|path| MediaProbe::probe(path))
        .collect()
}
